//! Pluggable `format` checks.
//!
//! A format name resolves through a [`FormatRegistry`]. Names with no
//! registered check always pass. The built-in checks only look at strings
//! and let every other kind through.
use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// A named format validator.
pub trait FormatCheck: Send + Sync {
    /// `Err` carries a human-readable reason.
    fn check(&self, value: &Value) -> Result<(), String>;
}

impl<F> FormatCheck for F
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync,
{
    fn check(&self, value: &Value) -> Result<(), String> {
        self(value)
    }
}

#[derive(Clone)]
pub struct FormatRegistry {
    checks: HashMap<String, Arc<dyn FormatCheck>>,
}

static SHARED: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::default);

impl FormatRegistry {
    /// A registry with no checks: every format passes.
    pub fn empty() -> Self {
        Self { checks: HashMap::new() }
    }

    /// Process-wide instance of [`FormatRegistry::default`].
    pub fn shared() -> &'static FormatRegistry {
        &SHARED
    }

    /// Add or replace the check for `name`.
    pub fn register(&mut self, name: impl Into<String>, check: impl FormatCheck + 'static) -> &mut Self {
        self.checks.insert(name.into(), Arc::new(check));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn FormatCheck> {
        self.checks.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

impl Default for FormatRegistry {
    /// Registers `date-time`, `email`, `hostname`, `ipv4`, `ipv6`, `uri` and `regex`.
    fn default() -> Self {
        let mut r = Self::empty();
        r.register("date-time", on_strings(date_time))
            .register("email", on_strings(email))
            .register("hostname", on_strings(hostname))
            .register("ipv4", on_strings(ipv4))
            .register("ipv6", on_strings(ipv6))
            .register("uri", on_strings(uri))
            .register("regex", on_strings(regex_source));
        r
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry").field("formats", &self.names()).finish()
    }
}

// ------------------------------ Built-ins --------------------------------- //

fn on_strings(f: fn(&str) -> Result<(), String>) -> impl FormatCheck {
    move |v: &Value| match v.as_str() {
        Some(s) => f(s),
        None => Ok(()),
    }
}

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));
static HOST_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("static regex"));
static URI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S*$").expect("static regex"));

fn date_time(s: &str) -> Result<(), String> {
    chrono::DateTime::parse_from_rfc3339(s).map(|_| ()).map_err(|e| e.to_string())
}

fn email(s: &str) -> Result<(), String> {
    if EMAIL.is_match(s) { Ok(()) } else { Err("expected local@domain".into()) }
}

fn hostname(s: &str) -> Result<(), String> {
    if s.is_empty() || s.len() > 253 {
        return Err("hostname must be 1 to 253 characters".into());
    }
    match s.split('.').find(|label| !HOST_LABEL.is_match(label)) {
        Some(label) => Err(format!("invalid label `{label}`")),
        None => Ok(()),
    }
}

fn ipv4(s: &str) -> Result<(), String> {
    s.parse::<Ipv4Addr>().map(|_| ()).map_err(|e| e.to_string())
}

fn ipv6(s: &str) -> Result<(), String> {
    s.parse::<Ipv6Addr>().map(|_| ()).map_err(|e| e.to_string())
}

fn uri(s: &str) -> Result<(), String> {
    if URI.is_match(s) { Ok(()) } else { Err("expected an absolute URI with a scheme".into()) }
}

fn regex_source(s: &str) -> Result<(), String> {
    Regex::new(s).map(|_| ()).map_err(|e| e.to_string())
}
