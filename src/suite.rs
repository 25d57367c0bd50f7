//! Fixture suites: a directory of schemas and the documents that must pass
//! or fail against them.
//!
//! For every `<name>.json` schema, each `<name>_pass*.json` document must
//! validate and each `<name>_fail*.json` document must not.
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{SchemaFormatError, ValidationError};
use crate::path_de::{self, DecodeError};
use crate::schema::Schema;

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot list fixtures: {0}")]
    Glob(#[from] glob::GlobError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("schema {} is invalid: {source}", .file.display())]
    Schema {
        file: PathBuf,
        #[source]
        source: SchemaFormatError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Pass,
    Fail,
}

#[derive(Debug)]
pub struct CaseOutcome {
    pub schema: String,
    pub document: PathBuf,
    pub expected: Expectation,
    /// The validation result as observed.
    pub result: Result<(), ValidationError>,
}

impl CaseOutcome {
    pub fn succeeded(&self) -> bool {
        match self.expected {
            Expectation::Pass => self.result.is_ok(),
            Expectation::Fail => self.result.is_err(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    /// Schema names in the order they ran.
    pub schemas: Vec<String>,
    pub cases: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases.iter().filter(|c| !c.succeeded())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Run every schema in `dir` against its pass/fail documents.
pub fn run_dir(dir: &Path) -> Result<SuiteReport, SuiteError> {
    let mut report = SuiteReport::default();
    for schema_file in list(dir, "*.json")? {
        let Some(name) = schema_file.file_stem().and_then(|s| s.to_str()) else { continue };
        if name.contains("_pass") || name.contains("_fail") {
            continue;
        }
        let name = name.to_string();
        let doc: Value = path_de::read_file_with_path(&schema_file)?;
        let schema = Schema::from_value(&doc)
            .map_err(|source| SuiteError::Schema { file: schema_file.clone(), source })?;
        debug!(schema = %name, "loaded fixture schema");

        for (expected, suffix) in [(Expectation::Pass, "_pass"), (Expectation::Fail, "_fail")] {
            for document in list(dir, &format!("{name}{suffix}*.json"))? {
                let value: Value = path_de::read_file_with_path(&document)?;
                let result = schema.validate(&value);
                let outcome = CaseOutcome { schema: name.clone(), document, expected, result };
                info!(
                    schema = %outcome.schema,
                    document = %outcome.document.display(),
                    ok = outcome.succeeded(),
                    "fixture case"
                );
                report.cases.push(outcome);
            }
        }
        report.schemas.push(name);
    }
    Ok(report)
}

/// Files in `dir` matching `file_pattern`, sorted.
fn list(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>, SuiteError> {
    let pattern = format!("{}/{file_pattern}", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut out = glob::glob(&pattern)
        .map_err(|source| SuiteError::Pattern { pattern: pattern.clone(), source })?
        .collect::<Result<Vec<_>, _>>()?;
    out.sort();
    Ok(out)
}
