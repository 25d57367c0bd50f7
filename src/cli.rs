//! Minimal CLI: validate | props | delete | fmt
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use schemata::Schema;
use schemata::path_de;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// read JSON Schema documents, validate JSON against them, and edit their property trees
#[derive(Parser, Debug)]
#[command(name = "schemata", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate JSON documents against a schema
    Validate(ValidateOut),
    /// list every dotted property path in a schema
    Props(PropsOut),
    /// delete property schemas by dotted path and print the result
    Delete(DeleteOut),
    /// read a schema and write it back out (round trip)
    Fmt(FmtOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// only print failures
    #[arg(long, short)]
    quiet: bool,
}

#[derive(clap::Parser, Debug)]
struct PropsOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,
}

#[derive(clap::Parser, Debug)]
struct DeleteOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// dotted property path to delete (repeatable); missing paths are skipped
    #[arg(long, short, num_args = 1.., required = true)]
    path: Vec<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct FmtOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One decoded input document and where it came from.
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load(&self) -> Result<Schema> {
        let schema: Schema = path_de::read_file_with_path(&self.schema)
            .with_context(|| format!("failed to load schema {}", self.schema.display()))?;
        debug!(schema = %self.schema.display(), "schema loaded");
        Ok(schema)
    }
}

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            if self.ndjson {
                for (i, line) in source.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
                    let label = format!("{source_path_str}:{}", i + 1);
                    let value = path_de::from_str_with_path::<Value>(line)
                        .with_context(|| format!("failed to parse JSON ({label})"))?;
                    out.push(self.select(label, value)?);
                }
            } else {
                let value = path_de::from_str_with_path::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                out.push(self.select(source_path_str, value)?);
            }
        }
        Ok(out)
    }

    fn select(&self, label: String, value: Value) -> Result<Document> {
        match self.json_pointer.as_deref() {
            None => Ok(Document { label, value }),
            Some(ptr) => {
                let value = value
                    .pointer(ptr)
                    .cloned()
                    .ok_or_else(|| anyhow!("JSON pointer {ptr} selects nothing in {label}"))?;
                Ok(Document { label, value })
            }
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// `Ok(false)` when some document failed validation.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Validate(target) => {
                let schema = target.schema_settings.load()?;
                let documents = target.input_settings.load_documents()?;
                info!(count = documents.len(), "validating documents");

                // one shared schema, documents checked in parallel
                let results: Vec<_> = documents
                    .par_iter()
                    .map(|doc| (doc, schema.validate(&doc.value)))
                    .collect();

                let mut failed = 0usize;
                for (doc, result) in &results {
                    match result {
                        Ok(()) => {
                            if !target.quiet {
                                println!("{} {}", "PASS".green().bold(), doc.label);
                            }
                        }
                        Err(error) => {
                            failed += 1;
                            println!("{} {}", "FAIL".red().bold(), doc.label);
                            for violation in error.violations() {
                                println!("  {violation}");
                            }
                        }
                    }
                }
                eprintln!("{} documents, {} failed", results.len(), failed);
                Ok(failed == 0)
            }
            Command::Props(target) => {
                let schema = target.schema_settings.load()?;
                for path in schema.get_all_props() {
                    println!("{path}");
                }
                Ok(true)
            }
            Command::Delete(target) => {
                let mut schema = target.schema_settings.load()?;
                for path in &target.path {
                    if !schema.delete_prop(path)? {
                        eprintln!("{} {path} not found; skipped", "note:".yellow());
                    }
                }
                write_output(target.out.as_deref(), &schema)?;
                Ok(true)
            }
            Command::Fmt(target) => {
                let schema = target.schema_settings.load()?;
                write_output(target.out.as_deref(), &schema)?;
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, schema: &Schema) -> Result<()> {
    let schema_src = serde_json::to_string_pretty(schema)?;
    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(out, &schema_src).with_context(|| format!("failed to write {}", out.display()))?;
    } else {
        println!("{schema_src}");
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
