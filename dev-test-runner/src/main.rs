use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use schemata::suite::{self, Expectation};
use tracing_subscriber::EnvFilter;

/// run a directory of `<name>.json` schemas against their `_pass*` / `_fail*` documents
#[derive(Parser, Debug)]
struct Cli {
    /// fixture directory
    #[arg(default_value = "tests/fixtures")]
    dir: PathBuf,

    /// print every case, not only failures
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let report = suite::run_dir(&cli.dir)
        .with_context(|| format!("fixture suite in {} did not run", cli.dir.display()))?;

    for case in &report.cases {
        let expected = match case.expected {
            Expectation::Pass => "pass",
            Expectation::Fail => "fail",
        };
        if case.succeeded() {
            if cli.verbose {
                println!("{} {} (expected {expected})", "ok".green(), case.document.display());
            }
            continue;
        }
        println!("{} {} (expected {expected})", "FAILED".red().bold(), case.document.display());
        if let Err(error) = &case.result {
            for violation in error.violations() {
                println!("    {violation}");
            }
        }
    }

    let failed = report.failures().count();
    let summary = format!(
        "{} schemas, {} cases, {} failed",
        report.schemas.len(),
        report.cases.len(),
        failed
    );
    if failed == 0 {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
    Ok(report.is_success())
}
