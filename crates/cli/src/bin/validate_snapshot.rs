use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::Value;
use std::{fs, path::PathBuf};
use subscription_cli::{init_tracing, validate::validate_snapshot};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "validate-snapshot", about = "Check subscription snapshot files for problems.")]
struct Args {
    /// Snapshot files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut any_errors = false;
    for path in &args.files {
        let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let txt = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let val: Value = match serde_json::from_str(&txt) {
            Ok(v) => v,
            Err(e) => {
                println!("[ERROR] {}: invalid JSON: {}", file_name, e);
                any_errors = true;
                continue;
            }
        };
        let report = validate_snapshot(&val);
        debug!(
            file = file_name,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated snapshot"
        );
        report.print(file_name);
        if report.has_errors() {
            any_errors = true;
        }
    }

    if any_errors {
        Err(anyhow!("Validation failed"))
    } else {
        println!("All snapshot files passed validation.");
        Ok(())
    }
}
