use anyhow::{Context, Result};
use billing_engine::{build_report_document, write_report_json};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use subscription_cli::{display::render_report, init_tracing, reference_instant};
use subscription_service::load_snapshot;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "subscription-report",
    about = "Aggregate subscription spend: totals, categories and the last six months."
)]
struct Args {
    /// Path to the subscription snapshot; defaults to `snapshot_path` from settings
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Path to settings.json
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Also write the report document as JSON to this path
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Last month of the series, as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    reference: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = settings_loader::load_or_default(args.settings.as_ref())?;
    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| PathBuf::from(&settings.snapshot_path));
    let reference = reference_instant(args.reference.as_deref())?;

    info!(
        snapshot = %snapshot_path.display(),
        reference = %reference.date(),
        "generating subscription report"
    );

    let snapshot = load_snapshot(&snapshot_path)
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;
    let doc = build_report_document(
        &snapshot.subscriptions,
        reference,
        &settings.currency,
        Local::now().to_rfc3339(),
    );

    print!("{}", render_report(&doc.report, &settings.currency));

    if let Some(out_path) = args.out {
        write_report_json(&doc, &out_path, args.pretty).context("write report json")?;
        info!(out = %out_path.display(), "report written");
    }
    Ok(())
}
