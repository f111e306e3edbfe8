use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime};
use models::Subscription;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::aggregate::{AggregationReport, aggregate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    /// `YYYY-MM` of the last month in the series.
    pub reference_month: String,
    pub currency: String,
}

/// Aggregation report plus the context needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub report: AggregationReport,
}

/// Runs the aggregation and wraps the result in a document.
///
/// `generated_at` is taken from the caller, like `reference`, so two calls with the same
/// inputs produce the same document.
pub fn build_report_document(
    records: &[Subscription],
    reference: NaiveDateTime,
    currency: &str,
    generated_at: String,
) -> ReportDocument {
    let report = aggregate(records, reference);
    ReportDocument {
        metadata: ReportMetadata {
            generated_at,
            reference_month: format!("{}-{:02}", reference.year(), reference.month()),
            currency: currency.to_string(),
        },
        report,
    }
}

pub fn write_report_json(doc: &ReportDocument, out_path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output dir: {}", parent.display()))?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    fs::write(out_path, json).with_context(|| format!("Writing report: {}", out_path.display()))?;
    Ok(())
}
