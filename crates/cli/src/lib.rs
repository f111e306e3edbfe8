//! Shared pieces of the subscription binaries: logging setup, reference-date parsing,
//! report rendering and snapshot validation.

pub mod display;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

const DEFAULT_LOG_FILTER: &str =
    "subscription_cli=info,subscription_service=info,billing_engine=info,settings_loader=warn";

/// Initializes tracing once per process. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `--reference YYYY-MM-DD`, defaulting to the local clock.
pub fn reference_instant(arg: Option<&str>) -> Result<NaiveDateTime> {
    match arg {
        Some(s) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid reference date '{s}', expected YYYY-MM-DD"))?;
            date.and_hms_opt(0, 0, 0)
                .with_context(|| format!("invalid reference date '{s}'"))
        }
        None => Ok(Local::now().naive_local()),
    }
}
