//! # Billing Engine
//!
//! Recurring-billing aggregation over a snapshot of subscriptions.
//!
//! - [`cadence`]: normalizes a cost across billing cadences and decides whether a
//!   subscription is charged in a given month
//! - [`aggregate`]: folds active subscriptions into totals, a per-category breakdown
//!   and a trailing six-month spend series
//! - [`report`]: wraps a report with metadata and writes it as JSON
//!
//! Everything except [`report::write_report_json`] is pure: the reference instant is
//! always passed in, never read from the clock.
//!
//! ```rust,no_run
//! use billing_engine::aggregate;
//! use chrono::Local;
//!
//! let report = aggregate(&[], Local::now().naive_local());
//! assert_eq!(report.monthly_series.len(), 6);
//! ```

pub mod aggregate;
pub mod cadence;
pub mod report;

pub use crate::aggregate::{
    AggregationReport, MonthlyDataPoint, SERIES_MONTHS, aggregate, trailing_months,
};
pub use crate::cadence::{NormalizedCost, bills_in_month, monthly_equivalent, yearly_equivalent};
pub use crate::report::{ReportDocument, ReportMetadata, build_report_document, write_report_json};
