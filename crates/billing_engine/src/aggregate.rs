use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use models::Subscription;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cadence::{NormalizedCost, bills_in_month};

/// Number of calendar months in the trailing spend series, reference month included.
pub const SERIES_MONTHS: usize = 6;

/// Summed raw spend for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyDataPoint {
    /// First day of the month.
    pub month: NaiveDate,
    /// Display label, e.g. `Mar 2024`.
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    pub total_monthly: Decimal,
    pub total_yearly: Decimal,
    pub active_count: usize,
    pub category_breakdown: BTreeMap<String, Decimal>,
    pub monthly_series: Vec<MonthlyDataPoint>,
}

/// Aggregates a snapshot of subscriptions as seen at `reference`.
///
/// Only active subscriptions count. Totals and the category breakdown use the
/// cadence-normalized monthly/yearly equivalents. The monthly series instead sums the
/// raw cost of every subscription billing in that month, so a yearly plan shows up as
/// one lump in its billing month rather than a pro-rated twelfth every month.
pub fn aggregate(records: &[Subscription], reference: NaiveDateTime) -> AggregationReport {
    let active: Vec<&Subscription> = records.iter().filter(|s| s.is_active()).collect();
    debug!(
        total = records.len(),
        active = active.len(),
        reference = %reference.date(),
        "aggregating subscriptions"
    );

    let mut total_monthly = Decimal::ZERO;
    let mut total_yearly = Decimal::ZERO;
    let mut category_breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
    for sub in &active {
        let normalized = NormalizedCost::of(sub);
        total_monthly += normalized.monthly;
        total_yearly += normalized.yearly;
        *category_breakdown
            .entry(sub.category.clone())
            .or_insert(Decimal::ZERO) += normalized.monthly;
    }

    let monthly_series = trailing_months(reference.year(), reference.month(), SERIES_MONTHS)
        .into_iter()
        .map(|(year, month)| month_data_point(&active, year, month))
        .collect();

    AggregationReport {
        total_monthly,
        total_yearly,
        active_count: active.len(),
        category_breakdown,
        monthly_series,
    }
}

fn month_data_point(active: &[&Subscription], year: i32, month: u32) -> MonthlyDataPoint {
    let amount: Decimal = active
        .iter()
        .filter(|s| bills_in_month(s.cadence, s.next_billing_date, year, month))
        .map(|s| s.cost())
        .sum();
    // (year, month) comes from trailing_months, so day 1 always exists
    let first_day = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    MonthlyDataPoint {
        month: first_day,
        label: first_day.format("%b %Y").to_string(),
        // series totals round half to even, unlike the per-record division
        amount: amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
    }
}

/// `count` (year, month) pairs ending at the given month, oldest first.
///
/// Works on a flat month index, so there is no day-of-month clamping to worry about.
pub fn trailing_months(year: i32, month: u32, count: usize) -> Vec<(i32, u32)> {
    let end = year as i64 * 12 + (month as i64 - 1);
    (0..count as i64)
        .rev()
        .map(|back| {
            let idx = end - back;
            (idx.div_euclid(12) as i32, idx.rem_euclid(12) as u32 + 1)
        })
        .collect()
}
