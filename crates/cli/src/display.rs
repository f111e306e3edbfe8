use std::fmt::Write;

use billing_engine::AggregationReport;
use models::Subscription;
use rust_decimal::Decimal;
use subscription_service::ListSummary;

pub fn money(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Plain-text rendering of an aggregation report.
pub fn render_report(report: &AggregationReport, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Active subscriptions: {}", report.active_count);
    let _ = writeln!(out, "Monthly total:        {}", money(report.total_monthly, currency));
    let _ = writeln!(out, "Yearly total:         {}", money(report.total_yearly, currency));

    let _ = writeln!(out, "\nBy category (monthly):");
    if report.category_breakdown.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (category, amount) in &report.category_breakdown {
        let _ = writeln!(out, "  {:<20} {}", category, money(*amount, currency));
    }

    let _ = writeln!(out, "\nSpend by month:");
    for point in &report.monthly_series {
        let _ = writeln!(out, "  {:<10} {}", point.label, money(point.amount, currency));
    }
    out
}

pub fn render_subscription_row(sub: &Subscription, currency: &str) -> String {
    format!(
        "{:>4}  {:<24} {:<16} {:>14} {:<12} {}  {}",
        sub.id,
        sub.service_name,
        sub.category,
        money(sub.cost(), currency),
        sub.cadence,
        sub.next_billing_date,
        sub.status
    )
}

pub fn render_summary(summary: &ListSummary, currency: &str) -> String {
    format!(
        "monthly {} | yearly {} | active {}",
        money(summary.monthly_cost, currency),
        money(summary.yearly_cost, currency),
        summary.active_count
    )
}
