use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use models::{BillingCadence, SubscriptionSnapshot, SubscriptionStatus};
use rust_decimal::Decimal;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Report {
    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
    pub fn print(&self, file: &str) {
        for w in &self.warnings {
            println!("[WARN] {}: {}", file, w);
        }
        for e in &self.errors {
            println!("[ERROR] {}: {}", file, e);
        }
    }
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn cost_of(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Checks a raw snapshot document before it is loaded as typed subscriptions.
pub fn validate_snapshot(val: &Value) -> Report {
    let mut rep = Report::default();

    let Some(entries) = val.get("subscriptions").and_then(|v| v.as_array()) else {
        rep.error("missing or non-array 'subscriptions'");
        return rep;
    };

    let mut seen_ids: HashSet<u32> = HashSet::new();
    for (i, e) in entries.iter().enumerate() {
        if !e.is_object() {
            rep.error(format!("subscriptions[{}] is not an object", i));
            continue;
        }

        match e.get("cost").map(cost_of) {
            None => rep.error(format!("subscriptions[{}] missing 'cost'", i)),
            Some(None) => rep.error(format!("subscriptions[{}] has non-numeric 'cost'", i)),
            Some(Some(c)) if c < Decimal::ZERO => {
                rep.error(format!("subscriptions[{}] has negative cost {}", i, c))
            }
            Some(Some(_)) => {}
        }

        match e.get("next_billing_date").map(|v| v.as_str()) {
            None => rep.error(format!("subscriptions[{}] missing 'next_billing_date'", i)),
            Some(None) => rep.error(format!(
                "subscriptions[{}] has non-string 'next_billing_date'",
                i
            )),
            Some(Some(d)) => {
                if NaiveDate::parse_from_str(d, "%Y-%m-%d").is_err() {
                    rep.error(format!(
                        "subscriptions[{}] invalid next_billing_date '{}', expected YYYY-MM-DD",
                        i, d
                    ));
                }
            }
        }

        match e.get("status").map(|v| v.as_str()) {
            None => {}
            Some(None) => rep.error(format!("subscriptions[{}] has non-string 'status'", i)),
            Some(Some(s)) => {
                if SubscriptionStatus::from_label(s).is_none() {
                    rep.error(format!("subscriptions[{}] has unknown status '{}'", i, s));
                }
            }
        }

        let cadence = e.get("cadence").or_else(|| e.get("payment_period"));
        match cadence.map(|v| v.as_str()) {
            None => {}
            Some(None) => rep.error(format!("subscriptions[{}] has non-string 'cadence'", i)),
            Some(Some(c)) if BillingCadence::from_label(c) == BillingCadence::Unrecognized => {
                rep.warn(format!(
                    "subscriptions[{}] has unrecognized cadence '{}' (costed as monthly)",
                    i, c
                ));
            }
            Some(Some(_)) => {}
        }

        let name = e
            .get("service_name")
            .or_else(|| e.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if name.trim().is_empty() {
            rep.warn(format!("subscriptions[{}] has no service name", i));
        }

        match e.get("id").map(|v| v.as_u64().and_then(|id| u32::try_from(id).ok())) {
            None => {}
            Some(None) => rep.error(format!(
                "subscriptions[{}] has id {}, expected an integer in 0..={}",
                i,
                e["id"],
                u32::MAX
            )),
            Some(Some(id)) => {
                // id 0 means "not assigned yet"; the repository numbers those on load
                if id != 0 && !seen_ids.insert(id) {
                    rep.warn(format!("subscriptions[{}] duplicates id {}", i, id));
                }
            }
        }
    }

    // The typed loader is the final word; report what it rejects if nothing above did.
    if !rep.has_errors() {
        if let Err(err) = serde_json::from_value::<SubscriptionSnapshot>(val.clone()) {
            rep.error(format!("snapshot does not load: {}", err));
        }
    }

    rep
}
