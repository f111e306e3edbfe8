use billing_engine::{monthly_equivalent, yearly_equivalent};
use models::{BillingCadence, Subscription, SubscriptionStatus};
use rust_decimal::Decimal;
use serde::Serialize;

/// Labels that mean "no filter" when a category comes from free text.
pub const ALL_LABELS: [&str; 2] = ["All", "Все"];

pub fn is_all_label(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || ALL_LABELS.iter().any(|l| l.eq_ignore_ascii_case(s))
}

/// Equality filter over the list of subscriptions. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub status: Option<SubscriptionStatus>,
    pub category: Option<String>,
    pub cadence: Option<BillingCadence>,
}

impl SubscriptionFilter {
    pub fn matches(&self, sub: &Subscription) -> bool {
        let status_ok = self.status.is_none_or(|s| sub.status == s);
        let category_ok = self.category.as_deref().is_none_or(|c| sub.category == c);
        let cadence_ok = self.cadence.is_none_or(|c| sub.cadence == c);
        status_ok && category_ok && cadence_ok
    }

    pub fn apply<'a>(&self, subs: &'a [Subscription]) -> Vec<&'a Subscription> {
        subs.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Totals shown under a filtered list.
///
/// Unlike `billing_engine::aggregate`, costs are summed over every listed subscription
/// whatever its status; only `active_count` looks at the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub monthly_cost: Decimal,
    pub yearly_cost: Decimal,
    pub active_count: usize,
}

impl ListSummary {
    pub fn of(subs: &[&Subscription]) -> Self {
        let mut summary = ListSummary {
            monthly_cost: Decimal::ZERO,
            yearly_cost: Decimal::ZERO,
            active_count: 0,
        };
        for sub in subs {
            summary.monthly_cost += monthly_equivalent(sub.cost(), sub.cadence);
            summary.yearly_cost += yearly_equivalent(sub.cost(), sub.cadence);
            if sub.is_active() {
                summary.active_count += 1;
            }
        }
        summary
    }
}
