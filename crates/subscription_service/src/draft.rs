use chrono::{Days, NaiveDate};
use models::{BillingCadence, Subscription, SubscriptionStatus};
use rust_decimal::Decimal;

use crate::error::Result;

/// Input for a subscription that is about to be added.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_name: String,
    /// `None` or blank falls back to the configured default category.
    pub category: Option<String>,
    pub cost: Decimal,
    pub cadence: BillingCadence,
    /// `None` means tomorrow.
    pub next_billing_date: Option<NaiveDate>,
    pub management_url: String,
    pub notes: String,
}

impl NewSubscription {
    pub fn new(service_name: impl Into<String>, cost: Decimal) -> Self {
        Self {
            service_name: service_name.into(),
            category: None,
            cost,
            cadence: BillingCadence::Monthly,
            next_billing_date: None,
            management_url: String::new(),
            notes: String::new(),
        }
    }

    /// Builds an active subscription added on `today`. Fails on a negative cost.
    pub fn into_subscription(
        self,
        default_category: &str,
        today: NaiveDate,
    ) -> Result<Subscription> {
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_category.to_string());
        let next_billing_date = self
            .next_billing_date
            .or_else(|| today.checked_add_days(Days::new(1)))
            .unwrap_or(today);

        let mut subscription = Subscription::new(
            self.service_name,
            category,
            self.cost,
            self.cadence,
            next_billing_date,
        )?
        .with_added_date(today);
        subscription.management_url = self.management_url;
        subscription.notes = self.notes;
        Ok(subscription)
    }
}

/// Field changes for an existing subscription. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionChanges {
    pub service_name: Option<String>,
    pub category: Option<String>,
    pub cost: Option<Decimal>,
    pub cadence: Option<BillingCadence>,
    pub next_billing_date: Option<NaiveDate>,
    pub management_url: Option<String>,
    pub notes: Option<String>,
    pub status: Option<SubscriptionStatus>,
}

impl SubscriptionChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns a copy of `current` with the changes applied. Fails on a negative cost.
    pub fn apply_to(&self, current: &Subscription) -> Result<Subscription> {
        let mut edited = current.clone();
        if let Some(name) = &self.service_name {
            edited.service_name = name.clone();
        }
        if let Some(category) = &self.category {
            edited.category = category.clone();
        }
        if let Some(cost) = self.cost {
            edited.set_cost(cost)?;
        }
        if let Some(cadence) = self.cadence {
            edited.cadence = cadence;
        }
        if let Some(date) = self.next_billing_date {
            edited.next_billing_date = date;
        }
        if let Some(url) = &self.management_url {
            edited.management_url = url.clone();
        }
        if let Some(notes) = &self.notes {
            edited.notes = notes.clone();
        }
        if let Some(status) = self.status {
            edited.status = status;
        }
        Ok(edited)
    }
}
