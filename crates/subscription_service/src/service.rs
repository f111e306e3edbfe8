use billing_engine::{AggregationReport, aggregate};
use chrono::{NaiveDate, NaiveDateTime};
use models::{Subscription, SubscriptionStatus};
use tracing::info;

use crate::draft::{NewSubscription, SubscriptionChanges};
use crate::error::{Result, ServiceError};
use crate::filter::{SubscriptionFilter, is_all_label};
use crate::repository::SubscriptionRepository;

/// Subscription management on top of a repository.
///
/// Every mutating call saves through the repository before returning. Reports are
/// recomputed from the current records on each call, so callers simply ask again after
/// a change.
pub struct SubscriptionService<R: SubscriptionRepository> {
    repository: R,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    pub fn all_subscriptions(&self) -> &[Subscription] {
        self.repository.all()
    }

    pub fn active_subscriptions(&self) -> Vec<&Subscription> {
        self.repository.all().iter().filter(|s| s.is_active()).collect()
    }

    /// Subscriptions in `category`. A blank category or an "All" label returns everything.
    pub fn subscriptions_by_category(&self, category: &str) -> Vec<&Subscription> {
        if is_all_label(category) {
            return self.repository.all().iter().collect();
        }
        self.repository
            .all()
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    pub fn filtered(&self, filter: &SubscriptionFilter) -> Vec<&Subscription> {
        filter.apply(self.repository.all())
    }

    /// Active subscriptions billing within `window_days` of `today`, soonest first.
    pub fn upcoming(&self, today: NaiveDate, window_days: i64) -> Vec<&Subscription> {
        let mut found: Vec<&Subscription> = self
            .repository
            .all()
            .iter()
            .filter(|s| s.is_active() && s.is_upcoming(today, window_days))
            .collect();
        found.sort_by_key(|s| s.next_billing_date);
        found
    }

    pub fn add_subscription(&mut self, subscription: Subscription) -> Result<u32> {
        let name = subscription.service_name.clone();
        let id = self.repository.add(subscription)?;
        self.repository.save()?;
        info!(id, name = %name, "added subscription");
        Ok(id)
    }

    /// Adds a subscription built from `draft`, added on `today`.
    pub fn create_subscription(
        &mut self,
        draft: NewSubscription,
        default_category: &str,
        today: NaiveDate,
    ) -> Result<u32> {
        let subscription = draft.into_subscription(default_category, today)?;
        self.add_subscription(subscription)
    }

    /// Applies `changes` to subscription `id`.
    pub fn apply_changes(&mut self, id: u32, changes: &SubscriptionChanges) -> Result<()> {
        let current = self.repository.get(id).ok_or(ServiceError::NotFound(id))?;
        let edited = changes.apply_to(current)?;
        self.edit_subscription(id, &edited)
    }

    /// Replaces the editable fields of subscription `id` with those of `edited`.
    pub fn edit_subscription(&mut self, id: u32, edited: &Subscription) -> Result<()> {
        let current = self.repository.get_mut(id).ok_or(ServiceError::NotFound(id))?;
        current.copy_from(edited);
        self.repository.save()?;
        info!(id, "edited subscription");
        Ok(())
    }

    pub fn update_status(&mut self, id: u32, status: SubscriptionStatus) -> Result<()> {
        let mut subscription = self
            .repository
            .get(id)
            .cloned()
            .ok_or(ServiceError::NotFound(id))?;
        subscription.status = status;
        self.repository.update(subscription)?;
        self.repository.save()?;
        info!(id, status = %status, "updated subscription status");
        Ok(())
    }

    pub fn remove_subscription(&mut self, id: u32) -> Result<Subscription> {
        let removed = self.repository.remove(id)?;
        self.repository.save()?;
        info!(id, name = %removed.service_name, "removed subscription");
        Ok(removed)
    }

    pub fn save(&mut self) -> Result<()> {
        self.repository.save()
    }

    /// Aggregation report over the current records.
    pub fn report(&self, reference: NaiveDateTime) -> AggregationReport {
        aggregate(self.repository.all(), reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryRepository, JsonFileRepository};
    use models::BillingCadence;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> SubscriptionService<InMemoryRepository> {
        let mut service = SubscriptionService::new(InMemoryRepository::new());
        for (name, category, cost, cadence, next) in [
            ("Netflix", "Стриминг", dec!(599), BillingCadence::Monthly, date(2024, 6, 12)),
            ("Okko", "Стриминг", dec!(399), BillingCadence::Monthly, date(2024, 6, 20)),
            ("Adobe", "ПО", dec!(12000), BillingCadence::Yearly, date(2024, 6, 11)),
        ] {
            let sub = Subscription::new(name, category, cost, cadence, next).unwrap();
            service.add_subscription(sub).unwrap();
        }
        service
    }

    #[test]
    fn test_active_subscriptions() {
        let mut service = seeded();
        service.update_status(2, SubscriptionStatus::Suspended).unwrap();

        let active = service.active_subscriptions();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|s| s.status == SubscriptionStatus::Active));
    }

    #[test]
    fn test_subscriptions_by_category() {
        let service = seeded();
        let streaming = service.subscriptions_by_category("Стриминг");
        assert_eq!(streaming.len(), 2);
        assert!(streaming.iter().all(|s| s.category == "Стриминг"));

        assert_eq!(service.subscriptions_by_category("Все").len(), 3);
        assert_eq!(service.subscriptions_by_category("").len(), 3);
        assert!(service.subscriptions_by_category("Games").is_empty());
    }

    #[test]
    fn test_update_status_unknown_id() {
        let mut service = seeded();
        let err = service.update_status(999, SubscriptionStatus::Suspended).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(999)));
    }

    #[test]
    fn test_remove_subscription() {
        let mut service = seeded();
        let removed = service.remove_subscription(1).unwrap();
        assert_eq!(removed.service_name, "Netflix");
        assert_eq!(service.all_subscriptions().len(), 2);
        assert!(matches!(
            service.remove_subscription(1),
            Err(ServiceError::NotFound(1))
        ));
    }

    #[test]
    fn test_edit_subscription_keeps_id() {
        let mut service = seeded();
        let edited = Subscription::new(
            "Netflix Premium",
            "Стриминг",
            dec!(999),
            BillingCadence::Monthly,
            date(2024, 7, 12),
        )
        .unwrap()
        .with_id(42);
        service.edit_subscription(1, &edited).unwrap();

        let stored = service.repository().get(1).unwrap();
        assert_eq!(stored.service_name, "Netflix Premium");
        assert_eq!(stored.cost(), dec!(999));
        assert!(service.repository().get(42).is_none());
    }

    #[test]
    fn test_create_subscription_defaults() {
        let mut service = seeded();
        let draft = NewSubscription::new("Kinopoisk", dec!(299));
        let id = service.create_subscription(draft, "Other", date(2024, 6, 10)).unwrap();
        assert_eq!(id, 4);

        let stored = service.repository().get(id).unwrap();
        assert_eq!(stored.category, "Other");
        assert_eq!(stored.next_billing_date, date(2024, 6, 11));
        assert_eq!(stored.added_date, Some(date(2024, 6, 10)));
    }

    #[test]
    fn test_create_subscription_negative_cost_is_model_error() {
        let mut service = seeded();
        let draft = NewSubscription::new("Bad", dec!(-1));
        let err = service.create_subscription(draft, "Other", date(2024, 6, 10)).unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        assert_eq!(service.all_subscriptions().len(), 3);
    }

    #[test]
    fn test_apply_changes() {
        let mut service = seeded();
        let changes = SubscriptionChanges {
            cost: Some(dec!(699)),
            notes: Some("family plan".to_string()),
            ..Default::default()
        };
        service.apply_changes(1, &changes).unwrap();

        let stored = service.repository().get(1).unwrap();
        assert_eq!(stored.cost(), dec!(699));
        assert_eq!(stored.notes, "family plan");
        assert_eq!(stored.service_name, "Netflix");

        assert!(matches!(
            service.apply_changes(99, &changes),
            Err(ServiceError::NotFound(99))
        ));
    }

    #[test]
    fn test_upcoming_sorted_and_active_only() {
        let mut service = seeded();
        let today = date(2024, 6, 10);

        let names: Vec<&str> = service
            .upcoming(today, 3)
            .iter()
            .map(|s| s.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["Adobe", "Netflix"]);

        service.update_status(3, SubscriptionStatus::Cancelled).unwrap();
        assert_eq!(service.upcoming(today, 3).len(), 1);
    }

    #[test]
    fn test_report_reflects_changes() {
        let mut service = seeded();
        let reference = date(2024, 6, 30).and_hms_opt(0, 0, 0).unwrap();

        let before = service.report(reference);
        assert_eq!(before.active_count, 3);
        assert_eq!(before.total_monthly, dec!(1998));

        service.update_status(3, SubscriptionStatus::Suspended).unwrap();
        let after = service.report(reference);
        assert_eq!(after.active_count, 2);
        assert_eq!(after.total_monthly, dec!(998));
    }

    #[test]
    fn test_mutations_are_persisted_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.json");

        let mut service = SubscriptionService::new(JsonFileRepository::open(&path).unwrap());
        let sub = Subscription::new(
            "VPN",
            "Security",
            dec!(250),
            BillingCadence::Monthly,
            date(2024, 6, 1),
        )
        .unwrap();
        let id = service.add_subscription(sub).unwrap();
        service.update_status(id, SubscriptionStatus::Suspended).unwrap();

        let reopened = JsonFileRepository::open(&path).unwrap();
        assert_eq!(reopened.get(id).unwrap().status, SubscriptionStatus::Suspended);
    }
}
