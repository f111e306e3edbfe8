//! Subscription management around the billing engine: storage behind a
//! repository trait, list filtering and the service used by the binaries.

pub mod draft;
pub mod error;
pub mod filter;
pub mod repository;
pub mod service;

pub use crate::draft::{NewSubscription, SubscriptionChanges};
pub use crate::error::{Result, ServiceError};
pub use crate::filter::{ListSummary, SubscriptionFilter, is_all_label};
pub use crate::repository::{
    InMemoryRepository, JsonFileRepository, SubscriptionRepository, load_snapshot, write_snapshot,
};
pub use crate::service::SubscriptionService;
