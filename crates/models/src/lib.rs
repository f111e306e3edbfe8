
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	#[error("cost cannot be negative (got {0})")]
	NegativeCost(Decimal),

	#[error("unknown subscription status: {0}")]
	UnknownStatus(String),
}

// Billing cadence
//
// Labels that do not match a known cadence are kept as `Unrecognized` instead of
// failing; the calculators in billing_engine decide what that means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingCadence {
	Monthly,
	Quarterly,
	Yearly,
	Unrecognized,
}

impl BillingCadence {
	/// Parses a cadence label, case-insensitive. Accepts the legacy Russian labels.
	pub fn from_label(s: &str) -> Self {
		match s.trim().to_lowercase().as_str() {
			"monthly" | "month" | "ежемесячно" => BillingCadence::Monthly,
			"quarterly" | "quarter" | "ежеквартально" => BillingCadence::Quarterly,
			"yearly" | "annual" | "annually" | "year" | "ежегодно" => BillingCadence::Yearly,
			_ => BillingCadence::Unrecognized,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			BillingCadence::Monthly => "monthly",
			BillingCadence::Quarterly => "quarterly",
			BillingCadence::Yearly => "yearly",
			BillingCadence::Unrecognized => "unrecognized",
		}
	}
}

impl From<String> for BillingCadence {
	fn from(s: String) -> Self {
		BillingCadence::from_label(&s)
	}
}

impl From<BillingCadence> for String {
	fn from(c: BillingCadence) -> Self {
		c.label().to_string()
	}
}

impl std::fmt::Display for BillingCadence {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.pad(self.label())
	}
}

// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SubscriptionStatus {
	Active,
	Suspended,
	Cancelled,
}

impl SubscriptionStatus {
	pub fn from_label(s: &str) -> Option<Self> {
		match s.trim().to_lowercase().as_str() {
			"active" | "активна" => Some(SubscriptionStatus::Active),
			"suspended" | "paused" | "приостановлена" => Some(SubscriptionStatus::Suspended),
			"cancelled" | "canceled" | "отменена" => Some(SubscriptionStatus::Cancelled),
			_ => None,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			SubscriptionStatus::Active => "active",
			SubscriptionStatus::Suspended => "suspended",
			SubscriptionStatus::Cancelled => "cancelled",
		}
	}
}

impl TryFrom<String> for SubscriptionStatus {
	type Error = ModelError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		SubscriptionStatus::from_label(&s).ok_or(ModelError::UnknownStatus(s))
	}
}

impl From<SubscriptionStatus> for String {
	fn from(s: SubscriptionStatus) -> Self {
		s.label().to_string()
	}
}

impl std::fmt::Display for SubscriptionStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.pad(self.label())
	}
}

/// A recurring paid subscription.
///
/// `cost` is private so the non-negative invariant holds for every value of this
/// type, including ones read back from a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SubscriptionRaw")]
pub struct Subscription {
	pub id: u32,
	pub service_name: String,
	pub category: String,
	cost: Decimal,
	pub cadence: BillingCadence,
	pub next_billing_date: NaiveDate,
	pub management_url: String,
	pub notes: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub added_date: Option<NaiveDate>,
	pub status: SubscriptionStatus,
}

// Raw input entry, validated into `Subscription`
#[derive(Debug, Deserialize)]
struct SubscriptionRaw {
	#[serde(default)]
	id: u32,
	#[serde(default, alias = "name")]
	service_name: String,
	#[serde(default = "default_category")]
	category: String,
	cost: Decimal,
	#[serde(default = "default_cadence", alias = "payment_period")]
	cadence: BillingCadence,
	next_billing_date: NaiveDate,
	#[serde(default)]
	management_url: String,
	#[serde(default)]
	notes: String,
	#[serde(default)]
	added_date: Option<NaiveDate>,
	#[serde(default = "default_status")]
	status: SubscriptionStatus,
}

fn default_category() -> String {
	DEFAULT_CATEGORY.to_string()
}

fn default_cadence() -> BillingCadence {
	BillingCadence::Monthly
}

fn default_status() -> SubscriptionStatus {
	SubscriptionStatus::Active
}

impl TryFrom<SubscriptionRaw> for Subscription {
	type Error = ModelError;

	fn try_from(raw: SubscriptionRaw) -> Result<Self, Self::Error> {
		let mut sub = Subscription::new(
			raw.service_name,
			raw.category,
			raw.cost,
			raw.cadence,
			raw.next_billing_date,
		)?;
		sub.id = raw.id;
		sub.management_url = raw.management_url;
		sub.notes = raw.notes;
		sub.added_date = raw.added_date;
		sub.status = raw.status;
		Ok(sub)
	}
}

impl Subscription {
	/// Creates an active subscription. Fails if `cost` is negative.
	pub fn new(
		service_name: impl Into<String>,
		category: impl Into<String>,
		cost: Decimal,
		cadence: BillingCadence,
		next_billing_date: NaiveDate,
	) -> Result<Self, ModelError> {
		if cost < Decimal::ZERO {
			return Err(ModelError::NegativeCost(cost));
		}
		Ok(Self {
			id: 0,
			service_name: service_name.into(),
			category: category.into(),
			cost,
			cadence,
			next_billing_date,
			management_url: String::new(),
			notes: String::new(),
			added_date: None,
			status: SubscriptionStatus::Active,
		})
	}

	pub fn with_id(mut self, id: u32) -> Self {
		self.id = id;
		self
	}

	pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
		self.status = status;
		self
	}

	pub fn with_added_date(mut self, date: NaiveDate) -> Self {
		self.added_date = Some(date);
		self
	}

	pub fn cost(&self) -> Decimal {
		self.cost
	}

	pub fn set_cost(&mut self, cost: Decimal) -> Result<(), ModelError> {
		if cost < Decimal::ZERO {
			return Err(ModelError::NegativeCost(cost));
		}
		self.cost = cost;
		Ok(())
	}

	pub fn is_active(&self) -> bool {
		self.status == SubscriptionStatus::Active
	}

	/// True when the next billing date falls within `window_days` days from `today` (inclusive).
	pub fn is_upcoming(&self, today: NaiveDate, window_days: i64) -> bool {
		let diff = (self.next_billing_date - today).num_days();
		(0..=window_days).contains(&diff)
	}

	/// Overwrites every editable field with the values of `other`.
	/// `id` and `added_date` are identity data and stay untouched.
	pub fn copy_from(&mut self, other: &Subscription) {
		self.service_name = other.service_name.clone();
		self.category = other.category.clone();
		self.cost = other.cost;
		self.cadence = other.cadence;
		self.next_billing_date = other.next_billing_date;
		self.management_url = other.management_url.clone();
		self.notes = other.notes.clone();
		self.status = other.status;
	}
}

/// On-disk snapshot of all subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
	#[serde(default)]
	pub subscriptions: Vec<Subscription>,
}

// Settings models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Currency label shown next to amounts.
	pub currency: String,
	pub default_category: String,
	/// How many days ahead a billing date counts as upcoming.
	pub upcoming_window_days: i64,
	pub snapshot_path: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			currency: "RUB".to_string(),
			default_category: DEFAULT_CATEGORY.to_string(),
			upcoming_window_days: 3,
			snapshot_path: "subscriptions.json".to_string(),
		}
	}
}
