use chrono::{Datelike, NaiveDate};
use models::{BillingCadence, Subscription};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const MONTHS_PER_QUARTER: i64 = 3;

fn round2(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Cost projected onto a monthly basis. Unrecognized cadences pass the cost through as if monthly.
pub fn monthly_equivalent(cost: Decimal, cadence: BillingCadence) -> Decimal {
    match cadence {
        BillingCadence::Monthly => cost,
        BillingCadence::Quarterly => round2(cost / Decimal::from(3)),
        BillingCadence::Yearly => round2(cost / Decimal::from(12)),
        BillingCadence::Unrecognized => cost,
    }
}

/// Cost projected onto a yearly basis. Exact, no rounding.
pub fn yearly_equivalent(cost: Decimal, cadence: BillingCadence) -> Decimal {
    match cadence {
        BillingCadence::Monthly | BillingCadence::Unrecognized => cost * Decimal::from(12),
        BillingCadence::Quarterly => cost * Decimal::from(4),
        BillingCadence::Yearly => cost,
    }
}

/// Whether a subscription anchored at `anchor` is charged in the target month.
///
/// - monthly: every month
/// - quarterly: every third month from the anchor, before and after it
/// - yearly: the anchor's month, from the anchor year onwards only
/// - unrecognized: never (unlike `monthly_equivalent`, there is no monthly fallback here)
pub fn bills_in_month(cadence: BillingCadence, anchor: NaiveDate, year: i32, month: u32) -> bool {
    match cadence {
        BillingCadence::Monthly => true,
        BillingCadence::Quarterly => {
            let distance = (year as i64 - anchor.year() as i64) * 12
                + (month as i64 - anchor.month() as i64);
            distance.rem_euclid(MONTHS_PER_QUARTER) == 0
        }
        BillingCadence::Yearly => month == anchor.month() && year >= anchor.year(),
        BillingCadence::Unrecognized => false,
    }
}

/// Both cadence-normalized projections of a subscription's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCost {
    pub monthly: Decimal,
    pub yearly: Decimal,
}

impl NormalizedCost {
    pub fn new(cost: Decimal, cadence: BillingCadence) -> Self {
        Self {
            monthly: monthly_equivalent(cost, cadence),
            yearly: yearly_equivalent(cost, cadence),
        }
    }

    pub fn of(sub: &Subscription) -> Self {
        Self::new(sub.cost(), sub.cadence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn anchor(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_equivalent_per_cadence() {
        assert_eq!(monthly_equivalent(dec!(300), BillingCadence::Monthly), dec!(300));
        assert_eq!(monthly_equivalent(dec!(900), BillingCadence::Quarterly), dec!(300));
        assert_eq!(monthly_equivalent(dec!(3600), BillingCadence::Yearly), dec!(300));
    }

    #[test]
    fn test_monthly_equivalent_rounds_to_cents() {
        assert_eq!(monthly_equivalent(dec!(1000), BillingCadence::Yearly), dec!(83.33));
        assert_eq!(monthly_equivalent(dec!(100), BillingCadence::Quarterly), dec!(33.33));
        assert_eq!(monthly_equivalent(dec!(200), BillingCadence::Quarterly), dec!(66.67));
    }

    #[test]
    fn test_monthly_equivalent_rounds_half_away_from_zero() {
        // 0.3 / 12 = 0.025 exactly
        assert_eq!(monthly_equivalent(dec!(0.3), BillingCadence::Yearly), dec!(0.03));
        // 0.075 / 3 = 0.025
        assert_eq!(monthly_equivalent(dec!(0.075), BillingCadence::Quarterly), dec!(0.03));
    }

    #[test]
    fn test_yearly_equivalent_per_cadence() {
        assert_eq!(yearly_equivalent(dec!(300), BillingCadence::Monthly), dec!(3600));
        assert_eq!(yearly_equivalent(dec!(900), BillingCadence::Quarterly), dec!(3600));
        assert_eq!(yearly_equivalent(dec!(3600), BillingCadence::Yearly), dec!(3600));
    }

    #[test]
    fn test_yearly_equivalent_is_exact() {
        assert_eq!(yearly_equivalent(dec!(9.99), BillingCadence::Monthly), dec!(119.88));
        assert_eq!(yearly_equivalent(dec!(0.01), BillingCadence::Quarterly), dec!(0.04));
    }

    #[test]
    fn test_unrecognized_cadence_costs_like_monthly() {
        assert_eq!(monthly_equivalent(dec!(450), BillingCadence::Unrecognized), dec!(450));
        assert_eq!(yearly_equivalent(dec!(450), BillingCadence::Unrecognized), dec!(5400));
    }

    #[test]
    fn test_unrecognized_cadence_never_bills() {
        // asymmetric with the cost fallback above
        let a = anchor(2024, 3, 15);
        for month in 1..=12 {
            assert!(!bills_in_month(BillingCadence::Unrecognized, a, 2024, month));
        }
    }

    #[test]
    fn test_monthly_times_twelve_close_to_yearly() {
        for cost in [dec!(0), dec!(1), dec!(1000), dec!(99.99), dec!(12345.67), dec!(0.07)] {
            let monthly = monthly_equivalent(cost, BillingCadence::Yearly);
            let yearly = yearly_equivalent(cost, BillingCadence::Yearly);
            let diff = (monthly * dec!(12) - yearly).abs();
            assert!(diff <= dec!(0.06), "cost {cost}: diff {diff}");
        }
    }

    #[test]
    fn test_monthly_bills_every_month() {
        let a = anchor(2030, 6, 1);
        assert!(bills_in_month(BillingCadence::Monthly, a, 2020, 1));
        assert!(bills_in_month(BillingCadence::Monthly, a, 2030, 6));
        assert!(bills_in_month(BillingCadence::Monthly, a, 2031, 12));
    }

    #[test]
    fn test_quarterly_period_three_both_directions() {
        let a = anchor(2024, 5, 20);
        let index = |y: i32, m: u32| y as i64 * 12 + m as i64 - 1;
        let anchor_index = index(2024, 5);
        for year in 2022..=2026 {
            for month in 1..=12 {
                let expected = (index(year, month) - anchor_index) % 3 == 0;
                assert_eq!(
                    bills_in_month(BillingCadence::Quarterly, a, year, month),
                    expected,
                    "{year}-{month:02}"
                );
            }
        }
        assert!(bills_in_month(BillingCadence::Quarterly, a, 2024, 2));
        assert!(bills_in_month(BillingCadence::Quarterly, a, 2023, 11));
        assert!(!bills_in_month(BillingCadence::Quarterly, a, 2024, 4));
        assert!(!bills_in_month(BillingCadence::Quarterly, a, 2024, 3));
    }

    #[test]
    fn test_quarterly_across_year_boundary() {
        let a = anchor(2023, 11, 30);
        assert!(bills_in_month(BillingCadence::Quarterly, a, 2024, 2));
        assert!(bills_in_month(BillingCadence::Quarterly, a, 2023, 8));
        assert!(!bills_in_month(BillingCadence::Quarterly, a, 2024, 1));
    }

    #[test]
    fn test_yearly_is_one_sided() {
        let a = anchor(2024, 7, 1);
        assert!(bills_in_month(BillingCadence::Yearly, a, 2024, 7));
        assert!(bills_in_month(BillingCadence::Yearly, a, 2027, 7));
        assert!(!bills_in_month(BillingCadence::Yearly, a, 2024, 8));
        // same month, earlier year
        assert!(!bills_in_month(BillingCadence::Yearly, a, 2023, 7));
        assert!(!bills_in_month(BillingCadence::Yearly, a, 2019, 7));
    }

    #[test]
    fn test_normalized_cost_of_subscription() {
        let sub = Subscription::new(
            "Office",
            "Software",
            dec!(1000),
            BillingCadence::Yearly,
            anchor(2024, 1, 1),
        )
        .unwrap();
        let n = NormalizedCost::of(&sub);
        assert_eq!(n.monthly, dec!(83.33));
        assert_eq!(n.yearly, dec!(1000));
    }
}
