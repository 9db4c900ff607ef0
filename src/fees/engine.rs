//! Cost projection engine: multi-year cost of holding a product

use log::debug;
use serde::{Deserialize, Serialize};

use super::schedule::FeeSchedule;
use crate::error::{check_horizon, ValidationError};

/// Parameters of one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Starting account size
    pub principal: f64,

    /// Holding period in whole years
    pub horizon_years: u32,

    pub fee_schedule: FeeSchedule,
}

impl ProjectionInput {
    pub fn new(principal: f64, horizon_years: u32, fee_schedule: FeeSchedule) -> Self {
        Self { principal, horizon_years, fee_schedule }
    }

    /// Check every precondition of [`project`]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.principal.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "principal" });
        }
        if self.principal <= 0.0 {
            return Err(ValidationError::NonPositivePrincipal { value: self.principal });
        }
        check_horizon(self.horizon_years)?;
        self.fee_schedule.validate()
    }
}

/// Cost breakdown for a single year of the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCost {
    pub year: u32,
    pub setup_fee: f64,
    pub annual_flat_fee: f64,
    pub storage_fee: f64,
    pub transaction_fee: f64,
    pub year_total: f64,
    pub cumulative: f64,
}

/// Deterministic output of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub year_one_cost: f64,
    pub recurring_year_cost: f64,
    pub total_cost: f64,
    /// Total cost as a percentage of principal (1.5 = 1.5%)
    pub cost_as_percent_of_principal: f64,
    pub average_annual_cost: f64,
    pub yearly: Vec<YearCost>,
}

/// Project the total cost of holding `input.principal` for `input.horizon_years`
///
/// Year one carries the setup and transaction fees on top of the recurring
/// fees; every later year costs the same recurring amount.
pub fn project(input: &ProjectionInput) -> Result<ProjectionResult, ValidationError> {
    input.validate()?;

    let schedule = &input.fee_schedule;
    let principal = input.principal;
    let horizon = input.horizon_years;

    let storage = schedule.storage_fee(principal);
    let recurring_year_cost = schedule.annual_flat_fee + storage;
    let year_one_cost = schedule.one_time_setup_fee
        + schedule.annual_flat_fee
        + storage
        + schedule.per_transaction_fee;

    let total_cost = year_one_cost + recurring_year_cost * f64::from(horizon - 1);

    let mut yearly = Vec::with_capacity(horizon as usize);
    let mut cumulative = 0.0;
    for year in 1..=horizon {
        let first = year == 1;
        let year_total = if first { year_one_cost } else { recurring_year_cost };
        cumulative += year_total;
        yearly.push(YearCost {
            year,
            setup_fee: if first { schedule.one_time_setup_fee } else { 0.0 },
            annual_flat_fee: schedule.annual_flat_fee,
            storage_fee: storage,
            transaction_fee: if first { schedule.per_transaction_fee } else { 0.0 },
            year_total,
            cumulative,
        });
    }

    let cost_as_percent_of_principal = total_cost / principal * 100.0;
    let average_annual_cost = total_cost / f64::from(horizon);

    // Finite fees can still sum past f64::MAX
    if ![year_one_cost, total_cost, cost_as_percent_of_principal, average_annual_cost]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(ValidationError::NonFiniteValue { field: "total_cost" });
    }

    debug!(
        "projected '{}': principal={:.2} horizon={} total={:.2}",
        schedule.name, principal, horizon, total_cost
    );

    Ok(ProjectionResult {
        year_one_cost,
        recurring_year_cost,
        total_cost,
        cost_as_percent_of_principal,
        average_annual_cost,
        yearly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeAmount;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn storage_only() -> FeeSchedule {
        FeeSchedule::new("Flat storage").with_storage_fee(FeeAmount::flat(150.0))
    }

    fn full_schedule() -> FeeSchedule {
        FeeSchedule::new("Full service")
            .with_setup_fee(50.0)
            .with_annual_flat_fee(295.0)
            .with_storage_fee(FeeAmount::percentage(0.35))
            .with_transaction_fee(30.0)
    }

    #[test]
    fn test_flat_storage_ten_years() {
        let result = project(&ProjectionInput::new(100_000.0, 10, storage_only())).unwrap();

        assert_eq!(result.year_one_cost, 150.0);
        assert_eq!(result.recurring_year_cost, 150.0);
        assert_eq!(result.total_cost, 1_500.0);
        assert_relative_eq!(result.cost_as_percent_of_principal, 1.5, epsilon = 1e-12);
        assert_relative_eq!(result.average_annual_cost, 150.0);
        assert_eq!(result.yearly.len(), 10);
    }

    #[test]
    fn test_year_one_fees_only_charged_once() {
        let result = project(&ProjectionInput::new(100_000.0, 3, full_schedule())).unwrap();

        // 350 storage = 0.35% of 100k
        assert_relative_eq!(result.year_one_cost, 50.0 + 295.0 + 350.0 + 30.0, epsilon = 1e-9);
        assert_relative_eq!(result.recurring_year_cost, 295.0 + 350.0, epsilon = 1e-9);
        assert_relative_eq!(result.total_cost, 725.0 + 2.0 * 645.0, epsilon = 1e-9);

        assert_eq!(result.yearly[0].setup_fee, 50.0);
        assert_eq!(result.yearly[0].transaction_fee, 30.0);
        assert_eq!(result.yearly[1].setup_fee, 0.0);
        assert_eq!(result.yearly[2].transaction_fee, 0.0);
        assert_relative_eq!(result.yearly[2].cumulative, result.total_cost, epsilon = 1e-9);
    }

    #[test]
    fn test_percentage_fee_is_not_compounded() {
        let schedule = FeeSchedule::new("Pct").with_storage_fee(FeeAmount::percentage(1.0));
        let result = project(&ProjectionInput::new(200_000.0, 5, schedule)).unwrap();
        for row in &result.yearly {
            assert_relative_eq!(row.storage_fee, 2_000.0, epsilon = 1e-9);
        }
        assert_relative_eq!(result.total_cost, 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_principal_is_rejected() {
        let err = project(&ProjectionInput::new(0.0, 10, storage_only())).unwrap_err();
        assert_eq!(err, ValidationError::NonPositivePrincipal { value: 0.0 });
    }

    #[test]
    fn test_zero_horizon_is_rejected() {
        let err = project(&ProjectionInput::new(100_000.0, 0, storage_only())).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveHorizon { value: 0 });
    }

    #[test]
    fn test_horizon_beyond_limit_is_rejected() {
        let err = project(&ProjectionInput::new(100_000.0, u32::MAX, storage_only())).unwrap_err();
        assert_eq!(err, ValidationError::HorizonTooLong { value: u32::MAX, max: 120 });
        assert!(project(&ProjectionInput::new(100_000.0, 121, storage_only())).is_err());
        assert_eq!(project(&ProjectionInput::new(100_000.0, 120, storage_only())).unwrap().yearly.len(), 120);
    }

    #[test]
    fn test_overflowing_fee_total_is_rejected() {
        let schedule = FeeSchedule::new("Huge")
            .with_setup_fee(1e308)
            .with_annual_flat_fee(1e308);
        let err = project(&ProjectionInput::new(100_000.0, 1, schedule)).unwrap_err();
        assert_eq!(err, ValidationError::NonFiniteValue { field: "total_cost" });

        let recurring = FeeSchedule::new("Recurring").with_annual_flat_fee(1e307);
        let err = project(&ProjectionInput::new(100_000.0, 120, recurring)).unwrap_err();
        assert_eq!(err.field(), Some("total_cost"));
    }

    #[test]
    fn test_tiny_principal_percent_overflow_is_rejected() {
        let schedule = FeeSchedule::new("Flat").with_annual_flat_fee(1e300);
        let err = project(&ProjectionInput::new(1e-10, 1, schedule)).unwrap_err();
        assert_eq!(err, ValidationError::NonFiniteValue { field: "total_cost" });
    }

    #[test]
    fn test_infinite_principal_is_rejected() {
        let err = project(&ProjectionInput::new(f64::INFINITY, 1, storage_only())).unwrap_err();
        assert_eq!(err, ValidationError::NonFiniteValue { field: "principal" });
    }

    fn arb_schedule() -> impl Strategy<Value = FeeSchedule> {
        (0.0..5_000.0f64, 0.0..5_000.0f64, 0.0..5_000.0f64, 0.0..99.0f64, any::<bool>(), 0.0..500.0f64)
            .prop_map(|(setup, flat, storage, rate, pct, wire)| {
                let storage_fee = if pct { FeeAmount::percentage(rate) } else { FeeAmount::flat(storage) };
                FeeSchedule::new("Arbitrary")
                    .with_setup_fee(setup)
                    .with_annual_flat_fee(flat)
                    .with_storage_fee(storage_fee)
                    .with_transaction_fee(wire)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_single_year_total_equals_year_one(
            principal in 1.0..10_000_000.0f64,
            schedule in arb_schedule(),
        ) {
            let result = project(&ProjectionInput::new(principal, 1, schedule)).unwrap();
            prop_assert_eq!(result.total_cost, result.year_one_cost);
        }

        #[test]
        fn prop_total_matches_closed_form(
            principal in 1.0..10_000_000.0f64,
            horizon in 1u32..60,
            schedule in arb_schedule(),
        ) {
            let result = project(&ProjectionInput::new(principal, horizon, schedule)).unwrap();
            let expected = result.year_one_cost + result.recurring_year_cost * f64::from(horizon - 1);
            let tolerance = 1e-6 * expected.abs().max(1.0);
            prop_assert!((result.total_cost - expected).abs() <= tolerance);

            let last = result.yearly.last().unwrap();
            prop_assert!((last.cumulative - result.total_cost).abs() <= tolerance);
        }

        #[test]
        fn prop_total_non_decreasing_in_horizon(
            principal in 1.0..10_000_000.0f64,
            horizon in 1u32..60,
            schedule in arb_schedule(),
        ) {
            let shorter = project(&ProjectionInput::new(principal, horizon, schedule.clone())).unwrap();
            let longer = project(&ProjectionInput::new(principal, horizon + 1, schedule)).unwrap();
            prop_assert!(longer.total_cost >= shorter.total_cost);
        }

        #[test]
        fn prop_total_non_decreasing_in_each_fee(
            principal in 1.0..10_000_000.0f64,
            horizon in 1u32..40,
            schedule in arb_schedule(),
            bump in 0.0..1_000.0f64,
        ) {
            let base = project(&ProjectionInput::new(principal, horizon, schedule.clone())).unwrap();

            // rate < 99 and bump / 1000 < 1 keep the bumped rate under 100
            let storage = match schedule.annual_storage_fee {
                FeeAmount::Flat { amount } => FeeAmount::flat(amount + bump),
                FeeAmount::PercentageOfPrincipal { rate } => FeeAmount::percentage(rate + bump / 1_000.0),
            };

            let bumped = [
                schedule.clone().with_setup_fee(schedule.one_time_setup_fee + bump),
                schedule.clone().with_annual_flat_fee(schedule.annual_flat_fee + bump),
                schedule.clone().with_storage_fee(storage),
                schedule.clone().with_transaction_fee(schedule.per_transaction_fee + bump),
            ];
            for variant in bumped {
                let result = project(&ProjectionInput::new(principal, horizon, variant)).unwrap();
                prop_assert!(result.total_cost >= base.total_cost);
            }
        }

        #[test]
        fn prop_total_non_decreasing_in_storage_rate(
            principal in 1.0..10_000_000.0f64,
            horizon in 1u32..40,
            rate in 0.0..99.0f64,
            step in 0.0..0.99f64,
        ) {
            let at = |r: f64| {
                let schedule = FeeSchedule::new("Pct").with_storage_fee(FeeAmount::percentage(r));
                project(&ProjectionInput::new(principal, horizon, schedule)).unwrap().total_cost
            };
            prop_assert!(at(rate + step) >= at(rate));
        }
    }
}
