//! Validation errors shared by every calculator
//!
//! Each variant names the failing precondition and carries the offending
//! value as data so a form layer can point at the exact field.

use serde::Serialize;
use thiserror::Error;

/// Fee component of a schedule, used to report which fee failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeComponent {
    SetupFee,
    AnnualFlatFee,
    StorageFee,
    PerTransactionFee,
}

impl FeeComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeComponent::SetupFee => "one_time_setup_fee",
            FeeComponent::AnnualFlatFee => "annual_flat_fee",
            FeeComponent::StorageFee => "annual_storage_fee",
            FeeComponent::PerTransactionFee => "per_transaction_fee",
        }
    }
}

/// A failed input precondition
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("principal must be greater than zero (got {value})")]
    NonPositivePrincipal { value: f64 },

    #[error("horizon must be at least one year (got {value})")]
    NonPositiveHorizon { value: u32 },

    #[error("horizon must be at most {max} years (got {value})")]
    HorizonTooLong { value: u32, max: u32 },

    #[error("{} must not be negative (got {value})", .component.as_str())]
    NegativeFeeComponent { component: FeeComponent, value: f64 },

    #[error("percentage fee rate must be in [0, 100) (got {value})")]
    PercentageOutOfRange { value: f64 },

    #[error("percentage storage fee for '{schedule}' has no rate")]
    MissingStorageRate { schedule: String },

    #[error("comparison inputs must share principal and horizon (input {index} differs)")]
    MismatchedComparisonBasis { index: usize },

    #[error("comparison requires at least one product")]
    EmptyComparison,

    #[error("{field} must be between 0 and 120 (got {value})")]
    AgeOutOfRange { field: &'static str, value: i64 },

    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },

    #[error("inconsistent input: {reason}")]
    InconsistentInput { reason: &'static str },
}

impl ValidationError {
    /// Form field the error refers to, if it maps to a single one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::NonPositivePrincipal { .. } => Some("principal"),
            ValidationError::NonPositiveHorizon { .. }
            | ValidationError::HorizonTooLong { .. } => Some("horizon_years"),
            ValidationError::NegativeFeeComponent { component, .. } => Some(component.as_str()),
            ValidationError::PercentageOutOfRange { .. }
            | ValidationError::MissingStorageRate { .. } => Some("annual_storage_fee"),
            ValidationError::AgeOutOfRange { field, .. }
            | ValidationError::NegativeAmount { field, .. }
            | ValidationError::NonFiniteValue { field } => Some(*field),
            ValidationError::MismatchedComparisonBasis { .. }
            | ValidationError::EmptyComparison
            | ValidationError::InconsistentInput { .. } => None,
        }
    }
}

/// Upper bound for any age input
pub const MAX_AGE: i64 = 120;

/// Upper bound for a projection or payment horizon, in years
pub const MAX_HORIZON_YEARS: u32 = 120;

/// Check that a horizon lies in [1, 120] years
pub(crate) fn check_horizon(value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::NonPositiveHorizon { value });
    }
    if value > MAX_HORIZON_YEARS {
        return Err(ValidationError::HorizonTooLong { value, max: MAX_HORIZON_YEARS });
    }
    Ok(())
}

/// Check that an age lies in [0, 120]
pub(crate) fn check_age(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if (0..=MAX_AGE).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::AgeOutOfRange { field, value })
    }
}

/// Check that a money amount is finite and non-negative
pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}
