//! Fee schedule structures for self-directed IRA and custodian products

use serde::{Deserialize, Serialize};

use crate::error::{FeeComponent, ValidationError};

/// How an annual fee is charged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeAmount {
    /// Fixed dollar amount per year
    Flat { amount: f64 },
    /// Percentage of principal per year, in percent units (0.5 = 0.5%)
    PercentageOfPrincipal { rate: f64 },
}

impl FeeAmount {
    pub fn flat(amount: f64) -> Self {
        FeeAmount::Flat { amount }
    }

    pub fn percentage(rate: f64) -> Self {
        FeeAmount::PercentageOfPrincipal { rate }
    }

    /// Dollar amount charged for one year against `principal`
    ///
    /// The percentage is applied to the starting principal every year; the
    /// balance is never grown or drawn down.
    pub fn amount_for(&self, principal: f64) -> f64 {
        match *self {
            FeeAmount::Flat { amount } => amount,
            FeeAmount::PercentageOfPrincipal { rate } => principal * (rate / 100.0),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            FeeAmount::Flat { amount } => check_fee(FeeComponent::StorageFee, amount),
            FeeAmount::PercentageOfPrincipal { rate } => {
                if !rate.is_finite() || !(0.0..100.0).contains(&rate) {
                    return Err(ValidationError::PercentageOutOfRange { value: rate });
                }
                Ok(())
            }
        }
    }
}

impl Default for FeeAmount {
    fn default() -> Self {
        FeeAmount::Flat { amount: 0.0 }
    }
}

/// Cost structure of one financial product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Product or company name shown in comparisons
    pub name: String,

    /// Account opening fee (0 when waived)
    #[serde(default)]
    pub one_time_setup_fee: f64,

    /// Custodian / administration fee charged every year
    #[serde(default)]
    pub annual_flat_fee: f64,

    /// Storage fee, flat or a percentage of principal
    #[serde(default)]
    pub annual_storage_fee: FeeAmount,

    /// Wire or transaction fee, charged in year one only
    #[serde(default)]
    pub per_transaction_fee: f64,
}

impl FeeSchedule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            one_time_setup_fee: 0.0,
            annual_flat_fee: 0.0,
            annual_storage_fee: FeeAmount::default(),
            per_transaction_fee: 0.0,
        }
    }

    pub fn with_setup_fee(mut self, amount: f64) -> Self {
        self.one_time_setup_fee = amount;
        self
    }

    pub fn with_annual_flat_fee(mut self, amount: f64) -> Self {
        self.annual_flat_fee = amount;
        self
    }

    pub fn with_storage_fee(mut self, fee: FeeAmount) -> Self {
        self.annual_storage_fee = fee;
        self
    }

    pub fn with_transaction_fee(mut self, amount: f64) -> Self {
        self.per_transaction_fee = amount;
        self
    }

    /// Check that every fee is finite and non-negative
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fee(FeeComponent::SetupFee, self.one_time_setup_fee)?;
        check_fee(FeeComponent::AnnualFlatFee, self.annual_flat_fee)?;
        self.annual_storage_fee.validate()?;
        check_fee(FeeComponent::PerTransactionFee, self.per_transaction_fee)?;
        Ok(())
    }

    /// Storage fee for one year
    pub fn storage_fee(&self, principal: f64) -> f64 {
        self.annual_storage_fee.amount_for(principal)
    }
}

fn check_fee(component: FeeComponent, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field: component.as_str() });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeFeeComponent { component, value });
    }
    Ok(())
}
