//! Present value of a pension and comparison against a lump-sum offer

use log::debug;
use serde::{Deserialize, Serialize};

use super::irr::{discounted_value, implied_annual_rate};
use crate::error::{check_amount, check_horizon, ValidationError};

/// A monthly pension paid for a fixed number of years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionInput {
    /// First-year monthly payment
    pub monthly_benefit: f64,

    /// Number of years payments are expected
    pub payment_years: u32,

    /// Annual discount rate in percent (5.0 = 5%), compounded monthly
    pub discount_rate: f64,

    /// Annual cost-of-living adjustment in percent, applied each new year
    #[serde(default)]
    pub cola_rate: f64,
}

impl PensionInput {
    pub fn new(monthly_benefit: f64, payment_years: u32, discount_rate: f64) -> Self {
        Self { monthly_benefit, payment_years, discount_rate, cola_rate: 0.0 }
    }

    pub fn with_cola(mut self, cola_rate: f64) -> Self {
        self.cola_rate = cola_rate;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount("monthly_benefit", self.monthly_benefit)?;
        check_horizon(self.payment_years)?;
        check_rate(self.discount_rate)?;
        check_rate(self.cola_rate)?;
        Ok(())
    }

    /// Monthly payments in order, first payment one month from now
    pub fn payments(&self) -> Vec<f64> {
        let growth = 1.0 + self.cola_rate / 100.0;
        (0..self.payment_years)
            .flat_map(|year| {
                let payment = self.monthly_benefit * growth.powi(year as i32);
                std::iter::repeat(payment).take(12)
            })
            .collect()
    }
}

fn check_rate(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() && rate > -100.0 && rate < 100.0 {
        Ok(())
    } else {
        Err(ValidationError::PercentageOutOfRange { value: rate })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionValuation {
    pub present_value: f64,
    pub total_nominal_payments: f64,
    pub payment_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumComparison {
    pub lump_sum: f64,
    pub pension: PensionValuation,

    /// Effective annual rate (percent) at which the payments are worth the lump sum
    pub implied_annual_rate: Option<f64>,

    /// Lump sum exceeds the pension's present value at the input discount rate
    pub lump_sum_is_better: bool,
}

/// Discount the payment stream at the input rate
pub fn present_value(input: &PensionInput) -> Result<PensionValuation, ValidationError> {
    input.validate()?;

    let monthly_rate = input.discount_rate / 100.0 / 12.0;
    let payments = input.payments();
    let present_value = discounted_value(&payments, monthly_rate);

    debug!(
        "pension pv: benefit={:.2} years={} rate={}% pv={:.2}",
        input.monthly_benefit, input.payment_years, input.discount_rate, present_value
    );

    Ok(PensionValuation {
        present_value,
        total_nominal_payments: payments.iter().sum(),
        payment_count: payments.len() as u32,
    })
}

/// Compare a lump-sum offer against the pension payments
pub fn compare_lump_sum(
    input: &PensionInput,
    lump_sum: f64,
) -> Result<LumpSumComparison, ValidationError> {
    check_amount("lump_sum", lump_sum)?;
    let pension = present_value(input)?;

    let implied_annual_rate = implied_annual_rate(lump_sum, &input.payments()).map(|r| r * 100.0);

    Ok(LumpSumComparison {
        lump_sum,
        lump_sum_is_better: lump_sum > pension.present_value,
        implied_annual_rate,
        pension,
    })
}
