//! FERS Special Retirement Supplement (SRS)
//!
//! The supplement bridges the gap between an immediate FERS annuity and
//! Social Security eligibility at 62. Eligibility is a small decision table
//! over retirement age and whole years of service.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{check_age, check_amount, ValidationError};

/// Minimum Retirement Age for the cohort modeled
pub const MINIMUM_RETIREMENT_AGE: u32 = 57;

/// Age at which the supplement stops
pub const SRS_END_AGE: u32 = 62;

/// Age from which 20 years of service qualifies
pub const AGE_60: u32 = 60;

/// Service years in the SRS denominator
const FULL_CAREER_YEARS: f64 = 40.0;

/// Why a scenario does not receive the supplement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SrsReason {
    /// Retiring at or after 62, Social Security is already available
    TooOld,
    /// Younger than the MRA, no immediate unreduced annuity
    BelowMinimumRetirementAge,
    /// Between MRA and 60 with fewer than 10 years
    InsufficientServiceAtMra,
    /// Between 60 and 62 with fewer than 20 years
    #[serde(rename = "INSUFFICIENT_SERVICE_AT_60")]
    InsufficientServiceAt60,
    /// MRA+10 retirement: immediate annuity but no supplement
    Mra10NotQualifying,
}

impl SrsReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SrsReason::TooOld => "TOO_OLD",
            SrsReason::BelowMinimumRetirementAge => "BELOW_MINIMUM_RETIREMENT_AGE",
            SrsReason::InsufficientServiceAtMra => "INSUFFICIENT_SERVICE_AT_MRA",
            SrsReason::InsufficientServiceAt60 => "INSUFFICIENT_SERVICE_AT_60",
            SrsReason::Mra10NotQualifying => "MRA10_NOT_QUALIFYING",
        }
    }
}

impl fmt::Display for SrsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualifying path for an eligible scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SrsPath {
    /// MRA with 30 or more years
    MraWith30,
    /// Age 60 with 20 or more years
    Age60With20,
}

/// Outcome of an SRS evaluation
///
/// Amounts are unrounded; round only when displaying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsResult {
    pub eligible: bool,
    pub reason: Option<SrsReason>,
    pub path: Option<SrsPath>,
    pub monthly_amount: f64,
    pub annual_amount: f64,
    pub months_until_62: u32,
    pub total_lifetime_value: f64,
}

impl SrsResult {
    fn ineligible(reason: SrsReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            path: None,
            monthly_amount: 0.0,
            annual_amount: 0.0,
            months_until_62: 0,
            total_lifetime_value: 0.0,
        }
    }
}

impl fmt::Display for SrsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Some(reason) => write!(f, "Not eligible for the supplement ({})", reason),
            None => write!(
                f,
                "Eligible: ${:.2}/month, ${:.2}/year for {} months (${:.2} total)",
                self.monthly_amount, self.annual_amount, self.months_until_62, self.total_lifetime_value
            ),
        }
    }
}

/// Classify a retirement age / service combination
///
/// Returns the qualifying path or the first rejection reason.
pub fn srs_eligibility(retirement_age: u32, years_of_service: u32) -> Result<SrsPath, SrsReason> {
    if retirement_age >= SRS_END_AGE {
        return Err(SrsReason::TooOld);
    }
    if retirement_age < MINIMUM_RETIREMENT_AGE {
        return Err(SrsReason::BelowMinimumRetirementAge);
    }
    if retirement_age >= AGE_60 {
        // 30 years at 60 or 61 also clears the 20 year bar
        return if years_of_service >= 20 {
            Ok(SrsPath::Age60With20)
        } else {
            Err(SrsReason::InsufficientServiceAt60)
        };
    }
    match years_of_service {
        30.. => Ok(SrsPath::MraWith30),
        10..=29 => Err(SrsReason::Mra10NotQualifying),
        _ => Err(SrsReason::InsufficientServiceAtMra),
    }
}

/// Evaluate the supplement for a scenario
///
/// `estimated_ss_benefit_at_62` is the monthly Social Security estimate.
pub fn evaluate_srs(
    retirement_age: u32,
    years_of_service: u32,
    estimated_ss_benefit_at_62: f64,
) -> Result<SrsResult, ValidationError> {
    check_age("retirement_age", i64::from(retirement_age))?;
    check_amount("estimated_ss_benefit_at_62", estimated_ss_benefit_at_62)?;
    if years_of_service > retirement_age {
        return Err(ValidationError::InconsistentInput {
            reason: "years of service exceed retirement age",
        });
    }

    let path = match srs_eligibility(retirement_age, years_of_service) {
        Ok(path) => path,
        Err(reason) => return Ok(SrsResult::ineligible(reason)),
    };

    let monthly_amount = f64::from(years_of_service) / FULL_CAREER_YEARS * estimated_ss_benefit_at_62;
    let months_until_62 = (SRS_END_AGE - retirement_age) * 12;

    Ok(SrsResult {
        eligible: true,
        reason: None,
        path: Some(path),
        monthly_amount,
        annual_amount: monthly_amount * 12.0,
        months_until_62,
        total_lifetime_value: monthly_amount * f64::from(months_until_62),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mra_with_30_years() {
        let result = evaluate_srs(57, 30, 2_000.0).unwrap();
        assert!(result.eligible);
        assert_eq!(result.path, Some(SrsPath::MraWith30));
        assert_relative_eq!(result.monthly_amount, 1_500.0);
        assert_relative_eq!(result.annual_amount, 18_000.0);
        assert_eq!(result.months_until_62, 60);
        assert_relative_eq!(result.total_lifetime_value, 90_000.0);
    }

    #[test]
    fn test_mra_plus_10_not_qualifying() {
        let result = evaluate_srs(57, 10, 2_000.0).unwrap();
        assert!(!result.eligible);
        assert_eq!(result.reason, Some(SrsReason::Mra10NotQualifying));
        assert_eq!(result.monthly_amount, 0.0);
        assert_eq!(result.total_lifetime_value, 0.0);
    }

    #[test]
    fn test_age_60_with_20_years() {
        let result = evaluate_srs(60, 20, 2_400.0).unwrap();
        assert!(result.eligible);
        assert_eq!(result.path, Some(SrsPath::Age60With20));
        assert_relative_eq!(result.monthly_amount, 1_200.0);
        assert_eq!(result.months_until_62, 24);
        assert_relative_eq!(result.total_lifetime_value, 28_800.0);
    }

    #[test]
    fn test_decision_table_rejections() {
        assert_eq!(srs_eligibility(62, 35), Err(SrsReason::TooOld));
        assert_eq!(srs_eligibility(70, 40), Err(SrsReason::TooOld));
        assert_eq!(srs_eligibility(56, 35), Err(SrsReason::BelowMinimumRetirementAge));
        assert_eq!(srs_eligibility(58, 9), Err(SrsReason::InsufficientServiceAtMra));
        assert_eq!(srs_eligibility(59, 29), Err(SrsReason::Mra10NotQualifying));
        assert_eq!(srs_eligibility(61, 19), Err(SrsReason::InsufficientServiceAt60));
        assert_eq!(srs_eligibility(61, 12), Err(SrsReason::InsufficientServiceAt60));
    }

    #[test]
    fn test_decision_table_boundaries() {
        assert_eq!(srs_eligibility(59, 30), Ok(SrsPath::MraWith30));
        assert_eq!(srs_eligibility(61, 20), Ok(SrsPath::Age60With20));
        assert_eq!(srs_eligibility(61, 31), Ok(SrsPath::Age60With20));
    }

    #[test]
    fn test_result_is_not_rounded() {
        let result = evaluate_srs(58, 31, 1_999.99).unwrap();
        let expected = 31.0 / 40.0 * 1_999.99;
        assert_eq!(result.monthly_amount, expected);
        assert_eq!(result.months_until_62, 48);
    }

    #[test]
    fn test_validation_failures() {
        assert_eq!(
            evaluate_srs(121, 30, 2_000.0),
            Err(ValidationError::AgeOutOfRange { field: "retirement_age", value: 121 })
        );
        assert_eq!(
            evaluate_srs(57, 30, -1.0),
            Err(ValidationError::NegativeAmount { field: "estimated_ss_benefit_at_62", value: -1.0 })
        );
        assert!(matches!(
            evaluate_srs(40, 45, 2_000.0),
            Err(ValidationError::InconsistentInput { .. })
        ));
    }

    #[test]
    fn test_display_rounds_for_presentation() {
        let result = evaluate_srs(57, 30, 2_000.0).unwrap();
        assert_eq!(
            result.to_string(),
            "Eligible: $1500.00/month, $18000.00/year for 60 months ($90000.00 total)"
        );
        let result = evaluate_srs(57, 10, 2_000.0).unwrap();
        assert_eq!(result.to_string(), "Not eligible for the supplement (MRA10_NOT_QUALIFYING)");
    }
}
