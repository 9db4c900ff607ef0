//! Beneficiary classification for inherited IRAs
//!
//! Three buckets with different distribution deadlines:
//! - Eligible designated beneficiary: stretch over life expectancy
//! - Designated beneficiary: ten-year rule
//! - Non-designated beneficiary (estate, charity, non-qualifying trust): five-year rule

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{check_age, ValidationError};

/// Age at which a minor child of the decedent reaches majority
pub const AGE_OF_MAJORITY: u32 = 21;

/// Maximum age gap for a beneficiary to stretch as "not more than 10 years younger"
pub const MAX_STRETCH_AGE_GAP: i32 = 10;

/// Years allowed under the ten-year rule
pub const TEN_YEAR_WINDOW: i32 = 10;

/// Years allowed under the five-year rule
pub const FIVE_YEAR_WINDOW: i32 = 5;

/// Beneficiary's relationship to the account owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Spouse,
    Child,
    Sibling,
    OtherIndividual,
    Estate,
    Charity,
    NonQualifyingTrust,
}

impl Relationship {
    /// Estates, charities and non-qualifying trusts are not individuals
    pub fn is_entity(&self) -> bool {
        matches!(
            self,
            Relationship::Estate | Relationship::Charity | Relationship::NonQualifyingTrust
        )
    }
}

/// Facts about the beneficiary and decedent needed for classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeneficiaryFacts {
    pub relationship: Relationship,

    /// Beneficiary's age at the decedent's death (ignored for entities)
    #[serde(default)]
    pub age: u32,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub chronically_ill: bool,

    /// Decedent's age minus the beneficiary's age
    #[serde(default)]
    pub age_delta_from_decedent: i32,

    pub decedent_death_date: NaiveDate,

    /// Decedent died on or after their Required Beginning Date
    #[serde(default)]
    pub decedent_had_started_rmds: bool,
}

/// Regulatory bucket of a beneficiary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeneficiaryBucket {
    EligibleDesignatedBeneficiary,
    DesignatedBeneficiary,
    NonDesignatedBeneficiary,
}

/// Reason a beneficiary qualifies for the life-expectancy stretch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretchReason {
    SurvivingSpouse,
    MinorChild,
    Disabled,
    ChronicallyIll,
    CloseInAge,
}

/// Distribution deadline that applies to a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DeadlineRule {
    /// Annual distributions over the beneficiary's life expectancy
    LifeExpectancy {
        reason: StretchReason,
        first_distribution_by: NaiveDate,
        /// Minor children switch to the ten-year rule at majority
        full_distribution_by: Option<NaiveDate>,
    },
    /// Everything out by the end of the tenth year after death
    TenYear {
        annual_rmds_required: bool,
        /// Calendar years in which an annual RMD is due (years 1-9)
        rmd_years: Option<(i32, i32)>,
        full_distribution_by: NaiveDate,
    },
    /// Everything out by the end of the fifth year after death
    FiveYear { full_distribution_by: NaiveDate },
}

impl DeadlineRule {
    /// Final date by which the account must be empty, if any
    pub fn full_distribution_by(&self) -> Option<NaiveDate> {
        match self {
            DeadlineRule::LifeExpectancy { full_distribution_by, .. } => *full_distribution_by,
            DeadlineRule::TenYear { full_distribution_by, .. }
            | DeadlineRule::FiveYear { full_distribution_by } => Some(*full_distribution_by),
        }
    }

    /// Whether a minimum distribution is due every year
    pub fn requires_annual_rmds(&self) -> bool {
        match self {
            DeadlineRule::LifeExpectancy { .. } => true,
            DeadlineRule::TenYear { annual_rmds_required, .. } => *annual_rmds_required,
            DeadlineRule::FiveYear { .. } => false,
        }
    }
}

impl fmt::Display for DeadlineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineRule::LifeExpectancy { first_distribution_by, full_distribution_by, .. } => {
                write!(
                    f,
                    "Stretch distributions over life expectancy; first distribution by {}",
                    first_distribution_by
                )?;
                if let Some(by) = full_distribution_by {
                    write!(f, "; ten-year rule applies from age 21, fully distributed by {}", by)?;
                }
                Ok(())
            }
            DeadlineRule::TenYear { rmd_years, full_distribution_by, .. } => {
                if let Some((from, to)) = rmd_years {
                    write!(f, "Annual RMDs required {}-{}; ", from, to)?;
                } else {
                    f.write_str("No annual RMDs required; ")?;
                }
                write!(f, "full distribution required by {}", full_distribution_by)
            }
            DeadlineRule::FiveYear { full_distribution_by } => {
                write!(f, "Full distribution required by {}", full_distribution_by)
            }
        }
    }
}

/// Classification outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub bucket: BeneficiaryBucket,
    pub deadline_rule: DeadlineRule,
    /// Human-readable rendering of `deadline_rule`
    pub deadline_text: String,
}

impl Classification {
    fn new(bucket: BeneficiaryBucket, deadline_rule: DeadlineRule) -> Self {
        let deadline_text = deadline_rule.to_string();
        Self { bucket, deadline_rule, deadline_text }
    }
}

/// Dec 31 of the given year
fn year_end(year: i32) -> Result<NaiveDate, ValidationError> {
    NaiveDate::from_ymd_opt(year, 12, 31).ok_or(ValidationError::InconsistentInput {
        reason: "deadline falls outside the supported calendar",
    })
}

fn validate(facts: &BeneficiaryFacts) -> Result<(), ValidationError> {
    if facts.relationship.is_entity() {
        if facts.disabled || facts.chronically_ill {
            return Err(ValidationError::InconsistentInput {
                reason: "an estate, charity or trust cannot be disabled or chronically ill",
            });
        }
        return Ok(());
    }

    check_age("age", i64::from(facts.age))?;
    let delta = i64::from(facts.age_delta_from_decedent);
    if delta.abs() > crate::error::MAX_AGE {
        return Err(ValidationError::AgeOutOfRange { field: "age_delta_from_decedent", value: delta });
    }
    if i64::from(facts.age) + delta > crate::error::MAX_AGE {
        return Err(ValidationError::InconsistentInput {
            reason: "decedent age implied by age delta exceeds 120",
        });
    }
    Ok(())
}

fn stretch_reason(facts: &BeneficiaryFacts) -> Option<StretchReason> {
    // Disability outranks minority: a disabled minor keeps the lifetime stretch past 21
    if facts.relationship == Relationship::Spouse {
        Some(StretchReason::SurvivingSpouse)
    } else if facts.disabled {
        Some(StretchReason::Disabled)
    } else if facts.chronically_ill {
        Some(StretchReason::ChronicallyIll)
    } else if facts.relationship == Relationship::Child && facts.age < AGE_OF_MAJORITY {
        Some(StretchReason::MinorChild)
    } else if facts.age_delta_from_decedent <= MAX_STRETCH_AGE_GAP {
        Some(StretchReason::CloseInAge)
    } else {
        None
    }
}

/// Classify a beneficiary and report the distribution deadline
pub fn classify_inherited_ira(facts: &BeneficiaryFacts) -> Result<Classification, ValidationError> {
    validate(facts)?;

    let death_year = facts.decedent_death_date.year();

    if facts.relationship.is_entity() {
        let rule = DeadlineRule::FiveYear {
            full_distribution_by: year_end(death_year + FIVE_YEAR_WINDOW)?,
        };
        return Ok(Classification::new(BeneficiaryBucket::NonDesignatedBeneficiary, rule));
    }

    if let Some(reason) = stretch_reason(facts) {
        let full_distribution_by = if reason == StretchReason::MinorChild {
            // Turns 21 in death_year + (21 - age)
            let majority_year = death_year + (AGE_OF_MAJORITY - facts.age) as i32;
            Some(year_end(majority_year + TEN_YEAR_WINDOW)?)
        } else {
            None
        };
        let rule = DeadlineRule::LifeExpectancy {
            reason,
            first_distribution_by: year_end(death_year + 1)?,
            full_distribution_by,
        };
        return Ok(Classification::new(BeneficiaryBucket::EligibleDesignatedBeneficiary, rule));
    }

    let annual_rmds_required = facts.decedent_had_started_rmds;
    let rule = DeadlineRule::TenYear {
        annual_rmds_required,
        rmd_years: annual_rmds_required
            .then(|| (death_year + 1, death_year + TEN_YEAR_WINDOW - 1)),
        full_distribution_by: year_end(death_year + TEN_YEAR_WINDOW)?,
    };
    Ok(Classification::new(BeneficiaryBucket::DesignatedBeneficiary, rule))
}
