//! Inherited IRA beneficiary rules and distribution amounts

mod classifier;
mod life_expectancy;

pub use classifier::{
    classify_inherited_ira, BeneficiaryBucket, BeneficiaryFacts, Classification, DeadlineRule,
    Relationship, StretchReason, AGE_OF_MAJORITY, FIVE_YEAR_WINDOW, MAX_STRETCH_AGE_GAP,
    TEN_YEAR_WINDOW,
};
pub use life_expectancy::{inherited_rmd, LifeExpectancyTable};
