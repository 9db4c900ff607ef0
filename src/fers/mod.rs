//! Federal Employees Retirement System calculators

mod srs;

pub use srs::{
    evaluate_srs, srs_eligibility, SrsPath, SrsReason, SrsResult, AGE_60,
    MINIMUM_RETIREMENT_AGE, SRS_END_AGE,
};
