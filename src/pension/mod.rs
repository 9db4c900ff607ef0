//! Pension present value and lump-sum comparison

mod irr;
mod valuation;

pub use irr::{discounted_value, implied_annual_rate};
pub use valuation::{compare_lump_sum, present_value, LumpSumComparison, PensionInput, PensionValuation};
