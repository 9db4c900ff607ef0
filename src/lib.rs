//! Retirement Calculators - pure calculation engines behind retirement planning tools
//!
//! This library provides:
//! - Fee schedule cost projections and lowest-cost rankings
//! - FERS Special Retirement Supplement eligibility and amounts
//! - Inherited IRA beneficiary classification and RMD amounts
//! - Pension present value and lump-sum comparison
//!
//! Every calculation is a synchronous function of its inputs and reports bad
//! input as a [`ValidationError`].

pub mod error;
pub mod fees;
pub mod fers;
pub mod inherited_ira;
pub mod pension;

// Re-export commonly used types
pub use error::{FeeComponent, ValidationError};
pub use fees::{project, rank, FeeAmount, FeeSchedule, ProjectionInput, ProjectionResult, Ranking};
pub use fers::{evaluate_srs, SrsReason, SrsResult};
pub use inherited_ira::{classify_inherited_ira, BeneficiaryBucket, BeneficiaryFacts, Classification};
pub use pension::{compare_lump_sum, present_value, PensionInput};
