//! Fee comparison: cost projection and ranking of custodian fee schedules

mod schedule;
mod engine;
mod ranking;
pub mod loader;

pub use schedule::{FeeAmount, FeeSchedule};
pub use engine::{project, ProjectionInput, ProjectionResult, YearCost};
pub use ranking::{rank, rank_across_horizons, rank_schedules, RankedEntry, Ranking};
pub use loader::{load_default_fee_schedules, load_fee_schedules, load_fee_schedules_from_reader};
