//! Ranking of fee schedules by total cost over a shared basis

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::engine::{project, ProjectionInput, ProjectionResult};
use super::schedule::FeeSchedule;
use crate::error::ValidationError;

/// One product's place in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position, cheapest first
    pub position: usize,

    /// Index of the product in the caller's input list
    pub input_index: usize,

    pub name: String,
    pub result: ProjectionResult,

    /// Set on the cheapest entry only
    pub lowest_cost: bool,

    /// How much cheaper this product is than the most expensive one
    pub savings_vs_highest: f64,
}

/// Products sorted ascending by total cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub principal: f64,
    pub horizon_years: u32,
    pub entries: Vec<RankedEntry>,
}

impl Ranking {
    /// The cheapest entry
    pub fn lowest(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    /// Names in ranked order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Rank products that share the same principal and horizon
///
/// Ties keep their input order.
pub fn rank(inputs: &[ProjectionInput]) -> Result<Ranking, ValidationError> {
    let first = inputs.first().ok_or(ValidationError::EmptyComparison)?;
    first.validate()?;

    for (index, input) in inputs.iter().enumerate().skip(1) {
        if input.principal != first.principal || input.horizon_years != first.horizon_years {
            return Err(ValidationError::MismatchedComparisonBasis { index });
        }
    }

    let mut projected = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| project(input).map(|result| (index, input, result)))
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by is stable, so exact ties stay in input order
    projected.sort_by(|a, b| a.2.total_cost.total_cmp(&b.2.total_cost));

    let highest = projected
        .iter()
        .map(|(_, _, r)| r.total_cost)
        .fold(f64::MIN, f64::max);

    let entries = projected
        .into_iter()
        .enumerate()
        .map(|(i, (input_index, input, result))| RankedEntry {
            position: i + 1,
            input_index,
            name: input.fee_schedule.name.clone(),
            savings_vs_highest: highest - result.total_cost,
            lowest_cost: i == 0,
            result,
        })
        .collect();

    Ok(Ranking {
        principal: first.principal,
        horizon_years: first.horizon_years,
        entries,
    })
}

/// Rank schedules at a single principal and horizon
pub fn rank_schedules(
    principal: f64,
    horizon_years: u32,
    schedules: &[FeeSchedule],
) -> Result<Ranking, ValidationError> {
    let inputs: Vec<ProjectionInput> = schedules
        .iter()
        .map(|s| ProjectionInput::new(principal, horizon_years, s.clone()))
        .collect();
    rank(&inputs)
}

/// Rank the same schedules at several horizons, one ranking per horizon
///
/// Results are returned in the order of `horizons`. The first failing
/// horizon aborts the whole comparison.
pub fn rank_across_horizons(
    principal: f64,
    horizons: &[u32],
    schedules: &[FeeSchedule],
) -> Result<Vec<Ranking>, ValidationError> {
    horizons
        .par_iter()
        .map(|&horizon| rank_schedules(principal, horizon, schedules))
        .collect()
}
