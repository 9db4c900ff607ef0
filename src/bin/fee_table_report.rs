//! Rank every product in the fee table at each holding period from 1 to 30 years
//!
//! Usage: cargo run --bin fee_table_report -- [principal] [fee_table.csv]
//!
//! Writes one row per product per horizon to fee_ranking_output.csv

use anyhow::{anyhow, Context, Result};
use log::info;
use retirement_calculators::fees::{self, loader::DEFAULT_FEE_TABLE_PATH};
use std::time::Instant;

const MAX_HORIZON: u32 = 30;
const DEFAULT_PRINCIPAL: f64 = 100_000.0;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let principal: f64 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid principal '{}'", arg))?,
        None => DEFAULT_PRINCIPAL,
    };
    let table_path = args.next().unwrap_or_else(|| DEFAULT_FEE_TABLE_PATH.to_string());

    let start = Instant::now();
    println!("Loading fee schedules from {}...", table_path);
    let schedules = fees::load_fee_schedules(&table_path).map_err(|e| anyhow!("{}", e))?;
    println!("Loaded {} schedules in {:?}", schedules.len(), start.elapsed());

    let horizons: Vec<u32> = (1..=MAX_HORIZON).collect();
    let rankings = fees::rank_across_horizons(principal, &horizons, &schedules)?;
    info!("ranked {} horizons", rankings.len());

    let output_path = "fee_ranking_output.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record([
        "Horizon", "Position", "Name", "YearOneCost", "RecurringCost",
        "TotalCost", "PctOfPrincipal", "SavingsVsHighest", "LowestCost",
    ])?;

    for ranking in &rankings {
        for entry in &ranking.entries {
            writer.write_record([
                ranking.horizon_years.to_string(),
                entry.position.to_string(),
                entry.name.clone(),
                format!("{:.2}", entry.result.year_one_cost),
                format!("{:.2}", entry.result.recurring_year_cost),
                format!("{:.2}", entry.result.total_cost),
                format!("{:.4}", entry.result.cost_as_percent_of_principal),
                format!("{:.2}", entry.savings_vs_highest),
                entry.lowest_cost.to_string(),
            ])?;
        }
    }
    writer.flush()?;

    println!("\nLowest-cost product by horizon (${:.2} principal):", principal);
    let mut previous: Option<&str> = None;
    for ranking in &rankings {
        if let Some(lowest) = ranking.lowest() {
            if previous != Some(lowest.name.as_str()) {
                println!("  from {:>2} years: {} (${:.2})",
                    ranking.horizon_years, lowest.name, lowest.result.total_cost);
                previous = Some(lowest.name.as_str());
            }
        }
    }

    println!("\nFull results written to: {}", output_path);
    Ok(())
}
