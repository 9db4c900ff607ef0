//! Retirement Calculators CLI
//!
//! Command-line front end for the fee, FERS, inherited IRA and pension calculators

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use retirement_calculators::{
    fees::{self, loader::DEFAULT_FEE_TABLE_PATH, FeeAmount, FeeSchedule, ProjectionInput},
    fers::evaluate_srs,
    inherited_ira::{classify_inherited_ira, inherited_rmd, BeneficiaryFacts, LifeExpectancyTable, Relationship},
    pension::{compare_lump_sum, present_value, PensionInput},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "retirement_calculators", version, about = "Retirement planning calculators")]
struct Cli {
    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project the cost of one fee schedule
    Project {
        #[arg(long)]
        principal: f64,
        #[arg(long)]
        years: u32,
        /// JSON file holding a fee schedule; overrides the fee flags
        #[arg(long)]
        schedule: Option<PathBuf>,
        #[arg(long, default_value = "Custom")]
        name: String,
        #[arg(long, default_value_t = 0.0)]
        setup_fee: f64,
        #[arg(long, default_value_t = 0.0)]
        annual_fee: f64,
        /// Flat annual storage fee in dollars
        #[arg(long, conflicts_with = "storage_pct")]
        storage_flat: Option<f64>,
        /// Annual storage fee as a percentage of principal
        #[arg(long)]
        storage_pct: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        wire_fee: f64,
    },
    /// Rank every schedule in a fee table
    Rank {
        #[arg(long)]
        principal: f64,
        /// One or more horizons, e.g. --years 1,5,10
        #[arg(long, value_delimiter = ',', required = true)]
        years: Vec<u32>,
        #[arg(long, default_value = DEFAULT_FEE_TABLE_PATH)]
        fee_table: PathBuf,
    },
    /// FERS Special Retirement Supplement
    Srs {
        #[arg(long)]
        age: u32,
        #[arg(long)]
        service: u32,
        /// Estimated monthly Social Security benefit at 62
        #[arg(long)]
        ss_benefit: f64,
    },
    /// Classify an inherited IRA beneficiary
    InheritedIra {
        /// JSON file with beneficiary facts; overrides the flags below
        #[arg(long)]
        facts: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "other-individual")]
        relationship: RelationshipArg,
        #[arg(long, default_value_t = 0)]
        age: u32,
        #[arg(long)]
        disabled: bool,
        #[arg(long)]
        chronically_ill: bool,
        /// Decedent's age minus the beneficiary's age
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        age_delta: i32,
        /// Date of death, YYYY-MM-DD
        #[arg(long)]
        death_date: Option<NaiveDate>,
        #[arg(long)]
        after_rbd: bool,
        /// Prior year-end balance, to compute the first annual RMD
        #[arg(long)]
        balance: Option<f64>,
        /// CSV of Age,Divisor rows to use instead of the IRS Single Life table
        #[arg(long, requires = "balance")]
        life_table: Option<PathBuf>,
    },
    /// Pension present value and lump-sum comparison
    Pension {
        #[arg(long)]
        benefit: f64,
        #[arg(long)]
        years: u32,
        /// Annual discount rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 0.0)]
        cola: f64,
        #[arg(long)]
        lump_sum: Option<f64>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RelationshipArg {
    Spouse,
    Child,
    Sibling,
    OtherIndividual,
    Estate,
    Charity,
    NonQualifyingTrust,
}

impl From<RelationshipArg> for Relationship {
    fn from(arg: RelationshipArg) -> Self {
        match arg {
            RelationshipArg::Spouse => Relationship::Spouse,
            RelationshipArg::Child => Relationship::Child,
            RelationshipArg::Sibling => Relationship::Sibling,
            RelationshipArg::OtherIndividual => Relationship::OtherIndividual,
            RelationshipArg::Estate => Relationship::Estate,
            RelationshipArg::Charity => Relationship::Charity,
            RelationshipArg::NonQualifyingTrust => Relationship::NonQualifyingTrust,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Project {
            principal, years, schedule, name, setup_fee, annual_fee,
            storage_flat, storage_pct, wire_fee,
        } => {
            let schedule = match schedule {
                Some(path) => read_json(&path)?,
                None => {
                    let storage = match storage_pct {
                        Some(rate) => FeeAmount::percentage(rate),
                        None => FeeAmount::flat(storage_flat.unwrap_or(0.0)),
                    };
                    FeeSchedule::new(name)
                        .with_setup_fee(setup_fee)
                        .with_annual_flat_fee(annual_fee)
                        .with_storage_fee(storage)
                        .with_transaction_fee(wire_fee)
                }
            };
            let result = fees::project(&ProjectionInput::new(principal, years, schedule.clone()))?;

            if cli.json {
                return print_json(&result);
            }
            println!("{} - ${:.2} over {} years", schedule.name, principal, years);
            println!("{:>5} {:>10} {:>10} {:>10} {:>10} {:>12} {:>12}",
                "Year", "Setup", "Annual", "Storage", "Wire", "Year Total", "Cumulative");
            println!("{}", "-".repeat(77));
            for row in &result.yearly {
                println!("{:>5} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.2} {:>12.2}",
                    row.year, row.setup_fee, row.annual_flat_fee, row.storage_fee,
                    row.transaction_fee, row.year_total, row.cumulative);
            }
            println!("\nTotal cost: ${:.2} ({:.2}% of principal, ${:.2}/year average)",
                result.total_cost, result.cost_as_percent_of_principal, result.average_annual_cost);
        }

        Command::Rank { principal, years, fee_table } => {
            let schedules = fees::load_fee_schedules(&fee_table)
                .map_err(|e| anyhow::anyhow!("{}", e))
                .with_context(|| format!("loading fee table {}", fee_table.display()))?;
            let rankings = fees::rank_across_horizons(principal, &years, &schedules)?;

            if cli.json {
                return print_json(&rankings);
            }
            for ranking in &rankings {
                println!("\n{} years, ${:.2} principal", ranking.horizon_years, ranking.principal);
                println!("{:>3} {:<36} {:>12} {:>8} {:>12}", "#", "Product", "Total", "% Prin", "Savings");
                println!("{}", "-".repeat(75));
                for entry in &ranking.entries {
                    println!("{:>3} {:<36} {:>12.2} {:>8.2} {:>12.2}{}",
                        entry.position, entry.name, entry.result.total_cost,
                        entry.result.cost_as_percent_of_principal, entry.savings_vs_highest,
                        if entry.lowest_cost { "  <- lowest cost" } else { "" });
                }
            }
        }

        Command::Srs { age, service, ss_benefit } => {
            let result = evaluate_srs(age, service, ss_benefit)?;
            if cli.json {
                return print_json(&result);
            }
            println!("{}", result);
        }

        Command::InheritedIra {
            facts, relationship, age, disabled, chronically_ill, age_delta,
            death_date, after_rbd, balance, life_table,
        } => {
            let facts: BeneficiaryFacts = match facts {
                Some(path) => read_json(&path)?,
                None => BeneficiaryFacts {
                    relationship: relationship.into(),
                    age,
                    disabled,
                    chronically_ill,
                    age_delta_from_decedent: age_delta,
                    decedent_death_date: death_date.context("--death-date is required without --facts")?,
                    decedent_had_started_rmds: after_rbd,
                },
            };
            let classification = classify_inherited_ira(&facts)?;

            // First distribution year is the year after death, one year older
            let first_rmd = match balance {
                Some(balance) if classification.deadline_rule.requires_annual_rmds() => {
                    let table = load_life_table(life_table.as_deref())?;
                    Some(inherited_rmd(balance, facts.age + 1, 0, &table)?)
                }
                _ => None,
            };

            if cli.json {
                #[derive(Serialize)]
                struct Output<'a> {
                    #[serde(flatten)]
                    classification: &'a retirement_calculators::Classification,
                    first_rmd: Option<f64>,
                }
                return print_json(&Output { classification: &classification, first_rmd });
            }
            println!("Bucket: {:?}", classification.bucket);
            println!("{}", classification.deadline_text);
            if let Some(rmd) = first_rmd {
                println!("First annual RMD: ${:.2}", rmd);
            }
        }

        Command::Pension { benefit, years, rate, cola, lump_sum } => {
            let input = PensionInput::new(benefit, years, rate).with_cola(cola);
            match lump_sum {
                Some(lump_sum) => {
                    let comparison = compare_lump_sum(&input, lump_sum)?;
                    if cli.json {
                        return print_json(&comparison);
                    }
                    println!("Pension present value: ${:.2}", comparison.pension.present_value);
                    println!("Lump sum offer:        ${:.2}", comparison.lump_sum);
                    match comparison.implied_annual_rate {
                        Some(r) => println!("Implied annual rate:   {:.3}%", r),
                        None => println!("Implied annual rate:   n/a"),
                    }
                    println!("{}", if comparison.lump_sum_is_better {
                        "The lump sum is worth more at this discount rate"
                    } else {
                        "The pension is worth more at this discount rate"
                    });
                }
                None => {
                    let valuation = present_value(&input)?;
                    if cli.json {
                        return print_json(&valuation);
                    }
                    println!("Present value:  ${:.2}", valuation.present_value);
                    println!("Total payments: ${:.2} over {} months",
                        valuation.total_nominal_payments, valuation.payment_count);
                }
            }
        }
    }

    Ok(())
}

fn load_life_table(path: Option<&Path>) -> Result<LifeExpectancyTable> {
    match path {
        Some(path) => LifeExpectancyTable::from_csv_path(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("loading life expectancy table {}", path.display())),
        None => Ok(LifeExpectancyTable::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
