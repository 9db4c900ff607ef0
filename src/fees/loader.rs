//! Load company fee tables from CSV
//!
//! Expected columns:
//! `Name,SetupFee,AnnualFee,StorageFeeType,StorageFee,WireFee`
//! where `StorageFeeType` is `flat` or `percentage`.

use super::{FeeAmount, FeeSchedule};
use crate::error::ValidationError;
use csv::Reader;
use log::warn;
use std::error::Error;
use std::path::Path;

/// Default location of the company fee table
pub const DEFAULT_FEE_TABLE_PATH: &str = "data/fee_schedules.csv";

/// Raw CSV row matching fee_schedules.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "SetupFee", default)]
    setup_fee: Option<f64>,
    #[serde(rename = "AnnualFee", default)]
    annual_fee: Option<f64>,
    #[serde(rename = "StorageFeeType")]
    storage_fee_type: String,
    #[serde(rename = "StorageFee", default)]
    storage_fee: Option<f64>,
    #[serde(rename = "WireFee", default)]
    wire_fee: Option<f64>,
}

impl CsvRow {
    fn to_schedule(self) -> Result<FeeSchedule, Box<dyn Error>> {
        let storage = match self.storage_fee_type.trim().to_ascii_lowercase().as_str() {
            "flat" => FeeAmount::flat(self.storage_fee.unwrap_or(0.0)),
            "percentage" => match self.storage_fee {
                Some(rate) => FeeAmount::percentage(rate),
                None => {
                    return Err(ValidationError::MissingStorageRate { schedule: self.name }.into())
                }
            },
            other => return Err(format!("Unknown StorageFeeType: {}", other).into()),
        };

        let schedule = FeeSchedule::new(self.name)
            .with_setup_fee(self.setup_fee.unwrap_or(0.0))
            .with_annual_flat_fee(self.annual_fee.unwrap_or(0.0))
            .with_storage_fee(storage)
            .with_transaction_fee(self.wire_fee.unwrap_or(0.0));

        schedule.validate()?;
        Ok(schedule)
    }
}

/// Load all fee schedules from a CSV file
pub fn load_fee_schedules<P: AsRef<Path>>(path: P) -> Result<Vec<FeeSchedule>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_schedules(reader)
}

/// Load fee schedules from any reader (e.g., string buffer, network stream)
pub fn load_fee_schedules_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<FeeSchedule>, Box<dyn Error>> {
    collect_schedules(Reader::from_reader(reader))
}

/// Load fee schedules from the default data/fee_schedules.csv location
pub fn load_default_fee_schedules() -> Result<Vec<FeeSchedule>, Box<dyn Error>> {
    load_fee_schedules(DEFAULT_FEE_TABLE_PATH)
}

fn collect_schedules<R: std::io::Read>(
    mut reader: Reader<R>,
) -> Result<Vec<FeeSchedule>, Box<dyn Error>> {
    let mut schedules = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        if row.name.trim().is_empty() {
            warn!("skipping fee table row with empty name");
            continue;
        }
        schedules.push(row.to_schedule()?);
    }

    Ok(schedules)
}
