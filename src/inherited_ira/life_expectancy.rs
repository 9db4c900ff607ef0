//! Single Life Expectancy table and inherited-IRA RMD amounts

use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{check_age, check_amount, ValidationError};

/// Smallest divisor used once the remaining life expectancy runs out
const MIN_DIVISOR: f64 = 1.0;

/// Oldest age carried by a table
const MAX_TABLE_AGE: u32 = 120;

/// Single Life Expectancy divisors by age (IRS Publication 590-B, Table I)
#[derive(Debug, Clone)]
pub struct LifeExpectancyTable {
    /// Divisors indexed by age, starting at age 0
    divisors: Vec<f64>,
}

impl Default for LifeExpectancyTable {
    fn default() -> Self {
        Self::irs_single_life_2022()
    }
}

impl LifeExpectancyTable {
    /// Table I as revised for distribution years 2022 and later (ages 0-120)
    pub fn irs_single_life_2022() -> Self {
        let mut divisors = vec![
            84.6, 83.7, 82.8, 81.8, 80.8, 79.8, 78.8, 77.9, 76.9, 75.9, // 0-9
            74.9, 73.9, 72.9, 71.9, 70.9, 69.9, 69.0, 68.0, 67.0, 66.0, // 10-19
            65.0, 64.1, 63.1, 62.1, 61.1, 60.2, 59.2, 58.2, 57.3, 56.3, // 20-29
            55.3, 54.4, 53.4, 52.5, 51.5, 50.5, 49.6, 48.6, 47.7, 46.7, // 30-39
            45.7, 44.8, 43.8, 42.9, 41.9, 41.0, 40.0, 39.0, 38.1, 37.1, // 40-49
            36.2, 35.3, 34.3, 33.4, 32.5, 31.6, 30.6, 29.8, 28.9, 28.0, // 50-59
            27.1, 26.2, 25.4, 24.5, 23.7, 22.9, 22.0, 21.2, 20.4, 19.6, // 60-69
            18.8, 18.0, 17.2, 16.4, 15.6, 14.8, 14.1, 13.3, 12.6, 11.9, // 70-79
            11.2, 10.5, 9.9, 9.3, 8.7, 8.1, 7.6, 7.1, 6.6, 6.1, // 80-89
            5.7, 5.3, 4.9, 4.6, 4.3, 4.0, 3.7, 3.4, 3.2, 3.0, // 90-99
            2.8, 2.6, 2.5, 2.3, 2.1, 1.9, 1.7, 1.5, 1.4, 1.2, // 100-109
            1.1, // 110
        ];
        // 111 and older
        divisors.resize(MAX_TABLE_AGE as usize + 1, 1.0);
        Self { divisors }
    }

    /// Build from (age, divisor) pairs; ages missing from the input reuse
    /// the previous age's divisor
    ///
    /// Age 0 must be present so every age has a divisor. Ages above 120 and
    /// non-positive divisors are rejected.
    pub fn from_rows(rows: &[(u32, f64)]) -> Result<Self, ValidationError> {
        let mut given: Vec<Option<f64>> = vec![None; MAX_TABLE_AGE as usize + 1];
        for &(age, divisor) in rows {
            check_age("age", i64::from(age))?;
            if !divisor.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "divisor" });
            }
            if divisor <= 0.0 {
                return Err(ValidationError::InconsistentInput {
                    reason: "life expectancy divisors must be positive",
                });
            }
            given[age as usize] = Some(divisor);
        }

        let mut previous = given[0].ok_or(ValidationError::InconsistentInput {
            reason: "life expectancy table has no row for age 0",
        })?;
        let divisors = given
            .into_iter()
            .map(|divisor| {
                previous = divisor.unwrap_or(previous);
                previous
            })
            .collect();
        Ok(Self { divisors })
    }

    /// Load from a CSV with `Age,Divisor` columns
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load from any reader with `Age,Divisor` columns
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Box<dyn Error>> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();

        for (line, result) in reader.records().enumerate() {
            let record = result?;
            let age = record
                .get(0)
                .ok_or_else(|| format!("row {}: missing Age column", line + 1))?;
            let divisor = record
                .get(1)
                .ok_or_else(|| format!("row {}: missing Divisor column", line + 1))?;
            rows.push((age.trim().parse::<u32>()?, divisor.trim().parse::<f64>()?));
        }

        Ok(Self::from_rows(&rows)?)
    }

    /// Divisor for an attained age, None above the table
    pub fn divisor_for_age(&self, age: u32) -> Option<f64> {
        self.divisors.get(age as usize).copied()
    }
}

/// Annual RMD for a non-spouse beneficiary using the non-recalculating method
///
/// The divisor is looked up once at the beneficiary's age in the first
/// distribution year and reduced by one for each year elapsed since.
pub fn inherited_rmd(
    prior_year_balance: f64,
    first_year_age: u32,
    years_elapsed: u32,
    table: &LifeExpectancyTable,
) -> Result<f64, ValidationError> {
    check_amount("prior_year_balance", prior_year_balance)?;
    check_age("first_year_age", i64::from(first_year_age))?;

    let initial = table
        .divisor_for_age(first_year_age)
        .ok_or(ValidationError::AgeOutOfRange {
            field: "first_year_age",
            value: i64::from(first_year_age),
        })?;
    let divisor = (initial - f64::from(years_elapsed)).max(MIN_DIVISOR);

    Ok(prior_year_balance / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_values() {
        let table = LifeExpectancyTable::irs_single_life_2022();
        assert_eq!(table.divisor_for_age(0), Some(84.6));
        assert_eq!(table.divisor_for_age(45), Some(41.0));
        assert_eq!(table.divisor_for_age(60), Some(27.1));
        assert_eq!(table.divisor_for_age(120), Some(1.0));
        assert_eq!(table.divisor_for_age(121), None);
    }

    #[test]
    fn test_table_is_non_increasing() {
        let table = LifeExpectancyTable::default();
        for age in 1..=120 {
            assert!(table.divisor_for_age(age).unwrap() <= table.divisor_for_age(age - 1).unwrap());
        }
    }

    #[test]
    fn test_first_year_rmd() {
        let table = LifeExpectancyTable::default();
        let rmd = inherited_rmd(410_000.0, 46, 0, &table).unwrap();
        // Age 46 divisor is 40.0
        assert_relative_eq!(rmd, 10_250.0);
    }

    #[test]
    fn test_divisor_reduces_each_year() {
        let table = LifeExpectancyTable::default();
        let rmd = inherited_rmd(100_000.0, 46, 5, &table).unwrap();
        assert_relative_eq!(rmd, 100_000.0 / 35.0);
    }

    #[test]
    fn test_divisor_floors_at_one() {
        let table = LifeExpectancyTable::default();
        let rmd = inherited_rmd(50_000.0, 100, 10, &table).unwrap();
        assert_relative_eq!(rmd, 50_000.0);
    }

    #[test]
    fn test_rejects_negative_balance() {
        let table = LifeExpectancyTable::default();
        assert!(inherited_rmd(-1.0, 50, 0, &table).is_err());
        assert!(inherited_rmd(1.0, 130, 0, &table).is_err());
    }

    #[test]
    fn test_from_rows_fills_gaps() {
        let table = LifeExpectancyTable::from_rows(&[(0, 80.0), (10, 70.0)]).unwrap();
        assert_eq!(table.divisor_for_age(5), Some(80.0));
        assert_eq!(table.divisor_for_age(10), Some(70.0));
        assert_eq!(table.divisor_for_age(90), Some(70.0));
        assert_eq!(table.divisor_for_age(121), None);
    }

    #[test]
    fn test_from_rows_rejects_bad_tables() {
        assert_eq!(
            LifeExpectancyTable::from_rows(&[(0, 80.0), (300, 1.0)]).unwrap_err(),
            ValidationError::AgeOutOfRange { field: "age", value: 300 }
        );
        assert!(matches!(
            LifeExpectancyTable::from_rows(&[(10, 70.0)]),
            Err(ValidationError::InconsistentInput { .. })
        ));
        assert!(LifeExpectancyTable::from_rows(&[(0, 0.0)]).is_err());
        assert!(LifeExpectancyTable::from_rows(&[(0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_from_reader() {
        let data = "Age,Divisor\n0,84.6\n45,41.0\n46,40.0\n";
        let table = LifeExpectancyTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.divisor_for_age(46), Some(40.0));
        assert_eq!(table.divisor_for_age(30), Some(84.6));

        let rmd = inherited_rmd(410_000.0, 46, 0, &table).unwrap();
        assert_relative_eq!(rmd, 10_250.0);
    }

    #[test]
    fn test_from_reader_reports_short_rows() {
        let data = "Age\n0\n";
        let err = LifeExpectancyTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Divisor"), "unexpected error: {}", err);

        let missing_zero = "Age,Divisor\n10,70.0\n";
        assert!(LifeExpectancyTable::from_reader(missing_zero.as_bytes()).is_err());
    }

    #[test]
    fn test_from_csv_path() {
        let path = std::env::temp_dir().join(format!("life_table_{}.csv", std::process::id()));
        std::fs::write(&path, "Age,Divisor\n0,80.0\n60,27.1\n").unwrap();
        let table = LifeExpectancyTable::from_csv_path(&path);
        std::fs::remove_file(&path).unwrap();

        let table = table.unwrap();
        assert_eq!(table.divisor_for_age(60), Some(27.1));
        assert!(LifeExpectancyTable::from_csv_path(Path::new("no/such/table.csv")).is_err());
    }
}
