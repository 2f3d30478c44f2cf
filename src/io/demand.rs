// src/io/demand.rs

use crate::model::records::DemandRecord;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, NormalError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("failed to read demand data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed demand CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: demand {value:?} is not a non-negative integer")]
    InvalidDemand { row: usize, value: String },
    #[error("invalid demand distribution: {0}")]
    Distribution(#[from] NormalError),
}

// Column layout of the daily sales export. Only the demand column is
// required; other columns are ignored. `date` wins over `label` when a
// file carries both.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(alias = "sales")]
    demand: String,
}

/// Loads the daily demand table from a CSV file, keeping file order.
pub fn load_demand_csv(path: impl AsRef<Path>) -> Result<Vec<DemandRecord>, DemandError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DemandError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records = read_demand_csv(file)?;

    if records.is_empty() {
        warn!(path = %path.display(), "demand file has no rows");
    } else {
        info!(path = %path.display(), days = records.len(), "loaded demand data");
    }
    Ok(records)
}

/// Parses headered CSV from any reader.
///
/// The label comes from `date`, then `label`; rows with neither get their
/// 1-based row number.
pub fn read_demand_csv<R: Read>(reader: R) -> Result<Vec<DemandRecord>, DemandError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let index = i + 1;
        let demand = row
            .demand
            .parse::<u32>()
            .map_err(|_| DemandError::InvalidDemand {
                row: index,
                value: row.demand.clone(),
            })?;
        let label = [row.date, row.label]
            .into_iter()
            .flatten()
            .find(|l| !l.is_empty())
            .unwrap_or_else(|| index.to_string());
        records.push(DemandRecord { label, demand });
    }

    Ok(records)
}

fn indexed(values: impl IntoIterator<Item = u32>) -> Vec<DemandRecord> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, demand)| DemandRecord::new((i + 1).to_string(), demand))
        .collect()
}

/// Every day has the same demand.
pub fn generate_constant_demand(days: usize, value: u32) -> Vec<DemandRecord> {
    indexed(std::iter::repeat(value).take(days))
}

/// Demand drawn from a Normal distribution, rounded and clamped at zero.
///
/// Seeded so that a demo dataset is reproducible between runs.
pub fn generate_normal_demand(
    days: usize,
    mean: f64,
    std_dev: f64,
    seed: u64,
) -> Result<Vec<DemandRecord>, DemandError> {
    let normal = Normal::new(mean, std_dev)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let values = (0..days).map(|_| {
        let val = normal.sample(&mut rng).round();
        if val < 0.0 {
            0
        } else {
            val as u32
        }
    });
    Ok(indexed(values.collect::<Vec<_>>()))
}

/// `low` for the first `switch_day` days, `high` afterwards.
pub fn generate_step_demand(days: usize, switch_day: usize, low: u32, high: u32) -> Vec<DemandRecord> {
    indexed((0..days).map(|d| if d < switch_day { low } else { high }))
}

/// A synthetic demand shape, used in place of a dataset for demos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemandPattern {
    Constant { value: u32 },
    Normal { mean: f64, std_dev: f64, seed: u64 },
    Step { switch_day: usize, low: u32, high: u32 },
}

impl DemandPattern {
    pub fn generate(&self, days: usize) -> Result<Vec<DemandRecord>, DemandError> {
        let records = match *self {
            DemandPattern::Constant { value } => generate_constant_demand(days, value),
            DemandPattern::Normal { mean, std_dev, seed } => {
                generate_normal_demand(days, mean, std_dev, seed)?
            }
            DemandPattern::Step {
                switch_day,
                low,
                high,
            } => generate_step_demand(days, switch_day, low, high),
        };
        info!(days, pattern = ?self, "generated synthetic demand");
        Ok(records)
    }
}
