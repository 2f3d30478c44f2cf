// src/io/reporting.rs

use crate::model::records::DayResult;
use crate::simulation::engine::Summary;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the per-day table to a CSV file, one row per simulated day.
pub fn write_day_results(path: impl AsRef<Path>, days: &[DayResult]) -> Result<(), ReportError> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for day in days {
        wtr.serialize(day)?;
    }

    wtr.flush().map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!(rows = days.len(), path = %path.display(), "exported day results");
    Ok(())
}

/// Writes the summary as pretty-printed JSON.
pub fn write_summary(path: impl AsRef<Path>, summary: &Summary) -> Result<(), ReportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(file, summary)?;

    info!(path = %path.display(), "exported summary");
    Ok(())
}
