// src/model/records.rs

use serde::Serialize;

/// One day of the input dataset.
///
/// The label is an opaque ordering key (usually a date). The engine never
/// interprets it, it only copies it into the matching `DayResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandRecord {
    pub label: String,
    pub demand: u32,
}

impl DemandRecord {
    pub fn new(label: impl Into<String>, demand: u32) -> Self {
        Self {
            label: label.into(),
            demand,
        }
    }
}

/// The outcome of a single simulated day.
///
/// Signed fields mirror the running stock, which is not clamped: a negative
/// starting stock or restock amount is carried through literally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayResult {
    pub label: String,
    pub demand: u32,
    pub fulfilled: i64,
    pub lost: i64,
    pub restocked: i64, // 0 when the threshold was not reached
    pub stock_after: i64,
}

impl DayResult {
    pub fn was_restocked(&self) -> bool {
        self.restocked > 0
    }
}
