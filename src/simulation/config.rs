// src/simulation/config.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_INITIAL_STOCK: i64 = 100;
pub const DEFAULT_THRESHOLD: i64 = 20;
pub const DEFAULT_RESTOCK_AMOUNT: i64 = 50;

/// The three knobs of a run. No range checks are applied: zero or negative
/// values are simulated as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub initial_stock: i64,
    pub threshold: i64,
    pub restock_amount: i64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_stock: DEFAULT_INITIAL_STOCK,
            threshold: DEFAULT_THRESHOLD,
            restock_amount: DEFAULT_RESTOCK_AMOUNT,
        }
    }
}

impl SimulationParameters {
    pub fn new(initial_stock: i64, threshold: i64, restock_amount: i64) -> Self {
        Self {
            initial_stock,
            threshold,
            restock_amount,
        }
    }

    /// Builds parameters from raw form values.
    ///
    /// Each field is parsed on its own. A missing or unparseable value falls
    /// back to that field's default and the others are kept, so a typo in one
    /// box never resets the whole form. Nothing is reported to the caller.
    pub fn from_form(
        initial_stock: Option<&str>,
        threshold: Option<&str>,
        restock_amount: Option<&str>,
    ) -> Self {
        Self::from_form_with_defaults(initial_stock, threshold, restock_amount, Self::default())
    }

    /// Same as [`from_form`](Self::from_form) but falls back to `defaults`
    /// instead of the built-in values.
    pub fn from_form_with_defaults(
        initial_stock: Option<&str>,
        threshold: Option<&str>,
        restock_amount: Option<&str>,
        defaults: Self,
    ) -> Self {
        Self {
            initial_stock: parse_or(initial_stock, defaults.initial_stock, "initial_stock"),
            threshold: parse_or(threshold, defaults.threshold, "threshold"),
            restock_amount: parse_or(restock_amount, defaults.restock_amount, "restock_amount"),
        }
    }
}

fn parse_or(raw: Option<&str>, fallback: i64, field: &str) -> i64 {
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.trim().parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            debug!(field, raw, fallback, "unparseable parameter, using default");
            fallback
        }
    }
}
