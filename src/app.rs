// src/app.rs

use crate::io::demand::{self, DemandError};
use crate::model::records::DemandRecord;
use crate::simulation::config::SimulationParameters;
use crate::simulation::engine::{simulate, SimulationResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Process-level settings, read once at startup.
///
/// ```toml
/// data_path = "data/daily_sales.csv"
/// output_dir = "results"
///
/// [defaults]
/// initial_stock = 100
/// threshold = 20
/// restock_amount = 50
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub defaults: SimulationParameters,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/daily_sales.csv"),
            output_dir: PathBuf::from("results"),
            defaults: SimulationParameters::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Applies command-line values on top of the file values. `None` keeps
    /// what the file said.
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
}

/// Shared, read-only state for serving simulation requests.
///
/// Built once when the process starts. Every call to [`run`](Self::run)
/// starts a fresh simulation, so a single context can serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct AppContext {
    demand: Vec<DemandRecord>,
    defaults: SimulationParameters,
}

impl AppContext {
    pub fn new(demand: Vec<DemandRecord>, defaults: SimulationParameters) -> Self {
        Self { demand, defaults }
    }

    /// Loads the dataset named in `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, DemandError> {
        let demand = demand::load_demand_csv(&config.data_path)?;
        info!(days = demand.len(), "application context ready");
        Ok(Self::new(demand, config.defaults))
    }

    pub fn defaults(&self) -> SimulationParameters {
        self.defaults
    }

    pub fn run(&self, params: SimulationParameters) -> SimulationResult {
        simulate(&self.demand, params)
    }

    /// Runs with raw form values, falling back per field to this context's
    /// defaults.
    pub fn run_form(
        &self,
        initial_stock: Option<&str>,
        threshold: Option<&str>,
        restock_amount: Option<&str>,
    ) -> (SimulationParameters, SimulationResult) {
        let params = SimulationParameters::from_form_with_defaults(
            initial_stock,
            threshold,
            restock_amount,
            self.defaults,
        );
        (params, self.run(params))
    }
}
