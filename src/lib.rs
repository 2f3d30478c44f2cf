//! Single-item inventory simulation.
//!
//! Replays a daily demand sequence against a stock level with a fixed
//! threshold restock rule and reports fulfilled and lost demand per day.

pub mod app;
pub mod io;
pub mod model;
pub mod simulation;

pub use model::records::{DayResult, DemandRecord};
pub use simulation::config::SimulationParameters;
pub use simulation::engine::{simulate, ChartSeries, SimulationResult, Summary};
