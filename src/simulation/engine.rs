// src/simulation/engine.rs

use crate::model::records::{DayResult, DemandRecord};
use crate::simulation::config::SimulationParameters;
use serde::Serialize;
use tracing::debug;

/// Aggregates over a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_demand: i64,
    pub total_fulfilled: i64,
    pub total_lost: i64,
    pub restock_days: usize,
    pub total_restocked: i64,
    /// Mean of `stock_after` over all days. 0.0 for an empty run.
    pub average_stock: f64,
}

impl Summary {
    pub fn from_days(days: &[DayResult]) -> Self {
        let average_stock = if days.is_empty() {
            0.0
        } else {
            days.iter().map(|d| d.stock_after as f64).sum::<f64>() / days.len() as f64
        };

        Self {
            total_demand: saturating_total(days.iter().map(|d| i64::from(d.demand))),
            total_fulfilled: saturating_total(days.iter().map(|d| d.fulfilled)),
            total_lost: saturating_total(days.iter().map(|d| d.lost)),
            restock_days: days.iter().filter(|d| d.was_restocked()).count(),
            total_restocked: saturating_total(days.iter().map(|d| d.restocked)),
            average_stock,
        }
    }
}

// Totals pin at the i64 bounds instead of overflowing.
fn saturating_total(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0i64, i64::saturating_add)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub days: Vec<DayResult>,
    pub summary: Summary,
}

/// Parallel series for plotting stock and realised sales over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub stock: Vec<i64>,
    pub fulfilled: Vec<i64>,
}

impl SimulationResult {
    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            labels: self.days.iter().map(|d| d.label.clone()).collect(),
            stock: self.days.iter().map(|d| d.stock_after).collect(),
            fulfilled: self.days.iter().map(|d| d.fulfilled).collect(),
        }
    }
}

/// The running state of one simulation. Lives only for the duration of
/// `simulate`.
struct StockRun {
    params: SimulationParameters,
    stock: i64,
}

impl StockRun {
    fn new(params: SimulationParameters) -> Self {
        Self {
            params,
            stock: params.initial_stock,
        }
    }

    fn step(&mut self, record: &DemandRecord) -> DayResult {
        let demand = i64::from(record.demand);

        // 1. Serve what we can from stock on hand
        let (fulfilled, lost) = if self.stock >= demand {
            (demand, 0)
        } else {
            (self.stock, demand.saturating_sub(self.stock))
        };
        self.stock = self.stock.saturating_sub(fulfilled);

        // 2. Restock decision on the post-sale level
        let restocked = if self.stock <= self.params.threshold {
            self.params.restock_amount
        } else {
            0
        };
        self.stock = self.stock.saturating_add(restocked);

        DayResult {
            label: record.label.clone(),
            demand: record.demand,
            fulfilled,
            lost,
            restocked,
            stock_after: self.stock,
        }
    }
}

/// Replays `demand` front to back against a single running stock level.
///
/// Each day: fulfil `min(stock, demand)`, record the rest as lost, then add
/// `restock_amount` if the remaining stock is at or below `threshold`. The
/// function is total; an empty sequence yields no days and a zeroed summary.
///
/// Arithmetic saturates at the `i64` bounds, so extreme parameters pin the
/// stock and totals at `i64::MIN`/`i64::MAX` rather than panicking or
/// wrapping.
pub fn simulate(demand: &[DemandRecord], params: SimulationParameters) -> SimulationResult {
    let mut run = StockRun::new(params);
    let days: Vec<DayResult> = demand.iter().map(|record| run.step(record)).collect();
    let summary = Summary::from_days(&days);

    debug!(
        days = days.len(),
        initial_stock = params.initial_stock,
        threshold = params.threshold,
        restock_amount = params.restock_amount,
        total_lost = summary.total_lost,
        restock_days = summary.restock_days,
        "simulation finished"
    );

    SimulationResult { days, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(demand: &[u32]) -> Vec<DemandRecord> {
        demand
            .iter()
            .enumerate()
            .map(|(i, &d)| DemandRecord::new((i + 1).to_string(), d))
            .collect()
    }

    #[test]
    fn restocks_when_threshold_is_reached_exactly() {
        let result = simulate(&records(&[30, 50, 10]), SimulationParameters::new(100, 20, 50));

        let stock: Vec<i64> = result.days.iter().map(|d| d.stock_after).collect();
        let restocked: Vec<i64> = result.days.iter().map(|d| d.restocked).collect();
        assert_eq!(stock, vec![70, 70, 60]);
        assert_eq!(restocked, vec![0, 50, 0]);
        assert!(result.days.iter().all(|d| d.lost == 0));

        let s = &result.summary;
        assert_eq!(s.total_demand, 90);
        assert_eq!(s.total_fulfilled, 90);
        assert_eq!(s.total_lost, 0);
        assert_eq!(s.restock_days, 1);
        assert_eq!(s.total_restocked, 50);
        assert!((s.average_stock - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn stockout_loses_excess_demand() {
        let result = simulate(&records(&[150]), SimulationParameters::new(100, 20, 50));
        let day = &result.days[0];

        assert_eq!(day.fulfilled, 100);
        assert_eq!(day.lost, 50);
        assert_eq!(day.restocked, 50);
        assert_eq!(day.stock_after, 50);
        assert_eq!(result.summary.total_lost, 50);
        assert_eq!(result.summary.restock_days, 1);
    }

    #[test]
    fn zero_restock_never_recovers() {
        let result = simulate(&records(&[10, 10]), SimulationParameters::new(15, 20, 0));

        assert_eq!(result.days[0].fulfilled, 10);
        assert_eq!(result.days[0].stock_after, 5);
        assert_eq!(result.days[1].fulfilled, 5);
        assert_eq!(result.days[1].lost, 5);
        assert_eq!(result.days[1].stock_after, 0);
        assert_eq!(result.summary.total_lost, 5);
        // restock of 0 units does not count as a restock day
        assert_eq!(result.summary.restock_days, 0);
    }

    #[test]
    fn empty_input_gives_zeroed_summary() {
        let result = simulate(&[], SimulationParameters::default());

        assert!(result.days.is_empty());
        assert_eq!(result.summary.total_demand, 0);
        assert_eq!(result.summary.total_fulfilled, 0);
        assert_eq!(result.summary.total_lost, 0);
        assert_eq!(result.summary.restock_days, 0);
        assert_eq!(result.summary.total_restocked, 0);
        assert_eq!(result.summary.average_stock, 0.0);
    }

    #[test]
    fn restock_can_fire_every_day() {
        let result = simulate(&records(&[5, 5, 5]), SimulationParameters::new(10, 100, 1));
        assert_eq!(result.summary.restock_days, 3);
        assert_eq!(result.summary.total_restocked, 3);
        let stock: Vec<i64> = result.days.iter().map(|d| d.stock_after).collect();
        assert_eq!(stock, vec![6, 2, 1]);
    }

    #[test]
    fn negative_restock_is_applied_literally() {
        let result = simulate(&records(&[0, 0]), SimulationParameters::new(0, 0, -10));
        assert_eq!(result.days[0].stock_after, -10);
        assert_eq!(result.days[0].restocked, -10);
        // negative stock is "fulfilled" back to zero before restocking again
        assert_eq!(result.days[1].fulfilled, -10);
        assert_eq!(result.days[1].lost, 10);
        assert_eq!(result.days[1].stock_after, -10);
        assert_eq!(result.summary.restock_days, 0);
    }

    #[test]
    fn huge_restock_saturates_stock() {
        let params = SimulationParameters::from_form(
            Some("100"),
            Some("9223372036854775807"),
            Some("9223372036854775807"),
        );
        let result = simulate(&records(&[0]), params);
        assert_eq!(result.days[0].restocked, i64::MAX);
        assert_eq!(result.days[0].stock_after, i64::MAX);
        assert_eq!(result.summary.total_restocked, i64::MAX);
    }

    #[test]
    fn minimum_initial_stock_does_not_overflow() {
        let params = SimulationParameters::from_form(Some("-9223372036854775808"), Some("0"), Some("0"));
        let result = simulate(&records(&[1]), params);
        let day = &result.days[0];
        assert_eq!(day.fulfilled, i64::MIN);
        assert_eq!(day.lost, i64::MAX);
        assert_eq!(day.stock_after, 0);
        assert_eq!(result.summary.total_lost, i64::MAX);
    }

    #[test]
    fn repeated_large_restocks_pin_at_max() {
        let params = SimulationParameters::new(0, i64::MAX, i64::MAX / 2 + 1);
        let result = simulate(&records(&[0, 0]), params);
        assert_eq!(result.days[0].stock_after, i64::MAX / 2 + 1);
        assert_eq!(result.days[1].stock_after, i64::MAX);
        assert_eq!(result.summary.restock_days, 2);
        assert_eq!(result.summary.total_restocked, i64::MAX);
    }

    #[test]
    fn zero_demand_day_still_checks_threshold() {
        let result = simulate(&records(&[0]), SimulationParameters::new(20, 20, 50));
        assert_eq!(result.days[0].restocked, 50);
        assert_eq!(result.days[0].stock_after, 70);
    }

    #[test]
    fn labels_are_copied_in_order() {
        let input = vec![
            DemandRecord::new("2024-01-01", 3),
            DemandRecord::new("2024-01-02", 4),
        ];
        let result = simulate(&input, SimulationParameters::default());
        let series = result.chart_series();

        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.stock, vec![97, 93]);
        assert_eq!(series.fulfilled, vec![3, 4]);
    }
}
