//! Human-readable run summary: total cost and per-family energy totals.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::domain::FlowFamily;
use crate::solver::{DispatchSolution, SolveStatus};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: SolveStatus,
    /// Net cost over the horizon (£); absent unless the solve was
    /// optimal.
    pub total_cost: Option<f64>,
    pub grid_cost: f64,
    pub battery_cost: f64,
    pub renewable_cost: f64,
    pub battery_to_grid_revenue: f64,
    /// kWh totals per flow family over the horizon.
    pub flow_totals_kwh: BTreeMap<String, f64>,
}

impl RunSummary {
    pub fn from_solution(solution: &DispatchSolution) -> Self {
        let flow_totals_kwh = FlowFamily::iter()
            .filter(|family| family.is_energy_flow())
            .map(|family| (family.to_string(), solution.total(family)))
            .collect();

        Self {
            status: solution.status,
            total_cost: solution.objective_value,
            grid_cost: solution.total(FlowFamily::GridCost),
            battery_cost: solution.total(FlowFamily::BatteryCost),
            renewable_cost: solution.total(FlowFamily::RenewableCost),
            battery_to_grid_revenue: solution.total(FlowFamily::BatteryToGridRevenue),
            flow_totals_kwh,
        }
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("Status: {}", summary.status);
    if !summary.status.is_optimal() {
        return;
    }

    println!("\n---- Costs ----");
    if let Some(total) = summary.total_cost {
        println!("Total Cost = £{total:.2}");
    }
    println!("Total Grid Costs = £{:.2}", summary.grid_cost);
    println!("Total Battery Costs = £{:.2}", summary.battery_cost);
    println!("Total Renewable Costs = £{:.2}", summary.renewable_cost);
    println!(
        "Total Battery to Grid Revenue = £{:.2}",
        summary.battery_to_grid_revenue
    );

    println!("\n---- Energy Flows ----");
    for (family, total) in &summary.flow_totals_kwh {
        println!("Total {family} = {total:.2} kWh");
    }
}
