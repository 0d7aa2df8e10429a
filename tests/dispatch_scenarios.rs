//! Solved-dispatch scenarios: conservation, the state-of-charge chain,
//! rate and capacity bounds, and the boundary cases around supply.

#![cfg(feature = "solver")]

use dispatch_optimiser::domain::{FlowFamily, ParameterSet, TimeSlice};
use dispatch_optimiser::model::Optimiser;
use dispatch_optimiser::solver::{solve, DispatchSolution, SolveStatus};

const TOLERANCE: f64 = 1e-6;

fn params(n: usize) -> ParameterSet {
    ParameterSet {
        timeslice_hours: 0.5,
        max_renewable_generation_kw: 10.0,
        max_battery_charge_rate_kw: 5.0,
        max_battery_discharge_rate_kw: 5.0,
        max_battery_capacity_kwh: 100.0,
        unit_price_grid: 0.3,
        unit_price_battery: 0.0,
        unit_price_renewable: 0.0,
        unit_price_battery_sale: 0.1,
        scale_renewable_cap_by_timeslice: false,
        demand_kwh: vec![100.0; n],
    }
}

fn solve_params(params: &ParameterSet) -> DispatchSolution {
    let model = Optimiser::build(params).unwrap();
    solve(&model).unwrap()
}

fn value(solution: &DispatchSolution, family: FlowFamily, t: u32) -> f64 {
    solution.value(family, TimeSlice(t)).unwrap()
}

#[test]
fn every_slice_serves_demand_exactly() {
    let params = params(48);
    let solution = solve_params(&params);
    assert_eq!(solution.status, SolveStatus::Optimal);

    for t in 1..=48 {
        let served = value(&solution, FlowFamily::RenewableToHouse, t)
            + value(&solution, FlowFamily::BatteryToHouse, t)
            + value(&solution, FlowFamily::GridToHouse, t);
        assert!(
            (served - 100.0).abs() < TOLERANCE,
            "slice {t}: served {served}"
        );
    }
}

#[test]
fn state_of_charge_chain_holds() {
    let params = params(48);
    let solution = solve_params(&params);

    assert!(value(&solution, FlowFamily::BatterySoc, 1).abs() < TOLERANCE);
    for t in 2..=48 {
        let expected = value(&solution, FlowFamily::BatterySoc, t - 1)
            + value(&solution, FlowFamily::ElectricityToBattery, t)
            - value(&solution, FlowFamily::BatteryToHouse, t)
            - value(&solution, FlowFamily::BatteryToGrid, t)
            - value(&solution, FlowFamily::BatteryDegradation, t);
        let actual = value(&solution, FlowFamily::BatterySoc, t);
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "slice {t}: soc {actual}, chain gives {expected}"
        );
    }
}

#[test]
fn rates_and_capacity_are_respected() {
    let params = params(48);
    let solution = solve_params(&params);

    for t in 1..=48 {
        let soc = value(&solution, FlowFamily::BatterySoc, t);
        assert!(soc > -TOLERANCE && soc < 100.0 + TOLERANCE, "slice {t}: soc {soc}");

        let charge = value(&solution, FlowFamily::ElectricityToBattery, t);
        assert!(charge < 2.5 + TOLERANCE, "slice {t}: charge {charge}");

        let discharge = value(&solution, FlowFamily::BatteryToHouse, t)
            + value(&solution, FlowFamily::BatteryToGrid, t);
        assert!(discharge < 2.5 + TOLERANCE, "slice {t}: discharge {discharge}");

        let generation = value(&solution, FlowFamily::TotalRenewableGeneration, t);
        assert!(generation < 10.0 + TOLERANCE, "slice {t}: generation {generation}");
    }
}

#[test]
fn objective_equals_recomputed_net_cost() {
    let params = params(48);
    let solution = solve_params(&params);

    let mut net_cost = 0.0;
    for t in 1..=48 {
        net_cost += value(&solution, FlowFamily::GridCost, t)
            + value(&solution, FlowFamily::BatteryCost, t)
            + value(&solution, FlowFamily::RenewableCost, t)
            - value(&solution, FlowFamily::BatteryToGridRevenue, t);
    }
    let objective = solution.objective_value.unwrap();
    assert!(
        (objective - net_cost).abs() < TOLERANCE,
        "objective {objective}, recomputed {net_cost}"
    );
}

#[test]
fn zero_demand_with_no_sale_price_dispatches_nothing() {
    let mut params = params(48);
    params.demand_kwh = vec![0.0; 48];
    params.unit_price_battery_sale = 0.0;
    let solution = solve_params(&params);

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!(solution.objective_value.unwrap().abs() < TOLERANCE);
    for family in [
        FlowFamily::RenewableToHouse,
        FlowFamily::RenewableToBattery,
        FlowFamily::TotalRenewableGeneration,
        FlowFamily::BatteryToHouse,
        FlowFamily::BatteryToGrid,
        FlowFamily::ElectricityToBattery,
        FlowFamily::GridToHouse,
        FlowFamily::GridToBattery,
    ] {
        assert!(
            solution.total(family).abs() < TOLERANCE,
            "{family} total is nonzero"
        );
    }
}

#[test]
fn grid_covers_demand_beyond_local_supply() {
    // Demand far above renewable + battery capability stays feasible:
    // the grid connection is uncapped.
    let mut params = params(48);
    params.demand_kwh = vec![1000.0; 48];
    let solution = solve_params(&params);

    assert_eq!(solution.status, SolveStatus::Optimal);
    for t in 1..=48 {
        let grid = value(&solution, FlowFamily::GridToHouse, t);
        assert!(grid > 987.5 - TOLERANCE, "slice {t}: grid {grid}");
    }
}

#[test]
fn single_slice_horizon_pins_soc_and_solves() {
    let params = params(1);
    let solution = solve_params(&params);

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!(value(&solution, FlowFamily::BatterySoc, 1).abs() < TOLERANCE);
    let served = value(&solution, FlowFamily::RenewableToHouse, 1)
        + value(&solution, FlowFamily::BatteryToHouse, 1)
        + value(&solution, FlowFamily::GridToHouse, 1);
    assert!((served - 100.0).abs() < TOLERANCE);
}
