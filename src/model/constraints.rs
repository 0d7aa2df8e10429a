//! Per-slice constraint generation: balance, capacity, rate, and
//! financial-linkage equations.

use crate::domain::{FlowFamily, ParameterSet, TimeSlice, VarKey};

use super::{Comparison, Constraint, LinearExpr, Model, VarId};

/// Emits the constraint groups for each time slice.
///
/// All variables must already be registered; the builder only reads the
/// parameter set and appends named constraints to the model.
pub struct ConstraintBuilder<'a> {
    params: &'a ParameterSet,
    model: &'a mut Model,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(params: &'a ParameterSet, model: &'a mut Model) -> Self {
        Self { params, model }
    }

    /// `renewable_to_house + battery_to_house + grid_to_house = demand`.
    ///
    /// Exact service of load: no curtailment or shedding variable
    /// exists, so an unservable demand surfaces as an infeasible model.
    pub fn demand_balance(&mut self, t: TimeSlice) {
        let expr = LinearExpr::new()
            .with_term(self.var(FlowFamily::RenewableToHouse, t), 1.0)
            .with_term(self.var(FlowFamily::BatteryToHouse, t), 1.0)
            .with_term(self.var(FlowFamily::GridToHouse, t), 1.0);
        self.push(
            format!("Demand_{t}"),
            t,
            expr,
            Comparison::Equal,
            self.params.demand(t),
        );
    }

    /// `renewable_to_battery + grid_to_battery - battery_to_grid =
    /// electricity_to_battery`; grid export nets against charging inflow.
    pub fn battery_inflow(&mut self, t: TimeSlice) {
        let expr = LinearExpr::new()
            .with_term(self.var(FlowFamily::RenewableToBattery, t), 1.0)
            .with_term(self.var(FlowFamily::GridToBattery, t), 1.0)
            .with_term(self.var(FlowFamily::BatteryToGrid, t), -1.0)
            .with_term(self.var(FlowFamily::ElectricityToBattery, t), -1.0);
        self.push(
            format!("Electricity_flow_{t}"),
            t,
            expr,
            Comparison::Equal,
            0.0,
        );
    }

    /// Defines the per-slice generation total from its two destinations.
    pub fn renewable_split(&mut self, t: TimeSlice) {
        let expr = LinearExpr::new()
            .with_term(self.var(FlowFamily::RenewableToHouse, t), 1.0)
            .with_term(self.var(FlowFamily::RenewableToBattery, t), 1.0)
            .with_term(self.var(FlowFamily::TotalRenewableGeneration, t), -1.0);
        self.push(
            format!("Total_renewable_generation_{t}"),
            t,
            expr,
            Comparison::Equal,
            0.0,
        );
    }

    /// Caps the per-slice generation total. The cap is a sizing limit,
    /// not an energy budget, unless the parameter set opts into scaling
    /// by the slice duration.
    pub fn renewable_cap(&mut self, t: TimeSlice) {
        let expr =
            LinearExpr::new().with_term(self.var(FlowFamily::TotalRenewableGeneration, t), 1.0);
        self.push(
            format!("Maximum_renewable_generation_{t}"),
            t,
            expr,
            Comparison::LessOrEqual,
            self.params.renewable_cap(),
        );
    }

    /// The stateful core: battery state of charge.
    ///
    /// Slice 1 carries the boundary condition `battery_soc = 0` as its
    /// own constraint; every later slice couples to its predecessor:
    /// `soc[t-1] + electricity_to_battery[t] - battery_to_house[t]
    ///  - battery_to_grid[t] - battery_degradation[t] = soc[t]`.
    ///
    /// Slices must be visited in ascending order so the chain reads
    /// left to right in the exported model.
    pub fn state_of_charge(&mut self, t: TimeSlice) {
        let name = format!("Battery_state_of_charge_{t}");
        match t.previous() {
            None => {
                let expr = LinearExpr::new().with_term(self.var(FlowFamily::BatterySoc, t), 1.0);
                self.push(name, t, expr, Comparison::Equal, 0.0);
            }
            Some(prev) => {
                let expr = LinearExpr::new()
                    .with_term(self.var(FlowFamily::BatterySoc, prev), 1.0)
                    .with_term(self.var(FlowFamily::ElectricityToBattery, t), 1.0)
                    .with_term(self.var(FlowFamily::BatteryToHouse, t), -1.0)
                    .with_term(self.var(FlowFamily::BatteryToGrid, t), -1.0)
                    .with_term(self.var(FlowFamily::BatteryDegradation, t), -1.0)
                    .with_term(self.var(FlowFamily::BatterySoc, t), -1.0);
                self.push(name, t, expr, Comparison::Equal, 0.0);
            }
        }
    }

    /// Energy leaving the battery within a slice cannot exceed the
    /// discharge rate over the slice duration.
    pub fn discharge_rate(&mut self, t: TimeSlice) {
        let expr = LinearExpr::new()
            .with_term(self.var(FlowFamily::BatteryToHouse, t), 1.0)
            .with_term(self.var(FlowFamily::BatteryToGrid, t), 1.0);
        self.push(
            format!("Battery_discharge_rate_{t}"),
            t,
            expr,
            Comparison::LessOrEqual,
            self.params.max_battery_discharge_rate_kw * self.params.timeslice_hours,
        );
    }

    /// Energy entering the battery within a slice cannot exceed the
    /// charge rate over the slice duration.
    pub fn charge_rate(&mut self, t: TimeSlice) {
        let expr = LinearExpr::new().with_term(self.var(FlowFamily::ElectricityToBattery, t), 1.0);
        self.push(
            format!("Battery_charge_rate_{t}"),
            t,
            expr,
            Comparison::LessOrEqual,
            self.params.max_battery_charge_rate_kw * self.params.timeslice_hours,
        );
    }

    /// Explicit `0 <= soc <= capacity` rows. Redundant with the
    /// variable bounds but kept as named constraints so solver
    /// diagnostics can point at them.
    pub fn capacity_bounds(&mut self, t: TimeSlice) {
        let soc = self.var(FlowFamily::BatterySoc, t);
        self.push(
            format!("Battery_capacity_{t}"),
            t,
            LinearExpr::new().with_term(soc, 1.0),
            Comparison::LessOrEqual,
            self.params.max_battery_capacity_kwh,
        );
        self.push(
            format!("Battery_minimum_state_of_charge_{t}"),
            t,
            LinearExpr::new().with_term(soc, 1.0),
            Comparison::GreaterOrEqual,
            0.0,
        );
    }

    /// Defines each cost variable as a linear function of its flows.
    pub fn financial_linkage(&mut self, t: TimeSlice) {
        let grid_expr = LinearExpr::new()
            .with_term(self.var(FlowFamily::GridToHouse, t), self.params.unit_price_grid)
            .with_term(
                self.var(FlowFamily::GridToBattery, t),
                self.params.unit_price_grid,
            )
            .with_term(self.var(FlowFamily::GridCost, t), -1.0);
        self.push(
            format!("Grid_electricity_costs_{t}"),
            t,
            grid_expr,
            Comparison::Equal,
            0.0,
        );

        let battery_expr = LinearExpr::new()
            .with_term(
                self.var(FlowFamily::BatteryToHouse, t),
                self.params.unit_price_battery,
            )
            .with_term(self.var(FlowFamily::BatteryCost, t), -1.0);
        self.push(
            format!("Battery_electricity_costs_{t}"),
            t,
            battery_expr,
            Comparison::Equal,
            0.0,
        );

        let renewable_expr = LinearExpr::new()
            .with_term(
                self.var(FlowFamily::RenewableToHouse, t),
                self.params.unit_price_renewable,
            )
            .with_term(self.var(FlowFamily::RenewableCost, t), -1.0);
        self.push(
            format!("Renewable_electricity_costs_{t}"),
            t,
            renewable_expr,
            Comparison::Equal,
            0.0,
        );

        let revenue_expr = LinearExpr::new()
            .with_term(
                self.var(FlowFamily::BatteryToGrid, t),
                self.params.unit_price_battery_sale,
            )
            .with_term(self.var(FlowFamily::BatteryToGridRevenue, t), -1.0);
        self.push(
            format!("Battery_to_grid_revenue_{t}"),
            t,
            revenue_expr,
            Comparison::Equal,
            0.0,
        );
    }

    fn var(&self, family: FlowFamily, slice: TimeSlice) -> VarId {
        self.model.handle(VarKey::new(family, slice))
    }

    fn push(
        &mut self,
        name: String,
        slice: TimeSlice,
        expr: LinearExpr,
        comparison: Comparison,
        rhs: f64,
    ) {
        self.model.add_constraint(Constraint {
            name,
            slice,
            expr,
            comparison,
            rhs,
        });
    }
}
