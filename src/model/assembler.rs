//! Orchestrates variable, objective, and constraint generation into one
//! complete model.

use tracing::debug;

use crate::domain::{ParameterError, ParameterSet};

use super::{ConstraintBuilder, Model, ObjectiveBuilder, VariableFactory};

const MODEL_NAME: &str = "BatteryDispatch";

/// Single entry point for model assembly.
pub struct Optimiser;

impl Optimiser {
    /// Builds the full dispatch model for one parameter set.
    ///
    /// Validates the parameters fail-fast, registers every variable,
    /// sets the objective, then walks the horizon once emitting each
    /// constraint group in a fixed order so constraint names and
    /// positions are identical across rebuilds. Construction succeeds
    /// even for models the solver will later report infeasible.
    pub fn build(params: &ParameterSet) -> Result<Model, ParameterError> {
        params.validate()?;

        let mut model = Model::new(MODEL_NAME);
        VariableFactory::new(params).populate(&mut model);

        let objective = ObjectiveBuilder::minimise_net_cost(params, &model);
        model.set_objective(objective);

        let mut builder = ConstraintBuilder::new(params, &mut model);
        for t in params.horizon() {
            builder.demand_balance(t);
            builder.battery_inflow(t);
            builder.renewable_split(t);
            builder.renewable_cap(t);
            builder.state_of_charge(t);
            builder.discharge_rate(t);
            builder.charge_rate(t);
            builder.capacity_bounds(t);
            builder.financial_linkage(t);
        }

        debug!(
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            "dispatch model assembled"
        );
        Ok(model)
    }
}
