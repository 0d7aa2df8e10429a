//! The scalar minimisation objective: net cost over the horizon.

use crate::domain::{FlowFamily, ParameterSet, VarKey};

use super::{LinearExpr, Model};

/// Composes `sum(grid + battery + renewable costs) - sum(export revenue)`.
///
/// Must run after the cost variables exist; independent of constraint
/// order.
pub struct ObjectiveBuilder;

impl ObjectiveBuilder {
    pub fn minimise_net_cost(params: &ParameterSet, model: &Model) -> LinearExpr {
        let mut objective = LinearExpr::new();
        for t in params.horizon() {
            objective.add_term(model.handle(VarKey::new(FlowFamily::GridCost, t)), 1.0);
            objective.add_term(model.handle(VarKey::new(FlowFamily::BatteryCost, t)), 1.0);
            objective.add_term(model.handle(VarKey::new(FlowFamily::RenewableCost, t)), 1.0);
            objective.add_term(
                model.handle(VarKey::new(FlowFamily::BatteryToGridRevenue, t)),
                -1.0,
            );
        }
        objective
    }
}
