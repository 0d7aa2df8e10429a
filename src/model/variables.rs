//! Decision-variable creation, one family at a time.

use strum::IntoEnumIterator;

use crate::domain::{FlowFamily, ParameterSet, VarKey};

use super::{Model, VariableDef};

/// Creates the decision variables for every `(family, slice)` pair.
///
/// Each variable is continuous and non-negative; state-of-charge
/// variables are additionally bounded above by the battery capacity.
/// Construction never fails for a validated parameter set and has no
/// side effects beyond registering the variables on the model.
pub struct VariableFactory<'a> {
    params: &'a ParameterSet,
}

impl<'a> VariableFactory<'a> {
    pub fn new(params: &'a ParameterSet) -> Self {
        Self { params }
    }

    /// Registers all families over the full horizon, in family
    /// declaration order then slice order, so handles are stable
    /// across rebuilds.
    pub fn populate(&self, model: &mut Model) {
        for family in FlowFamily::iter() {
            self.add_family(model, family);
        }
    }

    fn add_family(&self, model: &mut Model, family: FlowFamily) {
        let upper_bound = match family {
            FlowFamily::BatterySoc => Some(self.params.max_battery_capacity_kwh),
            _ => None,
        };
        for slice in self.params.horizon() {
            model.add_variable(VariableDef {
                key: VarKey::new(family, slice),
                lower_bound: 0.0,
                upper_bound,
            });
        }
    }
}
