//! Deterministic LP-format serialization of an assembled model.
//!
//! One line per constraint, in generation order, with the constraint
//! names embedded so solver diagnostics and the model-exchange file can
//! be matched row for row. Byte-for-byte stability for a fixed
//! parameter set is part of the contract and is covered by tests.

use std::fs;
use std::io;
use std::path::Path;

use itertools::Itertools;

use crate::model::{LinearExpr, Model};

/// Writes the model to `path` in LP format.
pub fn write_lp(model: &Model, path: &Path) -> io::Result<()> {
    fs::write(path, to_lp_string(model))
}

/// Renders the model as an LP-format string.
pub fn to_lp_string(model: &Model) -> String {
    let mut out = String::new();
    out.push_str(&format!("\\ {}\n", model.name()));

    out.push_str("Minimize\n");
    out.push_str(&format!(" obj: {}\n", format_expr(model, model.objective())));

    out.push_str("Subject To\n");
    for constraint in model.constraints() {
        out.push_str(&format!(
            " {}: {} {} {}\n",
            constraint.name,
            format_expr(model, &constraint.expr),
            constraint.comparison,
            format_number(constraint.rhs),
        ));
    }

    let bounded = model
        .variables()
        .iter()
        .filter_map(|def| def.upper_bound.map(|upper| (def.key, upper)))
        .collect_vec();
    if !bounded.is_empty() {
        out.push_str("Bounds\n");
        for (key, upper) in bounded {
            out.push_str(&format!(" {} <= {}\n", key, format_number(upper)));
        }
    }

    out.push_str("End\n");
    out
}

/// Terms in handle order; unit coefficients are elided, signs folded
/// into the separators.
fn format_expr(model: &Model, expr: &LinearExpr) -> String {
    let mut out = String::new();
    for (i, (id, coefficient)) in expr.iter().enumerate() {
        let magnitude = coefficient.abs();
        if i == 0 {
            if coefficient < 0.0 {
                out.push('-');
            }
        } else if coefficient < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        if magnitude != 1.0 {
            out.push_str(&format_number(magnitude));
            out.push(' ');
        }
        out.push_str(&model.variable(id).key.to_string());
    }
    out
}

/// Shortest round-trip decimal form; stable for equal inputs.
fn format_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlowFamily, TimeSlice, VarKey};
    use crate::model::{Comparison, Constraint, LinearExpr, Model, VariableDef};

    fn tiny_model() -> Model {
        let mut model = Model::new("TinyDispatch");
        let grid = model.add_variable(VariableDef {
            key: VarKey::new(FlowFamily::GridToHouse, TimeSlice(1)),
            lower_bound: 0.0,
            upper_bound: None,
        });
        let soc = model.add_variable(VariableDef {
            key: VarKey::new(FlowFamily::BatterySoc, TimeSlice(1)),
            lower_bound: 0.0,
            upper_bound: Some(100.0),
        });
        let cost = model.add_variable(VariableDef {
            key: VarKey::new(FlowFamily::GridCost, TimeSlice(1)),
            lower_bound: 0.0,
            upper_bound: None,
        });
        model.set_objective(LinearExpr::new().with_term(cost, 1.0));
        model.add_constraint(Constraint {
            name: "Demand_1".into(),
            slice: TimeSlice(1),
            expr: LinearExpr::new().with_term(grid, 1.0),
            comparison: Comparison::Equal,
            rhs: 100.0,
        });
        model.add_constraint(Constraint {
            name: "Grid_electricity_costs_1".into(),
            slice: TimeSlice(1),
            expr: LinearExpr::new()
                .with_term(grid, 0.3)
                .with_term(cost, -1.0),
            comparison: Comparison::Equal,
            rhs: 0.0,
        });
        model.add_constraint(Constraint {
            name: "Battery_capacity_1".into(),
            slice: TimeSlice(1),
            expr: LinearExpr::new().with_term(soc, 1.0),
            comparison: Comparison::LessOrEqual,
            rhs: 100.0,
        });
        model
    }

    #[test]
    fn renders_the_expected_snapshot() {
        let expected = "\\ TinyDispatch\n\
                        Minimize\n \
                        obj: grid_cost_1\n\
                        Subject To\n \
                        Demand_1: grid_to_house_1 = 100\n \
                        Grid_electricity_costs_1: 0.3 grid_to_house_1 - grid_cost_1 = 0\n \
                        Battery_capacity_1: battery_soc_1 <= 100\n\
                        Bounds\n \
                        battery_soc_1 <= 100\n\
                        End\n";
        assert_eq!(to_lp_string(&tiny_model()), expected);
    }

    #[test]
    fn writes_identical_bytes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.lp");
        let model = tiny_model();
        write_lp(&model, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_lp_string(&model));
    }

    #[test]
    fn numbers_render_without_trailing_zeros() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.3), "0.3");
    }
}
