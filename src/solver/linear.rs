//! LP backend adapter.
//!
//! Translates the assembled model into a `good_lp` problem and maps the
//! backend's resolution outcomes onto [`SolveStatus`]. Solving is a
//! single blocking call; the model is not mutated.

use crate::model::Model;

use super::{DispatchSolution, SolveStatus, SolverError};

#[cfg(feature = "solver")]
pub fn solve(model: &Model) -> Result<DispatchSolution, SolverError> {
    use std::collections::BTreeMap;

    use good_lp::{
        constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
        Solution, SolverModel, Variable,
    };
    use tracing::info;

    fn to_expression(expr: &crate::model::LinearExpr, handles: &[Variable]) -> Expression {
        expr.iter()
            .map(|(id, coefficient)| coefficient * handles[id.index()])
            .sum()
    }

    let mut vars = ProblemVariables::new();
    let mut handles: Vec<Variable> = Vec::with_capacity(model.variables().len());
    for def in model.variables() {
        let mut definition = variable().min(def.lower_bound).name(def.key.to_string());
        if let Some(upper) = def.upper_bound {
            definition = definition.max(upper);
        }
        handles.push(vars.add(definition));
    }

    let objective = to_expression(model.objective(), &handles);
    let mut problem = vars.minimise(objective).using(default_solver);
    for row in model.constraints() {
        let lhs = to_expression(&row.expr, &handles);
        let constraint = match row.comparison {
            crate::model::Comparison::Equal => constraint!(lhs == row.rhs),
            crate::model::Comparison::LessOrEqual => constraint!(lhs <= row.rhs),
            crate::model::Comparison::GreaterOrEqual => constraint!(lhs >= row.rhs),
        };
        problem = problem.with(constraint);
    }

    match problem.solve() {
        Ok(solution) => {
            let mut values = BTreeMap::new();
            for (def, handle) in model.variables().iter().zip(&handles) {
                values.insert(def.key, solution.value(*handle));
            }
            let objective_value = model
                .objective()
                .eval(|id| solution.value(handles[id.index()]));
            info!(objective = objective_value, "solver returned an optimal dispatch");
            Ok(DispatchSolution::new(
                SolveStatus::Optimal,
                Some(objective_value),
                values,
            ))
        }
        Err(ResolutionError::Infeasible) => Ok(DispatchSolution::new(
            SolveStatus::Infeasible,
            None,
            BTreeMap::new(),
        )),
        Err(ResolutionError::Unbounded) => Ok(DispatchSolution::new(
            SolveStatus::Unbounded,
            None,
            BTreeMap::new(),
        )),
        Err(other) => Err(SolverError::Backend(other.to_string())),
    }
}

#[cfg(not(feature = "solver"))]
pub fn solve(_model: &Model) -> Result<DispatchSolution, SolverError> {
    Err(SolverError::Unavailable(
        "built without the `solver` feature",
    ))
}
