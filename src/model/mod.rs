//! In-memory representation of the dispatch LP: variables, named
//! constraints, and one minimisation objective.
//!
//! The model is built once per parameter set by [`Optimiser::build`] and
//! never mutated afterwards; a new parameter set means a fresh build.

pub mod assembler;
pub mod constraints;
pub mod objective;
pub mod variables;

pub use assembler::Optimiser;
pub use constraints::ConstraintBuilder;
pub use objective::ObjectiveBuilder;
pub use variables::VariableFactory;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::domain::{TimeSlice, VarKey};

/// Handle to a decision variable inside one [`Model`].
///
/// Handles are dense indices in creation order, so expressions keyed by
/// handle iterate in a deterministic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A decision variable: identity plus bounds.
///
/// All variables are continuous with lower bound zero; only the
/// state-of-charge family carries an upper bound.
#[derive(Debug, Clone)]
pub struct VariableDef {
    pub key: VarKey,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
}

/// Sparse linear expression over decision variables.
///
/// Terms are keyed by handle so iteration order is stable, which the
/// deterministic LP export relies on.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    terms: BTreeMap<VarId, f64>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates `coefficient * var` into the expression. Zero
    /// coefficients are dropped so priced-at-zero flows do not clutter
    /// the exported model.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coefficient;
        if *entry == 0.0 {
            self.terms.remove(&var);
        }
    }

    /// Builder-style variant of [`LinearExpr::add_term`].
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(id, c)| (*id, *c))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Evaluates the expression under a variable assignment.
    pub fn eval(&self, mut value: impl FnMut(VarId) -> f64) -> f64 {
        self.iter().map(|(id, c)| c * value(id)).sum()
    }
}

/// Direction of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Equal => write!(f, "="),
            Comparison::LessOrEqual => write!(f, "<="),
            Comparison::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// A named linear (in)equality, tagged with the slice it applies to.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub name: String,
    pub slice: TimeSlice,
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub rhs: f64,
}

/// The assembled optimisation model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    variables: Vec<VariableDef>,
    index: HashMap<VarKey, VarId>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a variable and returns its handle.
    ///
    /// Keys must be unique; registering the same `(family, slice)` twice
    /// is a programming error in the factory.
    pub fn add_variable(&mut self, def: VariableDef) -> VarId {
        let id = VarId(self.variables.len());
        let previous = self.index.insert(def.key, id);
        assert!(previous.is_none(), "duplicate variable {}", def.key);
        self.variables.push(def);
        id
    }

    pub fn var(&self, key: VarKey) -> Option<VarId> {
        self.index.get(&key).copied()
    }

    /// Resolves a key that the factory is known to have registered.
    pub fn handle(&self, key: VarKey) -> VarId {
        self.index[&key]
    }

    pub fn variable(&self, id: VarId) -> &VariableDef {
        &self.variables[id.0]
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlowFamily, TimeSlice};

    #[test]
    fn expressions_accumulate_and_drop_zeros() {
        let mut model = Model::new("test");
        let a = model.add_variable(VariableDef {
            key: VarKey::new(FlowFamily::GridToHouse, TimeSlice(1)),
            lower_bound: 0.0,
            upper_bound: None,
        });
        let mut expr = LinearExpr::new();
        expr.add_term(a, 1.0);
        expr.add_term(a, 0.5);
        assert_eq!(expr.coefficient(a), 1.5);
        expr.add_term(a, -1.5);
        assert!(expr.is_empty());
    }

    #[test]
    fn eval_matches_hand_computation() {
        let mut model = Model::new("test");
        let a = model.add_variable(VariableDef {
            key: VarKey::new(FlowFamily::GridToHouse, TimeSlice(1)),
            lower_bound: 0.0,
            upper_bound: None,
        });
        let b = model.add_variable(VariableDef {
            key: VarKey::new(FlowFamily::GridToHouse, TimeSlice(2)),
            lower_bound: 0.0,
            upper_bound: None,
        });
        let expr = LinearExpr::new().with_term(a, 2.0).with_term(b, -1.0);
        let value = expr.eval(|id| if id == a { 3.0 } else { 4.0 });
        assert_eq!(value, 2.0);
    }

    #[test]
    #[should_panic(expected = "duplicate variable")]
    fn duplicate_keys_are_rejected() {
        let mut model = Model::new("test");
        let def = VariableDef {
            key: VarKey::new(FlowFamily::BatterySoc, TimeSlice(1)),
            lower_bound: 0.0,
            upper_bound: Some(100.0),
        };
        model.add_variable(def.clone());
        model.add_variable(def);
    }
}
