//! Solver collaborator interface: status, per-variable values, and the
//! backend adapter.
//!
//! The core hands the backend a fully specified model and reads back a
//! status plus a value for every variable; infeasible and unbounded are
//! ordinary outcomes here, while backend failures are a separate fatal
//! category.

pub mod linear;

pub use linear::solve;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{FlowFamily, TimeSlice, VarKey};

/// Negative values closer to zero than this are floating-point noise
/// and reported as zero in totals.
const NEGATIVE_NOISE_TOLERANCE: f64 = 1e-9;

/// Outcome of one solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl SolveStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::NotSolved => write!(f, "not_solved"),
        }
    }
}

/// Backend failures: the environment, not the model.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver backend unavailable: {0}")]
    Unavailable(&'static str),
    #[error("solver backend failed: {0}")]
    Backend(String),
}

/// The solved dispatch: a value for every decision variable plus the
/// overall status. Read-only; the only artifact that outlives the run.
#[derive(Debug, Clone)]
pub struct DispatchSolution {
    pub status: SolveStatus,
    pub objective_value: Option<f64>,
    values: BTreeMap<VarKey, f64>,
}

impl DispatchSolution {
    pub fn new(
        status: SolveStatus,
        objective_value: Option<f64>,
        values: BTreeMap<VarKey, f64>,
    ) -> Self {
        Self {
            status,
            objective_value,
            values,
        }
    }

    pub fn not_solved() -> Self {
        Self::new(SolveStatus::NotSolved, None, BTreeMap::new())
    }

    pub fn value(&self, family: FlowFamily, slice: TimeSlice) -> Option<f64> {
        self.values.get(&VarKey::new(family, slice)).copied()
    }

    pub fn values(&self) -> impl Iterator<Item = (VarKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Sum of a family over the horizon, with near-zero negative noise
    /// clamped to zero.
    pub fn total(&self, family: FlowFamily) -> f64 {
        self.values
            .iter()
            .filter(|(key, _)| key.family == family)
            .map(|(_, &v)| clamp_noise(v))
            .sum()
    }
}

fn clamp_noise(value: f64) -> f64 {
    if value < 0.0 && value > -NEGATIVE_NOISE_TOLERANCE {
        0.0
    } else {
        value
    }
}
