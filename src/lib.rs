//! Offline LP scheduler for household renewable/battery/grid dispatch.
//!
//! Builds a linear program that allocates energy flows among a
//! renewable source, a battery, the grid, and a house load over a daily
//! horizon of time slices, minimising net cost, then hands the model to
//! an external LP solver and reads back the dispatch.

pub mod config;
pub mod domain;
pub mod export;
pub mod model;
pub mod report;
pub mod runner;
pub mod solver;
pub mod telemetry;
