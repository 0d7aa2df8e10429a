//! Single-shot run orchestration: parameters, build, export, solve,
//! summary. Thin glue around the model core.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::export;
use crate::model::Optimiser;
use crate::report::RunSummary;
use crate::solver;

pub fn run(cfg: &Config) -> Result<RunSummary> {
    let params = cfg.parameters().context("invalid parameter set")?;
    info!(
        slices = params.num_slices(),
        timeslice_hours = params.timeslice_hours,
        "building dispatch model"
    );

    let model = Optimiser::build(&params).context("failed to build dispatch model")?;

    export::write_lp(&model, &cfg.export.model_path).with_context(|| {
        format!(
            "failed to export model to {}",
            cfg.export.model_path.display()
        )
    })?;
    info!(path = %cfg.export.model_path.display(), "model exported");

    let solution = solver::solve(&model).context("solver invocation failed")?;
    info!(status = %solution.status, "solve finished");

    let summary = RunSummary::from_solution(&solution);
    if let Some(path) = &cfg.export.summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }

    Ok(summary)
}
