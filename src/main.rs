use anyhow::Result;
use dispatch_optimiser::{config::Config, report, runner, telemetry};

fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let summary = runner::run(&cfg)?;
    report::print_summary(&summary);

    Ok(())
}
