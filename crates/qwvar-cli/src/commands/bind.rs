use crate::cli::BindArgs;
use crate::config;
use crate::error::Result;
use crate::progress::CliProgressHandler;
use qwvar::engine::comm::run_spmd;
use qwvar::engine::progress::ProgressReporter;
use qwvar::workflows::bind;
use tracing::{info, warn};

pub fn run(args: BindArgs, slots: usize) -> Result<()> {
    let config = config::resolve_bind(&args)?;

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let result = run_spmd(slots, |comm| bind::run(comm, &config, &reporter))?;

    if !result.converged {
        warn!("Result below is best-effort: the search exhausted its budget.");
    }
    info!(
        radius_angstrom = result.exciton_radius_angstrom,
        binding_energy_mev = result.binding_energy_mev,
        iterations = result.iterations,
        evaluations = result.evaluations,
        "bind command finished"
    );

    // The coordinator's single result line.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).map_err(anyhow::Error::new)?);
    } else {
        println!(
            "{:.10} {:.10}",
            result.exciton_radius, result.binding_energy_ry
        );
    }
    Ok(())
}
