use crate::cli::CalibrateArgs;
use crate::config;
use crate::error::Result;
use crate::progress::CliProgressHandler;
use qwvar::engine::comm::run_spmd;
use qwvar::engine::progress::ProgressReporter;
use qwvar::workflows::calibrate;
use tracing::{info, warn};

pub fn run(args: CalibrateArgs, slots: usize) -> Result<()> {
    let config = config::resolve_calibrate(&args)?;

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let result = run_spmd(slots, |comm| calibrate::run(comm, &config, &reporter))?;

    if !result.converged {
        warn!("Result below is best-effort: the calibration exhausted its budget.");
    }
    for fit in &result.fits {
        info!(
            width_angstrom = fit.width_angstrom,
            computed_mev = fit.computed_mev,
            reference_mev = fit.reference_mev,
            "geometry fit"
        );
    }
    info!(
        eps_well = result.eps_well,
        residual_mev = result.residual_mev,
        iterations = result.iterations,
        "calibrate command finished"
    );

    // The coordinator's single result line.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).map_err(anyhow::Error::new)?);
    } else {
        println!("{:.10} {:.10}", result.eps_well, result.residual_mev);
    }
    Ok(())
}
