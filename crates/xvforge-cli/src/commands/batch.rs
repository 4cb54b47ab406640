use crate::cli::BatchArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use tracing::{info, warn};
use xvforge::{engine::progress::ProgressReporter, workflows::batch};

pub fn run(args: BatchArgs) -> Result<()> {
    let app_config = config::build_config(&args.conversion)?;

    let jobs = batch::plan_jobs(&args.inputs, &args.output_dir)
        .map_err(|e| CliError::Argument(e.to_string()))?;
    std::fs::create_dir_all(&args.output_dir)?;
    info!(
        "Converting {} files into {}",
        jobs.len(),
        args.output_dir.display()
    );

    let progress_handler = CliProgressHandler::new("Converting");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let outcomes = batch::run(&jobs, &app_config.core_config, &reporter);

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(atoms) => println!(
                "✓ {} -> {} ({} atoms)",
                outcome.job.input.display(),
                outcome.job.output.display(),
                atoms
            ),
            Err(e) => {
                failed += 1;
                warn!("{}: {}", outcome.job.input.display(), e);
                eprintln!("✗ {}: {}", outcome.job.input.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(())
}
