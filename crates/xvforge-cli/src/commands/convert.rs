use crate::cli::ConvertArgs;
use crate::config::{self, SpeciesSource};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use tracing::info;
use xvforge::{engine::progress::ProgressReporter, workflows};

pub fn run(args: ConvertArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_config(&args.conversion)?;
    match &app_config.species_source {
        SpeciesSource::File(path) => info!("Using species map {}", path.display()),
        SpeciesSource::Inline => info!("Using species entries from the command line"),
    }

    let progress_handler = CliProgressHandler::new("Converting");
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core conversion workflow...");
    let target = workflows::convert::run(
        &args.input,
        &args.output,
        &app_config.core_config,
        &reporter,
    )?;

    println!(
        "✓ Wrote {} atoms to: {}",
        target.atom_count(),
        args.output.display()
    );
    for (tag, z, count) in target.species_summary() {
        println!("  species {:>3}  Z = {:>3}  x {}", tag, z, count);
    }

    Ok(())
}
