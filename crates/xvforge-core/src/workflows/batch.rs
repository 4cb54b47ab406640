use super::convert;
use crate::engine::config::{ConfigError, ConversionConfig};
use crate::engine::error::ConversionError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Extension given to every generated structure file.
pub const OUTPUT_EXTENSION: &str = "XV";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub job: ConversionJob,
    /// Number of atoms written, or the reason the job failed.
    pub result: Result<usize, ConversionError>,
}

/// Maps every input to `<output_dir>/<input stem>.XV`.
///
/// Fails if two inputs would be written to the same file.
pub fn plan_jobs(inputs: &[PathBuf], output_dir: &Path) -> Result<Vec<ConversionJob>, ConfigError> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input.file_stem().ok_or_else(|| ConfigError::InvalidParameter {
                name: "inputs",
                reason: format!("'{}' has no file name", input.display()),
            })?;
            let mut name = stem.to_os_string();
            name.push(".");
            name.push(OUTPUT_EXTENSION);
            let output = output_dir.join(name);
            if !seen.insert(output.clone()) {
                return Err(ConfigError::InvalidParameter {
                    name: "inputs",
                    reason: format!(
                        "more than one input would be written to '{}'",
                        output.display()
                    ),
                });
            }
            Ok(ConversionJob {
                input: input.clone(),
                output,
            })
        })
        .collect()
}

/// Converts independent documents in parallel.
///
/// Each job owns its input and output handles; a failure in one job does not
/// affect the others. Outcomes are returned in the order of `jobs`.
#[instrument(skip_all, name = "batch_workflow", fields(jobs = jobs.len()))]
pub fn run(
    jobs: &[ConversionJob],
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Vec<JobOutcome> {
    reporter.report(Progress::TaskStart {
        total_steps: jobs.len() as u64,
    });

    let outcomes: Vec<JobOutcome> = jobs
        .par_iter()
        .map(|job| {
            let result = convert::run(&job.input, &job.output, config, &ProgressReporter::new())
                .map(|target| target.atom_count());
            if let Err(e) = &result {
                warn!("Failed to convert {}: {}", job.input.display(), e);
                reporter.report(Progress::Message(format!(
                    "{}: {}",
                    job.input.display(),
                    e
                )));
            }
            reporter.report(Progress::TaskIncrement);
            JobOutcome {
                job: job.clone(),
                result,
            }
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        "Batch finished: {} converted, {} failed.",
        outcomes.len() - failed,
        failed
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::species::{SpeciesEntry, SpeciesLayout, SpeciesMap};
    use crate::engine::config::ConversionConfigBuilder;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::tempdir;

    const SINGLE_LEAD: &str = "Pb\n1.0\n4 0 0\n0 4 0\n0 0 4\n1\nDirect\n0.5 0.5 0.5\n";

    fn config() -> ConversionConfig {
        ConversionConfigBuilder::new()
            .species_map(
                SpeciesMap::new(vec![SpeciesEntry::new(1, 82)], SpeciesLayout::Blocks).unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn plan_jobs_names_outputs_after_input_stems() {
        let jobs = plan_jobs(
            &[PathBuf::from("runs/a/POSCAR"), PathBuf::from("runs/b.vasp")],
            Path::new("out"),
        )
        .unwrap();
        assert_eq!(jobs[0].output, PathBuf::from("out/POSCAR.XV"));
        assert_eq!(jobs[1].output, PathBuf::from("out/b.XV"));
    }

    #[test]
    fn plan_jobs_keeps_dotted_stems_intact() {
        let jobs = plan_jobs(
            &[
                PathBuf::from("PbTiO3.step1.vasp"),
                PathBuf::from("PbTiO3.step2.vasp"),
            ],
            Path::new("out"),
        )
        .unwrap();
        assert_eq!(jobs[0].output, PathBuf::from("out/PbTiO3.step1.XV"));
        assert_eq!(jobs[1].output, PathBuf::from("out/PbTiO3.step2.XV"));
    }

    #[test]
    fn plan_jobs_rejects_colliding_outputs() {
        let err = plan_jobs(
            &[PathBuf::from("a/POSCAR"), PathBuf::from("b/POSCAR")],
            Path::new("out"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "inputs", .. }));
    }

    #[test]
    fn run_converts_each_job_independently() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.vasp");
        let bad = dir.path().join("bad.vasp");
        fs::write(&good, SINGLE_LEAD).unwrap();
        fs::write(&bad, "truncated\n1.0\n").unwrap();
        let out_dir = dir.path().join("out");
        fs::create_dir(&out_dir).unwrap();

        let jobs = plan_jobs(&[good, bad], &out_dir).unwrap();
        let increments = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::TaskIncrement) {
                increments.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let outcomes = run(&jobs, &config(), &reporter);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].result.as_ref().ok(), Some(&1));
        assert!(matches!(
            outcomes[1].result,
            Err(ConversionError::MalformedStructure(_))
        ));
        assert!(out_dir.join("good.XV").exists());
        assert!(!out_dir.join("bad.XV").exists());
        drop(reporter);
        assert_eq!(increments.into_inner(), 2);
    }
}
