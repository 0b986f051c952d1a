use anyhow::{bail, Context};
use clap::{App, Arg};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use std::path::Path;
use std::time::Instant;

use crate::commands::Command;
use crate::converter::convert;
use crate::manifest::{self, Job};
use crate::pgm::SourceKind;
use crate::utils::JobError;

pub struct Batch {}

impl Command for Batch {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn register(&self) -> App<'static> {
        App::new(self.name())
            .about("Convert multiple heightmaps in parallel.")
            .arg(
                Arg::new("pairs")
                    .value_name("SOURCE|DESTINATION")
                    .help("Files to convert, e.g. 'maps/a.pgm|out/a.png'")
                    .takes_value(true)
                    .multiple_values(true),
            )
            .arg(
                Arg::new("manifest")
                    .short('m')
                    .long("manifest")
                    .value_name("MANIFEST")
                    .help("JSON file listing {\"source\", \"destination\"} objects")
                    .takes_value(true),
            )
            .arg(
                Arg::new("glob")
                    .short('g')
                    .long("glob")
                    .value_name("PATTERN")
                    .help("Glob pattern of heightmaps to convert into --output")
                    .takes_value(true)
                    .requires("output"),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("OUTPUT_DIR")
                    .help("Output directory for files matched by --glob")
                    .takes_value(true),
            )
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();
        let mut jobs: Vec<Job> = Vec::new();

        if let Some(pairs) = args.values_of("pairs") {
            for pair in pairs {
                match Job::from_pair(pair) {
                    Some(job) => jobs.push(job),
                    None => println!("ℹ️  Skipping input '{}'", pair),
                }
            }
        }

        if let Some(manifest_path) = args.value_of("manifest") {
            println!("▶️  Loading manifest");
            let manifest_jobs = manifest::from_file(Path::new(manifest_path))?;
            println!("✔️  Loaded {} jobs from manifest", manifest_jobs.len());
            jobs.extend(manifest_jobs);
        }

        if let Some(pattern) = args.value_of("glob") {
            let output_path = Path::new(args.value_of("output").unwrap_or_default());
            jobs.extend(glob_jobs(pattern, output_path)?);
        }

        if jobs.is_empty() {
            bail!("Nothing to convert");
        }

        println!("ℹ️  Converting {} heightmaps", jobs.len());
        run_jobs(&jobs)?;

        println!("\n    🎉  Finished in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}

/// One job per match of `pattern`, each written to `<output_path>/<stem>.png`.
fn glob_jobs(pattern: &str, output_path: &Path) -> anyhow::Result<Vec<Job>> {
    if !output_path.is_dir() {
        bail!("Output path is not a directory");
    }

    let mut jobs = Vec::new();
    let paths = glob::glob(pattern).with_context(|| format!("Invalid glob pattern '{}'", pattern))?;

    for entry in paths {
        let source = entry?;
        let kind = SourceKind::from_path(&source);
        let file_name = source.file_name().and_then(|n| n.to_str());

        let stem = match (kind, file_name) {
            (Some(kind), Some(file_name)) => kind.strip_extension(file_name),
            _ => {
                println!("ℹ️  Skipping {}, not a heightmap", source.display());
                continue;
            }
        };

        jobs.push(Job::new(&source, output_path.join(format!("{}.png", stem))));
    }

    Ok(jobs)
}

/// Runs every job, even after others failed, and reports all failures at the end.
fn run_jobs(jobs: &[Job]) -> anyhow::Result<()> {
    let results: Vec<_> = jobs
        .par_iter()
        .map(|job| -> Result<(), JobError> {
            let now = Instant::now();

            match convert(&job.source, &job.destination) {
                Ok(()) => {
                    println!(
                        "    ✔️  Converted {} in {}ms",
                        job.source.display(),
                        now.elapsed().as_millis()
                    );
                    Ok(())
                }
                Err(e) => {
                    println!("    ❌  Failed to convert {}", job.source.display());
                    Err(JobError::new(&job.source, &job.destination, e))
                }
            }
        })
        .collect();

    let errors: Vec<JobError> = results.into_iter().filter_map(Result::err).collect();

    if !errors.is_empty() {
        let mut error_string: Vec<String> = errors
            .iter()
            .take(10)
            .map(|e| -> String { format!("\t{}", e) })
            .collect();

        if errors.len() > 10 {
            error_string.push(format!("\t... and {} more heightmaps", errors.len() - 10))
        }

        bail!(
            "Failed to convert {} of {} heightmap(s):\n{}",
            errors.len(),
            jobs.len(),
            error_string.join("\n")
        );
    }

    Ok(())
}
