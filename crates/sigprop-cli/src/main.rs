//! sigprop command-line interface.
//!
//! Reads a job file, runs the propagation pipeline and prints the LaTeX
//! derivation.

mod job;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sigprop::{Digits, PropagationError, RenderOptions, UncertaintyCalculator};

use crate::job::Job;

/// Render the propagated uncertainty of a measurement as LaTeX
///
/// Switches given on the command line win over the job file; `--insert`
/// turns a switch on, `--insert=false` turns it off.
#[derive(Parser, Debug)]
#[command(name = "sigprop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render first-order uncertainty propagation as a LaTeX derivation")]
struct Cli {
    /// Job file (.json, .yaml or .yml)
    job: PathBuf,

    /// Write the markup here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit four environments instead of one aligned block
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    separate: Option<bool>,

    /// Show formulas with the values substituted
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    insert: Option<bool>,

    /// Use numbered equation environments
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    number: Option<bool>,

    /// Significant digits of the mean
    #[arg(long)]
    mu: Option<i64>,

    /// Significant digits of the uncertainty
    #[arg(long)]
    sigma: Option<i64>,

    /// Unit markup of the result
    #[arg(long)]
    unit: Option<String>,

    /// Close separate inserted unnumbered output with `\end{equation}*`
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    legacy_end_marker: Option<bool>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Digits and render options, flags first, then the job file.
    fn resolve(&self, job: &Job) -> Result<(Digits, RenderOptions), PropagationError> {
        let digits = Digits::new(
            self.mu.unwrap_or_else(|| i64::from(job.digits.mu())),
            self.sigma.unwrap_or_else(|| i64::from(job.digits.sigma())),
        )?;
        let options = RenderOptions {
            last_unit: self.unit.clone().or_else(|| job.unit.clone()),
            separate: self.separate.unwrap_or(job.separate),
            insert: self.insert.unwrap_or(job.insert),
            include_equation_number: self.number.unwrap_or(job.include_equation_number),
            legacy_end_marker: self.legacy_end_marker.unwrap_or(job.legacy_end_marker),
        };
        Ok((digits, options))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let job = Job::load(&cli.job)?;
    let equation = job.equation().map_err(classified)?;
    let variables = job.variables().map_err(classified)?;
    let (digits, options) = cli.resolve(&job).map_err(classified)?;
    log::info!(
        "rendering {} with {} variables ({options:?})",
        cli.job.display(),
        variables.len()
    );

    let calculator = UncertaintyCalculator::new().with_simplifier(job.simplifier.clone());
    let latex = calculator
        .run(&equation, &variables, digits, &options)
        .map_err(classified)?;

    match cli.output {
        Some(path) => fs::write(&path, latex)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => print!("{latex}"),
    }
    Ok(())
}

/// Wraps a pipeline error with its class.
fn classified(err: PropagationError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(kind.to_string())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}
