//! Command-line interface for autosig
//!
//! Running `autosig` with no subcommand generates the report. `validate` checks
//! an outline without running anything and `version` prints build information.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

use crate::config::{ExecutionOverrides, ReportOverrides, SettingsOverrides};

/// Generates the System Implementation Guide
#[derive(Parser)]
#[command(
    name = "autosig",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generates the System Implementation Guide",
    long_about = "autosig walks a section outline and renders static text, command output \
                  and collector files into a plain-text System Implementation Guide."
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options that shape a report run
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Outline file (JSON, YAML or TOML)
    #[arg(short, long, value_name = "CONFIG", default_value = "autosig.conf", global = true)]
    pub config: PathBuf,

    /// Read section bodies from this collector directory instead of running commands
    #[arg(short = 'C', long, value_name = "COLLECTORDIR")]
    pub collector: Option<PathBuf>,

    /// Log acquisition errors and continue instead of aborting
    #[arg(short, long)]
    pub ignore: bool,

    /// Settings file layered over the built-in defaults
    #[arg(long, value_name = "FILE", env = "AUTOSIG_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Default per-command timeout in seconds (0 disables it)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory to write the report into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Mirror the report to stdout while it is written
    #[arg(long)]
    pub stdout: bool,
}

impl RunArgs {
    /// Flags that were actually given, as settings overrides
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            report: ReportOverrides {
                output_dir: self.output_dir.clone(),
                mirror_stdout: self.stdout.then_some(true),
            },
            execution: ExecutionOverrides {
                timeout: self.timeout,
                ignore_errors: self.ignore.then_some(true),
                collector: self.collector.clone(),
            },
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the outline against the schema without running anything
    Validate(commands::validate::ValidateArgs),
    /// Show version information
    Version(commands::version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Validate(args)) => commands::validate::execute(args, &self.run, &output).await,
            Some(Commands::Version(args)) => commands::version::execute(args, &output).await,
            None => commands::generate::execute(&self.run, &output).await,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            return tracing_subscriber::EnvFilter::new("error");
        }
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("info"),
            1 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr so a mirrored report on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_run_flags() {
        let cli = Cli::parse_from(["autosig"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.run.config, PathBuf::from("autosig.conf"));
        assert!(!cli.run.ignore);

        let overrides = cli.run.overrides();
        assert_eq!(overrides.execution.ignore_errors, None);
        assert_eq!(overrides.report.mirror_stdout, None);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(["autosig", "-c", "sig.json", "-C", "/var/collector", "-i", "-t", "30"]);
        let overrides = cli.run.overrides();

        assert_eq!(cli.run.config, PathBuf::from("sig.json"));
        assert_eq!(overrides.execution.collector, Some(PathBuf::from("/var/collector")));
        assert_eq!(overrides.execution.ignore_errors, Some(true));
        assert_eq!(overrides.execution.timeout, Some(30));
    }

    #[test]
    fn test_validate_subcommand() {
        let cli = Cli::parse_from(["autosig", "validate", "-c", "sig.yaml"]);
        assert!(matches!(cli.command, Some(Commands::Validate(_))));
        assert_eq!(cli.run.config, PathBuf::from("sig.yaml"));
    }
}
