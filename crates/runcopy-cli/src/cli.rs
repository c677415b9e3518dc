//! Argument parsing and dispatch for the `runcopy` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use runcopy_config::load_policy;
use runcopy_fsops::copy_run;
use runcopy_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError, init_logging,
};
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, render_report};

const BUILD_SHA: &str = match option_env!("RUNCOPY_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, performs the copy, and reports the outcome.
/// Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(rendered) => {
            println!("{rendered}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn execute(cli: &Cli) -> CliResult<String> {
    install_logging(cli)?;

    let policy = load_policy(cli.config.as_deref())?;
    debug!(
        source = %cli.source.display(),
        destination_root = %cli.destination_root.display(),
        algorithm = %policy.hash_algorithm,
        "starting run copy"
    );
    let report = copy_run(&cli.source, &cli.destination_root, &policy)?;
    render_report(&report, cli.output)
}

fn install_logging(cli: &Cli) -> CliResult<()> {
    let format = cli.log_format.map_or_else(LogFormat::infer, LogFormat::from);
    let config = LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: BUILD_SHA,
    };
    match init_logging(&config) {
        Ok(()) | Err(TelemetryError::SubscriberInstall { .. }) => Ok(()),
        Err(TelemetryError::InvalidLevel { level, .. }) => Err(CliError::validation(format!(
            "invalid log level directive: {level}"
        ))),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "runcopy",
    version,
    about = "Copy a run directory into a fresh, checksum-verified destination folder"
)]
struct Cli {
    #[arg(help = "Directory holding the run's files and its descriptor")]
    source: PathBuf,
    #[arg(help = "Directory under which the <run id>_<n> folder is created")]
    destination_root: PathBuf,
    #[arg(long, env = "RUNCOPY_CONFIG", help = "JSON copy policy file")]
    config: Option<PathBuf>,
    #[arg(
        long,
        env = "RUNCOPY_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,
    #[arg(long, env = "RUNCOPY_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormatArg>,
    #[arg(
        long = "output",
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Select how the copy report is printed"
    )]
    output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}
