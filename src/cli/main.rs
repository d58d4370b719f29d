//! Launcher entry point
//!
//! Resolves the launcher directory, runs the bootstrap sequence and turns
//! its result into the process exit code.

use crate::{
    config::LauncherConfig,
    console,
    error::LauncherError,
    launcher::{resolve_base_directory, Launcher},
    outcome::{exit_code_for, wait_for_acknowledgment, Report},
    process::ChildStatus,
    tracing_config::{TracingConfig, TracingFormat},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing::{debug, error};

/// Launcher for the RemBG background remover
///
/// Takes no arguments: it picks the Python interpreter next to it (or on
/// PATH), installs missing libraries and starts the application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "rembg-launcher")]
pub struct Cli {
    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format (logs go to stderr; RUST_LOG overrides -v)
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliLogFormat {
    Console,
    Compact,
    #[cfg(feature = "tracing-json")]
    Json,
}

impl From<CliLogFormat> for TracingFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Console => Self::Console,
            CliLogFormat::Compact => Self::Compact,
            #[cfg(feature = "tracing-json")]
            CliLogFormat::Json => Self::Json,
        }
    }
}

pub fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let logging = tracing_config(&cli, std::env::var("RUST_LOG").ok());
    logging.init().context("Failed to initialize tracing")?;
    let session = logging.session_span();
    let _session = session.enter();

    let base_dir = resolve_base_directory().context("Failed to locate launcher directory")?;
    std::env::set_current_dir(&base_dir)
        .with_context(|| format!("Failed to change directory to {}", base_dir.display()))?;
    debug!(base_dir = %base_dir.display(), "Working directory set");

    let config = LauncherConfig::builder()
        .base_dir(&base_dir)
        .build()
        .context("Invalid launcher configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(title) = &config.console_title {
        if out.is_terminal() {
            console::set_title(&mut out, title);
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut launcher = Launcher::new(config);
    let outcome = match launcher.run(&mut out) {
        Ok(outcome) => outcome,
        Err(err) => return Ok(report_error(&err, &mut out, &mut input)),
    };

    let report = launcher.finish(&outcome, &mut out, &mut input);
    Ok(ExitCode::from(exit_code_after_report(report, outcome.status)))
}

/// Tracing setup for this run: `-v` level, `--log-format`, and `RUST_LOG`
/// when it is set to something non-empty
fn tracing_config(cli: &Cli, rust_log: Option<String>) -> TracingConfig {
    let config = TracingConfig::new()
        .with_verbosity(cli.verbose)
        .with_format(cli.log_format.into())
        .with_session_id(uuid::Uuid::new_v4().to_string());

    match rust_log.filter(|filter| !filter.trim().is_empty()) {
        Some(filter) => config.with_env_filter(filter),
        None => config,
    }
}

/// The application's exit code, even if the acknowledgment could not be read
fn exit_code_after_report(report: crate::Result<Report>, status: ChildStatus) -> u8 {
    if let Err(err) = report {
        error!(error = %err, "Failed to read acknowledgment");
    }
    exit_code_for(status)
}

/// Print a bootstrap error; pause only if it hit the application launch
fn report_error<W, R>(err: &LauncherError, out: &mut W, input: &mut R) -> ExitCode
where
    W: Write + ?Sized,
    R: BufRead + ?Sized,
{
    error!(error = %err, "Launch aborted");
    console::fatal(out, &err.to_string());
    if !err.is_pre_launch() {
        if let Err(e) = wait_for_acknowledgment(out, input) {
            debug!(error = %e, "Acknowledgment read failed");
        }
    }
    ExitCode::from(err.exit_code())
}
