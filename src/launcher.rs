//! The bootstrap sequence
//!
//! `Start → DirectoryResolved → InterpreterSelected → DependenciesChecked →
//! ApplicationLaunched → OutcomeReported | Done`, strictly in that order.
//! The only failure that stops the sequence before launch is a missing
//! interpreter; the dependency step is best-effort.

use crate::config::LauncherConfig;
use crate::console;
use crate::dependencies::{ensure_dependencies, DependencyCheck};
use crate::error::{LauncherError, Result};
use crate::interpreter::{select_interpreter, Interpreter, InterpreterLocator, SearchPathLocator};
use crate::outcome::{report_outcome, Report};
use crate::process::{ChildStatus, Invocation, ProcessExecutor, SystemExecutor};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};

/// Position in the bootstrap sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootstrapStage {
    Start,
    DirectoryResolved,
    InterpreterSelected,
    DependenciesChecked,
    ApplicationLaunched,
    OutcomeReported,
    Done,
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::DirectoryResolved => "directory_resolved",
            Self::InterpreterSelected => "interpreter_selected",
            Self::DependenciesChecked => "dependencies_checked",
            Self::ApplicationLaunched => "application_launched",
            Self::OutcomeReported => "outcome_reported",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub interpreter: Interpreter,
    pub dependencies: DependencyCheck,
    pub status: ChildStatus,
}

/// Directory containing the running launcher executable
///
/// # Errors
/// `LauncherError::BaseDirectory` if the executable path is unavailable.
pub fn resolve_base_directory() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(LauncherError::BaseDirectory)?;
    let dir = exe.parent().ok_or_else(|| {
        LauncherError::BaseDirectory(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{}' has no parent directory", exe.display()),
        ))
    })?;
    Ok(dir.to_path_buf())
}

/// Run the application script in the foreground and wait for it
///
/// No arguments are forwarded. Console streams are inherited so the
/// application's output shows up live.
///
/// # Errors
/// `LauncherError::Spawn` when the interpreter cannot be started.
pub fn launch_application<E>(
    executor: &mut E,
    interpreter: &Interpreter,
    config: &LauncherConfig,
) -> Result<ChildStatus>
where
    E: ProcessExecutor + ?Sized,
{
    let script = config.app_script_path();
    if !script.is_file() {
        warn!(script = %script.display(), "Application script not found, launching anyway");
    }

    let invocation = Invocation::new(&interpreter.program, &config.base_dir).arg(&script);
    info!(command = %invocation, "Launching application");
    executor.status(&invocation)
}

/// Drives the bootstrap sequence for one configuration
pub struct Launcher<E = SystemExecutor, L = SearchPathLocator> {
    config: LauncherConfig,
    executor: E,
    locator: L,
    stage: BootstrapStage,
}

impl Launcher {
    /// Launcher spawning real processes and searching the real `PATH`
    #[must_use]
    pub fn new(config: LauncherConfig) -> Self {
        Self::with_parts(config, SystemExecutor, SearchPathLocator)
    }
}

impl<E, L> Launcher<E, L>
where
    E: ProcessExecutor,
    L: InterpreterLocator,
{
    pub fn with_parts(config: LauncherConfig, executor: E, locator: L) -> Self {
        Self {
            config,
            executor,
            locator,
            stage: BootstrapStage::Start,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    #[must_use]
    pub fn stage(&self) -> BootstrapStage {
        self.stage
    }

    /// Give back the executor, e.g. to inspect what a fake recorded
    pub fn into_executor(self) -> E {
        self.executor
    }

    fn advance(&mut self, next: BootstrapStage) {
        debug!(from = %self.stage, to = %next, "Bootstrap stage");
        self.stage = next;
    }

    /// Select the interpreter, settle dependencies and run the application
    ///
    /// Returns once the application has exited. Reporting its status is a
    /// separate step (`finish`) so the caller controls where the
    /// acknowledgment is read from.
    ///
    /// # Errors
    /// - `LauncherError::InterpreterNotFound` before anything is spawned
    /// - `LauncherError::Spawn` if the application cannot be started
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<RunOutcome> {
        let span = info_span!("bootstrap", base_dir = %self.config.base_dir.display());
        let _enter = span.enter();

        if let Some(title) = &self.config.console_title {
            console::header(out, title);
        }
        self.advance(BootstrapStage::DirectoryResolved);

        let interpreter = select_interpreter(&self.config, &self.locator, out)?;
        self.advance(BootstrapStage::InterpreterSelected);

        let dependencies = ensure_dependencies(
            &mut self.executor,
            &interpreter,
            &self.config.requirements,
            &self.config.base_dir,
            out,
        );
        self.advance(BootstrapStage::DependenciesChecked);

        console::launching(out, &self.config.app_script);
        let status = launch_application(&mut self.executor, &interpreter, &self.config)?;
        self.advance(BootstrapStage::ApplicationLaunched);
        info!(status = %status, "Application exited");

        Ok(RunOutcome {
            interpreter,
            dependencies,
            status,
        })
    }

    /// Report the application's status, pausing on failure
    ///
    /// # Errors
    /// `LauncherError::Io` when reading the acknowledgment fails.
    pub fn finish<W, R>(
        &mut self,
        outcome: &RunOutcome,
        out: &mut W,
        input: &mut R,
    ) -> Result<Report>
    where
        W: Write + ?Sized,
        R: BufRead + ?Sized,
    {
        let report = report_outcome(outcome.status, self.config.pause_on_failure, out, input)?;
        match report {
            Report::Clean => self.advance(BootstrapStage::Done),
            Report::Failed { .. } => self.advance(BootstrapStage::OutcomeReported),
        }
        Ok(report)
    }
}
