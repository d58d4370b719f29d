#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # RemBG Launcher
//!
//! Console launcher for the RemBG desktop application. It locates the
//! directory it lives in, picks a Python interpreter (a local `.venv` one if
//! present, otherwise one from `PATH`), makes sure `numpy` and Pillow import,
//! installing them once if they don't, and then runs `rembg_app.py`.
//!
//! If the application exits with a non-zero status the launcher prints the
//! code and waits for Enter, so a window opened by double-click stays
//! readable.
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use rembg_launcher::{Launcher, LauncherConfig};
//! use std::io;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = LauncherConfig::builder().base_dir("/opt/rembg").build()?;
//! let mut launcher = Launcher::new(config);
//!
//! let mut out = io::stdout();
//! let outcome = launcher.run(&mut out)?;
//! launcher.finish(&outcome, &mut out, &mut io::stdin().lock())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Cargo features
//!
//! - `cli` (default): the `rembg-launcher` binary, clap parsing and tracing
//!   subscriber setup
//! - `tracing-json`: JSON log output

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod console;
pub mod dependencies;
pub mod error;
pub mod interpreter;
pub mod launcher;
pub mod outcome;
pub mod process;
#[cfg(feature = "cli")]
pub mod tracing_config;

pub use config::{LauncherConfig, LauncherConfigBuilder};
pub use dependencies::{ensure_dependencies, DependencyCheck, Requirement};
pub use error::{LauncherError, Result};
pub use interpreter::{
    select_interpreter, Interpreter, InterpreterKind, InterpreterLocator, SearchPathLocator,
};
pub use launcher::{launch_application, resolve_base_directory, BootstrapStage, Launcher, RunOutcome};
pub use outcome::{exit_code_for, report_outcome, Report};
pub use process::{ChildStatus, Invocation, ProcessExecutor, StdioMode, SystemExecutor};
