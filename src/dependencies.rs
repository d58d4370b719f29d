//! Import check and one-shot package installation

use crate::console;
use crate::interpreter::Interpreter;
use crate::process::{Invocation, ProcessExecutor};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// A third-party library the application imports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Module name used in `import`
    pub import_name: String,
    /// Distribution name passed to the package installer
    pub package_name: String,
}

impl Requirement {
    pub fn new<I: Into<String>, P: Into<String>>(import_name: I, package_name: P) -> Self {
        Self {
            import_name: import_name.into(),
            package_name: package_name.into(),
        }
    }

    /// The numeric-array and image-handling libraries the application needs
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("numpy", "numpy"), Self::new("PIL", "pillow")]
    }
}

/// Result of the dependency step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyCheck {
    /// Every requirement imported in the check
    Satisfied,
    /// The import check failed and the installer ran once
    InstallAttempted {
        /// `None` when the installer could not be started
        installer_succeeded: Option<bool>,
    },
}

impl DependencyCheck {
    #[must_use]
    pub fn install_attempted(&self) -> bool {
        matches!(self, Self::InstallAttempted { .. })
    }
}

/// Python source for the import check, e.g. `import numpy, PIL`
#[must_use]
pub fn import_check_source(requirements: &[Requirement]) -> String {
    let modules: Vec<&str> = requirements
        .iter()
        .map(|r| r.import_name.as_str())
        .collect();
    format!("import {}", modules.join(", "))
}

/// `<python> -c "import ..."` with output suppressed
#[must_use]
pub fn import_check_invocation(
    interpreter: &Interpreter,
    requirements: &[Requirement],
    working_dir: &Path,
) -> Invocation {
    Invocation::new(&interpreter.program, working_dir)
        .arg("-c")
        .arg(import_check_source(requirements))
        .silent()
}

/// `<python> -m pip install <packages...>` sharing the console
#[must_use]
pub fn install_invocation(
    interpreter: &Interpreter,
    requirements: &[Requirement],
    working_dir: &Path,
) -> Invocation {
    Invocation::new(&interpreter.program, working_dir)
        .args(["-m", "pip", "install"])
        .args(requirements.iter().map(|r| r.package_name.as_str()))
}

/// Make sure the requirements import, installing them once if they don't
///
/// The import check is a single process for the whole set, so any failure (or a
/// check that cannot start) counts as "not satisfied". The installer's own
/// outcome is logged and returned but never acted upon.
pub fn ensure_dependencies<E, W>(
    executor: &mut E,
    interpreter: &Interpreter,
    requirements: &[Requirement],
    working_dir: &Path,
    out: &mut W,
) -> DependencyCheck
where
    E: ProcessExecutor + ?Sized,
    W: Write + ?Sized,
{
    if requirements.is_empty() {
        return DependencyCheck::Satisfied;
    }

    let check = import_check_invocation(interpreter, requirements, working_dir);
    let satisfied = match executor.status(&check) {
        Ok(status) => {
            debug!(status = %status, "Import check finished");
            status.success()
        },
        Err(e) => {
            warn!(error = %e, "Import check could not run");
            false
        },
    };

    if satisfied {
        info!("Required libraries already importable");
        return DependencyCheck::Satisfied;
    }

    let packages: Vec<&str> = requirements
        .iter()
        .map(|r| r.package_name.as_str())
        .collect();
    console::installing_packages(out, &packages);

    let install = install_invocation(interpreter, requirements, working_dir);
    let installer_succeeded = match executor.status(&install) {
        Ok(status) if status.success() => Some(true),
        Ok(status) => {
            warn!(status = %status, "Package installer reported failure, continuing");
            Some(false)
        },
        Err(e) => {
            warn!(error = %e, "Package installer could not run, continuing");
            None
        },
    };

    DependencyCheck::InstallAttempted {
        installer_succeeded,
    }
}
