//! Child process plumbing
//!
//! Every step of the bootstrap that touches the interpreter goes through a
//! [`ProcessExecutor`], so the sequence can be driven against a recording
//! fake in tests and against real processes in the binary.

use crate::error::{LauncherError, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// How a child's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Share the launcher's console (live output, interactive input)
    Inherit,
    /// Discard output and provide no input
    Silent,
}

/// A single blocking child process call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: PathBuf,
    pub stdio: StdioMode,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>, D: Into<PathBuf>>(program: P, working_dir: D) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            stdio: StdioMode::Inherit,
        }
    }

    #[must_use]
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn silent(mut self) -> Self {
        self.stdio = StdioMode::Silent;
        self
    }

    /// Arguments as lossy UTF-8, for logging and assertions
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Build the `std::process::Command` for this invocation
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.working_dir);
        if self.stdio == StdioMode::Silent {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status of a finished child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildStatus {
    /// Exit code, `None` when the child was terminated by a signal
    pub code: Option<i32>,
    /// Terminating signal number (Unix only)
    pub signal: Option<i32>,
}

impl ChildStatus {
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    #[must_use]
    pub fn from_signal(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ChildStatus {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "{code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => write!(f, "terminated"),
        }
    }
}

/// Runs child processes to completion
pub trait ProcessExecutor {
    /// Run the invocation and block until it exits
    ///
    /// # Errors
    /// Returns `LauncherError::Spawn` when the process cannot be started.
    fn status(&mut self, invocation: &Invocation) -> Result<ChildStatus>;
}

impl<E: ProcessExecutor + ?Sized> ProcessExecutor for &mut E {
    fn status(&mut self, invocation: &Invocation) -> Result<ChildStatus> {
        (**self).status(invocation)
    }
}

/// Executor backed by `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn status(&mut self, invocation: &Invocation) -> Result<ChildStatus> {
        debug!(command = %invocation, cwd = %invocation.working_dir.display(), "Spawning");
        let status = invocation
            .to_command()
            .status()
            .map_err(|e| LauncherError::spawn(&invocation.program, e))?;
        let status = ChildStatus::from(status);
        debug!(command = %invocation, status = %status, "Child exited");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("python", "/work")
            .arg("-m")
            .args(["pip", "install"])
            .silent();
        assert_eq!(inv.args_lossy(), vec!["-m", "pip", "install"]);
        assert_eq!(inv.stdio, StdioMode::Silent);
        assert_eq!(inv.to_string(), "python -m pip install");
    }

    #[test]
    fn test_child_status() {
        assert!(ChildStatus::from_code(0).success());
        assert!(!ChildStatus::from_code(3).success());
        assert!(!ChildStatus::from_signal(9).success());
        assert_eq!(ChildStatus::from_code(7).to_string(), "7");
        assert_eq!(ChildStatus::from_signal(11).to_string(), "signal 11");
        assert_eq!(
            ChildStatus {
                code: None,
                signal: None
            }
            .to_string(),
            "terminated"
        );
    }

    #[test]
    fn test_system_executor_reports_spawn_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("definitely-not-a-program");
        let err = SystemExecutor
            .status(&Invocation::new(&missing, tmp.path()))
            .unwrap_err();
        assert!(matches!(err, LauncherError::Spawn { .. }));
        assert!(err.to_string().contains("definitely-not-a-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_records_signal() {
        let tmp = tempfile::tempdir().unwrap();
        let status = SystemExecutor
            .status(&Invocation::new("/bin/sh", tmp.path()).args(["-c", "kill -SEGV $$"]))
            .unwrap();
        assert_eq!(status.code, None);
        assert_eq!(status.signal, Some(11));
        assert!(!status.success());
    }
}
