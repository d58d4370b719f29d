//! Error types for launcher operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LauncherError>;

/// Errors that stop the bootstrap sequence
///
/// Import check and installer failures are not represented here: they are
/// best-effort steps that only log and move on.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Neither a virtual environment nor a system interpreter was found
    #[error(
        "Python interpreter not found (looked for {venv} and {candidates} on PATH). \
         Please install Python and try again.",
        venv = .venv_interpreter.display(),
        candidates = .searched.join(", ")
    )]
    InterpreterNotFound {
        venv_interpreter: PathBuf,
        searched: Vec<String>,
    },

    /// The launcher could not determine its own location
    #[error("Failed to resolve launcher directory: {0}")]
    BaseDirectory(#[source] std::io::Error),

    /// A child process could not be started at all
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Console or filesystem I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LauncherError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a spawn error for the given program
    pub fn spawn<P: AsRef<Path>>(program: P, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.as_ref().display().to_string(),
            source,
        }
    }

    /// Process exit code the launcher terminates with for this error
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Whether the error happened before the application was started
    #[must_use]
    pub fn is_pre_launch(&self) -> bool {
        !matches!(self, Self::Spawn { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_not_found_message() {
        let err = LauncherError::InterpreterNotFound {
            venv_interpreter: PathBuf::from(".venv/bin/python"),
            searched: vec!["python3".to_string(), "python".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Python interpreter not found"));
        assert!(msg.contains("python3, python"));
        assert!(msg.contains("install Python"));
        assert_eq!(err.exit_code(), 1);
        assert!(err.is_pre_launch());
    }

    #[test]
    fn test_spawn_error_keeps_program_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LauncherError::spawn("/opt/python", io);
        assert!(err.to_string().contains("/opt/python"));
        assert!(err.to_string().contains("no such file"));
        assert!(!err.is_pre_launch());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: LauncherError = io.into();
        assert!(matches!(err, LauncherError::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
