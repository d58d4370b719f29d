//! Configuration types for launcher operations

use crate::dependencies::Requirement;
use crate::error::LauncherError;
use std::path::{Path, PathBuf};

/// Directory holding the local virtual environment, relative to the base directory
pub const DEFAULT_VENV_DIR: &str = ".venv";

/// Application entry point, relative to the base directory
pub const DEFAULT_APP_SCRIPT: &str = "rembg_app.py";

/// Console window title set at startup
pub const DEFAULT_CONSOLE_TITLE: &str = "RemBG - Background Remover";

/// Interpreter location inside a virtual environment
#[cfg(windows)]
const VENV_INTERPRETER: [&str; 2] = ["Scripts", "python.exe"];
#[cfg(not(windows))]
const VENV_INTERPRETER: [&str; 2] = ["bin", "python"];

/// Interpreter commands looked up on the system search path, in order
#[cfg(windows)]
const SYSTEM_CANDIDATES: &[&str] = &["python"];
#[cfg(not(windows))]
const SYSTEM_CANDIDATES: &[&str] = &["python3", "python"];

/// Launcher configuration
///
/// Everything here is fixed at compile time for the shipped binary; the
/// builder exists so the bootstrap sequence can run against other
/// directories (tests, embedding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Directory all relative lookups are resolved against
    pub base_dir: PathBuf,

    /// Virtual environment directory, relative to `base_dir`
    pub venv_dir: PathBuf,

    /// Application entry point, relative to `base_dir`
    pub app_script: PathBuf,

    /// Libraries that must be importable before launching
    pub requirements: Vec<Requirement>,

    /// Commands looked up on the search path when no venv interpreter exists
    pub system_candidates: Vec<String>,

    /// Console title set at startup (`None` leaves the title alone)
    pub console_title: Option<String>,

    /// Block for acknowledgment when the application fails (default: true)
    pub pause_on_failure: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            venv_dir: PathBuf::from(DEFAULT_VENV_DIR),
            app_script: PathBuf::from(DEFAULT_APP_SCRIPT),
            requirements: Requirement::defaults(),
            system_candidates: SYSTEM_CANDIDATES.iter().map(|c| (*c).to_string()).collect(),
            console_title: Some(DEFAULT_CONSOLE_TITLE.to_string()),
            pause_on_failure: true,
        }
    }
}

impl LauncherConfig {
    /// Create a new configuration builder
    ///
    /// ```rust
    /// use rembg_launcher::LauncherConfig;
    ///
    /// let config = LauncherConfig::builder()
    ///     .base_dir("/opt/rembg")
    ///     .build()
    ///     .unwrap();
    /// assert!(config.app_script_path().ends_with("rembg_app.py"));
    /// ```
    #[must_use]
    pub fn builder() -> LauncherConfigBuilder {
        LauncherConfigBuilder::default()
    }

    /// Full path of the interpreter inside the virtual environment
    #[must_use]
    pub fn venv_interpreter(&self) -> PathBuf {
        let [dir, exe] = VENV_INTERPRETER;
        self.base_dir.join(&self.venv_dir).join(dir).join(exe)
    }

    /// Full path of the application entry point
    #[must_use]
    pub fn app_script_path(&self) -> PathBuf {
        self.base_dir.join(&self.app_script)
    }

    /// Validate configuration parameters
    ///
    /// # Errors
    /// - Empty or absolute application script path
    /// - Empty virtual environment directory
    /// - No system interpreter candidates
    pub fn validate(&self) -> crate::Result<()> {
        if self.app_script.as_os_str().is_empty() {
            return Err(LauncherError::invalid_config(
                "application script must not be empty",
            ));
        }
        if self.app_script.is_absolute() {
            return Err(LauncherError::invalid_config(format!(
                "application script must be relative to the launcher directory, got '{}'",
                self.app_script.display()
            )));
        }
        if self.venv_dir.as_os_str().is_empty() {
            return Err(LauncherError::invalid_config(
                "virtual environment directory must not be empty",
            ));
        }
        if self.system_candidates.iter().all(|c| c.trim().is_empty()) {
            return Err(LauncherError::invalid_config(
                "at least one system interpreter candidate is required",
            ));
        }
        Ok(())
    }
}

/// Builder for `LauncherConfig`
#[derive(Debug, Default)]
pub struct LauncherConfigBuilder {
    config: LauncherConfig,
}

impl LauncherConfigBuilder {
    /// Set the base directory
    #[must_use]
    pub fn base_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.base_dir = dir.into();
        self
    }

    /// Set the virtual environment directory (relative to the base directory)
    #[must_use]
    pub fn venv_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config.venv_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the application entry point (relative to the base directory)
    #[must_use]
    pub fn app_script<P: AsRef<Path>>(mut self, script: P) -> Self {
        self.config.app_script = script.as_ref().to_path_buf();
        self
    }

    /// Replace the system interpreter candidates
    #[must_use]
    pub fn system_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.system_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Set or clear the console title
    #[must_use]
    pub fn console_title(mut self, title: Option<String>) -> Self {
        self.config.console_title = title;
        self
    }

    /// Enable or disable the pause after a failed run
    #[must_use]
    pub fn pause_on_failure(mut self, pause: bool) -> Self {
        self.config.pause_on_failure = pause;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// Returns `LauncherError::InvalidConfig` when validation fails.
    pub fn build(self) -> crate::Result<LauncherConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}
