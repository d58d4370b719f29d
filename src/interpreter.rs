//! Interpreter selection: local virtual environment first, system search path second

use crate::config::LauncherConfig;
use crate::console;
use crate::error::{LauncherError, Result};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the selected interpreter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterKind {
    /// `<base>/.venv/...` interpreter
    VirtualEnv,
    /// Interpreter found on the system search path
    System,
}

impl fmt::Display for InterpreterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VirtualEnv => write!(f, "virtual environment"),
            Self::System => write!(f, "system"),
        }
    }
}

/// The interpreter every later step runs under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub kind: InterpreterKind,
    pub program: PathBuf,
}

/// Looks up commands on the system search path
pub trait InterpreterLocator {
    /// Full path of `command` if it can be executed
    fn find(&self, command: &str) -> Option<PathBuf>;
}

/// Locator backed by the `PATH` (and `PATHEXT` on Windows) lookup of the `which` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchPathLocator;

impl InterpreterLocator for SearchPathLocator {
    fn find(&self, command: &str) -> Option<PathBuf> {
        which::which(command).ok()
    }
}

/// Pick the interpreter for this run
///
/// A venv interpreter wins unconditionally; the search path is only
/// consulted when it is absent. Prints which mode was chosen.
///
/// # Errors
/// `LauncherError::InterpreterNotFound` when neither source has one.
pub fn select_interpreter<L, W>(
    config: &LauncherConfig,
    locator: &L,
    out: &mut W,
) -> Result<Interpreter>
where
    L: InterpreterLocator + ?Sized,
    W: Write + ?Sized,
{
    let venv_python = config.venv_interpreter();
    if venv_python.is_file() {
        info!(interpreter = %venv_python.display(), "Using virtual environment interpreter");
        console::using_virtual_env(out, &venv_python);
        return Ok(Interpreter {
            kind: InterpreterKind::VirtualEnv,
            program: venv_python,
        });
    }
    debug!(path = %venv_python.display(), "No virtual environment interpreter");

    for candidate in config.system_candidates.iter().map(|c| c.trim()) {
        if candidate.is_empty() {
            continue;
        }
        if let Some(program) = locator.find(candidate) {
            info!(interpreter = %program.display(), "Using system interpreter");
            console::using_system_python(out, &program);
            return Ok(Interpreter {
                kind: InterpreterKind::System,
                program,
            });
        }
        debug!(command = candidate, "Not found on search path");
    }

    Err(LauncherError::InterpreterNotFound {
        venv_interpreter: venv_python,
        searched: config.system_candidates.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    #[derive(Default)]
    struct MapLocator(HashMap<String, PathBuf>);

    impl MapLocator {
        fn with(command: &str, path: &str) -> Self {
            let mut map = HashMap::new();
            map.insert(command.to_string(), PathBuf::from(path));
            Self(map)
        }
    }

    impl InterpreterLocator for MapLocator {
        fn find(&self, command: &str) -> Option<PathBuf> {
            self.0.get(command).cloned()
        }
    }

    fn config_in(dir: &std::path::Path) -> LauncherConfig {
        LauncherConfig::builder()
            .base_dir(dir)
            .system_candidates(["python3", "python"])
            .build()
            .unwrap()
    }

    fn create_venv(config: &LauncherConfig) {
        let venv_python = config.venv_interpreter();
        fs::create_dir_all(venv_python.parent().unwrap()).unwrap();
        fs::write(&venv_python, b"").unwrap();
    }

    #[test]
    fn test_venv_takes_priority_over_system() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        create_venv(&config);

        let locator = MapLocator::with("python3", "/usr/bin/python3");
        let mut out = Vec::<u8>::new();
        let interp = select_interpreter(&config, &locator, &mut out).unwrap();

        assert_eq!(interp.kind, InterpreterKind::VirtualEnv);
        assert_eq!(interp.program, config.venv_interpreter());
        assert!(String::from_utf8(out).unwrap().contains("virtual environment"));
    }

    #[test]
    fn test_falls_back_to_system() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        let locator = MapLocator::with("python", "/usr/bin/python");
        let mut out = Vec::<u8>::new();
        let interp = select_interpreter(&config, &locator, &mut out).unwrap();

        assert_eq!(interp.kind, InterpreterKind::System);
        assert_eq!(interp.program, PathBuf::from("/usr/bin/python"));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("system Python"));
        assert!(!printed.to_lowercase().contains("error"));
    }

    #[test]
    fn test_candidates_tried_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        let mut locator = MapLocator::with("python", "/usr/bin/python");
        locator
            .0
            .insert("python3".to_string(), PathBuf::from("/usr/bin/python3"));
        let interp = select_interpreter(&config, &locator, &mut Vec::<u8>::new()).unwrap();
        assert_eq!(interp.program, PathBuf::from("/usr/bin/python3"));
    }

    #[test]
    fn test_venv_directory_without_interpreter_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        fs::create_dir_all(config.venv_interpreter()).unwrap();

        let locator = MapLocator::with("python", "/usr/bin/python");
        let interp = select_interpreter(&config, &locator, &mut Vec::<u8>::new()).unwrap();
        assert_eq!(interp.kind, InterpreterKind::System);
    }

    #[test]
    fn test_nothing_found_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        let err = select_interpreter(&config, &MapLocator::default(), &mut Vec::<u8>::new())
            .unwrap_err();
        match err {
            LauncherError::InterpreterNotFound { searched, .. } => {
                assert_eq!(searched, vec!["python3", "python"]);
            },
            other => panic!("unexpected error: {other}"),
        }
    }
}
