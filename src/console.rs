//! User-facing console messages
//!
//! These go to stdout for the person sitting in front of the window; logs go
//! through `tracing` to stderr. Write failures are ignored: a console that
//! cannot be written to must not change how the launch proceeds.

use crate::process::ChildStatus;
use std::io::Write;
use std::path::Path;

const RULE: &str = "============================================================";

/// Set the terminal window title (OSC 0)
pub fn set_title<W: Write + ?Sized>(out: &mut W, title: &str) {
    let _ = write!(out, "\x1b]0;{title}\x07");
    let _ = out.flush();
}

pub fn header<W: Write + ?Sized>(out: &mut W, title: &str) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  {title}");
    let _ = writeln!(out, "{RULE}");
}

pub fn using_virtual_env<W: Write + ?Sized>(out: &mut W, interpreter: &Path) {
    let _ = writeln!(
        out,
        "[OK] Using virtual environment Python: {}",
        interpreter.display()
    );
}

pub fn using_system_python<W: Write + ?Sized>(out: &mut W, interpreter: &Path) {
    let _ = writeln!(
        out,
        "[INFO] Virtual environment not found, using system Python: {}",
        interpreter.display()
    );
}

pub fn installing_packages<W: Write + ?Sized>(out: &mut W, packages: &[&str]) {
    let _ = writeln!(
        out,
        "[INFO] Installing required packages: {}",
        packages.join(" ")
    );
    let _ = out.flush();
}

pub fn launching<W: Write + ?Sized>(out: &mut W, script: &Path) {
    let _ = writeln!(out, "[INFO] Starting {}...", script.display());
    let _ = out.flush();
}

/// Printed when the bootstrap stops before the application starts
pub fn fatal<W: Write + ?Sized>(out: &mut W, message: &str) {
    let _ = writeln!(out, "[ERROR] {message}");
    let _ = out.flush();
}

/// Banner shown after the application exits unsuccessfully
pub fn failure_banner<W: Write + ?Sized>(out: &mut W, status: ChildStatus) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    match (status.code, status.signal) {
        (Some(code), _) => {
            let _ = writeln!(out, "  [ERROR] The application exited with error code {code}");
        },
        (None, Some(signal)) => {
            let _ = writeln!(
                out,
                "  [ERROR] The application was terminated by signal {signal}"
            );
        },
        (None, None) => {
            let _ = writeln!(out, "  [ERROR] The application was terminated");
        },
    }
    let _ = writeln!(out, "{RULE}");
}

pub fn press_enter<W: Write + ?Sized>(out: &mut W) {
    let _ = write!(out, "Press Enter to close this window...");
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_title_uses_osc_sequence() {
        let s = render(|out| set_title(out, "RemBG"));
        assert_eq!(s, "\x1b]0;RemBG\x07");
    }

    #[test]
    fn test_failure_banner_contains_code() {
        let s = render(|out| failure_banner(out, ChildStatus::from_code(42)));
        assert!(s.contains("error code 42"));

        let s = render(|out| failure_banner(out, ChildStatus::from_signal(11)));
        assert!(s.contains("terminated by signal 11"));
    }

    #[test]
    fn test_install_notice_lists_packages() {
        let s = render(|out| installing_packages(out, &["numpy", "pillow"]));
        assert!(s.contains("numpy pillow"));
    }
}
