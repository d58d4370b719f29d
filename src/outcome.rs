//! Reporting the application's exit status

use crate::console;
use crate::process::ChildStatus;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// What `report_outcome` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Status was zero; nothing printed
    Clean,
    /// Banner printed; `paused` tells whether we waited for acknowledgment
    Failed { paused: bool },
}

/// Show the failure banner and wait for the user when the application failed
///
/// Returns immediately for a zero status. For anything else the banner is
/// printed and, if `pause` is set, one line is read from `input` so the
/// window stays open until the user presses Enter. End of input counts as
/// acknowledgment.
///
/// # Errors
/// Propagates read errors from `input`.
pub fn report_outcome<W, R>(
    status: ChildStatus,
    pause: bool,
    out: &mut W,
    input: &mut R,
) -> io::Result<Report>
where
    W: Write + ?Sized,
    R: BufRead + ?Sized,
{
    if status.success() {
        debug!("Application exited cleanly");
        return Ok(Report::Clean);
    }

    warn!(status = %status, "Application exited with failure");
    console::failure_banner(out, status);
    if !pause {
        return Ok(Report::Failed { paused: false });
    }

    wait_for_acknowledgment(out, input)?;
    Ok(Report::Failed { paused: true })
}

/// Prompt and block until one line (or end of input) is read
///
/// # Errors
/// Propagates read errors from `input`.
pub fn wait_for_acknowledgment<W, R>(out: &mut W, input: &mut R) -> io::Result<()>
where
    W: Write + ?Sized,
    R: BufRead + ?Sized,
{
    console::press_enter(out);
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Exit code the launcher terminates with after running the application
///
/// Zero stays zero; codes that fit a process exit byte are passed through;
/// anything else (signals, large Windows status values) becomes 1.
#[must_use]
pub fn exit_code_for(status: ChildStatus) -> u8 {
    match status.code {
        Some(0) => 0,
        Some(code) => u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1),
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_success_prints_nothing_and_does_not_read() {
        let mut out = Vec::<u8>::new();
        let mut input = Cursor::new(b"ignored\n".to_vec());
        let report =
            report_outcome(ChildStatus::from_code(0), true, &mut out, &mut input).unwrap();

        assert_eq!(report, Report::Clean);
        assert!(out.is_empty());
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_failure_prints_code_and_waits() {
        let mut out = Vec::<u8>::new();
        let mut input = Cursor::new(b"\nleftover".to_vec());
        let report =
            report_outcome(ChildStatus::from_code(1), true, &mut out, &mut input).unwrap();

        assert_eq!(report, Report::Failed { paused: true });
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("error code 1"));
        assert!(printed.contains("Press Enter"));
        // exactly one line consumed
        assert_eq!(input.position(), 1);
    }

    #[test]
    fn test_failure_without_pause() {
        let mut out = Vec::<u8>::new();
        let mut input = Cursor::new(Vec::<u8>::new());
        let report =
            report_outcome(ChildStatus::from_code(3), false, &mut out, &mut input).unwrap();
        assert_eq!(report, Report::Failed { paused: false });
        assert!(!String::from_utf8(out).unwrap().contains("Press Enter"));
    }

    #[test]
    fn test_eof_counts_as_acknowledgment() {
        let mut input = Cursor::new(Vec::<u8>::new());
        let report = report_outcome(
            ChildStatus::from_signal(15),
            true,
            &mut Vec::<u8>::new(),
            &mut input,
        )
        .unwrap();
        assert_eq!(report, Report::Failed { paused: true });
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code_for(ChildStatus::from_code(0)), 0);
        assert_eq!(exit_code_for(ChildStatus::from_code(1)), 1);
        assert_eq!(exit_code_for(ChildStatus::from_code(42)), 42);
        assert_eq!(exit_code_for(ChildStatus::from_code(256)), 1);
        assert_eq!(exit_code_for(ChildStatus::from_code(-1_073_741_819)), 1);
        assert_eq!(exit_code_for(ChildStatus::from_signal(11)), 1);
    }
}
