//! RemBG launcher
//!
//! Bootstraps the Python environment next to the executable and runs the
//! RemBG desktop application.

#[cfg(feature = "cli")]
use rembg_launcher::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<std::process::ExitCode> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
