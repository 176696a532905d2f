//! User interface module - terminal output.
//!
//! - `formatter` - message and change formatting
//! - This module - logging setup for the binary

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_changes, display_error, display_notice, display_status, display_success, format_change,
};

/// Initialize `env_logger` from the `-v` count.
///
/// `RUST_LOG` still applies on top of the chosen default level.
pub fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
