//! Workflows behind the CLI subcommands

pub mod orchestration;

pub use orchestration::{run_sync, SyncArgs, SyncReport};
