pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod normalize;
pub mod notice;
pub mod ui;

pub use error::{ChartSyncError, Result};
