//! Changelog parsing - version section extraction and change classification
//!
//! Understands the Markdown layout written by semantic-release style tools:
//! - `# 1.0.0 (date)` or `## [1.0.1](compare-url) (date)` version headings
//! - `### Features` / `### Bug Fixes` subsections
//! - `* description ([sha](commit-url))` bullets

pub mod classify;
pub mod section;

pub use classify::{classify_section, EntryParser, SectionTable};
pub use section::{extract_section, VersionSection};

use crate::domain::Change;
use crate::error::Result;

/// Changes recorded for `version` in changelog text.
///
/// A version without a section yields an empty list.
pub fn parse_changes(text: &str, version: &str, table: &SectionTable) -> Result<Vec<Change>> {
    match extract_section(text, version)? {
        Some(section) => {
            log::debug!("Found changelog section: {}", section.heading);
            classify_section(&section, table)
        }
        None => Ok(Vec::new()),
    }
}
