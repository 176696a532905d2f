//! Chart descriptor version normalizer.
//!
//! Rewrites `version:` and `appVersion:` lines of a `Chart.yaml`-like file.
//! Only single-line, unquoted scalar values are touched; every other line is
//! reproduced byte-for-byte.

use std::fs;
use std::path::Path;

use regex::{Captures, Regex};

use crate::config::{AppVersionPolicy, NormalizeConfig};
use crate::domain::VersionString;
use crate::error::{ChartSyncError, Result};

const VERSION_LINE: &str = r"(?m)^([ \t]*)(version|appVersion):([ \t]*)(\S+)[ \t]*(\r?)$";

/// Rules applied to the version fields of a chart descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeRules {
    pub marker: char,
    pub app_version: AppVersionPolicy,
}

impl NormalizeRules {
    pub fn new(marker: char, app_version: AppVersionPolicy) -> Self {
        NormalizeRules {
            marker,
            app_version,
        }
    }

    /// Chart `version`: drop the marker when present.
    pub fn rewrite_version(&self, value: &str) -> Option<String> {
        let version = VersionString::parse(value, self.marker);
        version.is_marked().then(|| version.bare().to_string())
    }

    /// `appVersion`: apply the configured policy.
    pub fn rewrite_app_version(&self, value: &str) -> Option<String> {
        match self.app_version {
            AppVersionPolicy::Strip => self.rewrite_version(value),
            AppVersionPolicy::Add => {
                let version = VersionString::parse(value, self.marker);
                (!version.is_marked() && version.is_release_shaped()).then(|| version.marked())
            }
            AppVersionPolicy::Keep => None,
        }
    }
}

impl From<&NormalizeConfig> for NormalizeRules {
    fn from(config: &NormalizeConfig) -> Self {
        NormalizeRules::new(config.marker, config.app_version)
    }
}

/// Result of normalizing a chart file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Content changed (and was written unless in dry-run mode)
    Normalized,
    /// Content already normalized, file left untouched
    Unchanged,
}

/// Normalize the version fields of chart descriptor text.
///
/// Returns the rewritten text; equal to the input when nothing needed changing.
pub fn normalize_text(text: &str, rules: &NormalizeRules) -> Result<String> {
    let re = Regex::new(VERSION_LINE)?;

    let rewritten = re.replace_all(text, |caps: &Captures| {
        let value = &caps[4];
        let replacement = match &caps[2] {
            "version" => rules.rewrite_version(value),
            _ => rules.rewrite_app_version(value),
        };

        match replacement {
            Some(new_value) => {
                log::debug!("{}: {} -> {}", &caps[2], value, new_value);
                format!(
                    "{}{}:{}{}{}",
                    &caps[1], &caps[2], &caps[3], new_value, &caps[5]
                )
            }
            None => caps[0].to_string(),
        }
    });

    Ok(rewritten.into_owned())
}

/// Normalize a chart descriptor file in place.
///
/// The file is written only when its content changes and `dry_run` is false.
pub fn normalize_file(path: &Path, rules: &NormalizeRules, dry_run: bool) -> Result<NormalizeOutcome> {
    if !path.exists() {
        return Err(ChartSyncError::not_found("File", path));
    }

    let original = fs::read_to_string(path)?;
    let normalized = normalize_text(&original, rules)?;

    if normalized == original {
        return Ok(NormalizeOutcome::Unchanged);
    }

    if dry_run {
        log::info!("Dry run: not writing {}", path.display());
    } else {
        fs::write(path, normalized)?;
    }
    Ok(NormalizeOutcome::Normalized)
}
