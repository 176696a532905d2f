//! Changelog-to-metadata sync workflow
//!
//! Resolves the files around a chart, parses the changelog section for one
//! release and rewrites the package metadata. Kept free of clap so it can be
//! driven programmatically and from tests.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::changelog::{self, SectionTable};
use crate::config::Config;
use crate::domain::{Change, VersionString};
use crate::error::{ChartSyncError, Result};
use crate::metadata::PackageMetadata;

/// Arguments for the sync workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncArgs {
    /// Chart directory, or any file inside it (usually `Chart.yaml`)
    pub chart_path: PathBuf,

    /// Release version; falls back to the configured environment variable
    pub version: Option<String>,

    /// Explicit changelog location
    pub changelog_path: Option<PathBuf>,

    /// Compute the document without writing it
    pub dry_run: bool,
}

/// Result of a successful sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub metadata_path: PathBuf,
    pub changelog_path: PathBuf,
    pub version: String,
    pub changes: Vec<Change>,
    /// Rendered metadata document, as written (or as it would be written)
    pub document: String,
    pub written: bool,
}

/// Resolve the release version from the argument or `env_var`.
///
/// Blank values count as missing. The value is returned exactly as given.
pub fn resolve_version(explicit: Option<&str>, env_var: &str) -> Result<String> {
    explicit
        .map(str::to_string)
        .or_else(|| env::var(env_var).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            ChartSyncError::usage(format!(
                "version is required (argument or {} env)",
                env_var
            ))
        })
}

/// Changes recorded for `version` in changelog text.
///
/// The exact version is looked up first. A marked version ("v1.0.1") with no
/// entries under its own heading falls back to its bare form ("1.0.1").
pub fn changes_for_version(
    text: &str,
    version: &str,
    marker: char,
    table: &SectionTable,
) -> Result<Vec<Change>> {
    let changes = changelog::parse_changes(text, version, table)?;
    if !changes.is_empty() {
        return Ok(changes);
    }

    let parsed = VersionString::parse(version, marker);
    if parsed.is_marked() {
        log::debug!("No entries under {}, trying {}", version, parsed.bare());
        return changelog::parse_changes(text, parsed.bare(), table);
    }
    Ok(changes)
}

/// Log what the run replaces, and warn when the version goes backwards.
fn log_previous(metadata: &PackageMetadata, version: &str, marker: char) {
    if let Some(previous) = metadata.version() {
        let previous = VersionString::parse(previous, marker);
        let next = VersionString::parse(version, marker);
        if next < previous {
            log::warn!(
                "Version {} is older than the current metadata version {}",
                next,
                previous
            );
        }
    }
    if let Some(stamp) = metadata.created_at() {
        log::debug!("Previous createdAt: {}", stamp);
    }
    match metadata.changes() {
        Ok(previous) => log::info!("Replacing {} previous change(s)", previous.len()),
        Err(e) => log::warn!("Existing changes could not be read and will be replaced: {}", e),
    }
}

/// Directory holding the chart, given the chart directory or a file in it
pub fn chart_dir(chart_path: &Path) -> PathBuf {
    if chart_path.is_dir() {
        return chart_path.to_path_buf();
    }
    match chart_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Nearest ancestor of `start` (inclusive) containing one of `markers`
pub fn find_repo_root(start: &Path, markers: &[String]) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .find(|dir| markers.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}

/// Locate the changelog: explicit path, then the chart directory, then the repository root.
pub fn resolve_changelog(
    explicit: Option<&Path>,
    chart_dir: &Path,
    config: &Config,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ChartSyncError::not_found("CHANGELOG", path));
    }

    let local = chart_dir.join(&config.sync.changelog_file);
    if local.exists() {
        return Ok(local);
    }

    match find_repo_root(chart_dir, &config.sync.root_markers) {
        Some(root) => {
            let root_changelog = root.join(&config.sync.changelog_file);
            log::debug!("Falling back to repository changelog {}", root_changelog.display());
            if root_changelog.exists() {
                Ok(root_changelog)
            } else {
                Err(ChartSyncError::not_found("CHANGELOG", root_changelog))
            }
        }
        None => Err(ChartSyncError::not_found("CHANGELOG", local)),
    }
}

/// Main sync workflow
///
/// 1. Resolve the version (usage error when missing)
/// 2. Locate the metadata file next to the chart
/// 3. Locate the changelog
/// 4. Parse the changes recorded for the version
/// 5. Set `version` and `createdAt`, replace `changes`, write the document
pub fn run_sync(args: &SyncArgs, config: &Config, now: DateTime<Utc>) -> Result<SyncReport> {
    let version = resolve_version(args.version.as_deref(), &config.sync.version_env)?;

    let chart_dir = chart_dir(&args.chart_path);
    let metadata_path = chart_dir.join(&config.sync.metadata_file);
    if !metadata_path.exists() {
        return Err(ChartSyncError::not_found(
            config.sync.metadata_file.clone(),
            metadata_path,
        ));
    }

    let changelog_path = resolve_changelog(args.changelog_path.as_deref(), &chart_dir, config)?;
    log::info!(
        "Syncing {} from {} for version {}",
        metadata_path.display(),
        changelog_path.display(),
        version
    );

    let table = SectionTable::with_overrides(&config.sections);
    let text = fs::read_to_string(&changelog_path)?;
    let changes = changes_for_version(&text, &version, config.normalize.marker, &table)?;
    log::debug!("Parsed {} change(s)", changes.len());

    let mut metadata = PackageMetadata::load(&metadata_path)?;
    log_previous(&metadata, &version, config.normalize.marker);
    metadata.set_version(&version);
    metadata.set_created_at(now);
    metadata.replace_changes(&changes)?;
    let document = metadata.to_yaml_string()?;

    if !args.dry_run {
        metadata.save(&metadata_path)?;
    }

    Ok(SyncReport {
        metadata_path,
        changelog_path,
        version,
        changes,
        document,
        written: !args.dry_run,
    })
}
