use std::fmt;
use std::path::PathBuf;

/// Soft outcomes worth telling the user about.
/// These are normal results, not failures, and never change the exit code.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Chart file already normalized
    NoChangeNeeded { path: PathBuf },
    /// Changelog has no entries (or no section) for the version
    NoChangesForVersion { version: String, changelog: PathBuf },
    /// Dry run: nothing was written
    DryRun { path: PathBuf },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoChangeNeeded { path } => {
                write!(f, "No change needed in {}", path.display())
            }
            Notice::NoChangesForVersion { version, changelog } => {
                write!(
                    f,
                    "No changes found for version {} in {}",
                    version,
                    changelog.display()
                )
            }
            Notice::DryRun { path } => {
                write!(f, "Dry run: {} was not modified", path.display())
            }
        }
    }
}
