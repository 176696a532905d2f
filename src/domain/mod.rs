//! Domain types - versions and change records, independent of file I/O

pub mod change;
pub mod version;

pub use change::{Change, ChangeKind, ChangelogEntry, Link};
pub use version::{VersionString, DEFAULT_MARKER};
