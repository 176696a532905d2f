use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of the abbreviated commit hash used in link names
pub const SHORT_HASH_LEN: usize = 7;

/// Artifact Hub change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Fixed,
    Removed,
    Deprecated,
    Security,
    Changed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Fixed => "fixed",
            ChangeKind::Removed => "removed",
            ChangeKind::Deprecated => "deprecated",
            ChangeKind::Security => "security",
            ChangeKind::Changed => "changed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named link attached to a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

/// One entry of the `changes` list in the package metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Change {
    pub fn new(kind: ChangeKind, description: impl Into<String>) -> Self {
        Change {
            kind,
            description: description.into(),
            links: Vec::new(),
        }
    }
}

/// A bullet line parsed from a changelog section, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub description: String,
    pub commit: Option<String>,
    pub url: Option<String>,
}

impl ChangelogEntry {
    /// Plain entry without a commit reference
    pub fn plain(description: impl Into<String>) -> Self {
        ChangelogEntry {
            description: description.into(),
            commit: None,
            url: None,
        }
    }

    /// Entry referencing a commit hash and its URL
    pub fn with_commit(
        description: impl Into<String>,
        commit: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        ChangelogEntry {
            description: description.into(),
            commit: Some(commit.into()),
            url: Some(url.into()),
        }
    }

    /// Classify this entry, producing the persisted change record.
    ///
    /// A commit link is named after the hash, truncated to 7 characters.
    pub fn into_change(self, kind: ChangeKind) -> Change {
        let links = match (self.commit, self.url) {
            (Some(commit), Some(url)) => {
                let short: String = commit.chars().take(SHORT_HASH_LEN).collect();
                vec![Link {
                    name: format!("Commit {}", short),
                    url,
                }]
            }
            _ => Vec::new(),
        };

        Change {
            kind,
            description: self.description,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_matches_serde_name() {
        for kind in [
            ChangeKind::Added,
            ChangeKind::Fixed,
            ChangeKind::Removed,
            ChangeKind::Deprecated,
            ChangeKind::Security,
            ChangeKind::Changed,
        ] {
            let yaml = serde_yaml::to_string(&kind).unwrap();
            assert_eq!(yaml.trim(), kind.to_string());
        }
    }

    #[test]
    fn test_entry_with_commit_becomes_linked_change() {
        let entry = ChangelogEntry::with_commit(
            "Fix crash",
            "abc1234def5678",
            "https://example.com/commit/abc1234def5678",
        );
        let change = entry.into_change(ChangeKind::Fixed);

        assert_eq!(change.kind, ChangeKind::Fixed);
        assert_eq!(change.description, "Fix crash");
        assert_eq!(change.links.len(), 1);
        assert_eq!(change.links[0].name, "Commit abc1234");
        assert_eq!(
            change.links[0].url,
            "https://example.com/commit/abc1234def5678"
        );
    }

    #[test]
    fn test_short_hash_kept_whole() {
        let change = ChangelogEntry::with_commit("x", "abc12", "https://e.com/c/abc12")
            .into_change(ChangeKind::Added);
        assert_eq!(change.links[0].name, "Commit abc12");
    }

    #[test]
    fn test_plain_entry_has_no_links() {
        let change = ChangelogEntry::plain("Add widget").into_change(ChangeKind::Added);
        assert_eq!(change, Change::new(ChangeKind::Added, "Add widget"));
    }

    #[test]
    fn test_change_serializes_without_empty_links() {
        let yaml = serde_yaml::to_string(&Change::new(ChangeKind::Added, "Add widget")).unwrap();
        assert_eq!(yaml, "kind: added\ndescription: Add widget\n");
    }
}
