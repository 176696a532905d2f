use std::cmp::Ordering;
use std::fmt;

/// Default marker letter for tagged versions (`v1.2.3`)
pub const DEFAULT_MARKER: char = 'v';

/// A version token that may carry a single marker letter prefix.
///
/// The marker is cosmetic: two versions compare equal when their bare forms
/// are equal, and ordering follows semver precedence of the bare form.
#[derive(Debug, Clone, Eq)]
pub struct VersionString {
    marker: char,
    marked: bool,
    bare: String,
}

impl VersionString {
    /// Parse a raw value such as "v1.0.1" or "1.0.1".
    ///
    /// The value is considered marked only when the marker is directly
    /// followed by a digit or a dot, so "vendor" stays a bare (non-version) word.
    pub fn parse(raw: &str, marker: char) -> Self {
        let raw = raw.trim();
        match raw.strip_prefix(marker) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
                VersionString {
                    marker,
                    marked: true,
                    bare: rest.to_string(),
                }
            }
            _ => VersionString {
                marker,
                marked: false,
                bare: raw.to_string(),
            },
        }
    }

    /// Numeric form without the marker (e.g. "1.0.1")
    pub fn bare(&self) -> &str {
        &self.bare
    }

    /// Tagged form with the marker (e.g. "v1.0.1")
    pub fn marked(&self) -> String {
        format!("{}{}", self.marker, self.bare)
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// True when the bare form starts with three numeric components
    /// (`1.0.1`, `1.0.1-rc.1`, `10.20.30+build`).
    pub fn is_release_shaped(&self) -> bool {
        let mut parts = self.bare.splitn(3, '.');
        let (Some(major), Some(minor), Some(rest)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let patch_digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        is_numeric(major) && is_numeric(minor) && patch_digits > 0
    }

    /// Semver view of the bare form, when it is valid semver
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.bare).ok()
    }
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

impl PartialEq for VersionString {
    fn eq(&self, other: &Self) -> bool {
        self.bare == other.bare
    }
}

impl PartialOrd for VersionString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionString {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.semver(), other.semver()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.bare.cmp(&other.bare)),
            _ => self.bare.cmp(&other.bare),
        }
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.marked {
            write!(f, "{}{}", self.marker, self.bare)
        } else {
            write!(f, "{}", self.bare)
        }
    }
}
