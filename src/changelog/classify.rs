use std::collections::HashMap;

use regex::Regex;

use super::section::VersionSection;
use crate::domain::{Change, ChangeKind, ChangelogEntry};
use crate::error::Result;

const SUBSECTION_HEADING: &str = r"(?m)^(#+)[ \t]+(.+?)[ \t]*\r?$";

/// "description ([abc1234](https://host/commit/abc1234))"
const BRACKETED_COMMIT: &str =
    r"^(.+?)\s*\(\s*\[([0-9a-f]+)\]\((https?://[^)]+)\)\s*\)$";

/// "description (abc1234)(https://host/commit/abc1234)"
const PAIRED_COMMIT: &str = r"^(.+?)\s*\(([0-9a-f]+)\)\s*\((https?://[^)]+)\)$";

/// Built-in changelog heading -> change kind table.
///
/// Keys are lowercase; see https://artifacthub.io/docs/topics/annotations/helm/
const BUILTIN_SECTIONS: &[(&str, ChangeKind)] = &[
    ("bug fixes", ChangeKind::Fixed),
    ("features", ChangeKind::Added),
    ("breaking changes", ChangeKind::Removed),
    ("removed", ChangeKind::Removed),
    ("deprecated", ChangeKind::Deprecated),
    ("security", ChangeKind::Security),
    ("changed", ChangeKind::Changed),
    ("other", ChangeKind::Changed),
    ("documentation", ChangeKind::Changed),
];

/// Maps subsection headings to change kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    kinds: HashMap<String, ChangeKind>,
}

impl Default for SectionTable {
    fn default() -> Self {
        SectionTable {
            kinds: BUILTIN_SECTIONS
                .iter()
                .map(|(name, kind)| (name.to_string(), *kind))
                .collect(),
        }
    }
}

impl SectionTable {
    /// Built-in table extended (or overridden) by configured entries
    pub fn with_overrides(overrides: &HashMap<String, ChangeKind>) -> Self {
        let mut table = SectionTable::default();
        for (name, kind) in overrides {
            table.kinds.insert(name.trim().to_lowercase(), *kind);
        }
        table
    }

    /// Kind for a subsection heading; unknown headings are `changed`
    pub fn classify(&self, heading: &str) -> ChangeKind {
        self.kinds
            .get(&heading.trim().to_lowercase())
            .copied()
            .unwrap_or(ChangeKind::Changed)
    }
}

/// Parses bullet lines into changelog entries
pub struct EntryParser {
    bracketed: Regex,
    paired: Regex,
}

impl EntryParser {
    pub fn new() -> Result<Self> {
        Ok(EntryParser {
            bracketed: Regex::new(BRACKETED_COMMIT)?,
            paired: Regex::new(PAIRED_COMMIT)?,
        })
    }

    /// Parse one body line.
    ///
    /// Only `* text` / `- text` bullets qualify. A trailing commit reference
    /// becomes the entry's hash and URL; otherwise the text is kept as-is
    /// unless it starts with `[` (a half-formed link).
    pub fn parse_line(&self, line: &str) -> Option<ChangelogEntry> {
        let line = line.trim();
        let rest = line
            .strip_prefix("* ")
            .or_else(|| line.strip_prefix("- "))?
            .trim();
        if rest.is_empty() {
            return None;
        }

        for re in [&self.bracketed, &self.paired] {
            if let Some(caps) = re.captures(rest) {
                let description = caps[1].trim();
                if !description.is_empty() {
                    return Some(ChangelogEntry::with_commit(description, &caps[2], &caps[3]));
                }
            }
        }

        if rest.starts_with('[') {
            log::debug!("Skipping malformed entry: {}", rest);
            return None;
        }
        Some(ChangelogEntry::plain(rest))
    }
}

struct Heading<'a> {
    level: usize,
    name: &'a str,
    start: usize,
    end: usize,
}

/// Classify every bullet of a version section.
///
/// Subsections are the headings one level below the version heading (the
/// shallowest deeper level present). Output keeps subsection order, then
/// line order.
pub fn classify_section(section: &VersionSection<'_>, table: &SectionTable) -> Result<Vec<Change>> {
    let heading_re = Regex::new(SUBSECTION_HEADING)?;
    let parser = EntryParser::new()?;
    let body = section.body;

    let headings: Vec<Heading<'_>> = heading_re
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Heading {
                level: caps.get(1)?.as_str().len(),
                name: caps.get(2)?.as_str(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .filter(|h| h.level > section.level)
        .collect();

    let Some(sub_level) = headings.iter().map(|h| h.level).min() else {
        return Ok(Vec::new());
    };
    let subsections: Vec<&Heading<'_>> =
        headings.iter().filter(|h| h.level == sub_level).collect();

    let mut changes = Vec::new();
    for (i, heading) in subsections.iter().enumerate() {
        let kind = table.classify(heading.name);
        let end = subsections
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(body.len());

        for line in body[heading.end..end].lines() {
            if let Some(entry) = parser.parse_line(line) {
                changes.push(entry.into_change(kind));
            }
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(level: usize, body: &str) -> VersionSection<'_> {
        VersionSection {
            level,
            heading: "",
            body,
        }
    }

    #[test]
    fn test_builtin_mapping() {
        let table = SectionTable::default();
        assert_eq!(table.classify("Bug Fixes"), ChangeKind::Fixed);
        assert_eq!(table.classify("Breaking Changes"), ChangeKind::Removed);
        assert_eq!(table.classify("  Features "), ChangeKind::Added);
        assert_eq!(table.classify("SECURITY"), ChangeKind::Security);
        assert_eq!(table.classify("Deprecated"), ChangeKind::Deprecated);
        assert_eq!(table.classify("Performance Improvements"), ChangeKind::Changed);
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("Performance Improvements".to_string(), ChangeKind::Added);
        overrides.insert("other".to_string(), ChangeKind::Fixed);
        let table = SectionTable::with_overrides(&overrides);
        assert_eq!(table.classify("performance improvements"), ChangeKind::Added);
        assert_eq!(table.classify("Other"), ChangeKind::Fixed);
        assert_eq!(table.classify("Bug Fixes"), ChangeKind::Fixed);
    }

    #[test]
    fn test_parse_bracketed_commit() {
        let parser = EntryParser::new().unwrap();
        let entry = parser
            .parse_line("* **webhook:** reject cycles ([4f2c9e1ab](https://github.com/acme/demo/commit/4f2c9e1ab))")
            .unwrap();
        assert_eq!(entry.description, "**webhook:** reject cycles");
        assert_eq!(entry.commit.as_deref(), Some("4f2c9e1ab"));
        assert_eq!(
            entry.url.as_deref(),
            Some("https://github.com/acme/demo/commit/4f2c9e1ab")
        );
    }

    #[test]
    fn test_parse_paired_commit() {
        let parser = EntryParser::new().unwrap();
        let entry = parser
            .parse_line("* Fix crash (abc1234)(https://example.com/commit/abc1234)")
            .unwrap();
        assert_eq!(entry.description, "Fix crash");
        assert_eq!(entry.commit.as_deref(), Some("abc1234"));
        assert_eq!(entry.url.as_deref(), Some("https://example.com/commit/abc1234"));
    }

    #[test]
    fn test_parse_plain_and_rejects() {
        let parser = EntryParser::new().unwrap();
        assert_eq!(
            parser.parse_line("  * Add widget  "),
            Some(ChangelogEntry::plain("Add widget"))
        );
        assert_eq!(
            parser.parse_line("- dash bullet"),
            Some(ChangelogEntry::plain("dash bullet"))
        );
        assert_eq!(parser.parse_line("*"), None);
        assert_eq!(parser.parse_line("* "), None);
        assert_eq!(parser.parse_line("*bold* text"), None);
        assert_eq!(parser.parse_line("plain paragraph"), None);
        assert_eq!(parser.parse_line("* [abc1234](https://x/commit/abc1234)"), None);
    }

    #[test]
    fn test_parenthetical_in_description_is_kept() {
        let parser = EntryParser::new().unwrap();
        let entry = parser
            .parse_line("* support (optional) retries ([abc1234](https://x.io/c/abc1234))")
            .unwrap();
        assert_eq!(entry.description, "support (optional) retries");
    }

    #[test]
    fn test_classify_preserves_order() {
        let body = "\n### Features\n\n* b feature\n* a feature\n\n### Bug Fixes\n\n* z fix\n* b feature\n";
        let changes = classify_section(&section(2, body), &SectionTable::default()).unwrap();
        let got: Vec<(ChangeKind, &str)> = changes
            .iter()
            .map(|c| (c.kind, c.description.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (ChangeKind::Added, "b feature"),
                (ChangeKind::Added, "a feature"),
                (ChangeKind::Fixed, "z fix"),
                (ChangeKind::Fixed, "b feature"),
            ]
        );
    }

    #[test]
    fn test_subsections_two_levels_below_top_heading() {
        let body = "\n### Features\n\n* first release\n";
        let changes = classify_section(&section(1, body), &SectionTable::default()).unwrap();
        assert_eq!(changes, vec![Change::new(ChangeKind::Added, "first release")]);
    }

    #[test]
    fn test_deeper_headings_stay_inside_subsection() {
        let body = "### Features\n* a\n#### Details\n* b\n### Bug Fixes\n* c\n";
        let changes = classify_section(&section(2, body), &SectionTable::default()).unwrap();
        let kinds: Vec<ChangeKind> = changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Added, ChangeKind::Added, ChangeKind::Fixed]
        );
    }

    #[test]
    fn test_shallowest_deeper_heading_defines_subsections() {
        // Under "# 1.0.0", a "## Notes" heading sits one level down, so it
        // becomes the subsection and the "###" headings below it are body text.
        let body = "\n## Notes\n\n### Features\n\n* a feature\n\n### Bug Fixes\n\n* a fix\n";
        let changes = classify_section(&section(1, body), &SectionTable::default()).unwrap();
        assert_eq!(
            changes,
            vec![
                Change::new(ChangeKind::Changed, "a feature"),
                Change::new(ChangeKind::Changed, "a fix"),
            ]
        );
    }

    #[test]
    fn test_text_before_first_subsection_is_ignored() {
        let body = "* stray bullet\n### Other\n* kept\n";
        let changes = classify_section(&section(2, body), &SectionTable::default()).unwrap();
        assert_eq!(changes, vec![Change::new(ChangeKind::Changed, "kept")]);
    }

    #[test]
    fn test_no_subsections_yields_nothing() {
        let body = "* loose bullet\n";
        let changes = classify_section(&section(2, body), &SectionTable::default()).unwrap();
        assert!(changes.is_empty());
    }
}
