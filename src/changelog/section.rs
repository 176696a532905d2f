use regex::Regex;

use crate::error::Result;

/// Heading that opens the next release block: any level, text starting with a digit or `[`
const NEXT_RELEASE_HEADING: &str = r"(?m)^#+[ \t]+[0-9\[]";

/// The block of a changelog belonging to one version heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSection<'a> {
    /// Number of `#` markers on the version heading
    pub level: usize,
    /// The heading line itself
    pub heading: &'a str,
    /// Everything between the heading line and the next release heading
    pub body: &'a str,
}

fn version_heading_pattern(version: &str) -> String {
    let v = regex::escape(version);
    // plain:  "# 1.0.0 (2026-02-28)"
    // linked: "## [1.0.2](https://...) (2026-02-28)"
    format!(
        r"(?m)^(#+)[ \t]+(?:{v}[ \t]*(?:\([^)\n]+\))?|\[{v}\](?:\([^)\n]+\))*(?:[ \t]*\([^)\n]+\))?)[ \t]*\r?$"
    )
}

/// Find the section of `text` for `version`.
///
/// Returns `Ok(None)` when no heading names this exact version. A heading
/// must end right after the version token and its optional parentheticals,
/// so "1.0" never matches a "1.0.1" heading.
pub fn extract_section<'a>(text: &'a str, version: &str) -> Result<Option<VersionSection<'a>>> {
    let heading_re = Regex::new(&version_heading_pattern(version))?;

    let Some(caps) = heading_re.captures(text) else {
        log::debug!("No changelog heading for version {}", version);
        return Ok(None);
    };
    let (Some(heading), Some(markers)) = (caps.get(0), caps.get(1)) else {
        return Ok(None);
    };

    let body_start = match text[heading.end()..].strip_prefix('\n') {
        Some(_) => heading.end() + 1,
        None => heading.end(),
    };

    let next_re = Regex::new(NEXT_RELEASE_HEADING)?;
    let body_end = next_re
        .find(&text[body_start..])
        .map(|m| body_start + m.start())
        .unwrap_or(text.len());

    Ok(Some(VersionSection {
        level: markers.as_str().len(),
        heading: heading.as_str().trim_end(),
        body: &text[body_start..body_end],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
## [1.0.2](https://github.com/acme/demo/compare/v1.0.1...v1.0.2) (2026-02-28)

### Bug Fixes

* second fix

## 1.0.1 (2026-02-20)

### Features

* middle feature

# 1.0.0 (2026-02-01)

### Features

* first release
";

    #[test]
    fn test_linked_heading() {
        let section = extract_section(CHANGELOG, "1.0.2").unwrap().unwrap();
        assert_eq!(section.level, 2);
        assert!(section.heading.starts_with("## [1.0.2]"));
        assert_eq!(section.body, "\n### Bug Fixes\n\n* second fix\n\n");
    }

    #[test]
    fn test_plain_heading_with_date() {
        let section = extract_section(CHANGELOG, "1.0.1").unwrap().unwrap();
        assert_eq!(section.level, 2);
        assert!(section.body.contains("middle feature"));
        assert!(!section.body.contains("first release"));
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let section = extract_section(CHANGELOG, "1.0.0").unwrap().unwrap();
        assert_eq!(section.level, 1);
        assert_eq!(section.body, "\n### Features\n\n* first release\n");
    }

    #[test]
    fn test_missing_version_is_none() {
        assert!(extract_section(CHANGELOG, "9.9.9").unwrap().is_none());
    }

    #[test]
    fn test_prefix_version_does_not_match() {
        assert!(extract_section(CHANGELOG, "1.0").unwrap().is_none());
    }

    #[test]
    fn test_version_is_matched_literally() {
        // "." must not act as a regex wildcard
        assert!(extract_section("## 1x0x0\n* a\n", "1.0.0").unwrap().is_none());
    }

    #[test]
    fn test_plain_heading_without_date() {
        let text = "# 2.0.0\n\n### Features\n\n* Add widget\n";
        let section = extract_section(text, "2.0.0").unwrap().unwrap();
        assert!(section.body.contains("Add widget"));
    }

    #[test]
    fn test_heading_must_start_line() {
        let text = "see # 2.0.0\n";
        assert!(extract_section(text, "2.0.0").unwrap().is_none());
    }

    #[test]
    fn test_subsection_headings_do_not_end_section() {
        let text = "## 1.1.0\n### Features\n* a\n### Bug Fixes\n* b\n## 1.0.0\n* old\n";
        let section = extract_section(text, "1.1.0").unwrap().unwrap();
        assert_eq!(section.body, "### Features\n* a\n### Bug Fixes\n* b\n");
    }
}
