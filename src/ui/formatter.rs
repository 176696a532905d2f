//! Pure formatting functions for UI output.
//!
//! Messages go to stdout, errors to stderr. Styling comes from `console`,
//! which drops colors automatically when the stream is not a terminal.

use console::style;

use crate::domain::Change;
use crate::notice::Notice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a soft outcome as a status line.
pub fn display_notice(notice: &Notice) {
    display_status(&notice.to_string());
}

/// One line per change, as it will appear in the metadata.
pub fn format_change(change: &Change) -> String {
    let mut line = format!("[{}] {}", change.kind, change.description);
    for link in &change.links {
        line.push_str(&format!(" ({})", link.name));
    }
    line
}

/// List the parsed changes under a bold header.
pub fn display_changes(version: &str, changes: &[Change]) {
    if changes.is_empty() {
        return;
    }
    println!("\n{}", style(format!("Changes for {}", version)).bold());
    for change in changes {
        println!("  - {}", format_change(change));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeKind, ChangelogEntry};

    #[test]
    fn test_format_plain_change() {
        let change = Change::new(ChangeKind::Added, "Add widget");
        assert_eq!(format_change(&change), "[added] Add widget");
    }

    #[test]
    fn test_format_linked_change() {
        let change = ChangelogEntry::with_commit("Fix crash", "abc1234ff", "https://e.com/c/abc1234ff")
            .into_change(ChangeKind::Fixed);
        assert_eq!(format_change(&change), "[fixed] Fix crash (Commit abc1234)");
    }
}
