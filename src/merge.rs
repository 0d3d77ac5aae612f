//! Document merger for the target release-notes file.
//!
//! The target document is shared documentation edited by humans too, so a
//! merge must leave every line outside the inserted fragment byte-for-byte
//! untouched.

use regex::Regex;

/// Splice a processed fragment into the document ahead of its version
/// history.
///
/// The insertion point is the first line whose trimmed form starts with
/// `"## "` and matches `## YYYY-MM-DD`. When the document has no dated
/// section yet, the fragment is appended at the end instead - an intended
/// fallback, not an error.
pub fn insert_fragment(document: &str, fragment: &str) -> String {
    let lines: Vec<&str> = document.split('\n').collect();
    let fragment = fragment.trim();

    let mut merged: Vec<&str> = Vec::with_capacity(lines.len() + 2);
    match first_dated_heading(&lines) {
        Some(index) => {
            merged.extend_from_slice(&lines[..index]);
            merged.push(fragment);
            merged.push("");
            merged.extend_from_slice(&lines[index..]);
        }
        None => {
            merged.extend_from_slice(&lines);
            merged.push("");
            merged.push(fragment);
        }
    }

    merged.join("\n")
}

/// Index of the first dated `## YYYY-MM-DD` heading, if any.
fn first_dated_heading(lines: &[&str]) -> Option<usize> {
    let re = Regex::new(r"^## \d{4}-\d{2}-\d{2}").ok()?;
    lines.iter().position(|line| {
        let trimmed = line.trim();
        trimmed.starts_with("## ") && re.is_match(trimmed)
    })
}
