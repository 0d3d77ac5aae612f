use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::domain::version::ReleaseTag;

/// A tag as reported by the source project's tag list.
///
/// Identity is the name; the commit block carries the timestamp used to
/// derive a release date. Both are immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub commit: Option<TagCommit>,
}

/// Commit metadata attached to a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct TagCommit {
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Tag {
    /// True when the tag marks a final release (strict `vX.Y.Z` name).
    pub fn is_release(&self) -> bool {
        ReleaseTag::is_release_name(&self.name)
    }

    /// Release date derived from the tagged commit's timestamp, if present
    /// and parseable as RFC 3339. The date is taken in the timestamp's own
    /// offset, matching how upstream reports it.
    pub fn release_date(&self) -> Option<NaiveDate> {
        let created_at = self.commit.as_ref()?.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(created_at)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

/// Keep only final release tags, preserving the incoming order and
/// stopping once `limit` matches are collected.
///
/// Candidate tags with `-rc`, `-dev`, or any other suffix are dropped;
/// pre-releases never trigger documentation updates.
pub fn filter_release_tags(tags: Vec<Tag>, limit: usize) -> Vec<Tag> {
    let mut releases = Vec::new();
    for tag in tags {
        if tag.is_release() {
            releases.push(tag);
            if releases.len() >= limit {
                break;
            }
        }
    }
    releases
}
