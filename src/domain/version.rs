use crate::error::{Result, SyncError};
use regex::Regex;
use semver::Version;
use std::fmt;

/// Anchored pattern for final release tags. Suffixed tags never match.
const RELEASE_TAG_PATTERN: &str = r"^v(\d+)\.(\d+)\.(\d+)$";

/// A release tag parsed from the strict `vMAJOR.MINOR.PATCH` form.
///
/// Pre-release and otherwise suffixed tags (`v0.44.0-rc1`, `v0.44.0-dev1`)
/// never parse into this type; only final releases drive documentation
/// updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
}

impl ReleaseTag {
    /// Parse a tag name such as "v0.44.0".
    ///
    /// The pattern is anchored: any suffix, or anything beyond the leading
    /// 'v', fails with `InvalidTag`.
    ///
    /// # Example
    /// ```ignore
    /// assert!(ReleaseTag::parse("v0.44.0").is_ok());
    /// assert!(ReleaseTag::parse("v0.44.0-rc1").is_err());
    /// assert!(ReleaseTag::parse("0.44.0").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        if let Ok(re) = Regex::new(RELEASE_TAG_PATTERN) {
            if let Some(captures) = re.captures(name) {
                let major = parse_component(&captures[1])?;
                let minor = parse_component(&captures[2])?;
                let patch = parse_component(&captures[3])?;

                return Ok(ReleaseTag {
                    name: name.to_string(),
                    version: Version::new(major, minor, patch),
                });
            }
        }

        Err(SyncError::invalid_tag(format!(
            "'{}' - expected vX.Y.Z",
            name
        )))
    }

    /// True when a tag name is a final release (`vX.Y.Z`, no suffix).
    pub fn is_release_name(name: &str) -> bool {
        Regex::new(RELEASE_TAG_PATTERN)
            .map(|re| re.is_match(name))
            .unwrap_or(false)
    }

    /// Directory that groups release notes of one minor series, e.g. "v0.44".
    pub fn series_dir(&self) -> String {
        format!("v{}.{}", self.version.major, self.version.minor)
    }

    /// Repository path of this release's notes file under `base_dir`.
    ///
    /// Convention: `releasenotes/v0.44/releasenotes-v0.44.0.md`.
    pub fn notes_path(&self, base_dir: &str) -> String {
        format!(
            "{}/{}/releasenotes-{}.md",
            base_dir,
            self.series_dir(),
            self.name
        )
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn parse_component(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .map_err(|_| SyncError::invalid_tag(format!("version component out of range: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_tag() {
        let tag = ReleaseTag::parse("v0.44.0").unwrap();
        assert_eq!(tag.name, "v0.44.0");
        assert_eq!(tag.version, Version::new(0, 44, 0));
    }

    #[test]
    fn test_parse_rejects_suffixes() {
        assert!(ReleaseTag::parse("v0.44.0-rc1").is_err());
        assert!(ReleaseTag::parse("v0.44.0-dev1").is_err());
        assert!(ReleaseTag::parse("v0.44.0.1").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_prefix_or_components() {
        assert!(ReleaseTag::parse("0.44.0").is_err());
        assert!(ReleaseTag::parse("v0.44").is_err());
        assert!(ReleaseTag::parse("v").is_err());
        assert!(ReleaseTag::parse("").is_err());
    }

    #[test]
    fn test_parse_error_is_invalid_tag() {
        let err = ReleaseTag::parse("release-1.2.3").unwrap_err();
        assert!(matches!(err, SyncError::InvalidTag(_)));
    }

    #[test]
    fn test_is_release_name() {
        assert!(ReleaseTag::is_release_name("v1.2.3"));
        assert!(ReleaseTag::is_release_name("v0.44.0"));
        assert!(!ReleaseTag::is_release_name("v0.44.0-rc1"));
        assert!(!ReleaseTag::is_release_name("V1.2.3"));
    }

    #[test]
    fn test_series_dir() {
        let tag = ReleaseTag::parse("v0.44.2").unwrap();
        assert_eq!(tag.series_dir(), "v0.44");
    }

    #[test]
    fn test_notes_path_convention() {
        let tag = ReleaseTag::parse("v0.44.0").unwrap();
        assert_eq!(
            tag.notes_path("releasenotes"),
            "releasenotes/v0.44/releasenotes-v0.44.0.md"
        );
    }

    #[test]
    fn test_notes_path_multi_digit_components() {
        let tag = ReleaseTag::parse("v12.3.45").unwrap();
        assert_eq!(
            tag.notes_path("releasenotes"),
            "releasenotes/v12.3/releasenotes-v12.3.45.md"
        );
    }

    #[test]
    fn test_display_is_tag_name() {
        let tag = ReleaseTag::parse("v1.0.0").unwrap();
        assert_eq!(tag.to_string(), "v1.0.0");
    }
}
