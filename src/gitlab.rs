//! GitLab API client - tag listing and release-notes retrieval.
//!
//! Read-only against the source project: `GET /repository/tags`,
//! `GET /repository/tags/{name}` and `GET /repository/files/{path}`.
//! Authentication is a private-token header; project identifiers that are
//! paths ("group/project") are percent-encoded into a single URL segment.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::domain::tag::{filter_release_tags, Tag};
use crate::domain::version::ReleaseTag;
use crate::error::{Result, SyncError};

/// Where a release document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    RepositoryFile,
}

/// Read-only snapshot of one release's raw notes.
#[derive(Debug, Clone)]
pub struct ReleaseDocument {
    pub tag_name: String,
    pub file_path: String,
    pub content: String,
    pub source: NoteSource,
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    content: String,
}

/// Client for the source project's repository API.
pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: String,
    project: String,
}

impl GitLabClient {
    /// Create a client for one project.
    ///
    /// # Arguments
    /// * `base_url` - GitLab instance address, e.g. "https://gitlab.daocloud.cn"
    /// * `token` - personal access token
    /// * `project` - project ID or path, e.g. "ndx/ghippo"
    pub fn new(base_url: &str, token: &str, project: &str) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(GitLabClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            project: project.to_string(),
        })
    }

    /// List tags ordered by most recently updated first.
    pub fn list_tags(&self, per_page: usize) -> Result<Vec<Tag>> {
        let response = self
            .http
            .get(self.repository_url("tags"))
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[
                ("per_page", per_page.to_string().as_str()),
                ("order_by", "updated"),
                ("sort", "desc"),
            ])
            .send()?;

        let response = check_status(response)?;
        Ok(response.json()?)
    }

    /// List final release tags only (`vX.Y.Z`, no suffix), newest first.
    ///
    /// Scans a window of 100 recently-updated tags before filtering.
    pub fn list_release_tags(&self, limit: usize) -> Result<Vec<Tag>> {
        let all_tags = self.list_tags(100)?;
        Ok(filter_release_tags(all_tags, limit))
    }

    /// Most recently updated final release tag.
    pub fn latest_release_tag(&self) -> Result<Tag> {
        self.list_release_tags(1)
            .map(|tags| tags.into_iter().next())?
            .ok_or(SyncError::NoReleaseTag)
    }

    /// Metadata of a single tag, including its commit timestamp.
    pub fn get_tag_info(&self, tag_name: &str) -> Result<Tag> {
        let response = self
            .http
            .get(self.repository_url(&format!("tags/{}", urlencoding::encode(tag_name))))
            .header("PRIVATE-TOKEN", &self.token)
            .send()?;

        let response = check_status(response)?;
        Ok(response.json()?)
    }

    /// Decoded text content of a repository file at `git_ref`.
    pub fn file_content(&self, file_path: &str, git_ref: &str) -> Result<String> {
        let response = self
            .http
            .get(self.repository_url(&format!("files/{}", urlencoding::encode(file_path))))
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("ref", git_ref)])
            .send()?;

        let response = check_status(response)?;
        let status = response.status().as_u16();
        let payload: FilePayload = response.json()?;
        decode_file_content(&payload.content, status)
    }

    /// Fetch the release notes document for a tag.
    ///
    /// The tag name must be a strict `vX.Y.Z` release name; the file path
    /// follows the `{base_dir}/v{M}.{m}/releasenotes-{tag}.md` convention.
    /// A remote 404 is reported as `NotesMissing` with the computed path,
    /// distinguishable from transport failures.
    pub fn release_notes_for_tag(
        &self,
        tag_name: &str,
        base_dir: &str,
        git_ref: &str,
    ) -> Result<ReleaseDocument> {
        let tag = ReleaseTag::parse(tag_name)?;
        let file_path = tag.notes_path(base_dir);

        match self.file_content(&file_path, git_ref) {
            Ok(content) => Ok(ReleaseDocument {
                tag_name: tag_name.to_string(),
                file_path,
                content,
                source: NoteSource::RepositoryFile,
            }),
            Err(err) if err.is_remote_not_found() => Err(SyncError::NotesMissing(file_path)),
            Err(err) => Err(err),
        }
    }

    fn repository_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/v4/projects/{}/repository/{}",
            self.base_url,
            urlencoding::encode(&self.project),
            suffix
        )
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(SyncError::remote(status.as_u16(), body))
    }
}

fn decode_file_content(encoded: &str, status: u16) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|_| SyncError::remote(status, "file content is not valid base64"))?;
    String::from_utf8(bytes).map_err(|_| SyncError::remote(status, "file content is not valid UTF-8"))
}
