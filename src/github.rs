//! GitHub API client - pull-request creation against the target
//! repository.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Longest fragment preview embedded in a pull-request body, in characters.
const BODY_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Serialize)]
struct PullRequestPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    html_url: String,
}

/// Client for the target repository's REST API.
pub struct GitHubClient {
    http: Client,
    api_base: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_api_base("https://api.github.com", token)
    }

    /// Client against a non-default API base. Used by tests.
    pub fn with_api_base(api_base: &str, token: &str) -> Result<Self> {
        // GitHub rejects requests without a user agent.
        let http = Client::builder()
            .user_agent(concat!("release-notes-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GitHubClient {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Open a pull request from `head` into `base` and return its URL.
    ///
    /// # Arguments
    /// * `repo` - target repository, e.g. "DaoCloud/DaoCloud-docs"
    /// * `head` - branch carrying the change
    /// * `base` - branch the pull request targets
    /// * `title` - pull-request title (the commit message)
    /// * `fragment` - processed notes, previewed in the body
    pub fn open_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        fragment: &str,
    ) -> Result<String> {
        let payload = PullRequestPayload {
            title,
            head,
            base,
            body: pr_body(fragment),
        };

        let response = self
            .http
            .post(format!("{}/repos/{}/pulls", self.api_base, repo))
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SyncError::remote(status.as_u16(), body));
        }

        let created: PullRequestResponse = response.json()?;
        Ok(created.html_url)
    }
}

/// Pull-request body: boilerplate around a truncated fragment preview.
///
/// Truncation counts characters, not bytes; fragments are mostly CJK text
/// and must never be cut mid-character.
pub fn pr_body(fragment: &str) -> String {
    let preview: String = fragment.chars().take(BODY_PREVIEW_CHARS).collect();
    format!(
        r#"## 自动更新 Release Notes

本 PR 由自动化脚本生成，包含以下更新：

{preview}...

---
*由 GitHub Actions 自动创建*
"#
    )
}
