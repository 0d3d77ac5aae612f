//! Main sync workflow orchestration
//!
//! Sequences tag resolution, note fetching, the rewrite, and publishing.
//! This module owns no I/O policy of its own: the transformer and the
//! repository client arrive as capability traits so the flow can be
//! exercised without external services.

use chrono::Local;

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::git::RepositoryClient;
use crate::github::GitHubClient;
use crate::gitlab::GitLabClient;
use crate::publish::{PublishMode, Publisher};
use crate::runlog::RunLog;
use crate::transform::TextTransformer;

/// Options for one sync run
///
/// Decoupled from clap so the workflow can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Explicit tag to sync; latest release tag when unset
    pub tag_override: Option<String>,

    /// Open a pull request instead of pushing the default branch
    pub create_pr: bool,
}

/// Result of a completed sync run
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// A change was committed and pushed/proposed
    Updated { tag: String },

    /// The merge produced no staged change; nothing was published
    NoChange { tag: String },
}

/// Run the full fetch → transform → publish pipeline.
pub fn run_sync(
    config: &Config,
    credentials: &Credentials,
    options: &SyncOptions,
    transformer: &dyn TextTransformer,
    git: &dyn RepositoryClient,
    log: &RunLog,
) -> Result<SyncOutcome> {
    log.banner();
    log.status("Starting release notes sync");
    log.banner();

    let gitlab = GitLabClient::new(
        &config.source.gitlab_url,
        &credentials.gitlab_token,
        &config.source.project,
    )?;

    log.status("[step 1/3] Fetching release notes from GitLab...");
    let tag_name = match &options.tag_override {
        Some(tag) if !tag.trim().is_empty() => {
            let tag = tag.trim().to_string();
            log.status(&format!("Using requested tag: {}", tag));
            tag
        }
        _ => {
            let tag = gitlab.latest_release_tag()?;
            log.status(&format!("Using latest release tag: {}", tag.name));
            tag.name
        }
    };

    let document = gitlab.release_notes_for_tag(
        &tag_name,
        &config.source.notes_base_dir,
        &config.source.notes_ref,
    )?;
    log.success(&format!(
        "Fetched release notes ({} chars)",
        document.content.chars().count()
    ));

    let release_date = resolve_release_date(&gitlab, &tag_name, log);

    log.status("[step 2/3] Rewriting notes through the transform service...");
    let fragment = transformer.transform(&document.content, &release_date)?;
    log.success(&format!(
        "Transform complete ({} chars)",
        fragment.chars().count()
    ));

    log.status(&format!(
        "[step 3/3] Publishing to GitHub ({})...",
        config.target.repo
    ));
    let mode = if options.create_pr {
        log.status("Mode: pull request");
        PublishMode::PullRequest
    } else {
        log.status("Mode: direct push");
        PublishMode::DirectPush
    };

    let github = GitHubClient::new(&credentials.github_token)?;
    let publisher = Publisher::new(git, &github, log);
    let updated = publisher.publish(&config.target, &credentials.github_token, &fragment, mode)?;

    log.banner();
    if updated {
        log.success("Sync task finished: target updated");
        Ok(SyncOutcome::Updated { tag: tag_name })
    } else {
        log.warn("Sync task finished without changes; content may already exist");
        Ok(SyncOutcome::NoChange { tag: tag_name })
    }
}

/// Release date for the fragment: the tagged commit's date when it can be
/// determined, today otherwise.
///
/// Every failure on this path - missing tag, transport error, absent or
/// malformed timestamp - falls back silently to the current date. This is
/// the single deliberately swallowed error in the pipeline; everything
/// else propagates.
fn resolve_release_date(gitlab: &GitLabClient, tag_name: &str, log: &RunLog) -> String {
    match gitlab
        .get_tag_info(tag_name)
        .ok()
        .and_then(|tag| tag.release_date())
    {
        Some(date) => {
            let date = date.format("%Y-%m-%d").to_string();
            log.status(&format!("Release date: {}", date));
            date
        }
        None => {
            let date = Local::now().format("%Y-%m-%d").to_string();
            log.status(&format!("Using current date: {}", date));
            date
        }
    }
}
