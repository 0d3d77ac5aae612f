//! Publisher - stages the merged document in a disposable working copy of
//! the target repository and pushes it out, either directly or through a
//! pull request.

use chrono::{DateTime, Utc};
use std::fs;

use crate::config::TargetConfig;
use crate::error::{Result, SyncError};
use crate::git::RepositoryClient;
use crate::github::GitHubClient;
use crate::merge;
use crate::runlog::RunLog;

/// How the committed change leaves the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    PullRequest,
    DirectPush,
}

/// Publishes one processed fragment into the target repository.
///
/// Owns the ephemeral workspace for the duration of a run; the workspace
/// is removed on every exit path, success or failure.
pub struct Publisher<'a> {
    git: &'a dyn RepositoryClient,
    github: &'a GitHubClient,
    log: &'a RunLog,
}

impl<'a> Publisher<'a> {
    pub fn new(git: &'a dyn RepositoryClient, github: &'a GitHubClient, log: &'a RunLog) -> Self {
        Publisher { git, github, log }
    }

    /// Run the publish state machine.
    ///
    /// Returns `Ok(true)` when a change was committed and pushed,
    /// `Ok(false)` when the staged diff was empty (the no-op outcome -
    /// nothing is committed, pushed, or opened as a pull request).
    pub fn publish(
        &self,
        target: &TargetConfig,
        clone_token: &str,
        fragment: &str,
        mode: PublishMode,
    ) -> Result<bool> {
        self.log
            .status(&format!("Preparing to publish into {}...", target.repo));
        self.log
            .status(&format!("Target file: {}", target.file_path));

        let workspace = tempfile::Builder::new().prefix("github_docs_").tempdir()?;
        let workdir = workspace.path();
        self.log
            .status(&format!("Workspace: {}", workdir.display()));

        let clone_url = format!("https://{}@github.com/{}.git", clone_token, target.repo);
        self.log.status("Cloning target repository...");
        self.git.clone_repo(&clone_url, workdir)?;

        self.git
            .set_identity(workdir, &target.author_name, &target.author_email)?;

        let branch = match mode {
            PublishMode::PullRequest => {
                let branch = release_branch_name(Utc::now());
                self.log.status(&format!("Creating branch: {}", branch));
                self.git.create_branch(workdir, &branch)?;
                Some(branch)
            }
            PublishMode::DirectPush => None,
        };

        let document_path = workdir.join(&target.file_path);
        if !document_path.exists() {
            return Err(SyncError::FileMissing(target.file_path.clone()));
        }

        self.log.status("Updating release notes file...");
        let document = fs::read_to_string(&document_path)?;
        fs::write(&document_path, merge::insert_fragment(&document, fragment))?;

        self.git.stage_file(workdir, &target.file_path)?;

        if !self.git.has_staged_changes(workdir)? {
            self.log
                .warn("No file changes detected; content may already be present");
            return Ok(false);
        }

        let message = commit_message_for(fragment);
        self.log.status(&format!("Committing: {}", message));
        self.git.commit(workdir, &message)?;

        match branch {
            Some(branch) => {
                self.log.status(&format!("Pushing branch: {}", branch));
                self.git.push(workdir, &branch)?;

                self.log.status("Creating pull request...");
                let url = self.github.open_pull_request(
                    &target.repo,
                    &branch,
                    &target.base_branch,
                    &message,
                    fragment,
                )?;
                self.log.success(&format!("Pull request created: {}", url));
            }
            None => {
                self.log
                    .status(&format!("Pushing to {} branch...", target.base_branch));
                self.git.push(workdir, &target.base_branch)?;
            }
        }

        self.log.success("Publish complete");
        Ok(true)
    }
}

/// Commit message derived from the fragment's first `###` heading.
///
/// Falls back to a generic message when the fragment carries no version
/// heading.
pub fn commit_message_for(fragment: &str) -> String {
    for line in fragment.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("###") {
            let version = trimmed.trim_start_matches('#').trim();
            return format!("docs: add {} release notes", version);
        }
    }
    "docs: update release notes".to_string()
}

/// Branch name for a pull-request run, unique to the second.
pub fn release_branch_name(now: DateTime<Utc>) -> String {
    format!("auto-update-release-{}", now.format("%Y%m%d-%H%M%S"))
}
