use crate::error::Result;
use git2::build::RepoBuilder;
use git2::{Cred, FetchOptions, PushOptions, RemoteCallbacks, Repository};
use std::path::Path;

/// git2-backed implementation of [super::RepositoryClient].
///
/// Authenticates HTTPS operations with a token supplied at construction;
/// the token doubles as the password for whatever username the remote URL
/// carries.
pub struct Git2Client {
    token: String,
}

impl Git2Client {
    pub fn new(token: impl Into<String>) -> Self {
        Git2Client {
            token: token.into(),
        }
    }

    fn auth_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, _allowed_types| {
            Cred::userpass_plaintext(username_from_url.unwrap_or("x-access-token"), &self.token)
        });
        callbacks
    }
}

impl super::RepositoryClient for Git2Client {
    fn clone_repo(&self, url: &str, into: &Path) -> Result<()> {
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.auth_callbacks());
        fetch_options.depth(1);

        RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(url, into)?;

        Ok(())
    }

    fn set_identity(&self, workdir: &Path, name: &str, email: &str) -> Result<()> {
        let repo = Repository::open(workdir)?;
        let mut config = repo.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        Ok(())
    }

    fn create_branch(&self, workdir: &Path, branch: &str) -> Result<()> {
        let repo = Repository::open(workdir)?;
        let head = repo.head()?.peel_to_commit()?;
        repo.branch(branch, &head, false)?;
        // The working tree is untouched; only HEAD moves.
        repo.set_head(&format!("refs/heads/{}", branch))?;
        Ok(())
    }

    fn stage_file(&self, workdir: &Path, file_path: &str) -> Result<()> {
        let repo = Repository::open(workdir)?;
        let mut index = repo.index()?;
        index.add_path(Path::new(file_path))?;
        index.write()?;
        Ok(())
    }

    fn has_staged_changes(&self, workdir: &Path) -> Result<bool> {
        let repo = Repository::open(workdir)?;
        let head_tree = repo.head()?.peel_to_tree()?;
        let index = repo.index()?;
        let diff = repo.diff_tree_to_index(Some(&head_tree), Some(&index), None)?;
        Ok(diff.deltas().len() > 0)
    }

    fn commit(&self, workdir: &Path, message: &str) -> Result<()> {
        let repo = Repository::open(workdir)?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = repo.signature()?;
        let parent = repo.head()?.peel_to_commit()?;
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
        Ok(())
    }

    fn push(&self, workdir: &Path, branch: &str) -> Result<()> {
        let repo = Repository::open(workdir)?;
        let mut remote = repo.find_remote("origin")?;

        let mut callbacks = self.auth_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        remote.push(&[refspec.as_str()], Some(&mut push_options))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::RepositoryClient;

    #[test]
    fn test_operations_on_a_plain_directory_fail() {
        let dir = tempfile::tempdir().unwrap();
        let client = Git2Client::new("token");
        assert!(client.set_identity(dir.path(), "Bot", "bot@example.com").is_err());
        assert!(client.has_staged_changes(dir.path()).is_err());
    }

    #[test]
    fn test_stage_and_diff_against_a_local_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        // Seed an initial commit so HEAD exists.
        std::fs::write(dir.path().join("release-notes.md"), "intro\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("release-notes.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Seed", "seed@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "seed", &tree, &[]).unwrap();
        drop(tree);

        let client = Git2Client::new("token");
        client
            .set_identity(dir.path(), "Release Bot", "bot@daocloud.io")
            .unwrap();

        // Unchanged file: staging produces no diff.
        client.stage_file(dir.path(), "release-notes.md").unwrap();
        assert!(!client.has_staged_changes(dir.path()).unwrap());

        // Modified file: staging produces a diff, commit clears it.
        std::fs::write(dir.path().join("release-notes.md"), "intro\nmore\n").unwrap();
        client.stage_file(dir.path(), "release-notes.md").unwrap();
        assert!(client.has_staged_changes(dir.path()).unwrap());

        client.commit(dir.path(), "docs: update release notes").unwrap();
        assert!(!client.has_staged_changes(dir.path()).unwrap());

        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("docs: update release notes"));
        assert_eq!(head.author().name(), Some("Release Bot"));
    }

    #[test]
    fn test_create_branch_switches_head() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        std::fs::write(dir.path().join("f"), "x").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("f")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Seed", "seed@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "seed", &tree, &[]).unwrap();
        drop(tree);

        let client = Git2Client::new("token");
        client
            .create_branch(dir.path(), "auto-update-release-20251130-120000")
            .unwrap();

        let head = repo.head().unwrap();
        assert_eq!(
            head.name(),
            Some("refs/heads/auto-update-release-20251130-120000")
        );
    }
}
