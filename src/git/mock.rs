use crate::error::Result;
use crate::git::RepositoryClient;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Mock repository client for exercising the publisher without git or a
/// network.
///
/// `clone_repo` materializes the seeded files into the workspace, and the
/// staged-diff check compares the workspace content against the seeds, so
/// the publisher's merge-then-diff flow behaves as it would against a real
/// clone. Every call is journaled for assertions.
pub struct MockRepository {
    seed_files: BTreeMap<String, String>,
    force_clean_diff: bool,
    operations: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        MockRepository {
            seed_files: BTreeMap::new(),
            force_clean_diff: false,
            operations: Mutex::new(Vec::new()),
        }
    }

    /// Seed a file that will exist in the workspace after `clone_repo`
    pub fn seed_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.seed_files.insert(path.into(), content.into());
    }

    /// Force the staged-diff check to report no changes
    pub fn force_clean_diff(&mut self) {
        self.force_clean_diff = true;
    }

    /// Journal of every operation performed, in order
    pub fn operations(&self) -> Vec<String> {
        self.operations
            .lock()
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut ops) = self.operations.lock() {
            ops.push(entry);
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryClient for MockRepository {
    fn clone_repo(&self, url: &str, into: &Path) -> Result<()> {
        for (path, content) in &self.seed_files {
            let full = into.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full, content)?;
        }
        self.record(format!("clone {}", url));
        Ok(())
    }

    fn set_identity(&self, _workdir: &Path, name: &str, email: &str) -> Result<()> {
        self.record(format!("identity {} <{}>", name, email));
        Ok(())
    }

    fn create_branch(&self, _workdir: &Path, branch: &str) -> Result<()> {
        self.record(format!("branch {}", branch));
        Ok(())
    }

    fn stage_file(&self, _workdir: &Path, file_path: &str) -> Result<()> {
        self.record(format!("stage {}", file_path));
        Ok(())
    }

    fn has_staged_changes(&self, workdir: &Path) -> Result<bool> {
        if self.force_clean_diff {
            return Ok(false);
        }
        for (path, original) in &self.seed_files {
            let current = fs::read_to_string(workdir.join(path)).unwrap_or_default();
            if &current != original {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn commit(&self, _workdir: &Path, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        Ok(())
    }

    fn push(&self, _workdir: &Path, branch: &str) -> Result<()> {
        self.record(format!("push {}", branch));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_materializes_seeded_files() {
        let mut mock = MockRepository::new();
        mock.seed_file("docs/release-notes.md", "intro\n");

        let dir = tempfile::tempdir().unwrap();
        mock.clone_repo("https://example.com/repo.git", dir.path())
            .unwrap();

        let content = fs::read_to_string(dir.path().join("docs/release-notes.md")).unwrap();
        assert_eq!(content, "intro\n");
    }

    #[test]
    fn test_diff_reflects_workspace_edits() {
        let mut mock = MockRepository::new();
        mock.seed_file("release-notes.md", "intro");

        let dir = tempfile::tempdir().unwrap();
        mock.clone_repo("url", dir.path()).unwrap();
        assert!(!mock.has_staged_changes(dir.path()).unwrap());

        fs::write(dir.path().join("release-notes.md"), "intro\nnew entry").unwrap();
        assert!(mock.has_staged_changes(dir.path()).unwrap());
    }

    #[test]
    fn test_forced_clean_diff_wins() {
        let mut mock = MockRepository::new();
        mock.seed_file("release-notes.md", "intro");
        mock.force_clean_diff();

        let dir = tempfile::tempdir().unwrap();
        mock.clone_repo("url", dir.path()).unwrap();
        fs::write(dir.path().join("release-notes.md"), "changed").unwrap();
        assert!(!mock.has_staged_changes(dir.path()).unwrap());
    }

    #[test]
    fn test_operations_are_journaled_in_order() {
        let mock = MockRepository::new();
        let dir = tempfile::tempdir().unwrap();
        mock.clone_repo("url", dir.path()).unwrap();
        mock.set_identity(dir.path(), "Bot", "bot@example.com").unwrap();
        mock.commit(dir.path(), "docs: update release notes").unwrap();
        mock.push(dir.path(), "main").unwrap();

        assert_eq!(
            mock.operations(),
            vec![
                "clone url",
                "identity Bot <bot@example.com>",
                "commit docs: update release notes",
                "push main",
            ]
        );
    }
}
