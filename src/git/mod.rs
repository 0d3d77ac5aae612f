//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations
//! the publisher needs, allowing for multiple implementations including a
//! real git2-backed client and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [RepositoryClient] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Client]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: a mock implementation for testing
//!
//! Publishing code should depend on the trait rather than a concrete
//! implementation so that the publish state machine can be exercised
//! without a network or a git binary.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Client;

use crate::error::Result;
use std::path::Path;

/// Operations the publisher performs against a working copy of the
/// target repository.
///
/// Every method takes the working copy's directory; implementations hold
/// no per-repository state. All implementors must be `Send + Sync`.
pub trait RepositoryClient: Send + Sync {
    /// Clone `url` (default branch, shallow) into `into`.
    fn clone_repo(&self, url: &str, into: &Path) -> Result<()>;

    /// Set the commit author identity for the working copy.
    fn set_identity(&self, workdir: &Path, name: &str, email: &str) -> Result<()>;

    /// Create a branch at HEAD and switch to it.
    fn create_branch(&self, workdir: &Path, branch: &str) -> Result<()>;

    /// Stage one file, given as a path relative to the working copy root.
    fn stage_file(&self, workdir: &Path, file_path: &str) -> Result<()>;

    /// True when the index differs from HEAD.
    ///
    /// The publisher uses this as its no-op guard: nothing staged means
    /// nothing to commit, push, or open a pull request for.
    fn has_staged_changes(&self, workdir: &Path) -> Result<bool>;

    /// Commit the staged changes with the configured identity.
    fn commit(&self, workdir: &Path, message: &str) -> Result<()>;

    /// Push `branch` to the origin remote.
    fn push(&self, workdir: &Path, branch: &str) -> Result<()>;
}
