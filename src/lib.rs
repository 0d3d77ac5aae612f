pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod gitlab;
pub mod merge;
pub mod publish;
pub mod runlog;
pub mod transform;
pub mod workflow;

pub use error::{Result, SyncError};
