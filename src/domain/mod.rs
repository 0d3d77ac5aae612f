//! Domain logic - pure rules independent of any remote service

pub mod tag;
pub mod version;

pub use tag::{filter_release_tags, Tag, TagCommit};
pub use version::ReleaseTag;
