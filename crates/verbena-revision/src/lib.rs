//! Verbena Revision
//!
//! This crate provides the revision-tracking contract used by the engine
//! lifecycle cache to decide whether a cached scripting runtime is still
//! primed with the current version of its initialization script.
//!
//! The [`RevisionOracle`] trait answers one question: "what is the current
//! revision tag of this source path?" Tags are opaque — equal tags mean the
//! content has not changed since last observed, nothing more.

mod fs;
mod memory;
mod oracle;

pub use fs::FsRevisionOracle;
pub use memory::InMemoryRevisionOracle;
pub use oracle::{RevisionOracle, RevisionTag};
