//! Verbena Store
//!
//! This crate provides the two storage backends for cached scripting
//! runtimes:
//!
//! - [`ProcessStore`] — process-wide, shared by every concurrent request,
//!   with per-entry absolute and sliding expiration. Backs the "single"
//!   instancing policy.
//! - [`Session`] / [`SessionStore`] — scoped to one logical caller session,
//!   no expiration of its own. Backs the "per session" instancing policy.
//!
//! Both stores are plain key/value maps; the lifecycle layer decides what
//! goes in them and when entries are evicted.

mod process;
mod session;

pub use process::{Expiry, InsertOutcome, ProcessStore};
pub use session::{Session, SessionProvider, SessionRegistry, SessionStore, StaticSessionProvider};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
  /// No session context is available for the current request.
  #[error("no active session for the current request")]
  NoActiveSession,
}
