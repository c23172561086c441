//! Verbena Lifecycle
//!
//! This crate decides, for each incoming request, whether to construct a
//! brand-new scripting runtime, reuse one tied to a named instance, or
//! reuse one tied to the caller's session — and invalidates a reused
//! runtime when the script source used to prime it has changed.
//!
//! The entry point is [`LifecycleManager`]: `get_or_create` resolves an
//! [`InstanceSettings`] descriptor into an [`EngineLease`], and `remove`
//! backs host-level "clear cached instance" commands. Runtime construction
//! itself is delegated to an [`EngineFactory`] collaborator; revision
//! tracking to a [`RevisionOracle`](verbena_revision::RevisionOracle).

mod engine;
mod error;
mod key;
mod manager;
mod settings;

pub use engine::{CacheSlot, EngineFactory, EngineLease};
pub use error::LifecycleError;
pub use key::InstanceKey;
pub use manager::LifecycleManager;
pub use settings::{InstanceSettings, InstancingPolicy};
