use std::fmt;
use std::sync::Arc;

use verbena_revision::RevisionTag;

use crate::settings::InstanceSettings;

/// Constructs scripting runtime instances.
///
/// The lifecycle cache never looks inside an engine; it only stores and
/// hands out `Arc` handles. Construction failures propagate to the caller
/// unchanged and leave nothing behind in the cache.
pub trait EngineFactory: Send + Sync {
  /// The runtime handle type. Shared by concurrent requests under the
  /// caching policies; its internal thread-safety is its own concern.
  type Engine: Send + Sync;

  type Error: std::error::Error + Send + Sync + 'static;

  /// Construct a new runtime for the given settings.
  fn create(&self, settings: &InstanceSettings) -> Result<Self::Engine, Self::Error>;
}

/// A cached engine handle plus its freshness flag.
///
/// `newly_created` tells the host whether to run the instance's one-time
/// initialization script before executing the request's script body.
#[derive(Debug)]
pub struct EngineLease<E> {
  pub engine: Arc<E>,
  pub newly_created: bool,
}

/// Value type for the backing stores.
///
/// The engine and its captured revision tag live under two separate keys
/// of the same store; the pairing is intentionally not atomic. A reader
/// that sees an engine with no tag treats it as "no invalidation signal"
/// and keeps the engine.
pub enum CacheSlot<E> {
  Engine(Arc<E>),
  Revision(RevisionTag),
}

impl<E> Clone for CacheSlot<E> {
  fn clone(&self) -> Self {
    match self {
      CacheSlot::Engine(engine) => CacheSlot::Engine(engine.clone()),
      CacheSlot::Revision(tag) => CacheSlot::Revision(tag.clone()),
    }
  }
}

impl<E> fmt::Debug for CacheSlot<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CacheSlot::Engine(_) => f.write_str("CacheSlot::Engine(..)"),
      CacheSlot::Revision(tag) => write!(f, "CacheSlot::Revision({})", tag),
    }
  }
}
