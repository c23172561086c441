//! Engine instance lifecycle cache.
//!
//! Staleness is purely pull-based: an entry only moves between absent,
//! valid, and stale inside a `get_or_create` call. There is no background
//! invalidation.

use std::sync::Arc;

use tracing::{debug, info};
use verbena_revision::{RevisionOracle, RevisionTag};
use verbena_store::{
  Expiry, InsertOutcome, ProcessStore, Session, SessionProvider, SessionStore,
};

use crate::engine::{CacheSlot, EngineFactory, EngineLease};
use crate::error::LifecycleError;
use crate::key::InstanceKey;
use crate::settings::{InstanceSettings, InstancingPolicy};

/// The store selected for one request, dispatched from the instancing
/// policy in exactly one place. Adding a policy means adding a variant
/// here, not another `if` chain in a caller.
enum Backing<'a, E> {
  Process(&'a ProcessStore<CacheSlot<E>>),
  Session(Arc<Session<CacheSlot<E>>>),
}

impl<E> Backing<'_, E> {
  fn try_get(&self, key: &str) -> Option<CacheSlot<E>> {
    match self {
      Backing::Process(store) => store.try_get(key),
      Backing::Session(session) => session.try_get(key),
    }
  }

  fn insert(&self, key: &str, slot: CacheSlot<E>, expiry: Expiry) -> InsertOutcome<CacheSlot<E>> {
    match self {
      Backing::Process(store) => store.insert(key, slot, expiry),
      Backing::Session(session) => {
        // Session entries never expire on their own; lifetime is the
        // session's, and a session is effectively single-writer.
        session.insert(key, slot);
        InsertOutcome::Inserted
      }
    }
  }

  fn remove(&self, key: &str) -> bool {
    match self {
      Backing::Process(store) => store.remove(key),
      Backing::Session(session) => session.remove(key),
    }
  }
}

/// Decides whether a request gets a fresh scripting runtime or a cached
/// one, and keeps cached runtimes honest against their initialization
/// source.
///
/// Callers receive shared handles: under the caching policies, concurrent
/// requests may hold the same engine simultaneously. The manager
/// guarantees identity stability (the same handle until eviction), not
/// exclusive use.
pub struct LifecycleManager<F: EngineFactory> {
  factory: F,
  oracle: Arc<dyn RevisionOracle>,
  process: ProcessStore<CacheSlot<F::Engine>>,
  sessions: SessionStore<CacheSlot<F::Engine>>,
}

impl<F: EngineFactory> LifecycleManager<F> {
  pub fn new(
    factory: F,
    oracle: Arc<dyn RevisionOracle>,
    sessions: Arc<dyn SessionProvider<CacheSlot<F::Engine>>>,
  ) -> Self {
    Self {
      factory,
      oracle,
      process: ProcessStore::new(),
      sessions: SessionStore::new(sessions),
    }
  }

  /// Get the process-wide store backing the `Single` policy.
  pub fn process_store(&self) -> &ProcessStore<CacheSlot<F::Engine>> {
    &self.process
  }

  /// Get the engine factory.
  pub fn factory(&self) -> &F {
    &self.factory
  }

  /// Return a cached engine for the settings, constructing one if no valid
  /// entry exists.
  pub fn get_or_create(
    &self,
    settings: &InstanceSettings,
  ) -> Result<EngineLease<F::Engine>, LifecycleError<F::Error>> {
    match settings.instance_mode {
      InstancingPolicy::PerCall => {
        let engine = Arc::new(self.factory.create(settings).map_err(LifecycleError::Engine)?);
        debug!(policy = %InstancingPolicy::PerCall, "engine_created");
        Ok(EngineLease {
          engine,
          newly_created: true,
        })
      }
      InstancingPolicy::Single => {
        let key = self.instance_key(settings)?;
        self.cached_lease(settings, &key, Backing::Process(&self.process))
      }
      InstancingPolicy::PerSession => {
        let key = self.instance_key(settings)?;
        let session = self.sessions.current()?;
        self.cached_lease(settings, &key, Backing::Session(session))
      }
    }
  }

  /// Evict a named instance from the store backing the given policy.
  ///
  /// Returns true iff an engine entry was present. `PerCall` never stores
  /// anything, so removal is a no-op reporting false.
  pub fn remove(
    &self,
    instance_name: &str,
    mode: InstancingPolicy,
  ) -> Result<bool, LifecycleError<F::Error>> {
    if mode == InstancingPolicy::PerCall {
      return Ok(false);
    }

    let key = InstanceKey::new(instance_name)
      .ok_or(LifecycleError::MissingInstanceName { policy: mode })?;

    let backing = if mode == InstancingPolicy::Single {
      Backing::Process(&self.process)
    } else {
      Backing::Session(self.sessions.current()?)
    };

    backing.remove(&key.revision_key());
    let removed = backing.remove(&key.engine_key());
    if removed {
      info!(instance = %instance_name, policy = %mode, "engine_removed");
    }
    Ok(removed)
  }

  /// The shared get-or-create protocol for the caching policies.
  fn cached_lease(
    &self,
    settings: &InstanceSettings,
    key: &InstanceKey,
    backing: Backing<'_, F::Engine>,
  ) -> Result<EngineLease<F::Engine>, LifecycleError<F::Error>> {
    let engine_key = key.engine_key();
    let revision_key = key.revision_key();

    let current_tag = settings
      .initialization_source_path
      .as_deref()
      .and_then(|path| self.oracle.revision_tag(path));

    self.evict_if_stale(key, &backing, &revision_key, &engine_key, current_tag.as_ref());

    if let Some(CacheSlot::Engine(engine)) = backing.try_get(&engine_key) {
      debug!(instance = %key.name(), "engine_reused");
      return Ok(EngineLease {
        engine,
        newly_created: false,
      });
    }

    let engine = Arc::new(self.factory.create(settings).map_err(LifecycleError::Engine)?);
    let expiry = settings.expiry();

    if let InsertOutcome::Existing(CacheSlot::Engine(winner)) =
      backing.insert(&engine_key, CacheSlot::Engine(engine.clone()), expiry)
    {
      // A concurrent request registered its engine first. Ours is dropped
      // here; the winner runs the one-time initialization.
      debug!(instance = %key.name(), "engine_registration_lost");
      return Ok(EngineLease {
        engine: winner,
        newly_created: false,
      });
    }

    if let Some(current) = current_tag {
      backing.insert(&revision_key, CacheSlot::Revision(current), expiry);
    }

    info!(
      instance = %key.name(),
      policy = %settings.instance_mode,
      "engine_created"
    );
    Ok(EngineLease {
      engine,
      newly_created: true,
    })
  }

  /// Evict a cached engine whose initialization source has changed.
  ///
  /// Eviction needs both a stored tag and a current tag: a missing stored
  /// tag or an absent source means "no invalidation signal", which keeps
  /// the engine.
  fn evict_if_stale(
    &self,
    key: &InstanceKey,
    backing: &Backing<'_, F::Engine>,
    revision_key: &str,
    engine_key: &str,
    current_tag: Option<&RevisionTag>,
  ) {
    if let Some(current) = current_tag
      && let Some(CacheSlot::Revision(stored)) = backing.try_get(revision_key)
      && stored != *current
    {
      // Tag first, then engine: a racing reader sees a missing tag (and
      // keeps the engine) rather than a stale engine with a fresh tag.
      backing.remove(revision_key);
      backing.remove(engine_key);
      info!(
        instance = %key.name(),
        stored_tag = %stored,
        current_tag = %current,
        "engine_evicted"
      );
    }
  }

  fn instance_key(
    &self,
    settings: &InstanceSettings,
  ) -> Result<InstanceKey, LifecycleError<F::Error>> {
    InstanceKey::new(&settings.instance_name).ok_or(LifecycleError::MissingInstanceName {
      policy: settings.instance_mode,
    })
  }
}
