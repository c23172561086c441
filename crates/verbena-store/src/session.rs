use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::StoreError;

/// Key/value storage owned by one logical caller session.
///
/// No expiration of its own; everything it holds is dropped when the
/// session ends.
#[derive(Debug)]
pub struct Session<V> {
  values: RwLock<HashMap<String, V>>,
}

impl<V: Clone> Session<V> {
  pub fn new() -> Self {
    Self {
      values: RwLock::new(HashMap::new()),
    }
  }

  /// Get a value by key.
  pub fn try_get(&self, key: &str) -> Option<V> {
    let values = self.values.read().unwrap();
    values.get(key).cloned()
  }

  /// Unconditionally set a value.
  pub fn insert(&self, key: &str, value: V) {
    let mut values = self.values.write().unwrap();
    values.insert(key.to_string(), value);
  }

  /// Remove a value. Returns true iff the key was present.
  pub fn remove(&self, key: &str) -> bool {
    let mut values = self.values.write().unwrap();
    values.remove(key).is_some()
  }

  pub fn len(&self) -> usize {
    self.values.read().unwrap().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<V: Clone> Default for Session<V> {
  fn default() -> Self {
    Self::new()
  }
}

/// Accessor for the session bound to the current request, if any.
///
/// How a host binds sessions to requests (cookie, connection, thread) is
/// its own concern; the cache only asks "is there one right now?".
pub trait SessionProvider<V>: Send + Sync {
  fn current(&self) -> Option<Arc<Session<V>>>;
}

/// Session-scoped store facade.
///
/// Every operation requires an active session; [`current`](Self::current)
/// fails with [`StoreError::NoActiveSession`] when the provider has none,
/// and that failure is fatal to the calling request.
pub struct SessionStore<V> {
  provider: Arc<dyn SessionProvider<V>>,
}

impl<V: Clone> SessionStore<V> {
  pub fn new(provider: Arc<dyn SessionProvider<V>>) -> Self {
    Self { provider }
  }

  /// Resolve the session for the current request.
  pub fn current(&self) -> Result<Arc<Session<V>>, StoreError> {
    self.provider.current().ok_or(StoreError::NoActiveSession)
  }
}

/// A provider holding one explicitly attached session.
///
/// Useful for tests and for single-session hosts; request pipelines attach
/// the caller's session before dispatch and detach it after.
pub struct StaticSessionProvider<V> {
  session: RwLock<Option<Arc<Session<V>>>>,
}

impl<V: Clone + Send + Sync> StaticSessionProvider<V> {
  /// Create a provider with no active session.
  pub fn new() -> Self {
    Self {
      session: RwLock::new(None),
    }
  }

  /// Start a fresh session and make it current.
  pub fn begin(&self) -> Arc<Session<V>> {
    let session = Arc::new(Session::new());
    self.attach(session.clone());
    session
  }

  /// Make an existing session current.
  pub fn attach(&self, session: Arc<Session<V>>) {
    let mut current = self.session.write().unwrap();
    *current = Some(session);
  }

  /// Detach the current session. Returns true iff one was active.
  pub fn detach(&self) -> bool {
    let mut current = self.session.write().unwrap();
    current.take().is_some()
  }
}

impl<V: Clone + Send + Sync> Default for StaticSessionProvider<V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<V: Clone + Send + Sync> SessionProvider<V> for StaticSessionProvider<V> {
  fn current(&self) -> Option<Arc<Session<V>>> {
    self.session.read().unwrap().clone()
  }
}

/// Registry of live sessions keyed by an external session id.
///
/// Hosts that identify callers by session id use this to look up (or lazily
/// create) the session to attach for a request, and to drop everything a
/// session owns when it ends.
pub struct SessionRegistry<V> {
  sessions: RwLock<HashMap<String, Arc<Session<V>>>>,
}

impl<V: Clone> SessionRegistry<V> {
  pub fn new() -> Self {
    Self {
      sessions: RwLock::new(HashMap::new()),
    }
  }

  /// Get the session for an id, creating it on first use.
  pub fn session(&self, session_id: &str) -> Arc<Session<V>> {
    {
      let sessions = self.sessions.read().unwrap();
      if let Some(session) = sessions.get(session_id) {
        return session.clone();
      }
    }

    let mut sessions = self.sessions.write().unwrap();
    sessions
      .entry(session_id.to_string())
      .or_insert_with(|| Arc::new(Session::new()))
      .clone()
  }

  /// End a session, dropping everything it owns. Returns true iff the id
  /// was known.
  pub fn end_session(&self, session_id: &str) -> bool {
    let mut sessions = self.sessions.write().unwrap();
    let ended = sessions.remove(session_id).is_some();
    if ended {
      debug!(session_id = %session_id, "session_ended");
    }
    ended
  }

  pub fn len(&self) -> usize {
    self.sessions.read().unwrap().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<V: Clone> Default for SessionRegistry<V> {
  fn default() -> Self {
    Self::new()
  }
}
