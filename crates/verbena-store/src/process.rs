use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Expiration limits for a [`ProcessStore`] entry.
///
/// `absolute` is a wall-clock deadline; `sliding` is an idle timeout whose
/// deadline is pushed out on every successful get. If both are set the
/// entry expires at whichever limit is reached first. If neither is set
/// the entry lives until explicitly removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expiry {
  pub absolute: Option<DateTime<Utc>>,
  pub sliding: Option<Duration>,
}

impl Expiry {
  /// No expiration limits.
  pub fn none() -> Self {
    Self::default()
  }
}

/// Outcome of a [`ProcessStore::insert`].
#[derive(Debug)]
pub enum InsertOutcome<V> {
  /// The value was inserted; no live entry existed for the key.
  Inserted,
  /// A live entry already existed. The incoming value was discarded and
  /// the stored value is returned.
  Existing(V),
}

struct Entry<V> {
  value: V,
  absolute: Option<DateTime<Utc>>,
  sliding: Option<Duration>,
  idle_deadline: Option<Instant>,
}

impl<V> Entry<V> {
  fn new(value: V, expiry: Expiry) -> Self {
    Self {
      value,
      absolute: expiry.absolute,
      sliding: expiry.sliding,
      idle_deadline: expiry.sliding.map(|idle| Instant::now() + idle),
    }
  }

  /// An expired entry is logically gone even before it is physically purged.
  fn expired(&self) -> bool {
    if let Some(at) = self.absolute
      && Utc::now() >= at
    {
      return true;
    }
    if let Some(deadline) = self.idle_deadline
      && Instant::now() >= deadline
    {
      return true;
    }
    false
  }

  fn touch(&mut self) {
    if let Some(idle) = self.sliding {
      self.idle_deadline = Some(Instant::now() + idle);
    }
  }
}

/// Process-wide key/value store with per-entry expiration.
///
/// Shared mutable state across every concurrent request in the host
/// process. The one strict guarantee is that [`insert`](Self::insert) is an
/// atomic insert-if-absent: when two requests race to register a value
/// under the same key, exactly one wins and the loser gets the winner's
/// value back.
pub struct ProcessStore<V> {
  entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V: Clone> ProcessStore<V> {
  pub fn new() -> Self {
    Self {
      entries: RwLock::new(HashMap::new()),
    }
  }

  /// Get a live value by key.
  ///
  /// Expired entries report `None`. A successful get on an entry with a
  /// sliding limit pushes its idle deadline out.
  pub fn try_get(&self, key: &str) -> Option<V> {
    // Fast path under the read lock; sliding entries need the write lock
    // to move their deadline.
    {
      let entries = self.entries.read().unwrap();
      match entries.get(key) {
        Some(entry) if entry.expired() => return None,
        Some(entry) if entry.sliding.is_none() => return Some(entry.value.clone()),
        Some(_) => {}
        None => return None,
      }
    }

    let mut entries = self.entries.write().unwrap();
    let live = match entries.get_mut(key) {
      Some(entry) if !entry.expired() => {
        entry.touch();
        Some(entry.value.clone())
      }
      _ => None,
    };
    if live.is_none() {
      // Lost to expiry (or removal) between the locks; purge if needed.
      entries.remove(key);
    }
    live
  }

  /// Insert a value if no live entry exists for the key.
  ///
  /// An expired entry counts as absent and is replaced.
  pub fn insert(&self, key: &str, value: V, expiry: Expiry) -> InsertOutcome<V> {
    let mut entries = self.entries.write().unwrap();
    if let Some(existing) = entries.get(key)
      && !existing.expired()
    {
      debug!(key = %key, "insert_lost_to_existing_entry");
      return InsertOutcome::Existing(existing.value.clone());
    }
    entries.insert(key.to_string(), Entry::new(value, expiry));
    InsertOutcome::Inserted
  }

  /// Remove an entry. Returns true iff a live entry was removed.
  pub fn remove(&self, key: &str) -> bool {
    let mut entries = self.entries.write().unwrap();
    match entries.remove(key) {
      Some(entry) => !entry.expired(),
      None => false,
    }
  }

  /// Number of physically present entries, expired ones included.
  pub fn len(&self) -> usize {
    self.entries.read().unwrap().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<V: Clone> Default for ProcessStore<V> {
  fn default() -> Self {
    Self::new()
  }
}
