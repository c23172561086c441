use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use verbena_store::Expiry;

/// How a scripting runtime instance is shared across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstancingPolicy {
  /// Every request gets a freshly constructed runtime; nothing is cached.
  PerCall,
  /// One runtime per instance name, shared by all requests in the process.
  Single,
  /// One runtime per instance name per logical caller session.
  PerSession,
}

impl fmt::Display for InstancingPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      InstancingPolicy::PerCall => "per_call",
      InstancingPolicy::Single => "single",
      InstancingPolicy::PerSession => "per_session",
    };
    f.write_str(name)
  }
}

/// Per-request descriptor of how a runtime instance should be obtained.
///
/// Resolved by the host's configuration layer from request metadata;
/// immutable for the duration of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSettings {
  /// Instance identifier. Required (non-empty) for the caching policies.
  #[serde(default)]
  pub instance_name: String,

  pub instance_mode: InstancingPolicy,

  /// Logical path of the script used to prime a new runtime. When set, its
  /// revision tag participates in cache invalidation.
  #[serde(default)]
  pub initialization_source_path: Option<String>,

  /// Wall-clock deadline for a `Single` cache entry.
  #[serde(default)]
  pub absolute_expiration: Option<DateTime<Utc>>,

  /// Idle timeout for a `Single` cache entry, reset on every access.
  #[serde(default)]
  pub sliding_expiration: Option<Duration>,
}

impl InstanceSettings {
  pub fn per_call() -> Self {
    Self {
      instance_name: String::new(),
      instance_mode: InstancingPolicy::PerCall,
      initialization_source_path: None,
      absolute_expiration: None,
      sliding_expiration: None,
    }
  }

  pub fn single(instance_name: impl Into<String>) -> Self {
    Self {
      instance_name: instance_name.into(),
      instance_mode: InstancingPolicy::Single,
      ..Self::per_call()
    }
  }

  pub fn per_session(instance_name: impl Into<String>) -> Self {
    Self {
      instance_name: instance_name.into(),
      instance_mode: InstancingPolicy::PerSession,
      ..Self::per_call()
    }
  }

  pub fn with_initialization_source(mut self, path: impl Into<String>) -> Self {
    self.initialization_source_path = Some(path.into());
    self
  }

  pub fn with_absolute_expiration(mut self, at: DateTime<Utc>) -> Self {
    self.absolute_expiration = Some(at);
    self
  }

  pub fn with_sliding_expiration(mut self, idle: Duration) -> Self {
    self.sliding_expiration = Some(idle);
    self
  }

  /// Expiration limits for process-store entries made from these settings.
  pub(crate) fn expiry(&self) -> Expiry {
    Expiry {
      absolute: self.absolute_expiration,
      sliding: self.sliding_expiration,
    }
  }
}
