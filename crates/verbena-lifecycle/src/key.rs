/// Deterministic store-key derivation for a named instance.
///
/// Each instance owns two slots in its backing store: one for the engine
/// handle and one for the revision tag captured when the engine was
/// primed. The reserved prefixes keep the two key spaces disjoint for
/// every possible instance name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceKey {
  name: String,
}

const ENGINE_PREFIX: &str = "engine:";
const REVISION_PREFIX: &str = "revision:";

impl InstanceKey {
  /// Create a key for an instance name. Empty names are rejected.
  pub fn new(instance_name: &str) -> Option<Self> {
    if instance_name.is_empty() {
      return None;
    }
    Some(Self {
      name: instance_name.to_string(),
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Store key for the engine slot.
  pub fn engine_key(&self) -> String {
    format!("{}{}", ENGINE_PREFIX, self.name)
  }

  /// Store key for the companion revision-tag slot.
  pub fn revision_key(&self) -> String {
    format!("{}{}", REVISION_PREFIX, self.name)
  }
}
