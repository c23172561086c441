use std::collections::HashMap;
use std::sync::RwLock;

use crate::oracle::{RevisionOracle, RevisionTag};

/// In-memory revision oracle.
///
/// Tags are set explicitly per source path. Suitable for testing and for
/// hosts that push revision updates from a content repository.
#[derive(Debug, Default)]
pub struct InMemoryRevisionOracle {
  tags: RwLock<HashMap<String, RevisionTag>>,
}

impl InMemoryRevisionOracle {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the current tag for a source path.
  pub fn set(&self, source_path: impl Into<String>, tag: impl Into<RevisionTag>) {
    let mut tags = self.tags.write().unwrap();
    tags.insert(source_path.into(), tag.into());
  }

  /// Forget the tag for a source path, as if the source were deleted.
  pub fn clear(&self, source_path: &str) -> bool {
    let mut tags = self.tags.write().unwrap();
    tags.remove(source_path).is_some()
  }
}

impl RevisionOracle for InMemoryRevisionOracle {
  fn revision_tag(&self, source_path: &str) -> Option<RevisionTag> {
    let tags = self.tags.read().unwrap();
    tags.get(source_path).cloned()
  }
}
