use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque token for the current content version of a script source.
///
/// The cache only ever compares tags for equality: equal tags mean the
/// source has not changed since the tag was last observed. How a tag is
/// derived (hash, mtime, repository version counter) is the oracle's
/// business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionTag(String);

impl RevisionTag {
  pub fn new(tag: impl Into<String>) -> Self {
    Self(tag.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for RevisionTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for RevisionTag {
  fn from(tag: &str) -> Self {
    Self(tag.to_string())
  }
}

impl From<String> for RevisionTag {
  fn from(tag: String) -> Self {
    Self(tag)
  }
}

/// Trait for resolving the current revision tag of a logical source path.
///
/// Returning `None` means the source does not currently exist. The cache
/// treats that as "no invalidation signal available", never as an error.
pub trait RevisionOracle: Send + Sync {
  /// Get the current revision tag for a source path, if the source exists.
  fn revision_tag(&self, source_path: &str) -> Option<RevisionTag>;
}
