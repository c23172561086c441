use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::oracle::{RevisionOracle, RevisionTag};

/// Filesystem-backed revision oracle.
///
/// Source paths are resolved relative to a root directory. The tag is
/// derived from the file's length and modification time, so it changes
/// whenever the file's content is rewritten.
pub struct FsRevisionOracle {
  root: PathBuf,
}

impl FsRevisionOracle {
  /// Create a new oracle rooted at the given directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory the oracle resolves source paths under.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn resolve(&self, source_path: &str) -> PathBuf {
    self.root.join(source_path.trim_start_matches('/'))
  }
}

impl RevisionOracle for FsRevisionOracle {
  fn revision_tag(&self, source_path: &str) -> Option<RevisionTag> {
    let metadata = std::fs::metadata(self.resolve(source_path)).ok()?;
    if !metadata.is_file() {
      return None;
    }

    let modified = metadata
      .modified()
      .ok()?
      .duration_since(UNIX_EPOCH)
      .ok()?;

    Some(RevisionTag::new(format!(
      "{}-{}",
      metadata.len(),
      modified.as_nanos()
    )))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_source_has_no_tag() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let oracle = FsRevisionOracle::new(temp_dir.path());

    assert_eq!(oracle.revision_tag("scripts/init.ss"), None);
  }

  #[test]
  fn test_tag_is_stable_until_content_changes() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let source = temp_dir.path().join("init.ss");
    std::fs::write(&source, "let x = 1").expect("failed to write source");

    let oracle = FsRevisionOracle::new(temp_dir.path());

    let first = oracle.revision_tag("init.ss").expect("expected a tag");
    let second = oracle.revision_tag("init.ss").expect("expected a tag");
    assert_eq!(first, second);

    std::fs::write(&source, "let x = 1; let y = 2").expect("failed to rewrite source");
    let third = oracle.revision_tag("init.ss").expect("expected a tag");
    assert_ne!(first, third);
  }

  #[test]
  fn test_directory_is_not_a_source() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::create_dir(temp_dir.path().join("scripts")).expect("failed to create dir");

    let oracle = FsRevisionOracle::new(temp_dir.path());

    assert_eq!(oracle.revision_tag("scripts"), None);
  }

  #[test]
  fn test_leading_slash_resolves_under_root() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(temp_dir.path().join("init.ss"), "noop").expect("failed to write source");

    let oracle = FsRevisionOracle::new(temp_dir.path());

    assert!(oracle.revision_tag("/init.ss").is_some());
  }
}
