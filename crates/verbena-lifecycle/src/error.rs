use verbena_store::StoreError;

use crate::settings::InstancingPolicy;

/// Errors that can occur while resolving an engine lease.
///
/// All of these are local to the calling request; nothing is retried
/// internally and no cross-request error state exists.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError<E>
where
  E: std::error::Error + 'static,
{
  /// A caching policy was requested without an instance name.
  #[error("an instance name is required for {policy} instancing")]
  MissingInstanceName { policy: InstancingPolicy },

  /// The backing store refused the operation (no active session).
  #[error(transparent)]
  Store(#[from] StoreError),

  /// Engine construction failed; the factory's error passes through
  /// unchanged.
  #[error(transparent)]
  Engine(E),
}
