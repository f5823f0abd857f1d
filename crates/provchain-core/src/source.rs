//! Content store capability: fetch bytes by content address.
//!
//! The core never reaches a network or filesystem itself; implementations
//! live in adapter crates and are injected where needed. Calls are blocking
//! with no implied retry policy; retry/backoff belongs to the adapters.

use bytes::Bytes;

use crate::error::FetchError;
use crate::reference::ContentId;

/// Fetch bytes by content id.
///
/// The core needs no write path; adapters may add one as an inherent
/// method.
pub trait ContentStore {
    /// Fetch the bytes named by `id`.
    fn fetch(&self, id: &ContentId) -> Result<Bytes, FetchError>;
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn fetch(&self, id: &ContentId) -> Result<Bytes, FetchError> {
        (**self).fetch(id)
    }
}
