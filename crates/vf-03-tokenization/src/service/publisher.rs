//! Content-addressed publisher.
//!
//! Wraps a `ContentStore` with an upload deadline, an identifier check and a
//! bounded record of identifiers recently confirmed in this process. The
//! identifier is always computed locally first; the store must agree with it.

use crate::domain::ContentId;
use crate::error::{PublishError, PublishResult};
use crate::metrics;
use crate::ports::outbound::ContentStore;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Confirmed identifiers remembered per publisher.
pub const CONFIRMED_CAPACITY: usize = 1024;

pub struct ContentAddressedPublisher<S: ContentStore> {
    store: Arc<S>,
    timeout: Duration,
    confirmed: Mutex<LruCache<ContentId, ()>>,
}

impl<S: ContentStore> ContentAddressedPublisher<S> {
    pub fn new(store: Arc<S>, timeout: Duration) -> Self {
        Self::with_capacity(store, timeout, CONFIRMED_CAPACITY)
    }

    /// Remember at most `capacity` confirmed identifiers (at least one).
    pub fn with_capacity(store: Arc<S>, timeout: Duration, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            timeout,
            confirmed: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn is_confirmed(&self, id: &ContentId) -> bool {
        self.confirmed.lock().contains(id)
    }

    /// A remembered identifier is only reused while the store still holds it.
    async fn still_pinned(&self, id: &ContentId) -> bool {
        if self.confirmed.lock().get(id).is_none() {
            return false;
        }
        match tokio::time::timeout(self.timeout, self.store.contains(id)).await {
            Ok(Ok(true)) => true,
            _ => {
                self.confirmed.lock().pop(id);
                warn!(cid = %id, "Confirmed content no longer held by the store, republishing");
                false
            }
        }
    }

    /// Pin `bytes` and return their identifier.
    ///
    /// Publishing the same bytes again yields the same identifier. A recently
    /// confirmed identifier is not uploaded again as long as the store still
    /// reports holding it.
    pub async fn publish(&self, bytes: &[u8]) -> PublishResult<ContentId> {
        let expected = ContentId::for_bytes(bytes);
        if self.still_pinned(&expected).await {
            metrics::record_publish_reuse();
            debug!(cid = %expected, "Content already confirmed");
            return Ok(expected);
        }

        let returned = match tokio::time::timeout(self.timeout, self.store.pin(bytes)).await {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                metrics::record_publish("failed");
                warn!(cid = %expected, error = %e, "Upload failed");
                return Err(PublishError::UploadFailed {
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                metrics::record_publish("timeout");
                warn!(cid = %expected, timeout_secs = self.timeout.as_secs(), "Upload timed out");
                return Err(PublishError::Timeout {
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if returned != expected {
            metrics::record_publish("mismatch");
            warn!(expected = %expected, returned = %returned, "Store returned a different CID");
            return Err(PublishError::CidMismatch { expected, returned });
        }

        self.confirmed.lock().put(expected, ());
        metrics::record_publish("pinned");
        debug!(cid = %expected, bytes = bytes.len(), "Content published");
        Ok(expected)
    }

    /// Publish the compact JSON serialization of `value`.
    pub async fn publish_json<T: Serialize + Sync>(&self, value: &T) -> PublishResult<ContentId> {
        let bytes = serde_json::to_vec(value).map_err(|e| PublishError::Serialization {
            reason: e.to_string(),
        })?;
        self.publish(&bytes).await
    }

    /// Read content back and check it still hashes to `id`.
    pub async fn fetch(&self, id: &ContentId) -> PublishResult<Vec<u8>> {
        let bytes = match tokio::time::timeout(self.timeout, self.store.get(id)).await {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => return Err(PublishError::NotFound { cid: *id }),
            Ok(Err(e)) => {
                return Err(PublishError::UploadFailed {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(PublishError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !id.matches(&bytes) {
            return Err(PublishError::IntegrityMismatch { cid: *id });
        }
        Ok(bytes)
    }
}
