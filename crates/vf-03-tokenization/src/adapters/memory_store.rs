//! In-memory content store.

use crate::domain::ContentId;
use crate::ports::outbound::{ContentStore, StoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Content-addressed store kept in a map.
///
/// Identical bytes are kept once. Uploads can be switched off to simulate an
/// unreachable pinning service.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    objects: RwLock<HashMap<ContentId, Vec<u8>>>,
    pins: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `pin` fail with `Unavailable` until reset.
    pub fn fail_uploads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `pin` calls, duplicates included.
    pub fn pin_count(&self) -> usize {
        self.pins.load(Ordering::SeqCst)
    }

    /// Number of distinct objects held.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.objects.read().contains_key(id)
    }

    /// Overwrite an object without rehashing. Test hook for corrupted storage.
    pub fn put_raw(&self, id: ContentId, bytes: Vec<u8>) {
        self.objects.write().insert(id, bytes);
    }

    /// Drop an object, as an unpin or a wiped backend would.
    pub fn remove(&self, id: &ContentId) -> Option<Vec<u8>> {
        self.objects.write().remove(id)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "uploads disabled".to_string(),
            });
        }
        let id = ContentId::for_bytes(bytes);
        self.objects
            .write()
            .entry(id)
            .or_insert_with(|| bytes.to_vec());
        self.pins.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.objects.read().get(id).cloned())
    }

    async fn contains(&self, id: &ContentId) -> Result<bool, StoreError> {
        Ok(self.objects.read().contains_key(id))
    }
}
