use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::CacheError;

use super::{CachedSnapshot, PermissionCache};

/// Process-local slot; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryPermissionCache {
    slot: Mutex<Option<CachedSnapshot>>,
}

impl MemoryPermissionCache {
    pub fn new() -> Self { Self::default() }

    pub fn seeded(snapshot: CachedSnapshot) -> Self { Self { slot: Mutex::new(Some(snapshot)) } }
}

#[async_trait]
impl PermissionCache for MemoryPermissionCache {
    async fn read(&self) -> Option<CachedSnapshot> { self.slot.lock().clone() }

    async fn write(&self, snapshot: &CachedSnapshot) -> Result<(), CacheError> {
        *self.slot.lock() = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.slot.lock().take();
        Ok(())
    }
}
