use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::CacheError;

use super::{CachedSnapshot, PermissionCache};

/// JSON file slot. Writes go to a sibling temp file and are renamed into place
/// so a crash mid-write never leaves a torn snapshot behind.
#[derive(Debug, Clone)]
pub struct FilePermissionCache {
    path: PathBuf,
}

impl FilePermissionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    fn tmp_path(&self) -> PathBuf { self.path.with_extension("json.tmp") }
}

#[async_trait]
impl PermissionCache for FilePermissionCache {
    async fn read(&self) -> Option<CachedSnapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(target: "campusgate::cache", "read {} failed: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice::<CachedSnapshot>(&bytes) {
            Ok(snap) => Some(snap),
            Err(e) => {
                warn!(target: "campusgate::cache", "ignoring corrupt snapshot {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn write(&self, snapshot: &CachedSnapshot) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let text = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(target: "campusgate::cache", "wrote snapshot for user={} perms={}", snapshot.user_id, snapshot.permissions.len());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
