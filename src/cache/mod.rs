//! Single persisted slot holding the last successfully resolved permission snapshot.
//! Keyed globally, overwritten on every successful remote load, never versioned.

mod file;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::PermissionSet;
use crate::error::CacheError;
use crate::identity::Principal;

pub use file::FilePermissionCache;
pub use memory::MemoryPermissionCache;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub permissions: BTreeMap<String, bool>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default = "Utc::now")]
    pub cached_at: DateTime<Utc>,
}

impl CachedSnapshot {
    /// Snapshot of a remote resolution for `principal`.
    pub fn from_resolution(principal: &Principal, permissions: &PermissionSet) -> Self {
        Self {
            permissions: permissions.to_grant_map(),
            role: principal.role.clone(),
            user_id: principal.id.clone(),
            school_id: principal.attrs.school_id.clone(),
            department: principal.attrs.department.clone(),
            last_login: principal.attrs.last_login,
            is_active: principal.attrs.is_active,
            cached_at: Utc::now(),
        }
    }

    /// Only names mapped to `true` are granted.
    pub fn granted(&self) -> PermissionSet {
        self.permissions.iter().filter(|(_, v)| **v).map(|(k, _)| k.clone()).collect()
    }
}

#[async_trait]
pub trait PermissionCache: Send + Sync {
    /// `None` when the slot is empty or unreadable.
    async fn read(&self) -> Option<CachedSnapshot>;

    /// Last write wins.
    async fn write(&self, snapshot: &CachedSnapshot) -> Result<(), CacheError>;

    async fn clear(&self) -> Result<(), CacheError>;
}

#[cfg(test)]
mod cache_tests;
