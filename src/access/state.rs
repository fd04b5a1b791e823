use serde::{Deserialize, Serialize};

use crate::error::LoadError;

use super::permission_set::PermissionSet;

/// Provenance of the published permission set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionSource {
    Remote,
    Cache,
    Fallback,
    #[default]
    None,
}

/// IDLE -> LOADING -> {LOADED, ERROR}; ERROR may re-enter LOADING on retry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// What the rendering layer sees. Mutated only by the loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAccessState {
    pub permissions: PermissionSet,
    pub source: PermissionSource,
    pub load_status: LoadStatus,
    pub loaded_for_principal_id: Option<String>,
    #[serde(default)]
    pub error: Option<LoadError>,
}

impl ResolvedAccessState {
    /// Fresh IDLE state bound to a principal, nothing resolved yet.
    pub fn empty_for(principal_id: impl Into<String>) -> Self {
        Self { loaded_for_principal_id: Some(principal_id.into()), ..Default::default() }
    }

    pub fn is_for(&self, principal_id: &str) -> bool { self.loaded_for_principal_id.as_deref() == Some(principal_id) }

    pub fn error_message(&self) -> Option<String> { self.error.as_ref().map(|e| e.user_message()) }
}
