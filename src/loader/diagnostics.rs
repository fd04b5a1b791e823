use std::sync::atomic::AtomicU64;

use serde::Serialize;

use crate::access::ResolvedAccessState;
use crate::error::LoadError;

use super::retry::RetryState;

#[derive(Debug, Default)]
pub(crate) struct LoaderCounters {
    pub remote_fetches: AtomicU64,
    pub coalesced: AtomicU64,
    pub discarded: AtomicU64,
    pub cache_writes: AtomicU64,
}

/// Point-in-time view of a loader, for tests and operator tooling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderDiagnostics {
    pub state: ResolvedAccessState,
    pub retry: RetryState,
    pub retry_pending: bool,
    pub epoch: u64,
    pub bound_principal_id: Option<String>,
    pub remote_fetches: u64,
    /// Triggers merged into an in-flight load.
    pub coalesced: u64,
    /// Results dropped because the principal changed while they were in flight.
    pub discarded: u64,
    pub cache_writes: u64,
    pub last_error: Option<LoadError>,
}
