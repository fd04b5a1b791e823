use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::access::{AccessEvaluator, LoadStatus, PermissionSource, ResolvedAccessState};
use crate::cache::{CachedSnapshot, PermissionCache};
use crate::catalog::{Catalog, FallbackPolicyTable};
use crate::config::AccessConfig;
use crate::error::{LoadError, TokenProblem};
use crate::identity::{IdentityStore, Principal};

use super::authority::PermissionAuthority;
use super::diagnostics::{LoaderCounters, LoaderDiagnostics};
use super::normalize::permissions_from_envelope;
use super::retry::{backoff_delay, RetryState};

/// Orchestrates permission resolution for the bound principal and owns the
/// published state, the retry bookkeeping and the pending retry timer.
///
/// Cheap to clone; every clone drives the same state.
#[derive(Clone)]
pub struct PermissionLoader {
    inner: Arc<LoaderInner>,
}

pub struct PermissionLoaderBuilder {
    identity: Arc<dyn IdentityStore>,
    authority: Arc<dyn PermissionAuthority>,
    cache: Arc<dyn PermissionCache>,
    fallback: FallbackPolicyTable,
    catalog: Catalog,
    max_attempts: u32,
    backoff_base: Duration,
}

impl PermissionLoaderBuilder {
    pub fn config(mut self, cfg: &AccessConfig) -> Self {
        self.max_attempts = cfg.max_attempts;
        self.backoff_base = cfg.backoff_base();
        self
    }

    pub fn fallback(mut self, table: FallbackPolicyTable) -> Self {
        self.fallback = table;
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn build(self) -> PermissionLoader {
        let inner = LoaderInner {
            identity: self.identity,
            authority: self.authority,
            cache: self.cache,
            fallback: self.fallback,
            catalog: self.catalog,
            backoff_base: self.backoff_base,
            state: Arc::new(RwLock::new(ResolvedAccessState::default())),
            control: Mutex::new(Control {
                bound: None,
                retry: RetryState::new(self.max_attempts),
                pending: None,
                last_error: None,
            }),
            epoch: AtomicU64::new(1),
            counters: LoaderCounters::default(),
            cache_gate: tokio::sync::Mutex::new(()),
        };
        PermissionLoader { inner: Arc::new(inner) }
    }
}

struct Control {
    bound: Option<Principal>,
    retry: RetryState,
    pending: Option<AbortHandle>,
    last_error: Option<LoadError>,
}

impl Control {
    fn cancel_pending(&mut self) {
        if let Some(h) = self.pending.take() {
            h.abort();
        }
    }
}

struct LoaderInner {
    identity: Arc<dyn IdentityStore>,
    authority: Arc<dyn PermissionAuthority>,
    cache: Arc<dyn PermissionCache>,
    fallback: FallbackPolicyTable,
    catalog: Catalog,
    backoff_base: Duration,
    state: Arc<RwLock<ResolvedAccessState>>,
    // lock order: control, then state
    control: Mutex<Control>,
    // bumped under the control lock; a load only publishes if its epoch is still current
    epoch: AtomicU64,
    counters: LoaderCounters,
    // serialises "still current? then write" so an older snapshot never lands after a newer one
    cache_gate: tokio::sync::Mutex<()>,
}

/// A load that passed the trigger checks and is allowed to run.
struct Job {
    epoch: u64,
    principal: Principal,
}

impl PermissionLoader {
    pub fn builder(
        identity: Arc<dyn IdentityStore>,
        authority: Arc<dyn PermissionAuthority>,
        cache: Arc<dyn PermissionCache>,
    ) -> PermissionLoaderBuilder {
        let defaults = AccessConfig::default();
        PermissionLoaderBuilder {
            identity,
            authority,
            cache,
            fallback: FallbackPolicyTable::default(),
            catalog: Catalog::builtin(),
            max_attempts: defaults.max_attempts,
            backoff_base: defaults.backoff_base(),
        }
    }

    /// Evaluator bound to this loader's published state.
    pub fn evaluator(&self) -> AccessEvaluator {
        AccessEvaluator::new(Arc::clone(&self.inner.state), self.inner.catalog)
    }

    pub fn state(&self) -> ResolvedAccessState { self.inner.state.read().clone() }

    pub fn retry_state(&self) -> RetryState { self.inner.control.lock().retry.clone() }

    pub fn diagnostics(&self) -> LoaderDiagnostics {
        let ctl = self.inner.control.lock();
        LoaderDiagnostics {
            state: self.inner.state.read().clone(),
            retry: ctl.retry.clone(),
            retry_pending: ctl.pending.as_ref().is_some_and(|h| !h.is_finished()),
            epoch: self.inner.epoch.load(Ordering::Acquire),
            bound_principal_id: ctl.bound.as_ref().map(|p| p.id.clone()),
            remote_fetches: self.inner.counters.remote_fetches.load(Ordering::Relaxed),
            coalesced: self.inner.counters.coalesced.load(Ordering::Relaxed),
            discarded: self.inner.counters.discarded.load(Ordering::Relaxed),
            cache_writes: self.inner.counters.cache_writes.load(Ordering::Relaxed),
            last_error: ctl.last_error.clone(),
        }
    }

    /// Idempotent trigger. Runs only when the state for `principal` is IDLE;
    /// a call landing while a load is in flight is merged into it.
    pub async fn load_user_permissions(&self, principal: Principal) {
        if let Some(job) = self.inner.begin_load(principal) {
            self.inner.run_load(job).await;
        }
    }

    /// Re-attempts a failed load immediately, within the attempt ceiling.
    pub async fn retry_permissions_load(&self) {
        if let Some(job) = self.inner.begin_retry(None) {
            self.inner.run_load(job).await;
        }
    }

    /// Resets state and retry bookkeeping, then loads unconditionally.
    pub async fn force_reload_permissions(&self) {
        if let Some(job) = self.inner.begin_force() {
            self.inner.run_load(job).await;
        }
    }

    /// Explicit principal-changed event. `None` is a logout.
    pub async fn on_principal_changed(&self, principal: Option<Principal>) {
        if let Some(job) = self.inner.begin_principal_change(principal) {
            self.inner.run_load(job).await;
        }
    }

    /// Follows an identity watch channel, reacting only to identifier changes.
    /// Transitions are applied in event order; loads run on their own tasks so a
    /// slow fetch never delays the next change.
    pub fn spawn_principal_listener(&self, mut rx: watch::Receiver<Option<Principal>>) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            loop {
                let next = rx.borrow_and_update().clone();
                if let Some(job) = inner.begin_principal_change(next) {
                    let runner = Arc::clone(&inner);
                    tokio::spawn(async move { runner.run_load(job).await });
                }
                if rx.changed().await.is_err() {
                    debug!(target: "campusgate::loader", "identity channel closed; listener exiting");
                    break;
                }
            }
        })
    }
}

impl LoaderInner {
    fn current_epoch(&self) -> u64 { self.epoch.load(Ordering::Acquire) }

    /// Drops everything known about the previous principal. Caller holds the control lock.
    fn rebind(&self, ctl: &mut Control, principal: Option<Principal>) {
        ctl.cancel_pending();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let id = principal.as_ref().map(|p| p.id.clone());
        *self.state.write() = match &id {
            Some(id) => ResolvedAccessState::empty_for(id.clone()),
            None => ResolvedAccessState::default(),
        };
        ctl.retry.reset(id);
        ctl.last_error = None;
        ctl.bound = principal;
    }

    fn begin_load(&self, principal: Principal) -> Option<Job> {
        if !principal.has_id() {
            return None;
        }
        let mut ctl = self.control.lock();
        let same = ctl.bound.as_ref().is_some_and(|b| b.id == principal.id);
        if same {
            ctl.bound = Some(principal.clone());
        } else {
            info!(target: "campusgate::loader", "binding principal user={} role={}", principal.id, principal.role);
            self.rebind(&mut ctl, Some(principal.clone()));
        }
        let mut state = self.state.write();
        match state.load_status {
            LoadStatus::Idle => {}
            LoadStatus::Loading => {
                self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                debug!(target: "campusgate::loader", "load for user={} already in flight; coalesced", principal.id);
                return None;
            }
            LoadStatus::Loaded | LoadStatus::Error => return None,
        }
        state.load_status = LoadStatus::Loading;
        Some(Job { epoch: self.current_epoch(), principal })
    }

    /// Manual retries pass `None`; timers pass the epoch they were scheduled under.
    fn begin_retry(&self, scheduled_epoch: Option<u64>) -> Option<Job> {
        let mut ctl = self.control.lock();
        let epoch = self.current_epoch();
        if let Some(e) = scheduled_epoch {
            if e != epoch {
                return None;
            }
            ctl.pending = None;
        }
        let principal = ctl.bound.clone()?;
        let mut state = self.state.write();
        if state.load_status != LoadStatus::Error || !ctl.retry.can_retry() {
            return None;
        }
        match scheduled_epoch {
            // timers never retry past an auth rejection; a manual retry may, after re-login
            Some(_) if ctl.last_error.as_ref().is_some_and(LoadError::is_terminal) => return None,
            Some(_) => {}
            None => ctl.cancel_pending(),
        }
        debug!(target: "campusgate::loader", "retrying user={} attempt={}/{}", principal.id, ctl.retry.attempt, ctl.retry.max_attempts);
        // keep the degraded set visible while the retry is in flight
        state.load_status = LoadStatus::Loading;
        Some(Job { epoch, principal })
    }

    fn begin_force(&self) -> Option<Job> {
        let mut ctl = self.control.lock();
        let principal = ctl.bound.clone().or_else(|| self.identity.current_principal())?;
        if !principal.has_id() {
            return None;
        }
        info!(target: "campusgate::loader", "forced reload for user={}", principal.id);
        self.rebind(&mut ctl, Some(principal.clone()));
        self.state.write().load_status = LoadStatus::Loading;
        Some(Job { epoch: self.current_epoch(), principal })
    }

    fn begin_principal_change(&self, principal: Option<Principal>) -> Option<Job> {
        match principal {
            None => {
                let mut ctl = self.control.lock();
                if let Some(prev) = ctl.bound.as_ref() {
                    info!(target: "campusgate::loader", "principal user={} unbound; clearing access state", prev.id);
                }
                self.rebind(&mut ctl, None);
                None
            }
            Some(p) => {
                let unchanged = self.control.lock().bound.as_ref().is_some_and(|b| b.id == p.id);
                if unchanged {
                    return None;
                }
                self.begin_load(p)
            }
        }
    }

    async fn run_load(self: &Arc<Self>, job: Job) {
        let Job { epoch, principal } = job;

        let token = match self.identity.access_token().await {
            None => Err(LoadError::no_token(TokenProblem::Missing)),
            Some(t) if !self.identity.is_token_valid(&t) => Err(LoadError::no_token(TokenProblem::Invalid)),
            Some(t) => Ok(t),
        };
        let token = match token {
            Ok(t) => t,
            Err(e) => {
                warn!(target: "campusgate::loader", "not contacting authority for user={}: {}", principal.id, e);
                self.degrade(epoch, &principal, e).await;
                return;
            }
        };

        self.counters.remote_fetches.fetch_add(1, Ordering::Relaxed);
        let fetched = self
            .authority
            .fetch_user_permissions(&principal.id, &token)
            .await
            .and_then(|env| permissions_from_envelope(&env));

        match fetched {
            Ok(permissions) => {
                let snapshot = CachedSnapshot::from_resolution(&principal, &permissions);
                let count = permissions.len();
                let next = ResolvedAccessState {
                    permissions,
                    source: PermissionSource::Remote,
                    load_status: LoadStatus::Loaded,
                    loaded_for_principal_id: Some(principal.id.clone()),
                    error: None,
                };
                if !self.publish(epoch, &principal, next, None) {
                    return;
                }
                info!(target: "campusgate::loader", "resolved {} permissions for user={} from remote", count, principal.id);
                self.persist(epoch, &principal, &snapshot).await;
            }
            Err(e) => self.degrade(epoch, &principal, e).await,
        }
    }

    /// Writes the snapshot only if `epoch` is still current once the gate is held.
    async fn persist(&self, epoch: u64, principal: &Principal, snapshot: &CachedSnapshot) {
        let _gate = self.cache_gate.lock().await;
        let current = {
            let ctl = self.control.lock();
            epoch == self.current_epoch() && ctl.bound.as_ref().is_some_and(|b| b.id == principal.id)
        };
        if !current {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            debug!(target: "campusgate::loader", "skipping snapshot write for user={}: principal changed", principal.id);
            return;
        }
        match self.cache.write(snapshot).await {
            Ok(()) => {
                self.counters.cache_writes.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!(target: "campusgate::loader", "failed to persist permission snapshot: {}", e),
        }
    }

    /// Cache, then fallback table. Transient failures with a usable snapshot count
    /// as resolved; everything else is published as ERROR.
    async fn degrade(self: &Arc<Self>, epoch: u64, principal: &Principal, error: LoadError) {
        if epoch != self.current_epoch() {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let cached = self.cache.read().await.map(|s| s.granted()).filter(|p| !p.is_empty());

        let (permissions, source) = match cached {
            Some(p) => (p, PermissionSource::Cache),
            None => (self.fallback.lookup(&principal.role), PermissionSource::Fallback),
        };
        let resolved_from_cache = source == PermissionSource::Cache && error.is_retryable();
        let next = ResolvedAccessState {
            permissions,
            source,
            load_status: if resolved_from_cache { LoadStatus::Loaded } else { LoadStatus::Error },
            loaded_for_principal_id: Some(principal.id.clone()),
            error: if resolved_from_cache { None } else { Some(error.clone()) },
        };
        if self.publish(epoch, principal, next, Some(error.clone())) {
            warn!(
                target: "campusgate::loader",
                "user={} degraded to {:?} after {}",
                principal.id,
                source,
                error
            );
        }
    }

    /// Applies `next` if `epoch` still belongs to the bound principal. Settles
    /// retry bookkeeping in the same critical section.
    fn publish(self: &Arc<Self>, epoch: u64, principal: &Principal, next: ResolvedAccessState, failure: Option<LoadError>) -> bool {
        let mut ctl = self.control.lock();
        let current = epoch == self.current_epoch() && ctl.bound.as_ref().is_some_and(|b| b.id == principal.id);
        if !current {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            debug!(target: "campusgate::loader", "discarding stale result for user={} epoch={}", principal.id, epoch);
            return false;
        }
        let schedule = match &failure {
            None => {
                ctl.retry.reset(Some(principal.id.clone()));
                ctl.last_error = None;
                false
            }
            Some(e) => {
                ctl.last_error = Some(e.clone());
                if next.load_status == LoadStatus::Error && e.is_retryable() {
                    ctl.retry.record_failure();
                    ctl.retry.can_retry()
                } else {
                    false
                }
            }
        };
        *self.state.write() = next;
        if schedule {
            let delay = backoff_delay(self.backoff_base, ctl.retry.attempt);
            self.schedule_retry(&mut ctl, epoch, delay);
        } else if failure.as_ref().is_some_and(LoadError::is_retryable) && !ctl.retry.can_retry() {
            warn!(target: "campusgate::loader", "user={} reached retry ceiling ({})", principal.id, ctl.retry.max_attempts);
        }
        true
    }

    fn schedule_retry(self: &Arc<Self>, ctl: &mut Control, epoch: u64, delay: Duration) {
        ctl.cancel_pending();
        debug!(target: "campusgate::loader", "retry scheduled in {:?} (attempt {})", delay, ctl.retry.attempt);
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(job) = inner.begin_retry(Some(epoch)) {
                inner.run_load(job).await;
            }
        });
        ctl.pending = Some(handle.abort_handle());
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod loader_tests;
