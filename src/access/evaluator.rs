//! Synchronous access predicates over the published state.
//! Never performs I/O and never fails: indeterminate state answers `false`.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{Catalog, ComponentDescriptor, FeatureDescriptor};

use super::permission_set::PermissionSet;
use super::state::ResolvedAccessState;

pub const DEFAULT_ACTION: &str = "view";

/// Feature gate: ANY of the descriptor's permissions. Unknown ids are denied even under the wildcard.
pub fn feature_allowed(catalog: &Catalog, perms: &PermissionSet, feature_id: &str) -> bool {
    if perms.is_empty() { return false; }
    let Some(feature) = catalog.feature(feature_id) else { return false; };
    if perms.has_wildcard() { return true; }
    perms.intersects(feature.required_permissions)
}

/// Component gate: ANY of the descriptor's permissions AND the `<component>:<action>` composite.
pub fn component_allowed(catalog: &Catalog, perms: &PermissionSet, component_id: &str, action: &str) -> bool {
    if perms.is_empty() { return false; }
    let Some(component) = catalog.component(component_id) else { return false; };
    if perms.has_wildcard() { return true; }
    if !perms.intersects(component.required_permissions) { return false; }
    perms.contains(&format!("{}:{}", component_id, action))
}

#[derive(Clone)]
pub struct AccessEvaluator {
    state: Arc<RwLock<ResolvedAccessState>>,
    catalog: Catalog,
}

impl AccessEvaluator {
    pub fn new(state: Arc<RwLock<ResolvedAccessState>>, catalog: Catalog) -> Self { Self { state, catalog } }

    /// Evaluator over a fixed permission set, detached from any loader.
    pub fn with_permissions(permissions: PermissionSet, catalog: Catalog) -> Self {
        let state = ResolvedAccessState { permissions, ..Default::default() };
        Self::new(Arc::new(RwLock::new(state)), catalog)
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn snapshot(&self) -> ResolvedAccessState { self.state.read().clone() }

    pub fn permissions(&self) -> PermissionSet { self.state.read().permissions.clone() }

    /// `action` is accepted for symmetry with components; feature gating is coarse and ignores it.
    pub fn can_access_feature(&self, feature_id: &str, _action: Option<&str>) -> bool {
        feature_allowed(&self.catalog, &self.state.read().permissions, feature_id)
    }

    pub fn can_access_component(&self, component_id: &str, action: Option<&str>) -> bool {
        let action = action.unwrap_or(DEFAULT_ACTION);
        component_allowed(&self.catalog, &self.state.read().permissions, component_id, action)
    }

    pub fn accessible_features(&self) -> Vec<&'static FeatureDescriptor> {
        let guard = self.state.read();
        self.catalog
            .features()
            .iter()
            .filter(|f| feature_allowed(&self.catalog, &guard.permissions, f.id))
            .collect()
    }

    pub fn accessible_components(&self, feature_id: Option<&str>) -> Vec<&'static ComponentDescriptor> {
        let guard = self.state.read();
        self.catalog
            .components()
            .iter()
            .filter(|c| component_allowed(&self.catalog, &guard.permissions, c.id, DEFAULT_ACTION))
            .filter(|c| feature_id.map_or(true, |fid| c.feature_id == fid))
            .collect()
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod evaluator_tests;
