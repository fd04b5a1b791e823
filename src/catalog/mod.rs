//! Static registry of gated features and components, plus the per-role fallback table.
//! Pure data: nothing here performs I/O or knows about the current principal.

mod components;
mod fallback;
mod features;

use serde::Serialize;

pub use fallback::FallbackPolicyTable;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    Public,
    Restricted,
    AdminOnly,
}

/// Coarse, navigable area. Access needs ANY of `required_permissions`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub path: &'static str,
    pub required_permissions: &'static [&'static str],
    /// Roles nominally entitled; informational, never consulted by the evaluator.
    pub roles: &'static [&'static str],
}

/// Fine-grained element inside a feature.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub id: &'static str,
    pub feature_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub path: &'static str,
    pub required_permissions: &'static [&'static str],
    pub roles: &'static [&'static str],
    pub access_level: AccessLevel,
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    features: &'static [FeatureDescriptor],
    components: &'static [ComponentDescriptor],
}

impl Default for Catalog {
    fn default() -> Self { Self::builtin() }
}

impl Catalog {
    pub const fn new(features: &'static [FeatureDescriptor], components: &'static [ComponentDescriptor]) -> Self {
        Self { features, components }
    }

    pub const fn builtin() -> Self { Self::new(features::FEATURES, components::COMPONENTS) }

    pub fn features(&self) -> &'static [FeatureDescriptor] { self.features }

    pub fn components(&self) -> &'static [ComponentDescriptor] { self.components }

    pub fn feature(&self, id: &str) -> Option<&'static FeatureDescriptor> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn component(&self, id: &str) -> Option<&'static ComponentDescriptor> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn components_for_feature(&self, feature_id: &str) -> Vec<&'static ComponentDescriptor> {
        self.components.iter().filter(|c| c.feature_id == feature_id).collect()
    }

    /// Features whose nominal role list names `role` (case-normalised).
    pub fn features_for_role(&self, role: &str) -> Vec<&'static FeatureDescriptor> {
        let role = role.trim().to_uppercase();
        self.features.iter().filter(|f| f.roles.iter().any(|r| *r == role)).collect()
    }
}

#[cfg(test)]
mod catalog_tests;
