use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile attributes carried alongside the login response. The loader copies
/// them into the persisted snapshot; they never influence access decisions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attrs {
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub role: String,
    /// Permission map as declared by the identity provider at login.
    #[serde(default, rename = "permissions")]
    pub raw_permissions: BTreeMap<String, bool>,
    #[serde(flatten)]
    pub attrs: Attrs,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self { id: id.into(), role: role.into(), ..Default::default() }
    }

    pub fn with_permission(mut self, name: impl Into<String>, granted: bool) -> Self {
        self.raw_permissions.insert(name.into(), granted);
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn has_id(&self) -> bool { !self.id.trim().is_empty() }

    /// Role names compare upper-cased everywhere.
    pub fn normalized_role(&self) -> String { self.role.trim().to_uppercase() }

    /// Names the identity provider marked as granted.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.raw_permissions.iter().filter(|(_, v)| **v).map(|(k, _)| k.as_str())
    }
}
