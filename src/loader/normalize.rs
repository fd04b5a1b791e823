//! Canonicalisation of the remote permission envelope.
//!
//! Entries arrive in one of two shapes, `{name}` or `{permission: {name}}`.
//! Each entry is parsed on its own so one odd element never poisons the list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::PermissionSet;
use crate::error::{LoadError, LoadResult, TransientCause};

/// Wire envelope returned by the authority.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RemoteEnvelope {
    pub fn ok(data: Value) -> Self { Self { success: true, data, message: None } }

    /// Entries of `data`; anything other than an array reads as empty.
    pub fn entries(&self) -> &[Value] {
        match &self.data {
            Value::Array(items) => items.as_slice(),
            _ => &[],
        }
    }
}

/// One recognised entry shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionEntry {
    Direct(String),
    Nested(String),
}

impl PermissionEntry {
    /// Nested form wins when both are present. Blank names are rejected.
    pub fn parse(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        if let Some(name) = obj.get("permission").and_then(|p| p.get("name")).and_then(non_blank) {
            return Some(PermissionEntry::Nested(name));
        }
        obj.get("name").and_then(non_blank).map(PermissionEntry::Direct)
    }

    pub fn name(&self) -> &str {
        match self {
            PermissionEntry::Direct(n) | PermissionEntry::Nested(n) => n,
        }
    }

    pub fn into_name(self) -> String {
        match self {
            PermissionEntry::Direct(n) | PermissionEntry::Nested(n) => n,
        }
    }
}

fn non_blank(v: &Value) -> Option<String> {
    v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Names derivable from the entries; unparseable entries are dropped.
pub fn normalize(entries: &[Value]) -> PermissionSet {
    entries.iter().filter_map(PermissionEntry::parse).map(PermissionEntry::into_name).collect()
}

/// Full envelope check: rejected or empty results are transient failures.
pub fn permissions_from_envelope(envelope: &RemoteEnvelope) -> LoadResult<PermissionSet> {
    if !envelope.success {
        let msg = envelope.message.clone().unwrap_or_else(|| "server reported failure".to_string());
        return Err(LoadError::transient(TransientCause::Rejected, msg));
    }
    let set = normalize(envelope.entries());
    if set.is_empty() {
        return Err(LoadError::transient(TransientCause::Empty, "no permissions returned"));
    }
    Ok(set)
}
