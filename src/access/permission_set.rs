use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Grants every permission when present in a set.
pub const WILDCARD: &str = "*";

/// Unique, order-irrelevant permission names. Backed by a BTreeSet so that
/// serialised output and diagnostics are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self { Self::default() }

    pub fn wildcard() -> Self { std::iter::once(WILDCARD).collect() }

    pub fn insert(&mut self, name: impl Into<String>) -> bool { self.0.insert(name.into()) }

    pub fn contains(&self, name: &str) -> bool { self.0.contains(name) }

    pub fn has_wildcard(&self) -> bool { self.0.contains(WILDCARD) }

    /// True when at least one of `required` is held (ANY semantics).
    pub fn intersects(&self, required: &[&str]) -> bool { required.iter().any(|p| self.0.contains(*p)) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(|s| s.as_str()) }

    /// Shape used by the persisted snapshot slot.
    pub fn to_grant_map(&self) -> BTreeMap<String, bool> { self.0.iter().map(|p| (p.clone(), true)).collect() }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_and_intersects() {
        let set: PermissionSet = ["a:read", "a:read", "b:write"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.intersects(&["x", "b:write"]));
        assert!(!set.intersects(&["x", "y"]));
        assert!(!set.intersects(&[]));
    }

    #[test]
    fn wildcard_detection() {
        assert!(PermissionSet::wildcard().has_wildcard());
        let mut set = PermissionSet::new();
        set.insert("a");
        assert!(!set.has_wildcard());
        set.insert(WILDCARD);
        assert!(set.has_wildcard());
    }

    #[test]
    fn grant_map_marks_everything_true() {
        let set: PermissionSet = ["b", "a"].into_iter().collect();
        let m = set.to_grant_map();
        assert_eq!(m.keys().cloned().collect::<Vec<_>>(), vec!["a".to_string(), "b".to_string()]);
        assert!(m.values().all(|v| *v));
    }
}
