use std::collections::HashSet;

use super::*;

#[test]
fn builtin_ids_are_unique() {
    let cat = Catalog::builtin();
    let fids: HashSet<_> = cat.features().iter().map(|f| f.id).collect();
    assert_eq!(fids.len(), cat.features().len());
    let cids: HashSet<_> = cat.components().iter().map(|c| c.id).collect();
    assert_eq!(cids.len(), cat.components().len());
}

#[test]
fn every_component_points_at_a_known_feature() {
    let cat = Catalog::builtin();
    for c in cat.components() {
        assert!(cat.feature(c.feature_id).is_some(), "dangling feature id on {}", c.id);
        assert!(!c.required_permissions.is_empty());
    }
}

#[test]
fn lookups_by_id() {
    let cat = Catalog::builtin();
    assert_eq!(cat.feature("finance").map(|f| f.path), Some("/finance"));
    assert_eq!(cat.component("finance-dashboard").map(|c| c.required_permissions), Some(&["finance:read"][..]));
    assert!(cat.feature("nope").is_none());
    let student_parts: Vec<_> = cat.components_for_feature("students").iter().map(|c| c.id).collect();
    assert_eq!(student_parts, vec!["student-list", "student-form", "student-export"]);
}

#[test]
fn nominal_role_entitlement_is_case_normalised() {
    let cat = Catalog::builtin();
    let ids: Vec<_> = cat.features_for_role("accountant").iter().map(|f| f.id).collect();
    assert_eq!(ids, vec!["finance"]);
    assert!(cat.features_for_role("janitor").is_empty());
}

#[test]
fn fallback_lookup_is_case_normalised() {
    let t = FallbackPolicyTable::builtin();
    assert_eq!(t.lookup("teacher"), t.lookup("TEACHER"));
    assert_eq!(t.lookup(" Student "), t.lookup("STUDENT"));
    assert!(t.lookup("teacher").contains("teacher:read"));
    assert!(t.contains_role("owner"));
}

#[test]
fn fallback_unknown_role_is_empty() {
    assert!(FallbackPolicyTable::builtin().lookup("LIBRARIAN").is_empty());
    assert!(FallbackPolicyTable::builtin().lookup("").is_empty());
}

#[test]
fn fallback_lists_are_exact() {
    let t = FallbackPolicyTable::builtin();
    let student = t.lookup("STUDENT");
    assert_eq!(student.len(), 3);
    for p in ["dashboard:view", "messaging:read", "messaging:create"] {
        assert!(student.contains(p));
    }
    assert_eq!(t.lookup("OWNER"), t.lookup("SUPER_ADMIN"));
    assert_eq!(t.roles(), vec!["ACCOUNTANT", "OWNER", "SCHOOL_ADMIN", "STAFF", "STUDENT", "SUPER_ADMIN", "TEACHER"]);
}

#[test]
fn custom_tables_normalise_keys() {
    static ONLY: &[&str] = &["x:read"];
    let t = FallbackPolicyTable::from_entries(&[("guest", ONLY)]);
    assert!(t.lookup("GUEST").contains("x:read"));
    assert_eq!(t.roles(), vec!["GUEST"]);
}
