use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::access::PermissionSet;

const FULL_ACCESS: &[&str] = &[
    "dashboard:view",
    // academic
    "student:read", "student:create", "student:update", "student:delete", "student:export",
    "teacher:read", "teacher:create", "teacher:update", "teacher:delete", "teacher:export",
    "class:read", "class:create", "class:update", "class:delete", "class:export",
    "attendance:read", "attendance:create", "attendance:update", "attendance:export",
    "exam:read", "exam:create", "exam:update", "exam:delete", "exam:export",
    // finance
    "finance:read", "finance:create", "finance:update", "finance:delete", "finance:export",
    "payment:read", "payment:create", "payment:update", "payment:delete",
    // communication
    "messaging:read", "messaging:create", "messaging:update", "messaging:delete",
    // content
    "subject:read", "subject:create", "subject:update", "subject:delete",
    "resource:read", "resource:create", "resource:update", "resource:delete",
    "document:read", "document:create", "document:update", "document:delete",
    // administrative
    "staff:read", "staff:create", "staff:update", "staff:delete",
    "customer:read", "customer:create", "customer:update", "customer:delete",
    "admin:read", "admin:create", "admin:update", "admin:delete",
    // reporting
    "report:read", "report:create", "report:export",
    "analytics:read", "analytics:create", "analytics:export",
    // system
    "settings:read", "settings:update",
    "audit:read", "audit:export",
    "user:read", "user:create", "user:update", "user:delete",
    "role:read", "role:create", "role:update", "role:delete",
    "permission:read", "permission:create", "permission:update", "permission:delete",
];

const SCHOOL_ADMIN: &[&str] = &[
    "dashboard:view",
    "student:read", "student:create", "student:update", "student:export",
    "teacher:read", "teacher:create", "teacher:update",
    "class:read", "class:create", "class:update",
    "attendance:read", "attendance:create", "attendance:update",
    "exam:read", "exam:create", "exam:update",
    "finance:read", "finance:create", "finance:update",
    "messaging:read", "messaging:create",
    "subject:read", "subject:create", "subject:update",
    "resource:read", "resource:create", "resource:update",
    "document:read", "document:create", "document:update",
    "staff:read", "staff:create", "staff:update",
    "customer:read", "customer:create", "customer:update",
    "report:read", "report:create",
    "settings:read", "settings:update",
];

const TEACHER: &[&str] = &[
    "dashboard:view",
    "student:read", "student:create", "student:update",
    "teacher:read", "teacher:create", "teacher:update", "teacher:delete", "teacher:restore",
    "teacher:bulk_create", "teacher:bulk_update", "teacher:bulk_delete",
    "teacher:export", "teacher:import", "teacher:analytics", "teacher:stats",
    "teacher:search", "teacher:performance",
    "class:read", "class:create", "class:update",
    "attendance:read", "attendance:create", "attendance:update",
    "exam:read", "exam:create", "exam:update",
    "messaging:read", "messaging:create",
    "subject:read",
    "resource:read", "resource:create", "resource:update",
    "document:read", "document:create", "document:update",
    "report:read", "report:create",
    "customer:read", "customer:create", "customer:update",
    "settings:read", "settings:update",
];

const STAFF: &[&str] = &[
    "dashboard:view",
    "student:read",
    "attendance:read", "attendance:create",
    "messaging:read", "messaging:create",
    "resource:read",
    "document:read",
];

const STUDENT: &[&str] = &["dashboard:view", "messaging:read", "messaging:create"];

const ACCOUNTANT: &[&str] = &[
    "dashboard:view",
    "finance:read", "finance:create", "finance:update",
    "payment:read", "payment:create", "payment:update",
    "report:read",
];

const ROLE_DEFAULTS: &[(&str, &[&str])] = &[
    ("SUPER_ADMIN", FULL_ACCESS),
    ("OWNER", FULL_ACCESS),
    ("SCHOOL_ADMIN", SCHOOL_ADMIN),
    ("TEACHER", TEACHER),
    ("STAFF", STAFF),
    ("STUDENT", STUDENT),
    ("ACCOUNTANT", ACCOUNTANT),
];

static BUILTIN: Lazy<FallbackPolicyTable> = Lazy::new(|| FallbackPolicyTable::from_entries(ROLE_DEFAULTS));

/// Conservative per-role permission lists, consulted only when neither the remote
/// authority nor the persisted snapshot produced anything.
#[derive(Debug, Clone)]
pub struct FallbackPolicyTable {
    entries: HashMap<String, &'static [&'static str]>,
}

impl Default for FallbackPolicyTable {
    fn default() -> Self { Self::builtin().clone() }
}

impl FallbackPolicyTable {
    pub fn builtin() -> &'static FallbackPolicyTable { &BUILTIN }

    pub fn from_entries(entries: &[(&str, &'static [&'static str])]) -> Self {
        let entries = entries
            .iter()
            .map(|(role, perms)| (role.trim().to_uppercase(), *perms))
            .collect();
        Self { entries }
    }

    /// Unknown roles resolve to an empty set.
    pub fn lookup(&self, role: &str) -> PermissionSet {
        self.entries
            .get(&role.trim().to_uppercase())
            .map(|perms| perms.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_role(&self, role: &str) -> bool { self.entries.contains_key(&role.trim().to_uppercase()) }

    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.entries.keys().map(|k| k.as_str()).collect();
        roles.sort_unstable();
        roles
    }
}
