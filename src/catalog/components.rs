use super::{AccessLevel, ComponentDescriptor};

pub(crate) const COMPONENTS: &[ComponentDescriptor] = &[
    ComponentDescriptor {
        id: "student-list",
        feature_id: "students",
        name: "Student List",
        description: "List of students",
        path: "/students/list",
        required_permissions: &["student:read"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "TEACHER", "STAFF"],
        access_level: AccessLevel::Restricted,
    },
    ComponentDescriptor {
        id: "student-form",
        feature_id: "students",
        name: "Student Form",
        description: "Add/edit student",
        path: "/students/form",
        required_permissions: &["student:create", "student:update"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "TEACHER", "STAFF"],
        access_level: AccessLevel::Restricted,
    },
    ComponentDescriptor {
        id: "student-export",
        feature_id: "students",
        name: "Student Export",
        description: "Export student data",
        path: "/students/export",
        required_permissions: &["student:export"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "STAFF"],
        access_level: AccessLevel::Restricted,
    },
    ComponentDescriptor {
        id: "teacher-list",
        feature_id: "teachers",
        name: "Teacher List",
        description: "List of teachers",
        path: "/teachers/list",
        required_permissions: &["teacher:read"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN"],
        access_level: AccessLevel::Restricted,
    },
    ComponentDescriptor {
        id: "finance-dashboard",
        feature_id: "finance",
        name: "Finance Dashboard",
        description: "Financial overview",
        path: "/finance/dashboard",
        required_permissions: &["finance:read"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "ACCOUNTANT"],
        access_level: AccessLevel::Restricted,
    },
];
