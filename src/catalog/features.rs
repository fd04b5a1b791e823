use super::FeatureDescriptor;

const ALL_STAFF_AND_STUDENTS: &[&str] = &["SUPER_ADMIN", "SCHOOL_ADMIN", "TEACHER", "STAFF", "STUDENT"];
const ADMINS: &[&str] = &["SUPER_ADMIN", "SCHOOL_ADMIN"];
const ADMINS_AND_TEACHERS: &[&str] = &["SUPER_ADMIN", "SCHOOL_ADMIN", "TEACHER"];
const ADMINS_TEACHERS_STAFF: &[&str] = &["SUPER_ADMIN", "SCHOOL_ADMIN", "TEACHER", "STAFF"];

pub(crate) const FEATURES: &[FeatureDescriptor] = &[
    FeatureDescriptor {
        id: "dashboard",
        name: "Dashboard",
        description: "Main dashboard",
        path: "/dashboard",
        required_permissions: &["dashboard:view", "student:read"],
        roles: ALL_STAFF_AND_STUDENTS,
    },
    FeatureDescriptor {
        id: "academic",
        name: "Academic",
        description: "Academic management",
        path: "/academic",
        required_permissions: &["student:read"],
        roles: ALL_STAFF_AND_STUDENTS,
    },
    FeatureDescriptor {
        id: "students",
        name: "Students",
        description: "Student management",
        path: "/students",
        required_permissions: &["student:read", "student:create", "student:update", "student:delete", "student:export"],
        roles: ALL_STAFF_AND_STUDENTS,
    },
    FeatureDescriptor {
        id: "teachers",
        name: "Teachers",
        description: "Teacher management",
        path: "/teachers",
        required_permissions: &["teacher:read", "teacher:create", "teacher:update", "teacher:delete"],
        roles: ADMINS,
    },
    FeatureDescriptor {
        id: "staff",
        name: "Staff",
        description: "Staff management",
        path: "/staff",
        required_permissions: &["staff:read", "staff:create", "staff:update", "staff:delete"],
        roles: ADMINS,
    },
    FeatureDescriptor {
        id: "finance",
        name: "Finance",
        description: "Financial management",
        path: "/finance",
        required_permissions: &["finance:read", "finance:create", "finance:update", "finance:delete"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "ACCOUNTANT"],
    },
    FeatureDescriptor {
        id: "messaging",
        name: "Messaging",
        description: "Internal messaging",
        path: "/messaging",
        required_permissions: &["messaging:read", "messaging:create"],
        roles: ADMINS_TEACHERS_STAFF,
    },
    FeatureDescriptor {
        id: "classes",
        name: "Classes",
        description: "Class management",
        path: "/classes",
        required_permissions: &["class:read", "class:create", "class:update", "class:delete"],
        roles: ADMINS_AND_TEACHERS,
    },
    FeatureDescriptor {
        id: "subjects",
        name: "Subjects",
        description: "Subject management",
        path: "/subjects",
        required_permissions: &["subject:read", "subject:create", "subject:update", "subject:delete"],
        roles: ADMINS_AND_TEACHERS,
    },
    FeatureDescriptor {
        id: "attendance",
        name: "Attendance",
        description: "Attendance management",
        path: "/attendance",
        required_permissions: &["attendance:read", "attendance:create", "attendance:update"],
        roles: ADMINS_TEACHERS_STAFF,
    },
    FeatureDescriptor {
        id: "exams",
        name: "Exams",
        description: "Exam management",
        path: "/exams",
        required_permissions: &["exam:read", "exam:create", "exam:update", "exam:delete"],
        roles: ADMINS_AND_TEACHERS,
    },
    FeatureDescriptor {
        id: "reports",
        name: "Reports",
        description: "Reports and analytics",
        path: "/reports",
        required_permissions: &["report:read", "report:create"],
        roles: ADMINS_AND_TEACHERS,
    },
    FeatureDescriptor {
        id: "settings",
        name: "Settings",
        description: "System settings",
        path: "/settings",
        required_permissions: &["settings:read", "settings:update"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "CRM_MANAGER"],
    },
    FeatureDescriptor {
        id: "customers",
        name: "Visitors",
        description: "Visitor management",
        path: "/customers",
        required_permissions: &["customer:read", "customer:create", "customer:update", "customer:delete"],
        roles: &["SUPER_ADMIN", "SCHOOL_ADMIN", "STAFF", "CRM_MANAGER", "TEACHER"],
    },
    FeatureDescriptor {
        id: "resources",
        name: "Resources",
        description: "Resource management",
        path: "/resources",
        required_permissions: &["resource:read", "resource:create", "resource:update"],
        roles: ADMINS_TEACHERS_STAFF,
    },
    FeatureDescriptor {
        id: "documents",
        name: "Documents",
        description: "Document management",
        path: "/documents",
        required_permissions: &["document:read", "document:create", "document:update"],
        roles: ADMINS_TEACHERS_STAFF,
    },
    FeatureDescriptor {
        id: "admin",
        name: "Admin Panel",
        description: "Administrative panel",
        path: "/admin",
        required_permissions: &["admin:read", "admin:create", "admin:update"],
        roles: ADMINS,
    },
    FeatureDescriptor {
        id: "quantum-analytics",
        name: "Quantum Analytics",
        description: "Advanced analytics",
        path: "/quantum-analytics",
        required_permissions: &["analytics:read", "analytics:create"],
        roles: ADMINS,
    },
    FeatureDescriptor {
        id: "schools",
        name: "Schools",
        description: "School management",
        path: "/schools",
        required_permissions: &["school:read", "school:create", "school:update"],
        roles: ADMINS,
    },
    FeatureDescriptor {
        id: "owners",
        name: "Owners",
        description: "Owner management",
        path: "/owners",
        required_permissions: &["owner:read", "owner:create", "owner:update"],
        roles: &["SUPER_ADMIN"],
    },
];
