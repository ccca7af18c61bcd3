// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access, including user management
/// - `Manager` - Manages stores, templates, and task assignment
/// - `Inspector` - Performs inspections
/// - `Employee` - Completes assigned tasks and checklists
///
/// The hierarchy is strictly ordered: a role satisfies a requirement when
/// it ranks at or above the required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Store and template management
    Manager,
    /// Performs inspections
    Inspector,
    /// Completes assigned work
    Employee,
}

impl Role {
    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "inspector" => Some(Role::Inspector),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Inspector => 1,
            Role::Employee => 0,
        }
    }
}

impl Default for Role {
    /// Default role is Employee (least privilege for provisioned users).
    fn default() -> Self {
        Role::Employee
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Inspector => write!(f, "inspector"),
            Role::Employee => write!(f, "employee"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_privileges() {
        assert!(Role::Admin.has_privilege(Role::Admin));
        assert!(Role::Admin.has_privilege(Role::Manager));
        assert!(Role::Admin.has_privilege(Role::Inspector));
        assert!(Role::Admin.has_privilege(Role::Employee));
    }

    #[test]
    fn manager_cannot_act_as_admin() {
        assert!(!Role::Manager.has_privilege(Role::Admin));
        assert!(Role::Manager.has_privilege(Role::Inspector));
        assert!(Role::Manager.has_privilege(Role::Employee));
    }

    #[test]
    fn employee_only_has_employee_privilege() {
        assert!(!Role::Employee.has_privilege(Role::Admin));
        assert!(!Role::Employee.has_privilege(Role::Manager));
        assert!(!Role::Employee.has_privilege(Role::Inspector));
        assert!(Role::Employee.has_privilege(Role::Employee));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Manager"), Some(Role::Manager));
        assert_eq!(Role::parse("unknown"), None);
    }

    #[test]
    fn default_role_is_employee() {
        assert_eq!(Role::default(), Role::Employee);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), r#""manager""#);
    }
}
