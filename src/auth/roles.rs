// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role resolved from the token's `roleName` claim.
///
/// ## Role Hierarchy
///
/// - `SuperAdmin` - Platform operator, full access within any tenant it is issued for
/// - `Owner` - Tenant owner, manages clients and users of its tenant
/// - `Member` - Any other role; works on the vault of its own client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    Owner,
    Member,
}

impl Role {
    fn rank(self) -> u8 {
        match self {
            Role::SuperAdmin => 2,
            Role::Owner => 1,
            Role::Member => 0,
        }
    }

    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Map a role name claim (case-insensitive). Unknown names are members.
    pub fn from_name(name: &str) -> Role {
        match name.trim().to_uppercase().as_str() {
            "SUPERADMIN" => Role::SuperAdmin,
            "OWNER" => Role::Owner,
            _ => Role::Member,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "SUPERADMIN"),
            Role::Owner => write!(f, "OWNER"),
            Role::Member => write!(f, "MEMBER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privileges_are_ordered() {
        assert!(Role::SuperAdmin.has_privilege(Role::Owner));
        assert!(Role::SuperAdmin.has_privilege(Role::Member));
        assert!(Role::Owner.has_privilege(Role::Owner));
        assert!(!Role::Owner.has_privilege(Role::SuperAdmin));
        assert!(!Role::Member.has_privilege(Role::Owner));
    }

    #[test]
    fn from_name_parses_claims() {
        assert_eq!(Role::from_name("SUPERADMIN"), Role::SuperAdmin);
        assert_eq!(Role::from_name("owner"), Role::Owner);
        assert_eq!(Role::from_name("EDITOR"), Role::Member);
        assert_eq!(Role::from_name(""), Role::Member);
    }

    #[test]
    fn display_round_trips() {
        for role in [Role::SuperAdmin, Role::Owner, Role::Member] {
            assert_eq!(Role::from_name(&role.to_string()), role);
        }
    }
}
