// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tenant and client scope enforcement for storage operations.
//!
//! Every asset, showroom and showroom asset belongs to exactly one
//! `(tenant, client)` pair. Reads and writes only ever see records whose
//! pair matches the caller's [`Scope`]; anything else is indistinguishable
//! from a missing record.

use crate::auth::AuthenticatedUser;

/// The `(tenant, client)` pair an operation is confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub tenant_id: String,
    pub client_id: String,
}

impl Scope {
    pub fn new(tenant_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
        }
    }

    /// Scope carried by the caller's token, if it names a client.
    pub fn for_user(user: &AuthenticatedUser) -> Option<Self> {
        user.client_id
            .as_ref()
            .map(|client_id| Self::new(user.tenant_id.clone(), client_id.clone()))
    }
}

/// Records owned by a `(tenant, client)` pair.
pub trait TenantScoped {
    fn tenant_id(&self) -> &str;
    fn client_id(&self) -> &str;

    /// True when the record belongs to `scope`.
    fn in_scope(&self, scope: &Scope) -> bool {
        self.tenant_id() == scope.tenant_id && self.client_id() == scope.client_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    struct Record {
        tenant: String,
        client: String,
    }

    impl TenantScoped for Record {
        fn tenant_id(&self) -> &str {
            &self.tenant
        }
        fn client_id(&self) -> &str {
            &self.client
        }
    }

    fn record(tenant: &str, client: &str) -> Record {
        Record {
            tenant: tenant.to_string(),
            client: client.to_string(),
        }
    }

    fn make_user(client_id: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "user_1".to_string(),
            tenant_id: "tenant_1".to_string(),
            client_id: client_id.map(str::to_string),
            role_id: "role_1".to_string(),
            role_name: "OWNER".to_string(),
            role: Role::Owner,
        }
    }

    #[test]
    fn scope_requires_client_claim() {
        assert_eq!(
            Scope::for_user(&make_user(Some("client_1"))),
            Some(Scope::new("tenant_1", "client_1"))
        );
        assert_eq!(Scope::for_user(&make_user(None)), None);
    }

    #[test]
    fn in_scope_matches_both_ids() {
        let scope = Scope::new("t1", "c1");
        assert!(record("t1", "c1").in_scope(&scope));
        assert!(!record("t1", "c2").in_scope(&scope));
        assert!(!record("t2", "c1").in_scope(&scope));
    }
}
