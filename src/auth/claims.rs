// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried by a caller token (HS256, issued by the identity provider).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub tenant_id: String,
    pub role_id: String,
    pub role_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Authenticated caller context.
///
/// This is the only source of tenant and client scope; ids in request
/// bodies are never trusted for scoping.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub role_id: String,
    pub role_name: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        let role = Role::from_name(&claims.role_name);
        Self {
            user_id: claims.user_id,
            tenant_id: claims.tenant_id,
            client_id: claims.client_id.filter(|c| !c.is_empty()),
            role_id: claims.role_id,
            role_name: claims.role_name,
            role,
        }
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    /// SUPERADMIN or OWNER: may manage the tenant's clients and users.
    pub fn can_manage_directory(&self) -> bool {
        self.has_role(Role::Owner)
    }
}
