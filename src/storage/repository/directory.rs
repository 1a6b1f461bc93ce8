// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client and user directory.
//!
//! Clients are the scoping unit for vault entities inside a tenant. Users
//! are directory entries only: credentials and token issuance live with the
//! identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{DbResult, VaultDatabase, CLIENTS, USERS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredClient {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub tenant_id: String,
    pub client_id: Option<String>,
    pub email: String,
    pub name: String,
    pub role_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository for clients, scoped by tenant.
pub struct ClientRepository<'a> {
    db: &'a VaultDatabase,
}

impl<'a> ClientRepository<'a> {
    pub fn new(db: &'a VaultDatabase) -> Self {
        Self { db }
    }

    pub fn create(&self, client: &StoredClient) -> DbResult<()> {
        self.db.insert(CLIENTS, &client.id, client)
    }

    pub fn get(&self, tenant_id: &str, client_id: &str) -> DbResult<Option<StoredClient>> {
        let client = self.db.get::<StoredClient>(CLIENTS, client_id)?;
        Ok(client.filter(|c| c.tenant_id == tenant_id))
    }

    /// Clients of a tenant, oldest first.
    pub fn list(&self, tenant_id: &str) -> DbResult<Vec<StoredClient>> {
        let mut clients = self
            .db
            .scan(CLIENTS, |c: &StoredClient| c.tenant_id == tenant_id)?;
        clients.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(clients)
    }

    pub fn delete(&self, tenant_id: &str, client_id: &str) -> DbResult<Option<StoredClient>> {
        self.db
            .remove_where(CLIENTS, client_id, |c: &StoredClient| c.tenant_id == tenant_id)
    }
}

/// Repository for users, scoped by tenant.
pub struct UserRepository<'a> {
    db: &'a VaultDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a VaultDatabase) -> Self {
        Self { db }
    }

    pub fn create(&self, user: &StoredUser) -> DbResult<()> {
        self.db.insert(USERS, &user.id, user)
    }

    pub fn get(&self, tenant_id: &str, user_id: &str) -> DbResult<Option<StoredUser>> {
        let user = self.db.get::<StoredUser>(USERS, user_id)?;
        Ok(user.filter(|u| u.tenant_id == tenant_id))
    }

    /// Case-insensitive email lookup within one tenant.
    pub fn find_by_email(&self, tenant_id: &str, email: &str) -> DbResult<Option<StoredUser>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .db
            .scan(USERS, |u: &StoredUser| u.tenant_id == tenant_id && u.email == email)?
            .into_iter()
            .next())
    }

    /// Users of a tenant, optionally narrowed to one client.
    pub fn list(&self, tenant_id: &str, client_id: Option<&str>) -> DbResult<Vec<StoredUser>> {
        let mut users = self.db.scan(USERS, |u: &StoredUser| {
            u.tenant_id == tenant_id
                && client_id.is_none_or(|c| u.client_id.as_deref() == Some(c))
        })?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    /// Reminder recipients: every active user of the tenant.
    pub fn active_in_tenant(&self, tenant_id: &str) -> DbResult<Vec<StoredUser>> {
        self.db
            .scan(USERS, |u: &StoredUser| u.tenant_id == tenant_id && u.is_active)
    }

    /// Remove the users attached to a client (client cascade).
    pub fn delete_for_client(&self, tenant_id: &str, client_id: &str) -> DbResult<usize> {
        let removed = self.db.remove_all(USERS, |u: &StoredUser| {
            u.tenant_id == tenant_id && u.client_id.as_deref() == Some(client_id)
        })?;
        Ok(removed.len())
    }
}
