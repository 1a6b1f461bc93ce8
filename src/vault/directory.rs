// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client and user directory operations.
//!
//! Callers are expected to hold a directory role (see
//! [`DirectoryAdmin`](crate::auth::DirectoryAdmin)); every operation is
//! confined to the caller's tenant.

use std::thread;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Vault, VaultError, VaultResult};
use crate::auth::{AuthenticatedUser, Role};
use crate::storage::{
    AssetRepository, ClientRepository, NotificationLedger, Scope, ShowroomRepository,
    StoredClient, StoredUser, UserRepository,
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role_name: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Outcome of one branch of a client cascade.
type BranchOutcome = Result<usize, String>;

impl Vault {
    pub fn create_client(&self, admin: &AuthenticatedUser, input: NewClient) -> VaultResult<StoredClient> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(VaultError::bad_request("Client name is required"));
        }

        let client = StoredClient {
            id: Uuid::new_v4().to_string(),
            tenant_id: admin.tenant_id.clone(),
            name,
            is_active: true,
            created_at: Utc::now(),
        };
        ClientRepository::new(self.db()).create(&client)?;

        info!(client_id = %client.id, tenant_id = %client.tenant_id, "Client created");
        Ok(client)
    }

    pub fn list_clients(&self, admin: &AuthenticatedUser) -> VaultResult<Vec<StoredClient>> {
        Ok(ClientRepository::new(self.db()).list(&admin.tenant_id)?)
    }

    /// Register a directory entry. Non-SUPERADMIN roles must name a client
    /// of the caller's tenant.
    pub fn register_user(&self, admin: &AuthenticatedUser, input: NewUser) -> VaultResult<StoredUser> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(VaultError::bad_request("A valid email is required"));
        }

        let role = Role::from_name(&input.role_name);
        let client_id = input.client_id.filter(|c| !c.is_empty());
        match &client_id {
            None if role != Role::SuperAdmin => {
                return Err(VaultError::bad_request("Client ID is required for this role"));
            }
            Some(client_id) => {
                ClientRepository::new(self.db())
                    .get(&admin.tenant_id, client_id)?
                    .ok_or(VaultError::NotFound("Client"))?;
            }
            None => {}
        }

        let users = UserRepository::new(self.db());
        if users.find_by_email(&admin.tenant_id, &email)?.is_some() {
            return Err(VaultError::bad_request("Email already registered"));
        }

        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            tenant_id: admin.tenant_id.clone(),
            client_id,
            email,
            name: input.name,
            role_name: role.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        users.create(&user)?;

        info!(user_id = %user.id, tenant_id = %user.tenant_id, role = %role, "User registered");
        Ok(user)
    }

    pub fn list_users(&self, admin: &AuthenticatedUser, client_id: Option<&str>) -> VaultResult<Vec<StoredUser>> {
        Ok(UserRepository::new(self.db()).list(&admin.tenant_id, client_id)?)
    }

    /// Directory entry of the caller, if one was registered.
    pub fn find_user(&self, user: &AuthenticatedUser) -> VaultResult<Option<StoredUser>> {
        Ok(UserRepository::new(self.db()).get(&user.tenant_id, &user.user_id)?)
    }

    /// Delete a client and everything it owns.
    ///
    /// The dependent collections and the upload tree are cleared in
    /// parallel. The client record is removed even when a branch fails; the
    /// failed branches are then reported as [`VaultError::Cascade`].
    pub fn delete_client(&self, admin: &AuthenticatedUser, client_id: &str) -> VaultResult<()> {
        let clients = ClientRepository::new(self.db());
        clients
            .get(&admin.tenant_id, client_id)?
            .ok_or(VaultError::NotFound("Client"))?;

        let scope = Scope::new(admin.tenant_id.clone(), client_id);
        let failed = self.clear_client(&scope);

        clients.delete(&scope.tenant_id, client_id)?;

        if failed.is_empty() {
            info!(client_id = %client_id, tenant_id = %scope.tenant_id, "Client deleted");
            Ok(())
        } else {
            warn!(client_id = %client_id, failed = ?failed, "Client deleted with incomplete cascade");
            Err(VaultError::Cascade { failed })
        }
    }

    /// Run every cascade branch to completion and return the names of the
    /// ones that failed.
    fn clear_client(&self, scope: &Scope) -> Vec<String> {
        let db = self.db();
        let files = self.files();

        thread::scope(|s| {
            let branches = vec![
                (
                    "assets",
                    s.spawn(move || -> BranchOutcome {
                        AssetRepository::standalone(db)
                            .delete_all(scope)
                            .map(|removed| removed.len())
                            .map_err(|e| e.to_string())
                    }),
                ),
                (
                    "showrooms",
                    s.spawn(move || -> BranchOutcome {
                        ShowroomRepository::new(db)
                            .delete_all(scope)
                            .map(|removed| removed.len())
                            .map_err(|e| e.to_string())
                    }),
                ),
                (
                    "showroom_assets",
                    s.spawn(move || -> BranchOutcome {
                        AssetRepository::showroom_assets(db)
                            .delete_all(scope)
                            .map(|removed| removed.len())
                            .map_err(|e| e.to_string())
                    }),
                ),
                (
                    "notifications",
                    s.spawn(move || -> BranchOutcome {
                        NotificationLedger::new(db)
                            .delete_for_client(&scope.tenant_id, &scope.client_id)
                            .map_err(|e| e.to_string())
                    }),
                ),
                (
                    "users",
                    s.spawn(move || -> BranchOutcome {
                        UserRepository::new(db)
                            .delete_for_client(&scope.tenant_id, &scope.client_id)
                            .map_err(|e| e.to_string())
                    }),
                ),
                (
                    "files",
                    s.spawn(move || -> BranchOutcome {
                        let dir = files.paths().client_dir(&scope.tenant_id, &scope.client_id);
                        files.delete_tree(&dir).map(|()| 0).map_err(|e| e.to_string())
                    }),
                ),
            ];

            let mut failed = Vec::new();
            for (branch, handle) in branches {
                match handle.join() {
                    Ok(Ok(removed)) => {
                        info!(branch, removed, client_id = %scope.client_id, "Cascade branch done");
                    }
                    Ok(Err(error)) => {
                        warn!(branch, error = %error, client_id = %scope.client_id, "Cascade branch failed");
                        failed.push(branch.to_string());
                    }
                    Err(_) => {
                        warn!(branch, client_id = %scope.client_id, "Cascade branch panicked");
                        failed.push(branch.to_string());
                    }
                }
            }
            failed
        })
    }
}
