// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use asset_vault_server::auth::{AuthenticatedUser, Role};
use asset_vault_server::crypto::FieldCipher;
use asset_vault_server::notifications::{MailError, Mailer};
use asset_vault_server::storage::{FileStore, StoragePaths, VaultDatabase};
use asset_vault_server::vault::{NewClient, NewUser, Vault};
use async_trait::async_trait;
use tempfile::TempDir;

pub struct Fixture {
    pub vault: Vault,
    pub db: Arc<VaultDatabase>,
    pub files: Arc<FileStore>,
    _dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::under(dir.path());
        std::fs::create_dir_all(paths.data_dir()).unwrap();
        let db = Arc::new(VaultDatabase::open(&paths.database_file()).unwrap());
        let mut files = FileStore::new(paths);
        files.initialize().unwrap();
        let files = Arc::new(files);
        let cipher = Arc::new(FieldCipher::from_key_bytes(&[42u8; 32]).unwrap());

        Self {
            vault: Vault::new(db.clone(), files.clone(), cipher),
            db,
            files,
            _dir: dir,
        }
    }

    /// Create a client in `tenant` and return a member scoped to it.
    pub fn member_of_new_client(&self, tenant: &str, name: &str) -> AuthenticatedUser {
        let client = self
            .vault
            .create_client(&owner(tenant), NewClient { name: name.to_string() })
            .unwrap();
        member(tenant, &client.id)
    }

    /// Register an active directory user for the member's client.
    pub fn register(&self, member: &AuthenticatedUser, email: &str, name: &str) {
        self.vault
            .register_user(
                &owner(&member.tenant_id),
                NewUser {
                    email: email.to_string(),
                    name: name.to_string(),
                    role_name: "MEMBER".to_string(),
                    client_id: member.client_id.clone(),
                },
            )
            .unwrap();
    }
}

pub fn owner(tenant: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: format!("owner-{tenant}"),
        tenant_id: tenant.to_string(),
        client_id: None,
        role_id: "role-owner".to_string(),
        role_name: "OWNER".to_string(),
        role: Role::Owner,
    }
}

pub fn member(tenant: &str, client_id: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: format!("member-{tenant}-{client_id}"),
        tenant_id: tenant.to_string(),
        client_id: Some(client_id.to_string()),
        role_id: "role-member".to_string(),
        role_name: "MEMBER".to_string(),
        role: Role::Member,
    }
}

/// Mailer that records deliveries and fails for addresses containing `bounce`.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), MailError> {
        if to.contains("bounce") {
            return Err(MailError::Rejected(550));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}
