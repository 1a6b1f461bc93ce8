// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::crypto::FieldCipher;
use crate::storage::{FileStore, VaultDatabase};
use crate::vault::Vault;

/// Clock skew tolerated on `exp`, in seconds.
const TOKEN_LEEWAY_SECS: u64 = 60;

/// Token verification settings.
#[derive(Clone)]
pub struct AuthConfig {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthConfig {
    /// HS256 verification with a shared secret.
    pub fn hs256(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = TOKEN_LEEWAY_SECS;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }
}

#[derive(Clone)]
pub struct AppState {
    pub vault: Vault,
    pub db: Arc<VaultDatabase>,
    pub files: Arc<FileStore>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(db: Arc<VaultDatabase>, files: Arc<FileStore>, cipher: Arc<FieldCipher>, auth_config: AuthConfig) -> Self {
        Self {
            vault: Vault::new(db.clone(), files.clone(), cipher),
            db,
            files,
            auth_config,
        }
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }
}

#[cfg(test)]
pub mod test_support {
    //! Fixtures shared by unit tests.

    use std::sync::Arc;

    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tempfile::TempDir;

    use super::{AppState, AuthConfig};
    use crate::auth::{AuthenticatedUser, Role, TokenClaims};
    use crate::crypto::FieldCipher;
    use crate::storage::{FileStore, StoragePaths, VaultDatabase};
    use crate::vault::Vault;

    pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

    /// Application state over a fresh temporary data and upload tree.
    pub fn test_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::under(dir.path());
        std::fs::create_dir_all(paths.data_dir()).unwrap();
        let db = VaultDatabase::open(&paths.database_file()).unwrap();
        let mut files = FileStore::new(paths);
        files.initialize().unwrap();
        let cipher = FieldCipher::from_key_bytes(&[7u8; 32]).unwrap();

        let state = AppState::new(
            Arc::new(db),
            Arc::new(files),
            Arc::new(cipher),
            AuthConfig::hs256(TEST_JWT_SECRET),
        );
        (state, dir)
    }

    pub fn test_vault() -> (Vault, TempDir) {
        let (state, dir) = test_state();
        (state.vault, dir)
    }

    /// Member of `tenant`, scoped to `client` when given.
    pub fn user_in(tenant: &str, client: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: format!("user-{tenant}-{}", client.unwrap_or("none")),
            tenant_id: tenant.to_string(),
            client_id: client.map(str::to_string),
            role_id: "role-member".to_string(),
            role_name: "MEMBER".to_string(),
            role: Role::Member,
        }
    }

    /// Tenant owner without a client scope.
    pub fn admin_in(tenant: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: format!("owner-{tenant}"),
            tenant_id: tenant.to_string(),
            client_id: None,
            role_id: "role-owner".to_string(),
            role_name: "OWNER".to_string(),
            role: Role::Owner,
        }
    }

    /// Signed HS256 token valid for one hour.
    pub fn token_for(user: &str, tenant: &str, client: Option<&str>, role_name: &str) -> String {
        let claims = TokenClaims {
            user_id: user.to_string(),
            tenant_id: tenant.to_string(),
            role_id: format!("role-{}", role_name.to_lowercase()),
            role_name: role_name.to_string(),
            client_id: client.map(str::to_string),
            exp: Utc::now().timestamp() + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }
}
