// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Vault Services
//!
//! Business operations over assets, showrooms and the client directory.
//! Every operation starts from the caller's [`AuthenticatedUser`]: tenant
//! and client come from the verified token, never from request bodies.
//!
//! Secret field values are sealed here on the way into storage and opened
//! here on the way out (see [`fields`]).

pub mod assets;
pub mod directory;
pub mod error;
pub mod fields;
pub mod showrooms;

use std::sync::Arc;

use crate::auth::AuthenticatedUser;
use crate::crypto::FieldCipher;
use crate::storage::{FileStore, Scope, VaultDatabase};

pub use assets::{AssetPatch, AssetView, CredentialView, FileView, Location, NewAsset, UploadedFile};
pub use directory::{NewClient, NewUser};
pub use error::{VaultError, VaultResult};
pub use fields::{FieldInput, FieldView};
pub use showrooms::{
    NewShowroom, ShowroomPatch, ShowroomView, SizeInput, TemplateInput, TemplatePatch, TemplateView,
};

/// Service handle shared by the HTTP layer and the integration tests.
#[derive(Clone)]
pub struct Vault {
    db: Arc<VaultDatabase>,
    files: Arc<FileStore>,
    cipher: Arc<FieldCipher>,
}

impl Vault {
    pub fn new(db: Arc<VaultDatabase>, files: Arc<FileStore>, cipher: Arc<FieldCipher>) -> Self {
        Self { db, files, cipher }
    }

    pub fn db(&self) -> &VaultDatabase {
        &self.db
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn cipher(&self) -> &FieldCipher {
        &self.cipher
    }
}

/// The caller's client scope, or [`VaultError::Scope`] for tenant-level tokens.
pub(crate) fn scope_of(user: &AuthenticatedUser) -> VaultResult<Scope> {
    Scope::for_user(user).ok_or(VaultError::Scope)
}
