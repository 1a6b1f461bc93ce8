// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy of the vault services.

use crate::crypto::CryptoError;
use crate::storage::{DbError, FileStoreError};

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The caller's token names no client.
    #[error("Client scope is required")]
    Scope,

    /// Absent, or owned by another tenant/client. The two are not told apart.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),

    #[error("storage failure: {0}")]
    Storage(#[from] DbError),

    #[error("file store failure: {0}")]
    Files(#[from] FileStoreError),

    /// Some branches of a cascade delete failed; the others completed.
    #[error("cascade delete incomplete: {}", failed.join(", "))]
    Cascade { failed: Vec<String> },
}

pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        VaultError::BadRequest(message.into())
    }
}
