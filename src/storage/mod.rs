// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent state of the vault lives in two places:
//!
//! - an embedded redb database (`DATA_DIR/vault.redb`) holding every record
//!   as a JSON document, one table per collection
//! - the upload tree (`UPLOADS_DIR`) holding attached files
//!
//! ## Upload Layout
//!
//! ```text
//! uploads/
//!   {tenant_id}/{client_id}/
//!     {asset_id}/{file}                         # standalone asset files
//!     showrooms/{showroom_id}/{asset_id}/{file} # showroom asset files
//! ```
//!
//! ## Isolation
//!
//! Repositories for client-owned records take a [`Scope`] on every read,
//! update and delete. A record outside the caller's scope is reported
//! exactly like a missing one.
//!
//! Secret field values reach this layer already sealed; nothing here
//! encrypts or decrypts.

pub mod arena;
pub mod database;
pub mod file_store;
pub mod paths;
pub mod repository;
pub mod scope;

pub use arena::Arena;
pub use database::{DbError, DbResult, VaultDatabase};
pub use file_store::{FileStore, FileStoreError, FileStoreResult};
pub use paths::StoragePaths;
pub use repository::{
    AssetRepository, AssetType, ClientRepository, FieldContent, FieldType, MetaField,
    NotificationLedger, NotificationType, ReminderSubject, ShowroomRepository, StoredAsset,
    StoredClient, StoredField, StoredFile, StoredNotification, StoredShowroom, StoredTemplate,
    StoredUser, TemplateSize, UserRepository,
};
pub use scope::{Scope, TenantScoped};
