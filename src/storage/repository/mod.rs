// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the vault database.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the VaultDatabase for all reads and writes.

pub mod assets;
pub mod directory;
pub mod notifications;
pub mod showrooms;

pub use assets::{AssetRepository, AssetType, FieldContent, FieldType, StoredAsset, StoredField, StoredFile};
pub use directory::{ClientRepository, StoredClient, StoredUser, UserRepository};
pub use notifications::{NotificationLedger, NotificationType, ReminderSubject, StoredNotification};
pub use showrooms::{MetaField, ShowroomRepository, StoredShowroom, StoredTemplate, TemplateSize};
