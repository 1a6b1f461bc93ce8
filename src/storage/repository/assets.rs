// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset repository for the embedded database.
//!
//! Standalone assets live in the `assets` table; assets placed inside a
//! showroom live in `showroom_assets` and carry a `showroom_id`. Both share
//! [`StoredAsset`], and a repository instance is bound to one placement so
//! it can never return an asset from the other collection.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{load_doc, store_doc, DbResult, DocTable, VaultDatabase};
use super::super::database::{ASSETS, NOTIFICATIONS, SHOWROOM_ASSETS};
use super::super::{Arena, Scope, TenantScoped};
use super::notifications::StoredNotification;
use crate::crypto::SealedValue;

/// Most recent reminder timestamps kept per asset.
pub const REMINDER_LOG_CAP: usize = 32;

/// Kind of asset. `Files` assets hold attachments only and never expire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[default]
    General,
    Credentials,
    Files,
    Links,
}

/// Rendering hint for a field. Does not affect encryption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[default]
    Text,
    Password,
    Email,
    Username,
    Url,
    Note,
    Number,
}

/// Persisted field value: plaintext or a sealed envelope, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "storage", rename_all = "snake_case")]
pub enum FieldContent {
    Plain { value: String },
    Sealed { envelope: SealedValue },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredField {
    pub key: String,
    pub field_type: FieldType,
    pub content: FieldContent,
}

impl StoredField {
    pub fn is_secret(&self) -> bool {
        matches!(self.content, FieldContent::Sealed { .. })
    }
}

/// Metadata of a file written to the upload tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub filename: String,
    pub original_name: String,
    /// Path relative to the uploads root.
    pub relative_path: String,
    pub url: String,
    pub size: u64,
    pub mime_type: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub asset_type: AssetType,
    pub tenant_id: String,
    pub client_id: String,
    /// Set only for assets inside a showroom.
    pub showroom_id: Option<String>,
    pub fields: Arena<StoredField>,
    pub files: Arena<StoredFile>,
    pub tags: Vec<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub expiration_notifications_enabled: bool,
    /// Reminder dedup log, oldest first.
    pub notifications_sent_at: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for StoredAsset {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl StoredAsset {
    /// Whether a reminder already went out on `day` (UTC calendar date).
    pub fn reminded_on(&self, day: NaiveDate) -> bool {
        self.notifications_sent_at
            .iter()
            .any(|sent| sent.date_naive() == day)
    }

    /// Append to the dedup log, keeping only the newest entries.
    pub fn record_reminder(&mut self, at: DateTime<Utc>) {
        self.notifications_sent_at.push(at);
        let excess = self
            .notifications_sent_at
            .len()
            .saturating_sub(REMINDER_LOG_CAP);
        self.notifications_sent_at.drain(..excess);
    }

    /// Whether the sweep should consider this asset for a window.
    pub fn expires_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.expiration_notifications_enabled
            && self.asset_type != AssetType::Files
            && self
                .expiration_date
                .is_some_and(|date| date >= start && date <= end)
    }
}

/// Which collection (and showroom) a repository is bound to.
#[derive(Debug, Clone, Copy)]
enum Placement<'a> {
    Standalone,
    Showroom(&'a str),
    AnyShowroom,
}

/// Repository for asset operations.
pub struct AssetRepository<'a> {
    db: &'a VaultDatabase,
    placement: Placement<'a>,
}

impl<'a> AssetRepository<'a> {
    /// Assets that live directly under a client.
    pub fn standalone(db: &'a VaultDatabase) -> Self {
        Self {
            db,
            placement: Placement::Standalone,
        }
    }

    /// Assets inside one showroom.
    pub fn in_showroom(db: &'a VaultDatabase, showroom_id: &'a str) -> Self {
        Self {
            db,
            placement: Placement::Showroom(showroom_id),
        }
    }

    /// Assets inside any showroom (sweep and client cascade).
    pub fn showroom_assets(db: &'a VaultDatabase) -> Self {
        Self {
            db,
            placement: Placement::AnyShowroom,
        }
    }

    fn table(&self) -> DocTable {
        match self.placement {
            Placement::Standalone => ASSETS,
            Placement::Showroom(_) | Placement::AnyShowroom => SHOWROOM_ASSETS,
        }
    }

    fn placed(&self, asset: &StoredAsset) -> bool {
        match self.placement {
            Placement::Standalone => asset.showroom_id.is_none(),
            Placement::Showroom(id) => asset.showroom_id.as_deref() == Some(id),
            Placement::AnyShowroom => asset.showroom_id.is_some(),
        }
    }

    pub fn create(&self, asset: &StoredAsset) -> DbResult<()> {
        self.db.insert(self.table(), &asset.id, asset)
    }

    pub fn get(&self, scope: &Scope, asset_id: &str) -> DbResult<Option<StoredAsset>> {
        let asset = self.db.get::<StoredAsset>(self.table(), asset_id)?;
        Ok(asset.filter(|a| a.in_scope(scope) && self.placed(a)))
    }

    /// All assets in scope, newest first.
    pub fn list(&self, scope: &Scope) -> DbResult<Vec<StoredAsset>> {
        let mut assets = self
            .db
            .scan(self.table(), |a: &StoredAsset| a.in_scope(scope) && self.placed(a))?;
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(assets)
    }

    /// Apply `mutate` and bump `updated_at`. `None` when out of scope or absent.
    pub fn update<M>(&self, scope: &Scope, asset_id: &str, mutate: M) -> DbResult<Option<StoredAsset>>
    where
        M: FnOnce(&mut StoredAsset),
    {
        self.db.update_where(
            self.table(),
            asset_id,
            |a: &StoredAsset| a.in_scope(scope) && self.placed(a),
            |a| {
                mutate(a);
                a.updated_at = Utc::now();
            },
        )
    }

    pub fn delete(&self, scope: &Scope, asset_id: &str) -> DbResult<Option<StoredAsset>> {
        self.db.remove_where(self.table(), asset_id, |a: &StoredAsset| {
            a.in_scope(scope) && self.placed(a)
        })
    }

    /// Remove every asset in scope for this placement.
    pub fn delete_all(&self, scope: &Scope) -> DbResult<Vec<StoredAsset>> {
        self.db
            .remove_all(self.table(), |a: &StoredAsset| a.in_scope(scope) && self.placed(a))
    }

    /// Assets of every tenant whose expiration falls in `[start, end]`.
    pub fn expiring_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<StoredAsset>> {
        self.db.scan(self.table(), |a: &StoredAsset| {
            self.placed(a) && a.expires_within(start, end)
        })
    }

    /// Record a reminder and persist its notification in one transaction.
    ///
    /// Returns `false` (and writes nothing) if the asset is gone or was
    /// already reminded on the calendar day of `now`.
    pub fn claim_reminder(
        &self,
        asset_id: &str,
        now: DateTime<Utc>,
        notification: &StoredNotification,
    ) -> DbResult<bool> {
        let table = self.table();
        self.db.transact(|txn| {
            let mut assets = txn.open_table(table)?;
            let Some(mut asset) = load_doc::<StoredAsset, _>(&assets, asset_id)? else {
                return Ok(false);
            };
            if asset.reminded_on(now.date_naive()) {
                return Ok(false);
            }

            asset.record_reminder(now);
            store_doc(&mut assets, asset_id, &asset)?;

            let mut notifications = txn.open_table(NOTIFICATIONS)?;
            store_doc(&mut notifications, &notification.id, notification)?;
            Ok(true)
        })
    }
}
