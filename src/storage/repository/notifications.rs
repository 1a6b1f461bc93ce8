// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notification ledger.
//!
//! Notifications are written by the expiration sweep and only ever change by
//! being marked read. A notification without a `user_id` is broadcast to the
//! whole tenant; one with a `user_id` is private to that user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{DbResult, VaultDatabase, NOTIFICATIONS};

/// Maximum notifications returned by a listing.
pub const LIST_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ExpirationReminder,
    ExpirationToday,
}

/// The entity a reminder is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderSubject {
    Asset(String),
    ShowroomAsset(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub tenant_id: String,
    pub client_id: String,
    /// `None` means tenant-wide broadcast.
    pub user_id: Option<String>,
    pub subject: ReminderSubject,
    pub asset_name: String,
    pub showroom_name: Option<String>,
    pub days_until_expiry: i64,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl StoredNotification {
    /// Visibility rule: same tenant, and either broadcast or addressed to `user_id`.
    ///
    /// With no `user_id` every notification of the tenant is visible.
    pub fn visible_to(&self, tenant_id: &str, user_id: Option<&str>) -> bool {
        if self.tenant_id != tenant_id {
            return false;
        }
        match (user_id, self.user_id.as_deref()) {
            (Some(reader), Some(owner)) => reader == owner,
            _ => true,
        }
    }
}

/// Repository for the notification ledger.
pub struct NotificationLedger<'a> {
    db: &'a VaultDatabase,
}

impl<'a> NotificationLedger<'a> {
    pub fn new(db: &'a VaultDatabase) -> Self {
        Self { db }
    }

    pub fn create(&self, notification: &StoredNotification) -> DbResult<()> {
        self.db.insert(NOTIFICATIONS, &notification.id, notification)
    }

    /// Latest [`LIST_LIMIT`] visible notifications, newest first.
    pub fn list_for_user(
        &self,
        tenant_id: &str,
        user_id: Option<&str>,
    ) -> DbResult<Vec<StoredNotification>> {
        let mut visible = self.db.scan(NOTIFICATIONS, |n: &StoredNotification| {
            n.visible_to(tenant_id, user_id)
        })?;
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        visible.truncate(LIST_LIMIT);
        Ok(visible)
    }

    /// Mark one notification read. `None` if absent or not visible to the caller.
    pub fn mark_read(
        &self,
        tenant_id: &str,
        user_id: Option<&str>,
        notification_id: &str,
    ) -> DbResult<Option<StoredNotification>> {
        self.db.update_where(
            NOTIFICATIONS,
            notification_id,
            |n: &StoredNotification| n.visible_to(tenant_id, user_id),
            |n| n.is_read = true,
        )
    }

    /// Mark every visible unread notification read. Returns how many changed.
    pub fn mark_all_read(&self, tenant_id: &str, user_id: Option<&str>) -> DbResult<usize> {
        self.db.update_all(
            NOTIFICATIONS,
            |n: &StoredNotification| !n.is_read && n.visible_to(tenant_id, user_id),
            |n: &mut StoredNotification| n.is_read = true,
        )
    }

    pub fn unread_count(&self, tenant_id: &str, user_id: Option<&str>) -> DbResult<usize> {
        self.db.count(NOTIFICATIONS, |n: &StoredNotification| {
            !n.is_read && n.visible_to(tenant_id, user_id)
        })
    }

    /// Delete read notifications created before `cutoff`. Unread ones are kept.
    pub fn purge_read_before(&self, cutoff: DateTime<Utc>) -> DbResult<usize> {
        let removed = self.db.remove_all(NOTIFICATIONS, |n: &StoredNotification| {
            n.is_read && n.created_at < cutoff
        })?;
        Ok(removed.len())
    }

    /// Delete every notification about a client (client cascade).
    pub fn delete_for_client(&self, tenant_id: &str, client_id: &str) -> DbResult<usize> {
        let removed = self.db.remove_all(NOTIFICATIONS, |n: &StoredNotification| {
            n.tenant_id == tenant_id && n.client_id == client_id
        })?;
        Ok(removed.len())
    }
}
