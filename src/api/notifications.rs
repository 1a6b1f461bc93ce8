// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Notification endpoints.
//!
//! Reads are confined to the caller's tenant: broadcast notifications plus
//! those addressed to the caller.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{NotificationLedger, NotificationType, StoredNotification},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub asset_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showroom_name: Option<String>,
    pub days_until_expiry: i64,
    pub created_at: DateTime<Utc>,
}

impl From<StoredNotification> for NotificationView {
    fn from(n: StoredNotification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            is_read: n.is_read,
            asset_name: n.asset_name,
            showroom_name: n.showroom_name,
            days_until_expiry: n.days_until_expiry,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub notification: NotificationView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

/// Latest 50 notifications visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/v1/notifications",
    tag = "Notifications",
    security(("bearer" = [])),
    responses((status = 200, body = NotificationListResponse))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let notifications = NotificationLedger::new(&state.db)
        .list_for_user(&user.tenant_id, Some(&user.user_id))?
        .into_iter()
        .map(NotificationView::from)
        .collect();
    Ok(Json(NotificationListResponse { notifications }))
}

#[utoipa::path(
    get,
    path = "/v1/notifications/unread-count",
    tag = "Notifications",
    security(("bearer" = [])),
    responses((status = 200, body = UnreadCountResponse))
)]
pub async fn unread_count(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let count = NotificationLedger::new(&state.db).unread_count(&user.tenant_id, Some(&user.user_id))?;
    Ok(Json(UnreadCountResponse { count }))
}

#[utoipa::path(
    patch,
    path = "/v1/notifications/{notification_id}/read",
    params(("notification_id" = String, Path, description = "Notification identifier")),
    tag = "Notifications",
    security(("bearer" = [])),
    responses(
        (status = 200, body = NotificationResponse),
        (status = 404, description = "Notification not found"),
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(notification_id): Path<String>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = NotificationLedger::new(&state.db)
        .mark_read(&user.tenant_id, Some(&user.user_id), &notification_id)?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;
    Ok(Json(NotificationResponse {
        notification: notification.into(),
    }))
}

#[utoipa::path(
    patch,
    path = "/v1/notifications/read-all",
    tag = "Notifications",
    security(("bearer" = [])),
    responses((status = 200, body = MarkAllReadResponse))
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = NotificationLedger::new(&state.db).mark_all_read(&user.tenant_id, Some(&user.user_id))?;
    Ok(Json(MarkAllReadResponse { updated }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{test_state, user_in};
    use crate::storage::ReminderSubject;
    use axum::http::StatusCode;
    use chrono::Duration;

    fn notification(tenant: &str, user: Option<&str>, age_minutes: i64) -> StoredNotification {
        StoredNotification {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Asset expires in 3 days".to_string(),
            message: "Router expires in 3 days.".to_string(),
            notification_type: NotificationType::ExpirationReminder,
            tenant_id: tenant.to_string(),
            client_id: "c1".to_string(),
            user_id: user.map(str::to_string),
            subject: ReminderSubject::Asset("a1".to_string()),
            asset_name: "Router".to_string(),
            showroom_name: None,
            days_until_expiry: 3,
            is_read: false,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn caller_sees_broadcast_and_own() {
        let (state, _dir) = test_state();
        let user = user_in("t1", Some("c1"));
        let ledger = NotificationLedger::new(&state.db);
        ledger.create(&notification("t1", None, 10)).unwrap();
        ledger.create(&notification("t1", Some(&user.user_id), 5)).unwrap();
        ledger.create(&notification("t1", Some("someone-else"), 1)).unwrap();
        ledger.create(&notification("t2", None, 1)).unwrap();

        let Json(listed) = list_notifications(State(state.clone()), Auth(user.clone()))
            .await
            .unwrap();
        assert_eq!(listed.notifications.len(), 2);
        assert!(listed.notifications[0].created_at > listed.notifications[1].created_at);

        let Json(count) = unread_count(State(state), Auth(user)).await.unwrap();
        assert_eq!(count.count, 2);
    }

    #[tokio::test]
    async fn mark_read_then_all() {
        let (state, _dir) = test_state();
        let user = user_in("t1", Some("c1"));
        let first = notification("t1", None, 2);
        let ledger = NotificationLedger::new(&state.db);
        ledger.create(&first).unwrap();
        ledger.create(&notification("t1", None, 1)).unwrap();

        let Json(read) = mark_read(State(state.clone()), Auth(user.clone()), Path(first.id.clone()))
            .await
            .unwrap();
        assert!(read.notification.is_read);

        let Json(all) = mark_all_read(State(state.clone()), Auth(user.clone())).await.unwrap();
        assert_eq!(all.updated, 1);

        let Json(count) = unread_count(State(state), Auth(user)).await.unwrap();
        assert_eq!(count.count, 0);
    }

    #[tokio::test]
    async fn foreign_notification_is_404() {
        let (state, _dir) = test_state();
        let foreign = notification("t2", None, 1);
        NotificationLedger::new(&state.db).create(&foreign).unwrap();

        let err = mark_read(State(state), Auth(user_in("t1", Some("c1"))), Path(foreign.id))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Notification not found");
    }
}
