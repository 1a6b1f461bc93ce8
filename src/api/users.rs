// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::{Auth, AuthenticatedUser, DirectoryAdmin},
    error::ApiError,
    state::AppState,
    storage::StoredUser,
    vault::NewUser,
};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserMeResponse {
    /// Identity taken from the verified token
    pub identity: AuthenticatedUser,
    /// Directory entry, when the caller was registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<StoredUser>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: StoredUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<StoredUser>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Only users of this client
    pub client_id: Option<String>,
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserMeResponse>, ApiError> {
    let profile = state.vault().find_user(&user)?;
    Ok(Json(UserMeResponse {
        identity: user,
        profile,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    params(UserFilter),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserListResponse),
        (status = 403, description = "Directory role required"),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    DirectoryAdmin(admin): DirectoryAdmin,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.vault().list_users(&admin, filter.client_id.as_deref())?;
    Ok(Json(UserListResponse { users }))
}

#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = NewUser,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 201, body = UserResponse),
        (status = 400, description = "Invalid email, missing client or duplicate"),
        (status = 403, description = "Directory role required"),
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    DirectoryAdmin(admin): DirectoryAdmin,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.vault().register_user(&admin, request)?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{admin_in, test_state, user_in};
    use crate::vault::NewClient;

    #[tokio::test]
    async fn me_without_directory_entry() {
        let (state, _dir) = test_state();
        let Json(me) = get_current_user(State(state), Auth(user_in("t1", Some("c1"))))
            .await
            .unwrap();
        assert_eq!(me.identity.tenant_id, "t1");
        assert!(me.profile.is_none());
    }

    #[tokio::test]
    async fn register_and_filter_by_client() {
        let (state, _dir) = test_state();
        let admin = admin_in("t1");
        let client = state
            .vault()
            .create_client(&admin, NewClient { name: "Acme".to_string() })
            .unwrap();

        let (status, Json(created)) = register_user(
            State(state.clone()),
            DirectoryAdmin(admin.clone()),
            Json(NewUser {
                email: "Ana@Example.com".to_string(),
                name: "Ana".to_string(),
                role_name: "member".to_string(),
                client_id: Some(client.id.clone()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.user.email, "ana@example.com");

        let Json(filtered) = list_users(
            State(state.clone()),
            DirectoryAdmin(admin.clone()),
            Query(UserFilter {
                client_id: Some(client.id),
            }),
        )
        .await
        .unwrap();
        assert_eq!(filtered.users.len(), 1);

        let Json(none) = list_users(
            State(state),
            DirectoryAdmin(admin),
            Query(UserFilter {
                client_id: Some("other".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(none.users.is_empty());
    }

    #[tokio::test]
    async fn member_role_needs_client() {
        let (state, _dir) = test_state();
        let err = register_user(
            State(state),
            DirectoryAdmin(admin_in("t1")),
            Json(NewUser {
                email: "bo@example.com".to_string(),
                name: "Bo".to_string(),
                role_name: "MEMBER".to_string(),
                client_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Client ID is required for this role");
    }
}
