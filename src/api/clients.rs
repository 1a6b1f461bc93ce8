// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client directory endpoints. Require a directory role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::assets::DeletedResponse;
use crate::{auth::DirectoryAdmin, error::ApiError, state::AppState, storage::StoredClient, vault::NewClient};

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub client: StoredClient,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientListResponse {
    pub clients: Vec<StoredClient>,
}

#[utoipa::path(
    post,
    path = "/v1/clients",
    request_body = NewClient,
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 201, body = ClientResponse),
        (status = 403, description = "Directory role required"),
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    DirectoryAdmin(admin): DirectoryAdmin,
    Json(request): Json<NewClient>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    let client = state.vault().create_client(&admin, request)?;
    Ok((StatusCode::CREATED, Json(ClientResponse { client })))
}

#[utoipa::path(
    get,
    path = "/v1/clients",
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ClientListResponse),
        (status = 403, description = "Directory role required"),
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    DirectoryAdmin(admin): DirectoryAdmin,
) -> Result<Json<ClientListResponse>, ApiError> {
    let clients = state.vault().list_clients(&admin)?;
    Ok(Json(ClientListResponse { clients }))
}

/// Delete a client together with its showrooms, assets, notifications,
/// users and uploaded files.
#[utoipa::path(
    delete,
    path = "/v1/clients/{client_id}",
    params(("client_id" = String, Path, description = "Client identifier")),
    tag = "Clients",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 404, description = "Client not found"),
        (status = 500, description = "Cascade delete incomplete"),
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    DirectoryAdmin(admin): DirectoryAdmin,
    Path(client_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.vault().delete_client(&admin, &client_id)?;
    Ok(Json(DeletedResponse { deleted: true }))
}
