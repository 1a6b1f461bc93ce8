// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Showroom, template and showroom asset endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::assets::{read_uploads, AssetListResponse, AssetResponse, DeletedResponse};
use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    vault::{
        AssetPatch, Location, NewAsset, NewShowroom, ShowroomPatch, ShowroomView, TemplateInput,
        TemplatePatch,
    },
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowroomResponse {
    pub showroom: ShowroomView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShowroomListResponse {
    pub showrooms: Vec<ShowroomView>,
}

// =============================================================================
// Showrooms
// =============================================================================

#[utoipa::path(
    post,
    path = "/v1/showrooms",
    request_body = NewShowroom,
    tag = "Showrooms",
    security(("bearer" = [])),
    responses((status = 201, body = ShowroomResponse))
)]
pub async fn create_showroom(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<NewShowroom>,
) -> Result<(StatusCode, Json<ShowroomResponse>), ApiError> {
    let showroom = state.vault().create_showroom(&user, request)?;
    Ok((StatusCode::CREATED, Json(ShowroomResponse { showroom })))
}

#[utoipa::path(
    get,
    path = "/v1/showrooms",
    tag = "Showrooms",
    security(("bearer" = [])),
    responses((status = 200, body = ShowroomListResponse))
)]
pub async fn list_showrooms(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<ShowroomListResponse>, ApiError> {
    let showrooms = state.vault().list_showrooms(&user)?;
    Ok(Json(ShowroomListResponse { showrooms }))
}

#[utoipa::path(
    get,
    path = "/v1/showrooms/{showroom_id}",
    params(("showroom_id" = String, Path, description = "Showroom identifier")),
    tag = "Showrooms",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ShowroomResponse),
        (status = 404, description = "Showroom not found"),
    )
)]
pub async fn get_showroom(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(showroom_id): Path<String>,
) -> Result<Json<ShowroomResponse>, ApiError> {
    let showroom = state.vault().get_showroom(&user, &showroom_id)?;
    Ok(Json(ShowroomResponse { showroom }))
}

#[utoipa::path(
    patch,
    path = "/v1/showrooms/{showroom_id}",
    params(("showroom_id" = String, Path, description = "Showroom identifier")),
    request_body = ShowroomPatch,
    tag = "Showrooms",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ShowroomResponse),
        (status = 404, description = "Showroom not found"),
    )
)]
pub async fn update_showroom(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(showroom_id): Path<String>,
    Json(patch): Json<ShowroomPatch>,
) -> Result<Json<ShowroomResponse>, ApiError> {
    let showroom = state.vault().update_showroom(&user, &showroom_id, patch)?;
    Ok(Json(ShowroomResponse { showroom }))
}

#[utoipa::path(
    delete,
    path = "/v1/showrooms/{showroom_id}",
    params(("showroom_id" = String, Path, description = "Showroom identifier")),
    tag = "Showrooms",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 404, description = "Showroom not found"),
    )
)]
pub async fn delete_showroom(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(showroom_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.vault().delete_showroom(&user, &showroom_id)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

// =============================================================================
// Templates
// =============================================================================

#[utoipa::path(
    post,
    path = "/v1/showrooms/{showroom_id}/templates",
    params(("showroom_id" = String, Path, description = "Showroom identifier")),
    request_body = TemplateInput,
    tag = "Showrooms",
    security(("bearer" = [])),
    responses(
        (status = 201, body = ShowroomResponse),
        (status = 404, description = "Showroom not found"),
    )
)]
pub async fn add_template(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(showroom_id): Path<String>,
    Json(request): Json<TemplateInput>,
) -> Result<(StatusCode, Json<ShowroomResponse>), ApiError> {
    let showroom = state.vault().add_template(&user, &showroom_id, request)?;
    Ok((StatusCode::CREATED, Json(ShowroomResponse { showroom })))
}

#[utoipa::path(
    patch,
    path = "/v1/showrooms/{showroom_id}/templates/{template_id}",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("template_id" = String, Path, description = "Template identifier"),
    ),
    request_body = TemplatePatch,
    tag = "Showrooms",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ShowroomResponse),
        (status = 404, description = "Showroom or template not found"),
    )
)]
pub async fn update_template(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, template_id)): Path<(String, String)>,
    Json(patch): Json<TemplatePatch>,
) -> Result<Json<ShowroomResponse>, ApiError> {
    let showroom = state
        .vault()
        .update_template(&user, &showroom_id, &template_id, patch)?;
    Ok(Json(ShowroomResponse { showroom }))
}

#[utoipa::path(
    delete,
    path = "/v1/showrooms/{showroom_id}/templates/{template_id}",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("template_id" = String, Path, description = "Template identifier"),
    ),
    tag = "Showrooms",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ShowroomResponse),
        (status = 404, description = "Showroom or template not found"),
    )
)]
pub async fn remove_template(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, template_id)): Path<(String, String)>,
) -> Result<Json<ShowroomResponse>, ApiError> {
    let showroom = state
        .vault()
        .remove_template(&user, &showroom_id, &template_id)?;
    Ok(Json(ShowroomResponse { showroom }))
}

// =============================================================================
// Showroom Assets
// =============================================================================

#[utoipa::path(
    post,
    path = "/v1/showrooms/{showroom_id}/assets",
    params(("showroom_id" = String, Path, description = "Showroom identifier")),
    request_body = NewAsset,
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 201, body = AssetResponse),
        (status = 404, description = "Showroom not found"),
    )
)]
pub async fn create_showroom_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(showroom_id): Path<String>,
    Json(request): Json<NewAsset>,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    let asset = state
        .vault()
        .create_asset(&user, Location::Showroom(&showroom_id), request)?;
    Ok((StatusCode::CREATED, Json(AssetResponse { asset })))
}

#[utoipa::path(
    get,
    path = "/v1/showrooms/{showroom_id}/assets",
    params(("showroom_id" = String, Path, description = "Showroom identifier")),
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetListResponse),
        (status = 404, description = "Showroom not found"),
    )
)]
pub async fn list_showroom_assets(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(showroom_id): Path<String>,
) -> Result<Json<AssetListResponse>, ApiError> {
    let assets = state
        .vault()
        .list_assets(&user, Location::Showroom(&showroom_id))?;
    Ok(Json(AssetListResponse { assets }))
}

#[utoipa::path(
    get,
    path = "/v1/showrooms/{showroom_id}/assets/{asset_id}",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("asset_id" = String, Path, description = "Asset identifier"),
    ),
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetResponse),
        (status = 404, description = "Showroom or asset not found"),
    )
)]
pub async fn get_showroom_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, asset_id)): Path<(String, String)>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state
        .vault()
        .get_asset(&user, Location::Showroom(&showroom_id), &asset_id)?;
    Ok(Json(AssetResponse { asset }))
}

#[utoipa::path(
    patch,
    path = "/v1/showrooms/{showroom_id}/assets/{asset_id}",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("asset_id" = String, Path, description = "Asset identifier"),
    ),
    request_body = AssetPatch,
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetResponse),
        (status = 404, description = "Showroom or asset not found"),
    )
)]
pub async fn update_showroom_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, asset_id)): Path<(String, String)>,
    Json(patch): Json<AssetPatch>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state
        .vault()
        .update_asset(&user, Location::Showroom(&showroom_id), &asset_id, patch)?;
    Ok(Json(AssetResponse { asset }))
}

#[utoipa::path(
    delete,
    path = "/v1/showrooms/{showroom_id}/assets/{asset_id}",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("asset_id" = String, Path, description = "Asset identifier"),
    ),
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 404, description = "Showroom or asset not found"),
    )
)]
pub async fn delete_showroom_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, asset_id)): Path<(String, String)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .vault()
        .delete_asset(&user, Location::Showroom(&showroom_id), &asset_id)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(
    post,
    path = "/v1/showrooms/{showroom_id}/assets/{asset_id}/files",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("asset_id" = String, Path, description = "Asset identifier"),
    ),
    request_body(content = super::assets::FileUpload, content_type = "multipart/form-data"),
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 201, body = AssetResponse),
        (status = 400, description = "No files uploaded"),
        (status = 404, description = "Showroom or asset not found"),
    )
)]
pub async fn upload_showroom_asset_files(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, asset_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    let uploads = read_uploads(multipart).await?;
    let asset = state.vault().add_asset_files(
        &user,
        Location::Showroom(&showroom_id),
        &asset_id,
        uploads,
    )?;
    Ok((StatusCode::CREATED, Json(AssetResponse { asset })))
}

#[utoipa::path(
    delete,
    path = "/v1/showrooms/{showroom_id}/assets/{asset_id}/files/{file_id}",
    params(
        ("showroom_id" = String, Path, description = "Showroom identifier"),
        ("asset_id" = String, Path, description = "Asset identifier"),
        ("file_id" = String, Path, description = "File identifier"),
    ),
    tag = "Showroom Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetResponse),
        (status = 404, description = "Showroom, asset or file not found"),
    )
)]
pub async fn delete_showroom_asset_file(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((showroom_id, asset_id, file_id)): Path<(String, String, String)>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.vault().remove_asset_file(
        &user,
        Location::Showroom(&showroom_id),
        &asset_id,
        &file_id,
    )?;
    Ok(Json(AssetResponse { asset }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{test_state, user_in};

    fn showroom_request() -> NewShowroom {
        NewShowroom {
            name: "Expo".to_string(),
            location: None,
            meta_fields: Vec::new(),
            templates: Vec::new(),
        }
    }

    fn asset_request() -> NewAsset {
        NewAsset {
            name: "Poster".to_string(),
            description: Some("Main hall".to_string()),
            asset_type: None,
            fields: Vec::new(),
            tags: Vec::new(),
            expiration_date: None,
            expiration_notifications_enabled: false,
        }
    }

    #[tokio::test]
    async fn showroom_assets_are_nested() {
        let (state, _dir) = test_state();
        let user = user_in("t1", Some("c1"));

        let (_, Json(created)) = create_showroom(State(state.clone()), Auth(user.clone()), Json(showroom_request()))
            .await
            .unwrap();
        let showroom_id = created.showroom.id;

        let (status, Json(asset)) = create_showroom_asset(
            State(state.clone()),
            Auth(user.clone()),
            Path(showroom_id.clone()),
            Json(asset_request()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(asset.asset.showroom_id.as_deref(), Some(showroom_id.as_str()));

        let Json(listed) = list_showroom_assets(State(state.clone()), Auth(user.clone()), Path(showroom_id.clone()))
            .await
            .unwrap();
        assert_eq!(listed.assets.len(), 1);

        // Standalone listing does not see showroom assets
        let Json(standalone) = super::super::assets::list_assets(State(state), Auth(user))
            .await
            .unwrap();
        assert!(standalone.assets.is_empty());
    }

    #[tokio::test]
    async fn foreign_showroom_is_404() {
        let (state, _dir) = test_state();
        let (_, Json(created)) = create_showroom(
            State(state.clone()),
            Auth(user_in("t1", Some("c1"))),
            Json(showroom_request()),
        )
        .await
        .unwrap();

        let err = list_showroom_assets(State(state), Auth(user_in("t1", Some("c2"))), Path(created.showroom.id))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Showroom not found");
    }
}
