// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Standalone asset endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    vault::{AssetPatch, AssetView, CredentialView, Location, NewAsset, UploadedFile},
};

/// Most files accepted in one upload.
pub const MAX_UPLOAD_FILES: usize = 20;

/// Largest single file accepted, in bytes.
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Multipart field carrying the files.
const FILES_FIELD: &str = "files";

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetResponse {
    pub asset: AssetView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetListResponse {
    pub assets: Vec<AssetView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CredentialListResponse {
    pub credentials: Vec<CredentialView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Multipart upload body (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct FileUpload {
    #[schema(value_type = Vec<String>, format = Binary)]
    files: Vec<Vec<u8>>,
}

/// Collect the `files` parts of a multipart body.
pub async fn read_uploads(mut multipart: Multipart) -> Result<Vec<UploadedFile>, ApiError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if uploads.len() == MAX_UPLOAD_FILES {
            return Err(ApiError::bad_request(format!(
                "At most {MAX_UPLOAD_FILES} files per upload"
            )));
        }

        let original_name = field.file_name().unwrap_or("file").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(ApiError::bad_request(format!("{original_name} is too large")));
        }

        uploads.push(UploadedFile {
            original_name,
            mime_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(uploads)
}

#[utoipa::path(
    post,
    path = "/v1/assets",
    request_body = NewAsset,
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 201, body = AssetResponse),
        (status = 400, description = "Client scope is required"),
    )
)]
pub async fn create_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<NewAsset>,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    let asset = state.vault().create_asset(&user, Location::Client, request)?;
    Ok((StatusCode::CREATED, Json(AssetResponse { asset })))
}

#[utoipa::path(
    get,
    path = "/v1/assets",
    tag = "Assets",
    security(("bearer" = [])),
    responses((status = 200, body = AssetListResponse))
)]
pub async fn list_assets(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<AssetListResponse>, ApiError> {
    let assets = state.vault().list_assets(&user, Location::Client)?;
    Ok(Json(AssetListResponse { assets }))
}

#[utoipa::path(
    get,
    path = "/v1/assets/credentials",
    tag = "Assets",
    security(("bearer" = [])),
    responses((status = 200, body = CredentialListResponse))
)]
pub async fn list_credentials(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<CredentialListResponse>, ApiError> {
    let credentials = state.vault().credentials(&user)?;
    Ok(Json(CredentialListResponse { credentials }))
}

#[utoipa::path(
    get,
    path = "/v1/assets/{asset_id}",
    params(("asset_id" = String, Path, description = "Asset identifier")),
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetResponse),
        (status = 404, description = "Asset not found"),
    )
)]
pub async fn get_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(asset_id): Path<String>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.vault().get_asset(&user, Location::Client, &asset_id)?;
    Ok(Json(AssetResponse { asset }))
}

#[utoipa::path(
    patch,
    path = "/v1/assets/{asset_id}",
    params(("asset_id" = String, Path, description = "Asset identifier")),
    request_body = AssetPatch,
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetResponse),
        (status = 404, description = "Asset not found"),
    )
)]
pub async fn update_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(asset_id): Path<String>,
    Json(patch): Json<AssetPatch>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state
        .vault()
        .update_asset(&user, Location::Client, &asset_id, patch)?;
    Ok(Json(AssetResponse { asset }))
}

#[utoipa::path(
    delete,
    path = "/v1/assets/{asset_id}",
    params(("asset_id" = String, Path, description = "Asset identifier")),
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 404, description = "Asset not found"),
    )
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(asset_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.vault().delete_asset(&user, Location::Client, &asset_id)?;
    Ok(Json(DeletedResponse { deleted: true }))
}

#[utoipa::path(
    post,
    path = "/v1/assets/{asset_id}/files",
    params(("asset_id" = String, Path, description = "Asset identifier")),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 201, body = AssetResponse),
        (status = 400, description = "No files uploaded"),
        (status = 404, description = "Asset not found"),
    )
)]
pub async fn upload_asset_files(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(asset_id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    let uploads = read_uploads(multipart).await?;
    let asset = state
        .vault()
        .add_asset_files(&user, Location::Client, &asset_id, uploads)?;
    Ok((StatusCode::CREATED, Json(AssetResponse { asset })))
}

#[utoipa::path(
    delete,
    path = "/v1/assets/{asset_id}/files/{file_id}",
    params(
        ("asset_id" = String, Path, description = "Asset identifier"),
        ("file_id" = String, Path, description = "File identifier"),
    ),
    tag = "Assets",
    security(("bearer" = [])),
    responses(
        (status = 200, body = AssetResponse),
        (status = 404, description = "Asset or file not found"),
    )
)]
pub async fn delete_asset_file(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((asset_id, file_id)): Path<(String, String)>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state
        .vault()
        .remove_asset_file(&user, Location::Client, &asset_id, &file_id)?;
    Ok(Json(AssetResponse { asset }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{test_state, user_in};
    use crate::vault::FieldInput;

    fn request(name: &str) -> NewAsset {
        NewAsset {
            name: name.to_string(),
            description: None,
            asset_type: None,
            fields: vec![FieldInput {
                key: "password".to_string(),
                field_type: None,
                is_secret: true,
                value: Some("hunter2".to_string()),
            }],
            tags: vec!["infra".to_string()],
            expiration_date: None,
            expiration_notifications_enabled: false,
        }
    }

    #[tokio::test]
    async fn create_then_list() {
        let (state, _dir) = test_state();
        let user = user_in("t1", Some("c1"));

        let (status, Json(created)) = create_asset(
            State(state.clone()),
            Auth(user.clone()),
            Json(request("Router")),
        )
        .await
        .expect("asset creation succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.asset.fields[0].value, "hunter2");

        let Json(listed) = list_assets(State(state.clone()), Auth(user.clone()))
            .await
            .expect("asset listing succeeds");
        assert_eq!(listed.assets.len(), 1);
        assert_eq!(listed.assets[0].id, created.asset.id);

        let Json(credentials) = list_credentials(State(state), Auth(user))
            .await
            .expect("credential listing succeeds");
        assert_eq!(credentials.credentials.len(), 1);
    }

    #[tokio::test]
    async fn foreign_asset_is_404() {
        let (state, _dir) = test_state();
        let (_, Json(created)) = create_asset(
            State(state.clone()),
            Auth(user_in("t1", Some("c1"))),
            Json(request("Router")),
        )
        .await
        .unwrap();

        let err = get_asset(
            State(state),
            Auth(user_in("t2", Some("c1"))),
            Path(created.asset.id),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Asset not found");
    }

    #[tokio::test]
    async fn missing_client_scope_is_400() {
        let (state, _dir) = test_state();
        let err = create_asset(State(state), Auth(user_in("t1", None)), Json(request("x")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Client scope is required");
    }

    #[tokio::test]
    async fn delete_reports_deleted() {
        let (state, _dir) = test_state();
        let user = user_in("t1", Some("c1"));
        let (_, Json(created)) = create_asset(State(state.clone()), Auth(user.clone()), Json(request("x")))
            .await
            .unwrap();

        let Json(deleted) = delete_asset(State(state.clone()), Auth(user.clone()), Path(created.asset.id.clone()))
            .await
            .unwrap();
        assert!(deleted.deleted);

        let err = delete_asset(State(state), Auth(user), Path(created.asset.id))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
