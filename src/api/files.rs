// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Download of attached files. Only the owning client can read them.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::{auth::Auth, error::ApiError, state::AppState};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Stream back an attached file by its path under the upload root.
#[utoipa::path(
    get,
    path = "/v1/files/{path}",
    params(("path" = String, Path, description = "File path as returned in the file's `url`")),
    tag = "Files",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "File contents with the type recorded at upload"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "File not found"),
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let (file, bytes) = state.vault().read_asset_file(&user, &path)?;

    let content_type = HeaderValue::from_str(&file.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{}\"", file.filename))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
