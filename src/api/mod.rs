// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{AuthenticatedUser, Role},
    state::AppState,
    storage::{AssetType, FieldType, MetaField, NotificationType, StoredClient, StoredUser, TemplateSize},
    vault::{
        AssetPatch, AssetView, CredentialView, FieldInput, FieldView, FileView, NewAsset, NewClient,
        NewShowroom, NewUser, ShowroomPatch, ShowroomView, SizeInput, TemplateInput, TemplatePatch,
        TemplateView,
    },
};

pub mod assets;
pub mod clients;
pub mod files;
pub mod health;
pub mod notifications;
pub mod showrooms;
pub mod users;

/// Body limit on upload routes: a full batch of maximum-size files plus
/// multipart framing.
const UPLOAD_BODY_LIMIT: usize = assets::MAX_UPLOAD_FILES * assets::MAX_FILE_SIZE + 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        // Assets
        .route(
            "/assets",
            get(assets::list_assets).post(assets::create_asset),
        )
        .route("/assets/credentials", get(assets::list_credentials))
        .route(
            "/assets/{asset_id}",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route(
            "/assets/{asset_id}/files",
            post(assets::upload_asset_files).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/assets/{asset_id}/files/{file_id}",
            axum::routing::delete(assets::delete_asset_file),
        )
        // Showrooms
        .route(
            "/showrooms",
            get(showrooms::list_showrooms).post(showrooms::create_showroom),
        )
        .route(
            "/showrooms/{showroom_id}",
            get(showrooms::get_showroom)
                .patch(showrooms::update_showroom)
                .delete(showrooms::delete_showroom),
        )
        .route(
            "/showrooms/{showroom_id}/templates",
            post(showrooms::add_template),
        )
        .route(
            "/showrooms/{showroom_id}/templates/{template_id}",
            patch(showrooms::update_template).delete(showrooms::remove_template),
        )
        .route(
            "/showrooms/{showroom_id}/assets",
            get(showrooms::list_showroom_assets).post(showrooms::create_showroom_asset),
        )
        .route(
            "/showrooms/{showroom_id}/assets/{asset_id}",
            get(showrooms::get_showroom_asset)
                .patch(showrooms::update_showroom_asset)
                .delete(showrooms::delete_showroom_asset),
        )
        .route(
            "/showrooms/{showroom_id}/assets/{asset_id}/files",
            post(showrooms::upload_showroom_asset_files)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/showrooms/{showroom_id}/assets/{asset_id}/files/{file_id}",
            axum::routing::delete(showrooms::delete_showroom_asset_file),
        )
        .route("/files/{*path}", get(files::get_file))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", patch(notifications::mark_all_read))
        .route(
            "/notifications/{notification_id}/read",
            patch(notifications::mark_read),
        )
        // Directory
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/{client_id}",
            axum::routing::delete(clients::delete_client),
        )
        .route("/users", get(users::list_users).post(users::register_user))
        .route("/users/me", get(users::get_current_user))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        assets::create_asset,
        assets::list_assets,
        assets::list_credentials,
        assets::get_asset,
        assets::update_asset,
        assets::delete_asset,
        assets::upload_asset_files,
        assets::delete_asset_file,
        showrooms::create_showroom,
        showrooms::list_showrooms,
        showrooms::get_showroom,
        showrooms::update_showroom,
        showrooms::delete_showroom,
        showrooms::add_template,
        showrooms::update_template,
        showrooms::remove_template,
        showrooms::create_showroom_asset,
        showrooms::list_showroom_assets,
        showrooms::get_showroom_asset,
        showrooms::update_showroom_asset,
        showrooms::delete_showroom_asset,
        showrooms::upload_showroom_asset_files,
        showrooms::delete_showroom_asset_file,
        files::get_file,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
        clients::create_client,
        clients::list_clients,
        clients::delete_client,
        users::get_current_user,
        users::list_users,
        users::register_user
    ),
    components(
        schemas(
            AssetType,
            FieldType,
            MetaField,
            TemplateSize,
            NotificationType,
            StoredClient,
            StoredUser,
            AuthenticatedUser,
            Role,
            FieldInput,
            FieldView,
            FileView,
            NewAsset,
            AssetPatch,
            AssetView,
            CredentialView,
            SizeInput,
            TemplateInput,
            TemplatePatch,
            TemplateView,
            NewShowroom,
            ShowroomPatch,
            ShowroomView,
            NewClient,
            NewUser,
            assets::AssetResponse,
            assets::AssetListResponse,
            assets::CredentialListResponse,
            assets::DeletedResponse,
            assets::FileUpload,
            showrooms::ShowroomResponse,
            showrooms::ShowroomListResponse,
            notifications::NotificationView,
            notifications::NotificationListResponse,
            notifications::NotificationResponse,
            notifications::UnreadCountResponse,
            notifications::MarkAllReadResponse,
            clients::ClientResponse,
            clients::ClientListResponse,
            users::UserMeResponse,
            users::UserResponse,
            users::UserListResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Assets", description = "Standalone client assets and credentials"),
        (name = "Showrooms", description = "Showrooms and their templates"),
        (name = "Showroom Assets", description = "Assets placed in a showroom"),
        (name = "Files", description = "Attached file downloads"),
        (name = "Notifications", description = "Expiration reminders"),
        (name = "Clients", description = "Client directory"),
        (name = "Users", description = "User directory")
    )
)]
pub struct ApiDoc;
