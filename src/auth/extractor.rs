// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::decode;

use super::{claims::TokenClaims, AuthError, AuthenticatedUser};
use crate::state::{AppState, AuthConfig};

/// Extractor for authenticated users.
///
/// Validates the HS256 bearer token from the Authorization header.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = verify_token(token, &state.auth_config)?;
        Ok(Auth(user))
    }
}

/// Verify a bearer token and build the caller context.
pub fn verify_token(token: &str, auth_config: &AuthConfig) -> Result<AuthenticatedUser, AuthError> {
    let claims = decode::<TokenClaims>(token, auth_config.decoding_key(), auth_config.validation())?.claims;
    if claims.tenant_id.trim().is_empty() || claims.user_id.trim().is_empty() {
        return Err(AuthError::MissingIdentity);
    }
    Ok(AuthenticatedUser::from_claims(claims))
}

/// Extractor that requires a SUPERADMIN or OWNER caller.
pub struct DirectoryAdmin(pub AuthenticatedUser);

impl FromRequestParts<AppState> for DirectoryAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.can_manage_directory() {
            return Err(AuthError::DirectoryRoleRequired);
        }

        Ok(DirectoryAdmin(user))
    }
}
