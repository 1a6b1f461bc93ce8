// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Caller identity comes from an HS256 bearer token issued by the identity
//! provider and verified with `JWT_SECRET_KEY`.
//!
//! ## Auth Flow
//!
//! 1. The client logs in with the identity provider and receives a token
//! 2. Requests carry `Authorization: Bearer <token>`
//! 3. The server verifies signature and expiry, then extracts
//!    `userId`, `tenantId`, `clientId?`, `roleId` and `roleName`
//!
//! The tenant and client in the token are the only scope the vault trusts.
//! Clock skew tolerance is 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod roles;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::{Auth, DirectoryAdmin};
pub use roles::Role;
