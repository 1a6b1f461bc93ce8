// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset Vault - Multi-tenant Credential & Asset Vault Service
//!
//! Tenants keep client assets made of plaintext and secret fields, attach
//! files to them and group them into showrooms. Secret fields are sealed one
//! by one with AES-256-GCM before they reach storage. A daily sweep reminds
//! the tenant about assets that are about to expire.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token verification and tenant/client scope
//! - `crypto` - Per-field AES-256-GCM envelopes
//! - `notifications` - Expiration sweep, scheduler and mailer
//! - `storage` - Embedded database and upload tree
//! - `vault` - Tenant-scoped entity operations

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod notifications;
pub mod state;
pub mod storage;
pub mod vault;
