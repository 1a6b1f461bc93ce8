// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Field Encryption
//!
//! Secret asset fields are sealed one at a time with AES-256-GCM. Each sealed
//! value carries its own random 96-bit nonce, so two encryptions of the same
//! plaintext never produce the same envelope.
//!
//! The cipher is built once at startup from `ENCRYPTION_KEY` and shared
//! through application state. A key that does not resolve to 32 bytes stops
//! the process before it accepts any request.

pub mod field_cipher;

pub use field_cipher::{CryptoError, FieldCipher, SealedValue, KEY_LEN};
