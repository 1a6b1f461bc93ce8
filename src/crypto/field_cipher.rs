// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-GCM envelopes for individual secret fields.

use base64ct::{Base64, Encoding};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;

/// GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Errors raised while building the cipher or sealing/opening values.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("encryption key must resolve to {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("random nonce generation failed")]
    Rng,

    #[error("encryption failed")]
    Seal,

    #[error("malformed envelope: {0}")]
    Malformed(&'static str),

    #[error("authentication tag mismatch")]
    Authentication,
}

/// A sealed secret: base64 ciphertext, nonce, and tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedValue {
    pub cipher_text: String,
    pub iv: String,
    pub tag: String,
}

impl SealedValue {
    /// True when any component is missing, which reads back as an empty value.
    pub fn is_blank(&self) -> bool {
        self.cipher_text.is_empty() || self.iv.is_empty() || self.tag.is_empty()
    }
}

/// Process-wide field cipher. Construct once, share via `Arc`.
pub struct FieldCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Build the cipher from configured key material.
    ///
    /// Accepted forms, tried in order:
    /// 1. exactly 64 hex characters
    /// 2. base64 that decodes to 32 bytes
    /// 3. the raw UTF-8 bytes of the string
    pub fn from_key_material(raw: &str) -> Result<Self, CryptoError> {
        let key = resolve_key(raw)?;
        Self::from_key_bytes(&key)
    }

    pub fn from_key_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::InvalidKeyLength(bytes.len()));
        }
        let unbound = UnboundKey::new(&AES_256_GCM, bytes)
            .map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Seal a plaintext under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<SealedValue, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce_bytes).map_err(|_| CryptoError::Rng)?;

        let mut in_out = plaintext.as_bytes().to_vec();
        let tag = self
            .key
            .seal_in_place_separate_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| CryptoError::Seal)?;

        Ok(SealedValue {
            cipher_text: Base64::encode_string(&in_out),
            iv: Base64::encode_string(&nonce_bytes),
            tag: Base64::encode_string(tag.as_ref()),
        })
    }

    /// Open a sealed value.
    ///
    /// A blank envelope (any empty component) yields an empty string.
    /// Tampering with any component fails with `Authentication`.
    pub fn decrypt(&self, sealed: &SealedValue) -> Result<String, CryptoError> {
        if sealed.is_blank() {
            return Ok(String::new());
        }

        let cipher_text = Base64::decode_vec(&sealed.cipher_text)
            .map_err(|_| CryptoError::Malformed("cipherText is not base64"))?;
        let iv = Base64::decode_vec(&sealed.iv).map_err(|_| CryptoError::Malformed("iv is not base64"))?;
        let tag = Base64::decode_vec(&sealed.tag).map_err(|_| CryptoError::Malformed("tag is not base64"))?;

        if tag.len() != TAG_LEN {
            return Err(CryptoError::Malformed("tag must be 16 bytes"));
        }
        let nonce = Nonce::try_assume_unique_for_key(&iv)
            .map_err(|_| CryptoError::Malformed("iv must be 12 bytes"))?;

        let mut in_out = cipher_text;
        in_out.extend_from_slice(&tag);

        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Authentication)?;

        String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::Malformed("plaintext is not UTF-8"))
    }
}

fn resolve_key(raw: &str) -> Result<Vec<u8>, CryptoError> {
    if raw.len() == KEY_LEN * 2 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Ok(bytes) = hex::decode(raw) {
            return Ok(bytes);
        }
    }

    if let Ok(bytes) = Base64::decode_vec(raw) {
        if bytes.len() == KEY_LEN {
            return Ok(bytes);
        }
    }

    let bytes = raw.as_bytes();
    if bytes.len() == KEY_LEN {
        Ok(bytes.to_vec())
    } else {
        Err(CryptoError::InvalidKeyLength(bytes.len()))
    }
}
