// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field input/output and the seal/open boundary.
//!
//! Every field write goes through [`seal_fields`] and every field read
//! through [`open_fields`]. Secret values exist in plaintext only on the
//! way in from a request and on the way out in a response.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::crypto::{CryptoError, FieldCipher};
use crate::storage::{Arena, FieldContent, FieldType, StoredField};

/// A field as submitted by a client.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldInput {
    pub key: String,
    /// Defaults to TEXT.
    #[serde(default, rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub is_secret: bool,
    /// Missing means empty.
    #[serde(default)]
    pub value: Option<String>,
}

/// A field as returned to a client, secret values opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_secret: bool,
    pub value: String,
}

/// Seal secret inputs and keep the rest as plaintext.
pub fn seal_fields(cipher: &FieldCipher, inputs: Vec<FieldInput>) -> Result<Arena<StoredField>, CryptoError> {
    let mut fields = Arena::new();
    for input in inputs {
        let value = input.value.unwrap_or_default();
        let content = if input.is_secret {
            FieldContent::Sealed {
                envelope: cipher.encrypt(&value)?,
            }
        } else {
            FieldContent::Plain { value }
        };
        fields.push(StoredField {
            key: input.key,
            field_type: input.field_type.unwrap_or_default(),
            content,
        });
    }
    Ok(fields)
}

/// Open every field for a response. A tampered envelope is an error.
pub fn open_fields(cipher: &FieldCipher, fields: &Arena<StoredField>) -> Result<Vec<FieldView>, CryptoError> {
    fields
        .iter()
        .map(|(id, field)| {
            let value = match &field.content {
                FieldContent::Plain { value } => value.clone(),
                FieldContent::Sealed { envelope } => cipher.decrypt(envelope)?,
            };
            Ok(FieldView {
                id: id.to_string(),
                key: field.key.clone(),
                field_type: field.field_type,
                is_secret: field.is_secret(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::from_key_bytes(&[42u8; 32]).unwrap()
    }

    fn input(key: &str, secret: bool, value: Option<&str>) -> FieldInput {
        FieldInput {
            key: key.to_string(),
            field_type: None,
            is_secret: secret,
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn secrets_are_never_stored_in_plaintext() {
        let cipher = cipher();
        let fields = seal_fields(
            &cipher,
            vec![input("user", false, Some("admin")), input("password", true, Some("hunter2"))],
        )
        .unwrap();

        let json = serde_json::to_string(&fields).unwrap();
        assert!(json.contains("admin"));
        assert!(!json.contains("hunter2"));

        let (_, secret) = fields.iter().nth(1).unwrap();
        assert!(secret.is_secret());
    }

    #[test]
    fn open_restores_values_in_order() {
        let cipher = cipher();
        let fields = seal_fields(
            &cipher,
            vec![
                input("a", false, Some("plain")),
                input("b", true, Some("secret")),
                input("c", true, None),
            ],
        )
        .unwrap();

        let views = open_fields(&cipher, &fields).unwrap();
        let pairs: Vec<(&str, &str, bool)> = views
            .iter()
            .map(|v| (v.key.as_str(), v.value.as_str(), v.is_secret))
            .collect();
        assert_eq!(pairs, vec![("a", "plain", false), ("b", "secret", true), ("c", "", true)]);
        assert!(views.iter().all(|v| v.field_type == FieldType::Text));
    }

    #[test]
    fn tampered_secret_fails_loudly() {
        let cipher = cipher();
        let mut fields = seal_fields(&cipher, vec![input("pin", true, Some("1234"))]).unwrap();
        let id = fields.iter().next().unwrap().0.to_string();
        if let Some(StoredField {
            content: FieldContent::Sealed { envelope },
            ..
        }) = fields.get_mut(&id)
        {
            envelope.tag = crate::crypto::FieldCipher::from_key_bytes(&[1u8; 32])
                .unwrap()
                .encrypt("other")
                .unwrap()
                .tag;
        }

        assert!(open_fields(&cipher, &fields).is_err());
    }

    #[test]
    fn input_defaults() {
        let parsed: FieldInput = serde_json::from_str(r#"{"key":"k"}"#).unwrap();
        assert_eq!(parsed.field_type, None);
        assert!(!parsed.is_secret);
        assert!(parsed.value.is_none());

        let typed: FieldInput = serde_json::from_str(r#"{"key":"k","type":"PASSWORD","isSecret":true}"#).unwrap();
        assert_eq!(typed.field_type, Some(FieldType::Password));
        assert!(typed.is_secret);
    }
}
