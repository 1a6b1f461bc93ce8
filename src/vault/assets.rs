// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset operations, for both standalone and showroom assets.
//!
//! The two kinds share one code path. A [`Location`] picks the collection;
//! for showroom assets the showroom itself is checked against the caller's
//! scope before anything else happens.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::fields::{open_fields, seal_fields, FieldInput, FieldView};
use super::{scope_of, Vault, VaultError, VaultResult};
use crate::auth::AuthenticatedUser;
use crate::storage::paths::upload_url;
use crate::storage::{
    Arena, AssetRepository, AssetType, FileStoreError, Scope, ShowroomRepository, StoredAsset,
    StoredFile,
};

/// Longest file extension kept from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 16;

/// Where an asset lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location<'a> {
    /// Directly under the caller's client.
    Client,
    /// Inside the given showroom.
    Showroom(&'a str),
}

impl Location<'_> {
    fn label(&self) -> &'static str {
        match self {
            Location::Client => "Asset",
            Location::Showroom(_) => "Showroom asset",
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to GENERAL.
    #[serde(default, rename = "type")]
    pub asset_type: Option<AssetType>,
    #[serde(default)]
    pub fields: Vec<FieldInput>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration_notifications_enabled: bool,
}

/// Partial update. Absent members are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub asset_type: Option<AssetType>,
    /// Replaces the whole field list when present.
    #[serde(default)]
    pub fields: Option<Vec<FieldInput>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// `null` clears the date; absent leaves it.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub expiration_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub expiration_notifications_enabled: Option<bool>,
}

/// Distinguishes an explicit `null` from an absent member.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// File bytes received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub relative_path: String,
    pub url: String,
    pub size: u64,
    pub mime_type: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub tenant_id: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showroom_id: Option<String>,
    pub fields: Vec<FieldView>,
    pub files: Vec<FileView>,
    pub tags: Vec<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub expiration_notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential listing entry: fields only, no files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub fields: Vec<FieldView>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn file_views(files: &Arena<StoredFile>) -> Vec<FileView> {
    files
        .iter()
        .map(|(id, f)| FileView {
            id: id.to_string(),
            filename: f.filename.clone(),
            original_name: f.original_name.clone(),
            relative_path: f.relative_path.clone(),
            url: f.url.clone(),
            size: f.size,
            mime_type: f.mime_type.clone(),
            uploaded_by: f.uploaded_by.clone(),
            uploaded_at: f.uploaded_at,
        })
        .collect()
}

/// Server-side file name: a fresh id plus the sanitized original extension.
fn stored_file_name(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .map(|ext| {
            ext.to_string_lossy()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .take(MAX_EXTENSION_LEN)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .unwrap_or_default();

    if extension.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{extension}", Uuid::new_v4())
    }
}

// =============================================================================
// Operations
// =============================================================================

impl Vault {
    /// Resolve the caller's scope and the repository for `location`.
    fn locate<'a>(
        &'a self,
        user: &AuthenticatedUser,
        location: Location<'a>,
    ) -> VaultResult<(Scope, AssetRepository<'a>)> {
        let scope = scope_of(user)?;
        let repo = match location {
            Location::Client => AssetRepository::standalone(self.db()),
            Location::Showroom(showroom_id) => {
                ShowroomRepository::new(self.db())
                    .get(&scope, showroom_id)?
                    .ok_or(VaultError::NotFound("Showroom"))?;
                AssetRepository::in_showroom(self.db(), showroom_id)
            }
        };
        Ok((scope, repo))
    }

    /// Upload directory of an asset, relative to the uploads root.
    fn asset_files_dir(&self, scope: &Scope, location: Location<'_>, asset_id: &str) -> PathBuf {
        let paths = self.files().paths();
        match location {
            Location::Client => paths.asset_dir(&scope.tenant_id, &scope.client_id, asset_id),
            Location::Showroom(showroom_id) => {
                paths.showroom_asset_dir(&scope.tenant_id, &scope.client_id, showroom_id, asset_id)
            }
        }
    }

    pub(crate) fn asset_view(&self, asset: &StoredAsset) -> VaultResult<AssetView> {
        Ok(AssetView {
            id: asset.id.clone(),
            name: asset.name.clone(),
            description: asset.description.clone(),
            asset_type: asset.asset_type,
            tenant_id: asset.tenant_id.clone(),
            client_id: asset.client_id.clone(),
            showroom_id: asset.showroom_id.clone(),
            fields: open_fields(self.cipher(), &asset.fields)?,
            files: file_views(&asset.files),
            tags: asset.tags.clone(),
            expiration_date: asset.expiration_date,
            expiration_notifications_enabled: asset.expiration_notifications_enabled,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        })
    }

    pub fn create_asset(
        &self,
        user: &AuthenticatedUser,
        location: Location<'_>,
        input: NewAsset,
    ) -> VaultResult<AssetView> {
        let (scope, repo) = self.locate(user, location)?;
        let now = Utc::now();
        let asset = StoredAsset {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            asset_type: input.asset_type.unwrap_or_default(),
            tenant_id: scope.tenant_id,
            client_id: scope.client_id,
            showroom_id: match location {
                Location::Client => None,
                Location::Showroom(id) => Some(id.to_string()),
            },
            fields: seal_fields(self.cipher(), input.fields)?,
            files: Arena::new(),
            tags: input.tags,
            expiration_date: input.expiration_date,
            expiration_notifications_enabled: input.expiration_notifications_enabled,
            notifications_sent_at: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        repo.create(&asset)?;

        info!(asset_id = %asset.id, tenant_id = %asset.tenant_id, "Asset created");
        self.asset_view(&asset)
    }

    /// Assets of the caller's client (or showroom), newest first.
    pub fn list_assets(&self, user: &AuthenticatedUser, location: Location<'_>) -> VaultResult<Vec<AssetView>> {
        let (scope, repo) = self.locate(user, location)?;
        repo.list(&scope)?
            .iter()
            .map(|asset| self.asset_view(asset))
            .collect()
    }

    pub fn get_asset(
        &self,
        user: &AuthenticatedUser,
        location: Location<'_>,
        asset_id: &str,
    ) -> VaultResult<AssetView> {
        let (scope, repo) = self.locate(user, location)?;
        let asset = repo
            .get(&scope, asset_id)?
            .ok_or(VaultError::NotFound(location.label()))?;
        self.asset_view(&asset)
    }

    pub fn update_asset(
        &self,
        user: &AuthenticatedUser,
        location: Location<'_>,
        asset_id: &str,
        patch: AssetPatch,
    ) -> VaultResult<AssetView> {
        let (scope, repo) = self.locate(user, location)?;
        // Seal before opening the write transaction so a crypto failure
        // leaves the record untouched.
        let fields = patch
            .fields
            .map(|inputs| seal_fields(self.cipher(), inputs))
            .transpose()?;

        let updated = repo
            .update(&scope, asset_id, |asset| {
                if let Some(name) = patch.name {
                    asset.name = name;
                }
                if let Some(description) = patch.description {
                    asset.description = Some(description);
                }
                if let Some(asset_type) = patch.asset_type {
                    asset.asset_type = asset_type;
                }
                if let Some(fields) = fields {
                    asset.fields = fields;
                }
                if let Some(tags) = patch.tags {
                    asset.tags = tags;
                }
                if let Some(expiration_date) = patch.expiration_date {
                    asset.expiration_date = expiration_date;
                }
                if let Some(enabled) = patch.expiration_notifications_enabled {
                    asset.expiration_notifications_enabled = enabled;
                }
            })?
            .ok_or(VaultError::NotFound(location.label()))?;

        self.asset_view(&updated)
    }

    /// Delete an asset and its upload directory.
    pub fn delete_asset(&self, user: &AuthenticatedUser, location: Location<'_>, asset_id: &str) -> VaultResult<()> {
        let (scope, repo) = self.locate(user, location)?;
        repo.delete(&scope, asset_id)?
            .ok_or(VaultError::NotFound(location.label()))?;

        self.files()
            .delete_tree(&self.asset_files_dir(&scope, location, asset_id))?;
        info!(asset_id = %asset_id, tenant_id = %scope.tenant_id, "Asset deleted");
        Ok(())
    }

    /// Write uploaded files to the asset's directory and record them.
    pub fn add_asset_files(
        &self,
        user: &AuthenticatedUser,
        location: Location<'_>,
        asset_id: &str,
        uploads: Vec<UploadedFile>,
    ) -> VaultResult<AssetView> {
        if uploads.is_empty() {
            return Err(VaultError::bad_request("No files uploaded"));
        }

        let (scope, repo) = self.locate(user, location)?;
        repo.get(&scope, asset_id)?
            .ok_or(VaultError::NotFound(location.label()))?;

        let dir = self.asset_files_dir(&scope, location, asset_id);
        let now = Utc::now();
        let mut written: Vec<StoredFile> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let filename = stored_file_name(&upload.original_name);
            let relative = dir.join(&filename);
            if let Err(e) = self.files().write(&relative, &upload.bytes) {
                self.discard_files(&written);
                return Err(e.into());
            }
            written.push(StoredFile {
                filename,
                original_name: upload.original_name,
                relative_path: relative.to_string_lossy().replace('\\', "/"),
                url: upload_url(&relative),
                size: upload.bytes.len() as u64,
                mime_type: upload.mime_type,
                uploaded_by: user.user_id.clone(),
                uploaded_at: now,
            });
        }

        let records = written.clone();
        let updated = match repo.update(&scope, asset_id, |asset| {
            for file in records {
                asset.files.push(file);
            }
        }) {
            Ok(Some(asset)) => asset,
            Ok(None) => {
                self.discard_files(&written);
                return Err(VaultError::NotFound(location.label()));
            }
            Err(e) => {
                self.discard_files(&written);
                return Err(e.into());
            }
        };

        info!(asset_id = %asset_id, count = written.len(), "Files attached");
        self.asset_view(&updated)
    }

    /// Remove a file record and then the file on disk.
    pub fn remove_asset_file(
        &self,
        user: &AuthenticatedUser,
        location: Location<'_>,
        asset_id: &str,
        file_id: &str,
    ) -> VaultResult<AssetView> {
        let (scope, repo) = self.locate(user, location)?;
        let asset = repo
            .get(&scope, asset_id)?
            .ok_or(VaultError::NotFound(location.label()))?;
        let file = asset
            .files
            .get(file_id)
            .cloned()
            .ok_or(VaultError::NotFound("File"))?;

        let updated = repo
            .update(&scope, asset_id, |asset| {
                asset.files.remove(file_id);
            })?
            .ok_or(VaultError::NotFound(location.label()))?;

        self.files().delete(Path::new(&file.relative_path))?;
        self.asset_view(&updated)
    }

    /// An attached file and its bytes, addressed by its path under the
    /// upload root. Paths outside the caller's client, and files no asset
    /// record points at, are reported as not found.
    pub fn read_asset_file(
        &self,
        user: &AuthenticatedUser,
        relative_path: &str,
    ) -> VaultResult<(StoredFile, Vec<u8>)> {
        let scope = scope_of(user)?;
        let segments: Vec<&str> = relative_path.split('/').collect();
        let (location, asset_id) = match segments.as_slice() {
            [tenant, client, rest @ ..] if *tenant == scope.tenant_id && *client == scope.client_id => {
                match rest {
                    [asset_id, _] => (Location::Client, *asset_id),
                    ["showrooms", showroom_id, asset_id, _] => (Location::Showroom(*showroom_id), *asset_id),
                    _ => return Err(VaultError::NotFound("File")),
                }
            }
            _ => return Err(VaultError::NotFound("File")),
        };

        let (scope, repo) = match self.locate(user, location) {
            Ok(found) => found,
            Err(VaultError::NotFound(_)) => return Err(VaultError::NotFound("File")),
            Err(e) => return Err(e),
        };
        let file = repo
            .get(&scope, asset_id)?
            .and_then(|asset| {
                asset
                    .files
                    .iter()
                    .map(|(_, file)| file)
                    .find(|file| file.relative_path == relative_path)
                    .cloned()
            })
            .ok_or(VaultError::NotFound("File"))?;

        match self.files().read(Path::new(&file.relative_path)) {
            Ok(bytes) => Ok((file, bytes)),
            Err(FileStoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %file.relative_path, "File record has no data on disk");
                Err(VaultError::NotFound("File"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Standalone assets without attachments, fields opened, newest first.
    pub fn credentials(&self, user: &AuthenticatedUser) -> VaultResult<Vec<CredentialView>> {
        let (scope, repo) = self.locate(user, Location::Client)?;
        repo.list(&scope)?
            .into_iter()
            .filter(|asset| asset.files.is_empty())
            .map(|asset| {
                Ok(CredentialView {
                    fields: open_fields(self.cipher(), &asset.fields)?,
                    id: asset.id,
                    name: asset.name,
                    asset_type: asset.asset_type,
                    tags: asset.tags,
                    created_at: asset.created_at,
                    updated_at: asset.updated_at,
                })
            })
            .collect()
    }

    fn discard_files(&self, files: &[StoredFile]) {
        for file in files {
            if let Err(e) = self.files().delete(Path::new(&file.relative_path)) {
                warn!(path = %file.relative_path, error = %e, "Failed to discard uploaded file");
            }
        }
    }
}
