// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Showroom and template operations.
//!
//! Assets inside a showroom are handled by the asset operations with
//! [`Location::Showroom`](super::Location::Showroom).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{scope_of, Vault, VaultError, VaultResult};
use crate::auth::AuthenticatedUser;
use crate::storage::repository::showrooms::DEFAULT_SIZE_UNIT;
use crate::storage::{
    Arena, AssetRepository, MetaField, ShowroomRepository, StoredShowroom, StoredTemplate,
    TemplateSize,
};

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeInput {
    pub label: String,
    pub width: f64,
    pub height: f64,
    /// Defaults to "px".
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sizes: Vec<SizeInput>,
    #[serde(default)]
    pub meta_fields: Vec<MetaField>,
}

/// Partial template update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sizes: Option<Vec<SizeInput>>,
    #[serde(default)]
    pub meta_fields: Option<Vec<MetaField>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewShowroom {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meta_fields: Vec<MetaField>,
    #[serde(default)]
    pub templates: Vec<TemplateInput>,
}

/// Partial showroom update. `templates` replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShowroomPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meta_fields: Option<Vec<MetaField>>,
    #[serde(default)]
    pub templates: Option<Vec<TemplateInput>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sizes: Vec<TemplateSize>,
    pub meta_fields: Vec<MetaField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShowroomView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub tenant_id: String,
    pub client_id: String,
    pub meta_fields: Vec<MetaField>,
    pub templates: Vec<TemplateView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredShowroom> for ShowroomView {
    fn from(showroom: &StoredShowroom) -> Self {
        Self {
            id: showroom.id.clone(),
            name: showroom.name.clone(),
            location: showroom.location.clone(),
            tenant_id: showroom.tenant_id.clone(),
            client_id: showroom.client_id.clone(),
            meta_fields: showroom.meta_fields.clone(),
            templates: showroom
                .templates
                .iter()
                .map(|(id, t)| TemplateView {
                    id: id.to_string(),
                    name: t.name.clone(),
                    description: t.description.clone(),
                    sizes: t.sizes.clone(),
                    meta_fields: t.meta_fields.clone(),
                })
                .collect(),
            created_at: showroom.created_at,
            updated_at: showroom.updated_at,
        }
    }
}

fn normalize_sizes(sizes: Vec<SizeInput>) -> Vec<TemplateSize> {
    sizes
        .into_iter()
        .map(|s| TemplateSize {
            label: s.label,
            width: s.width,
            height: s.height,
            unit: s
                .unit
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_SIZE_UNIT.to_string()),
        })
        .collect()
}

impl From<TemplateInput> for StoredTemplate {
    fn from(input: TemplateInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            sizes: normalize_sizes(input.sizes),
            meta_fields: input.meta_fields,
        }
    }
}

fn template_arena(inputs: Vec<TemplateInput>) -> Arena<StoredTemplate> {
    inputs.into_iter().map(StoredTemplate::from).collect()
}

// =============================================================================
// Operations
// =============================================================================

impl Vault {
    pub fn create_showroom(&self, user: &AuthenticatedUser, input: NewShowroom) -> VaultResult<ShowroomView> {
        let scope = scope_of(user)?;
        let now = Utc::now();
        let showroom = StoredShowroom {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            location: input.location,
            tenant_id: scope.tenant_id,
            client_id: scope.client_id,
            meta_fields: input.meta_fields,
            templates: template_arena(input.templates),
            created_at: now,
            updated_at: now,
        };
        ShowroomRepository::new(self.db()).create(&showroom)?;

        info!(showroom_id = %showroom.id, tenant_id = %showroom.tenant_id, "Showroom created");
        Ok(ShowroomView::from(&showroom))
    }

    /// Showrooms of the caller's client, newest first.
    pub fn list_showrooms(&self, user: &AuthenticatedUser) -> VaultResult<Vec<ShowroomView>> {
        let scope = scope_of(user)?;
        let showrooms = ShowroomRepository::new(self.db()).list(&scope)?;
        Ok(showrooms.iter().map(ShowroomView::from).collect())
    }

    pub fn get_showroom(&self, user: &AuthenticatedUser, showroom_id: &str) -> VaultResult<ShowroomView> {
        let scope = scope_of(user)?;
        ShowroomRepository::new(self.db())
            .get(&scope, showroom_id)?
            .map(|s| ShowroomView::from(&s))
            .ok_or(VaultError::NotFound("Showroom"))
    }

    pub fn update_showroom(
        &self,
        user: &AuthenticatedUser,
        showroom_id: &str,
        patch: ShowroomPatch,
    ) -> VaultResult<ShowroomView> {
        let scope = scope_of(user)?;
        ShowroomRepository::new(self.db())
            .update(&scope, showroom_id, |showroom| {
                if let Some(name) = patch.name {
                    showroom.name = name;
                }
                if let Some(location) = patch.location {
                    showroom.location = Some(location);
                }
                if let Some(meta_fields) = patch.meta_fields {
                    showroom.meta_fields = meta_fields;
                }
                if let Some(templates) = patch.templates {
                    showroom.templates = template_arena(templates);
                }
            })?
            .map(|s| ShowroomView::from(&s))
            .ok_or(VaultError::NotFound("Showroom"))
    }

    /// Delete a showroom, its assets and its upload tree.
    pub fn delete_showroom(&self, user: &AuthenticatedUser, showroom_id: &str) -> VaultResult<()> {
        let scope = scope_of(user)?;
        ShowroomRepository::new(self.db())
            .delete(&scope, showroom_id)?
            .ok_or(VaultError::NotFound("Showroom"))?;

        let removed = AssetRepository::in_showroom(self.db(), showroom_id).delete_all(&scope)?;
        self.files().delete_tree(&self.files().paths().showroom_dir(
            &scope.tenant_id,
            &scope.client_id,
            showroom_id,
        ))?;

        info!(
            showroom_id = %showroom_id,
            assets_removed = removed.len(),
            "Showroom deleted"
        );
        Ok(())
    }

    pub fn add_template(
        &self,
        user: &AuthenticatedUser,
        showroom_id: &str,
        input: TemplateInput,
    ) -> VaultResult<ShowroomView> {
        let scope = scope_of(user)?;
        ShowroomRepository::new(self.db())
            .update(&scope, showroom_id, |showroom| {
                showroom.templates.push(StoredTemplate::from(input));
            })?
            .map(|s| ShowroomView::from(&s))
            .ok_or(VaultError::NotFound("Showroom"))
    }

    pub fn update_template(
        &self,
        user: &AuthenticatedUser,
        showroom_id: &str,
        template_id: &str,
        patch: TemplatePatch,
    ) -> VaultResult<ShowroomView> {
        let scope = scope_of(user)?;
        let mut found = false;
        let showroom = ShowroomRepository::new(self.db())
            .update(&scope, showroom_id, |showroom| {
                if let Some(template) = showroom.templates.get_mut(template_id) {
                    found = true;
                    if let Some(name) = patch.name {
                        template.name = name;
                    }
                    if let Some(description) = patch.description {
                        template.description = Some(description);
                    }
                    if let Some(sizes) = patch.sizes {
                        template.sizes = normalize_sizes(sizes);
                    }
                    if let Some(meta_fields) = patch.meta_fields {
                        template.meta_fields = meta_fields;
                    }
                }
            })?
            .ok_or(VaultError::NotFound("Showroom"))?;

        if !found {
            return Err(VaultError::NotFound("Template"));
        }
        Ok(ShowroomView::from(&showroom))
    }

    pub fn remove_template(
        &self,
        user: &AuthenticatedUser,
        showroom_id: &str,
        template_id: &str,
    ) -> VaultResult<ShowroomView> {
        let scope = scope_of(user)?;
        let mut found = false;
        let showroom = ShowroomRepository::new(self.db())
            .update(&scope, showroom_id, |showroom| {
                found = showroom.templates.remove(template_id).is_some();
            })?
            .ok_or(VaultError::NotFound("Showroom"))?;

        if !found {
            return Err(VaultError::NotFound("Template"));
        }
        Ok(ShowroomView::from(&showroom))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::state::test_support::{test_vault, user_in};
    use crate::vault::{Location, NewAsset, UploadedFile};

    fn new_showroom(name: &str) -> NewShowroom {
        NewShowroom {
            name: name.to_string(),
            location: Some("Hall 4".to_string()),
            meta_fields: Vec::new(),
            templates: vec![TemplateInput {
                name: "banner".to_string(),
                description: None,
                sizes: vec![SizeInput {
                    label: "wide".to_string(),
                    width: 1920.0,
                    height: 480.0,
                    unit: None,
                }],
                meta_fields: Vec::new(),
            }],
        }
    }

    fn poster() -> NewAsset {
        NewAsset {
            name: "Poster".to_string(),
            description: None,
            asset_type: None,
            fields: Vec::new(),
            tags: Vec::new(),
            expiration_date: None,
            expiration_notifications_enabled: false,
        }
    }

    #[test]
    fn create_defaults_size_unit() {
        let (vault, _dir) = test_vault();
        let user = user_in("t1", Some("c1"));

        let view = vault.create_showroom(&user, new_showroom("Expo")).unwrap();
        assert_eq!(view.templates.len(), 1);
        assert_eq!(view.templates[0].sizes[0].unit, "px");
        assert_eq!(vault.list_showrooms(&user).unwrap().len(), 1);
        assert!(vault.list_showrooms(&user_in("t1", Some("c2"))).unwrap().is_empty());
    }

    #[test]
    fn partial_update_keeps_other_members() {
        let (vault, _dir) = test_vault();
        let user = user_in("t1", Some("c1"));
        let created = vault.create_showroom(&user, new_showroom("Expo")).unwrap();

        let view = vault
            .update_showroom(
                &user,
                &created.id,
                ShowroomPatch {
                    name: Some("Expo 2026".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(view.name, "Expo 2026");
        assert_eq!(view.location.as_deref(), Some("Hall 4"));
        assert_eq!(view.templates.len(), 1);

        let err = vault
            .update_showroom(&user_in("t2", Some("c1")), &created.id, ShowroomPatch::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Showroom not found");
    }

    #[test]
    fn template_lifecycle() {
        let (vault, _dir) = test_vault();
        let user = user_in("t1", Some("c1"));
        let created = vault.create_showroom(&user, new_showroom("Expo")).unwrap();

        let view = vault
            .add_template(
                &user,
                &created.id,
                TemplateInput {
                    name: "flyer".to_string(),
                    description: Some("A5".to_string()),
                    sizes: vec![SizeInput {
                        label: "A5".to_string(),
                        width: 148.0,
                        height: 210.0,
                        unit: Some("mm".to_string()),
                    }],
                    meta_fields: Vec::new(),
                },
            )
            .unwrap();
        assert_eq!(view.templates.len(), 2);
        let flyer_id = view.templates[1].id.clone();

        let view = vault
            .update_template(
                &user,
                &created.id,
                &flyer_id,
                TemplatePatch {
                    name: Some("leaflet".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(view.templates[1].name, "leaflet");
        assert_eq!(view.templates[1].description.as_deref(), Some("A5"));
        assert_eq!(view.templates[1].sizes[0].unit, "mm");

        let err = vault
            .update_template(&user, &created.id, "missing", TemplatePatch::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Template not found");

        let view = vault.remove_template(&user, &created.id, &flyer_id).unwrap();
        assert_eq!(view.templates.len(), 1);
        assert!(matches!(
            vault.remove_template(&user, &created.id, &flyer_id),
            Err(VaultError::NotFound("Template"))
        ));
    }

    #[test]
    fn delete_cascades_to_assets_and_files() {
        let (vault, _dir) = test_vault();
        let user = user_in("t1", Some("c1"));
        let showroom = vault.create_showroom(&user, new_showroom("Expo")).unwrap();
        let location = Location::Showroom(&showroom.id);

        let asset = vault.create_asset(&user, location, poster()).unwrap();
        let view = vault
            .add_asset_files(
                &user,
                location,
                &asset.id,
                vec![UploadedFile {
                    original_name: "poster.png".to_string(),
                    mime_type: "image/png".to_string(),
                    bytes: b"png".to_vec(),
                }],
            )
            .unwrap();
        let file_path = view.files[0].relative_path.clone();
        assert!(file_path.starts_with(&format!("t1/c1/showrooms/{}/{}/", showroom.id, asset.id)));

        vault.delete_showroom(&user, &showroom.id).unwrap();

        assert!(!vault.files().exists(Path::new(&file_path)));
        assert!(AssetRepository::showroom_assets(vault.db())
            .list(&crate::storage::Scope::new("t1", "c1"))
            .unwrap()
            .is_empty());
        assert!(matches!(
            vault.list_assets(&user, location),
            Err(VaultError::NotFound("Showroom"))
        ));
    }
}
