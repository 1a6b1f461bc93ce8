// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Showroom repository for the embedded database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{DbResult, VaultDatabase, SHOWROOMS};
use super::super::{Arena, Scope, TenantScoped};

/// Default unit for template sizes.
pub const DEFAULT_SIZE_UNIT: &str = "px";

/// Free-form key/value metadata on a showroom or template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetaField {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateSize {
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub unit: String,
}

/// Reusable size/metadata preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub name: String,
    pub description: Option<String>,
    pub sizes: Vec<TemplateSize>,
    pub meta_fields: Vec<MetaField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredShowroom {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub tenant_id: String,
    pub client_id: String,
    pub meta_fields: Vec<MetaField>,
    pub templates: Arena<StoredTemplate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for StoredShowroom {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// Repository for showroom operations.
pub struct ShowroomRepository<'a> {
    db: &'a VaultDatabase,
}

impl<'a> ShowroomRepository<'a> {
    pub fn new(db: &'a VaultDatabase) -> Self {
        Self { db }
    }

    pub fn create(&self, showroom: &StoredShowroom) -> DbResult<()> {
        self.db.insert(SHOWROOMS, &showroom.id, showroom)
    }

    pub fn get(&self, scope: &Scope, showroom_id: &str) -> DbResult<Option<StoredShowroom>> {
        let showroom = self.db.get::<StoredShowroom>(SHOWROOMS, showroom_id)?;
        Ok(showroom.filter(|s| s.in_scope(scope)))
    }

    /// Unscoped lookup, used by the sweep to name a reminder's showroom.
    pub fn find(&self, showroom_id: &str) -> DbResult<Option<StoredShowroom>> {
        self.db.get(SHOWROOMS, showroom_id)
    }

    /// All showrooms in scope, newest first.
    pub fn list(&self, scope: &Scope) -> DbResult<Vec<StoredShowroom>> {
        let mut showrooms = self
            .db
            .scan(SHOWROOMS, |s: &StoredShowroom| s.in_scope(scope))?;
        showrooms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(showrooms)
    }

    pub fn update<M>(&self, scope: &Scope, showroom_id: &str, mutate: M) -> DbResult<Option<StoredShowroom>>
    where
        M: FnOnce(&mut StoredShowroom),
    {
        self.db.update_where(
            SHOWROOMS,
            showroom_id,
            |s: &StoredShowroom| s.in_scope(scope),
            |s| {
                mutate(s);
                s.updated_at = Utc::now();
            },
        )
    }

    pub fn delete(&self, scope: &Scope, showroom_id: &str) -> DbResult<Option<StoredShowroom>> {
        self.db
            .remove_where(SHOWROOMS, showroom_id, |s: &StoredShowroom| s.in_scope(scope))
    }

    /// Remove every showroom of a client.
    pub fn delete_all(&self, scope: &Scope) -> DbResult<Vec<StoredShowroom>> {
        self.db
            .remove_all(SHOWROOMS, |s: &StoredShowroom| s.in_scope(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, VaultDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let db = VaultDatabase::open(&dir.path().join("vault.redb")).unwrap();
        (dir, db)
    }

    fn showroom(id: &str, tenant: &str, client: &str) -> StoredShowroom {
        let now = Utc::now();
        StoredShowroom {
            id: id.to_string(),
            name: format!("Showroom {id}"),
            location: Some("Berlin".to_string()),
            tenant_id: tenant.to_string(),
            client_id: client.to_string(),
            meta_fields: vec![MetaField {
                key: "floor".to_string(),
                value: "2".to_string(),
            }],
            templates: Arena::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn crud_is_scoped() {
        let (_dir, db) = test_db();
        let repo = ShowroomRepository::new(&db);
        repo.create(&showroom("s1", "t1", "c1")).unwrap();
        repo.create(&showroom("s2", "t1", "c2")).unwrap();

        let scope = Scope::new("t1", "c1");
        assert_eq!(repo.list(&scope).unwrap().len(), 1);
        assert!(repo.get(&scope, "s2").unwrap().is_none());
        assert!(repo.find("s2").unwrap().is_some());

        let renamed = repo
            .update(&scope, "s1", |s| s.name = "Renamed".to_string())
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.location.as_deref(), Some("Berlin"));
        assert!(repo.update(&scope, "s2", |s| s.name = "x".into()).unwrap().is_none());

        assert!(repo.delete(&scope, "s2").unwrap().is_none());
        assert!(repo.delete(&scope, "s1").unwrap().is_some());
        assert!(repo.list(&scope).unwrap().is_empty());
    }

    #[test]
    fn templates_persist_in_order() {
        let (_dir, db) = test_db();
        let repo = ShowroomRepository::new(&db);
        let mut s = showroom("s1", "t1", "c1");
        for name in ["banner", "poster"] {
            s.templates.push(StoredTemplate {
                name: name.to_string(),
                description: None,
                sizes: vec![TemplateSize {
                    label: "A".to_string(),
                    width: 100.0,
                    height: 50.0,
                    unit: DEFAULT_SIZE_UNIT.to_string(),
                }],
                meta_fields: Vec::new(),
            });
        }
        repo.create(&s).unwrap();

        let loaded = repo.get(&Scope::new("t1", "c1"), "s1").unwrap().unwrap();
        let names: Vec<&str> = loaded.templates.iter().map(|(_, t)| t.name.as_str()).collect();
        assert_eq!(names, vec!["banner", "poster"]);
    }
}
