// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! Every table maps an entity id to its JSON-serialized record.
//!
//! - `assets`: asset_id → StoredAsset (standalone assets)
//! - `showroom_assets`: asset_id → StoredAsset (assets inside a showroom)
//! - `showrooms`: showroom_id → StoredShowroom
//! - `notifications`: notification_id → StoredNotification
//! - `clients`: client_id → StoredClient
//! - `users`: user_id → StoredUser
//!
//! Each public method runs in its own transaction, so a read-modify-write
//! through [`VaultDatabase::update_where`] is atomic with respect to other
//! writers. Multi-table units of work go through [`VaultDatabase::transact`].

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, Table, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Key/value shape shared by every document table.
pub type DocTable = TableDefinition<'static, &'static str, &'static [u8]>;

pub const ASSETS: DocTable = TableDefinition::new("assets");
pub const SHOWROOM_ASSETS: DocTable = TableDefinition::new("showroom_assets");
pub const SHOWROOMS: DocTable = TableDefinition::new("showrooms");
pub const NOTIFICATIONS: DocTable = TableDefinition::new("notifications");
pub const CLIENTS: DocTable = TableDefinition::new("clients");
pub const USERS: DocTable = TableDefinition::new("users");

const ALL_TABLES: [DocTable; 6] = [ASSETS, SHOWROOM_ASSETS, SHOWROOMS, NOTIFICATIONS, CLIENTS, USERS];

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Document Helpers
// =============================================================================

/// Read and decode one document from an open table.
pub fn load_doc<T, R>(table: &R, id: &str) -> DbResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Encode and write one document into an open table.
pub fn store_doc<T: Serialize>(
    table: &mut Table<'_, &'static str, &'static [u8]>,
    id: &str,
    doc: &T,
) -> DbResult<()> {
    let json = serde_json::to_vec(doc)?;
    table.insert(id, json.as_slice())?;
    Ok(())
}

/// Decode every document in an open table that passes `filter`.
pub fn scan_docs<T, R, F>(table: &R, mut filter: F) -> DbResult<Vec<(String, T)>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
    F: FnMut(&T) -> bool,
{
    let mut out = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        let doc: T = serde_json::from_slice(value.value())?;
        if filter(&doc) {
            out.push((key.value().to_string(), doc));
        }
    }
    Ok(out)
}

// =============================================================================
// VaultDatabase
// =============================================================================

pub struct VaultDatabase {
    db: Database,
}

impl VaultDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        for table in ALL_TABLES {
            let _ = write_txn.open_table(table)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or overwrite a document.
    pub fn insert<T: Serialize>(&self, table: DocTable, id: &str, doc: &T) -> DbResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut t = write_txn.open_table(table)?;
            store_doc(&mut t, id, doc)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, table: DocTable, id: &str) -> DbResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        load_doc(&t, id)
    }

    /// All documents passing `filter`, in key order.
    pub fn scan<T, F>(&self, table: DocTable, filter: F) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        Ok(scan_docs(&t, filter)?.into_iter().map(|(_, doc)| doc).collect())
    }

    pub fn count<T, F>(&self, table: DocTable, filter: F) -> DbResult<usize>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        Ok(self.scan::<T, F>(table, filter)?.len())
    }

    /// Atomically read, check and mutate one document.
    ///
    /// Returns the updated document, or `None` if it does not exist or
    /// `predicate` rejects it (nothing is written in that case).
    pub fn update_where<T, P, M>(
        &self,
        table: DocTable,
        id: &str,
        predicate: P,
        mutate: M,
    ) -> DbResult<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        P: FnOnce(&T) -> bool,
        M: FnOnce(&mut T),
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut t = write_txn.open_table(table)?;
            match load_doc::<T, _>(&t, id)? {
                Some(mut doc) => {
                    if predicate(&doc) {
                        mutate(&mut doc);
                        store_doc(&mut t, id, &doc)?;
                        Some(doc)
                    } else {
                        None
                    }
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Mutate every document passing `filter`. Returns how many changed.
    pub fn update_all<T, F, M>(&self, table: DocTable, filter: F, mut mutate: M) -> DbResult<usize>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&T) -> bool,
        M: FnMut(&mut T),
    {
        let write_txn = self.db.begin_write()?;
        let changed = {
            let mut t = write_txn.open_table(table)?;
            let matches = scan_docs::<T, _, _>(&t, filter)?;
            let changed = matches.len();
            for (id, mut doc) in matches {
                mutate(&mut doc);
                store_doc(&mut t, &id, &doc)?;
            }
            changed
        };
        write_txn.commit()?;
        Ok(changed)
    }

    /// Remove one document if `predicate` accepts it. Returns the removed document.
    pub fn remove_where<T, P>(&self, table: DocTable, id: &str, predicate: P) -> DbResult<Option<T>>
    where
        T: DeserializeOwned,
        P: FnOnce(&T) -> bool,
    {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut t = write_txn.open_table(table)?;
            let found = load_doc::<T, _>(&t, id)?.filter(|doc| predicate(doc));
            if found.is_some() {
                t.remove(id)?;
            }
            found
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Remove every document passing `filter`. Returns the removed documents.
    pub fn remove_all<T, F>(&self, table: DocTable, filter: F) -> DbResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut t = write_txn.open_table(table)?;
            let doomed = scan_docs::<T, _, _>(&t, filter)?;
            for (id, _) in &doomed {
                t.remove(id.as_str())?;
            }
            doomed.into_iter().map(|(_, doc)| doc).collect()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Run a multi-table unit of work in one write transaction.
    ///
    /// Commits when `work` returns `Ok`; any error aborts the transaction.
    pub fn transact<R, F>(&self, work: F) -> DbResult<R>
    where
        F: FnOnce(&WriteTransaction) -> DbResult<R>,
    {
        let write_txn = self.db.begin_write()?;
        let result = work(&write_txn)?;
        write_txn.commit()?;
        Ok(result)
    }

    /// Verify the database can serve a read transaction.
    pub fn health_check(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(CLIENTS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Doc {
        id: String,
        tenant: String,
        hits: u32,
    }

    fn doc(id: &str, tenant: &str) -> Doc {
        Doc {
            id: id.to_string(),
            tenant: tenant.to_string(),
            hits: 0,
        }
    }

    fn test_db() -> (tempfile::TempDir, VaultDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let db = VaultDatabase::open(&dir.path().join("nested").join("vault.redb")).unwrap();
        (dir, db)
    }

    #[test]
    fn insert_get_and_scan() {
        let (_dir, db) = test_db();
        db.insert(CLIENTS, "a", &doc("a", "t1")).unwrap();
        db.insert(CLIENTS, "b", &doc("b", "t2")).unwrap();

        assert_eq!(db.get::<Doc>(CLIENTS, "a").unwrap(), Some(doc("a", "t1")));
        assert_eq!(db.get::<Doc>(CLIENTS, "missing").unwrap(), None);
        // tables are independent
        assert_eq!(db.get::<Doc>(USERS, "a").unwrap(), None);

        let t1: Vec<Doc> = db.scan(CLIENTS, |d: &Doc| d.tenant == "t1").unwrap();
        assert_eq!(t1, vec![doc("a", "t1")]);
        assert_eq!(db.count(CLIENTS, |_: &Doc| true).unwrap(), 2);
    }

    #[test]
    fn update_where_respects_predicate() {
        let (_dir, db) = test_db();
        db.insert(ASSETS, "a", &doc("a", "t1")).unwrap();

        let denied = db
            .update_where(ASSETS, "a", |d: &Doc| d.tenant == "t2", |d: &mut Doc| d.hits += 1)
            .unwrap();
        assert!(denied.is_none());

        let updated = db
            .update_where(ASSETS, "a", |d: &Doc| d.tenant == "t1", |d: &mut Doc| d.hits += 1)
            .unwrap();
        assert_eq!(updated.unwrap().hits, 1);
        assert_eq!(db.get::<Doc>(ASSETS, "a").unwrap().unwrap().hits, 1);
    }

    #[test]
    fn update_all_and_remove_all() {
        let (_dir, db) = test_db();
        for (id, tenant) in [("a", "t1"), ("b", "t1"), ("c", "t2")] {
            db.insert(NOTIFICATIONS, id, &doc(id, tenant)).unwrap();
        }

        let changed = db
            .update_all(NOTIFICATIONS, |d: &Doc| d.tenant == "t1", |d: &mut Doc| d.hits = 9)
            .unwrap();
        assert_eq!(changed, 2);
        assert_eq!(db.get::<Doc>(NOTIFICATIONS, "c").unwrap().unwrap().hits, 0);

        let removed: Vec<Doc> = db.remove_all(NOTIFICATIONS, |d: &Doc| d.hits == 9).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(db.count(NOTIFICATIONS, |_: &Doc| true).unwrap(), 1);
    }

    #[test]
    fn remove_where_returns_removed_doc() {
        let (_dir, db) = test_db();
        db.insert(SHOWROOMS, "s", &doc("s", "t1")).unwrap();

        assert!(db.remove_where::<Doc, _>(SHOWROOMS, "s", |d| d.tenant == "t2").unwrap().is_none());
        let removed = db.remove_where::<Doc, _>(SHOWROOMS, "s", |d| d.tenant == "t1").unwrap();
        assert_eq!(removed, Some(doc("s", "t1")));
        assert!(db.get::<Doc>(SHOWROOMS, "s").unwrap().is_none());
    }

    #[test]
    fn transact_spans_tables_and_aborts_on_error() {
        let (_dir, db) = test_db();

        db.transact(|txn| {
            store_doc(&mut txn.open_table(ASSETS)?, "a", &doc("a", "t1"))?;
            store_doc(&mut txn.open_table(NOTIFICATIONS)?, "n", &doc("n", "t1"))?;
            Ok(())
        })
        .unwrap();
        assert!(db.get::<Doc>(ASSETS, "a").unwrap().is_some());
        assert!(db.get::<Doc>(NOTIFICATIONS, "n").unwrap().is_some());

        let result: DbResult<()> = db.transact(|txn| {
            store_doc(&mut txn.open_table(ASSETS)?, "b", &doc("b", "t1"))?;
            Err(DbError::Serde(serde_json::from_str::<Doc>("{").unwrap_err()))
        });
        assert!(result.is_err());
        assert!(db.get::<Doc>(ASSETS, "b").unwrap().is_none());
    }

    #[test]
    fn reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.redb");
        {
            let db = VaultDatabase::open(&path).unwrap();
            db.insert(USERS, "u", &doc("u", "t1")).unwrap();
        }
        let db = VaultDatabase::open(&path).unwrap();
        assert!(db.get::<Doc>(USERS, "u").unwrap().is_some());
        db.health_check().unwrap();
    }
}
