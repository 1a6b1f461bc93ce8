// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path layout for the database file and the upload tree.
//!
//! Upload paths are returned relative to the uploads root so they can be
//! stored on file records and turned into download URLs.

use std::path::{Path, PathBuf};

/// Default directory for the embedded database.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default directory for uploaded files.
pub const DEFAULT_UPLOADS_DIR: &str = "./uploads";

/// Database file name inside the data directory.
const DATABASE_FILE: &str = "vault.redb";

/// URL prefix of the authenticated file download route.
pub const UPLOADS_URL_PREFIX: &str = "/v1/files";

#[derive(Debug, Clone)]
pub struct StoragePaths {
    data_dir: PathBuf,
    uploads_dir: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_UPLOADS_DIR)
    }
}

impl StoragePaths {
    pub fn new(data_dir: impl AsRef<Path>, uploads_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            uploads_dir: uploads_dir.as_ref().to_path_buf(),
        }
    }

    /// Lay both trees out under a single root (useful for testing).
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join("data"), root.join("uploads"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    // ========== Upload Tree (relative) ==========

    /// `{tenant}/{client}`
    pub fn client_dir(&self, tenant_id: &str, client_id: &str) -> PathBuf {
        PathBuf::from(tenant_id).join(client_id)
    }

    /// `{tenant}/{client}/{asset}`
    pub fn asset_dir(&self, tenant_id: &str, client_id: &str, asset_id: &str) -> PathBuf {
        self.client_dir(tenant_id, client_id).join(asset_id)
    }

    /// `{tenant}/{client}/showrooms/{showroom}`
    pub fn showroom_dir(&self, tenant_id: &str, client_id: &str, showroom_id: &str) -> PathBuf {
        self.client_dir(tenant_id, client_id)
            .join("showrooms")
            .join(showroom_id)
    }

    /// `{tenant}/{client}/showrooms/{showroom}/{asset}`
    pub fn showroom_asset_dir(
        &self,
        tenant_id: &str,
        client_id: &str,
        showroom_id: &str,
        asset_id: &str,
    ) -> PathBuf {
        self.showroom_dir(tenant_id, client_id, showroom_id).join(asset_id)
    }

    /// Absolute location of a relative upload path.
    pub fn resolve_upload(&self, relative: &Path) -> PathBuf {
        self.uploads_dir.join(relative)
    }
}

/// Download URL for a relative upload path.
pub fn upload_url(relative: &Path) -> String {
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("{UPLOADS_URL_PREFIX}/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let paths = StoragePaths::default();
        assert_eq!(paths.data_dir(), Path::new("./data"));
        assert_eq!(paths.uploads_dir(), Path::new("./uploads"));
        assert_eq!(paths.database_file(), PathBuf::from("./data/vault.redb"));
    }

    #[test]
    fn upload_tree_layout() {
        let paths = StoragePaths::under("/tmp/vault");
        assert_eq!(paths.client_dir("t1", "c1"), PathBuf::from("t1/c1"));
        assert_eq!(paths.asset_dir("t1", "c1", "a1"), PathBuf::from("t1/c1/a1"));
        assert_eq!(
            paths.showroom_dir("t1", "c1", "s1"),
            PathBuf::from("t1/c1/showrooms/s1")
        );
        assert_eq!(
            paths.showroom_asset_dir("t1", "c1", "s1", "a1"),
            PathBuf::from("t1/c1/showrooms/s1/a1")
        );
        assert_eq!(
            paths.resolve_upload(Path::new("t1/c1/a1")),
            PathBuf::from("/tmp/vault/uploads/t1/c1/a1")
        );
    }

    #[test]
    fn upload_urls_use_forward_slashes() {
        let paths = StoragePaths::default();
        let rel = paths.asset_dir("t1", "c1", "a1").join("f.png");
        assert_eq!(upload_url(&rel), "/v1/files/t1/c1/a1/f.png");
    }
}
