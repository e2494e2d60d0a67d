//! Bundled static content used by synthesized pages.

use crate::base::context::IoResultExt;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Read-only store of bundled assets, looked up by relative name.
pub trait AssetStore: Send + Sync {
    /// The full content of `name`, or `None` if it is not bundled.
    fn open(&self, name: &str) -> Option<Bytes>;
}

/// Store with no assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn open(&self, _name: &str) -> Option<Bytes> {
        None
    }
}

/// Assets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, Bytes>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Bytes>) {
        self.assets.insert(name.into(), content.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_asset(mut self, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.insert(name, content);
        self
    }
}

impl AssetStore for MemoryAssetStore {
    fn open(&self, name: &str) -> Option<Bytes> {
        self.assets.get(name).cloned()
    }
}

/// Assets read from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileAssetStore {
    root: PathBuf,
}

impl FileAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // Only plain relative names may be resolved under the root.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let rel = Path::new(name);
        if rel.as_os_str().is_empty()
            || !rel.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }
}

impl AssetStore for FileAssetStore {
    fn open(&self, name: &str) -> Option<Bytes> {
        let Some(path) = self.resolve(name) else {
            tracing::debug!(asset = name, "refusing asset name outside the store");
            return None;
        };
        match std::fs::read(&path).asset_context(name) {
            Ok(content) => Some(Bytes::from(content)),
            Err(e) => {
                tracing::debug!(error = %e, "asset lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_assets() {
        assert!(NoAssets.open("anything").is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryAssetStore::new().with_asset("webkit/a.html", "<p>a</p>");
        assert_eq!(store.open("webkit/a.html"), Some(Bytes::from_static(b"<p>a</p>")));
        assert!(store.open("webkit/b.html").is_none());
    }

    #[test]
    fn test_file_store_reads_nested_asset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("webkit")).unwrap();
        std::fs::write(dir.path().join("webkit/start.html"), b"<h1>hi</h1>").unwrap();

        let store = FileAssetStore::new(dir.path());
        assert_eq!(
            store.open("webkit/start.html"),
            Some(Bytes::from_static(b"<h1>hi</h1>"))
        );
        assert!(store.open("webkit/missing.html").is_none());
    }

    #[test]
    fn test_file_store_refuses_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("assets");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"nope").unwrap();

        let store = FileAssetStore::new(&inner);
        assert!(store.open("../secret.txt").is_none());
        assert!(store.open("/etc/hostname").is_none());
        assert!(store.open("").is_none());
    }
}
