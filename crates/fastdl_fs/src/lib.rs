//! # FastDL filesystem pack store
//!
//! The local [`PackStore`] backend: keeps exactly one pack per server under
//! `<root>/<server_id>/data/gluapack/<md5-hex>.bsp.bz2`.
//!
//! ## Sandboxing
//!
//! Every read canonicalizes the requested path and rejects anything that does
//! not land below the storage root, so `..` segments and symlink tricks in
//! the `asset` parameter cannot reach files outside the root.
//!
//! ## Single-slot replacement
//!
//! Storing a pack clears the server's pack directory before writing the new
//! file. The whole clear-then-write sequence runs under a per-server async
//! mutex, so two concurrent uploads for the same server cannot leave the
//! directory with two packs or none.
//!
//! ## Usage
//!
//! ```no_run
//! use fastdl_fs::FsPackStore;
//!
//! let store = FsPackStore::new("./assets");
//! ```

use fastdl_core::prelude::*;

use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs;

#[derive(Clone)]
pub struct FsPackStore {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl FsPackStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Arc::default(),
        }
    }

    /// The storage root used when none is configured: an `assets` directory
    /// next to the running executable. Created lazily on the first store.
    pub fn default_location() -> std::io::Result<PathBuf> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join("assets"))
    }

    fn server_lock(&self, server: &ServerId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(server.as_str().to_string()).or_default().clone()
    }

    /// Canonicalizes `asset` below the server's namespace and checks it
    /// against the storage root and the required pack path shape.
    async fn resolve_asset(
        &self,
        server: &ServerId,
        asset: &str,
    ) -> Result<PathBuf, StorageError> {
        let requested = self.root.join(server.as_str()).join(asset);
        let not_found = || StorageError::NotFound(requested.to_string_lossy().to_string());

        let root = fs::canonicalize(&self.root).await.map_err(|_| not_found())?;
        let path = fs::canonicalize(&requested).await.map_err(|_| not_found())?;

        if !path.starts_with(&root) || !is_pack_path(&path) {
            return Err(not_found());
        }
        Ok(path)
    }
}

fn is_pack_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if !name.ends_with(PACK_EXTENSION) || name.len() == PACK_EXTENSION.len() {
        return false;
    }
    let parent = path.parent();
    parent.and_then(Path::file_name) == Some("gluapack".as_ref())
        && parent.and_then(Path::parent).and_then(Path::file_name) == Some("data".as_ref())
}

/// Creates every missing component of `dir`, applying the publish mode to
/// directories this call creates (pre-existing ones are left untouched).
async fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    let mut build = PathBuf::new();
    for component in dir.components() {
        build.push(component);
        match fs::create_dir(&build).await {
            Ok(()) => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(&build, std::fs::Permissions::from_mode(0o774)).await?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(StorageError::Io(e)),
        }
    }
    Ok(())
}

async fn clear_dir(dir: &Path) -> Result<(), StorageError> {
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            fs::remove_dir_all(entry.path()).await?;
        } else {
            fs::remove_file(entry.path()).await?;
        }
    }
    Ok(())
}

impl PackStore for FsPackStore {
    async fn read_asset(&self, server: &ServerId, asset: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve_asset(server, asset).await?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string_lossy().to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn store_pack(
        &self,
        server: &ServerId,
        md5_hex: &str,
        data: Bytes,
    ) -> Result<(), StorageError> {
        let lock = self.server_lock(server);
        let _guard = lock.lock().await;

        let dir = self.root.join(server.as_str()).join(PACK_SUBDIR);
        ensure_dir(&dir).await?;
        clear_dir(&dir).await?;

        let path = dir.join(format!("{md5_hex}{PACK_EXTENSION}"));
        fs::write(&path, data).await?;
        Ok(())
    }
}
