use crate::error::*;
use crate::id::ServerId;

use bytes::Bytes;

/// Storage for one pack per server, below a sandboxed root.
pub trait PackStore: Send + Sync + 'static + Clone {
    /// Resolves `asset` below the server's namespace and reads it.
    ///
    /// Must reject with [`StorageError::NotFound`] any path that escapes the
    /// storage root or that is not a `data/gluapack/<name>.bsp.bz2` file.
    fn read_asset(
        &self,
        server: &ServerId,
        asset: &str,
    ) -> impl Future<Output = Result<Bytes, StorageError>> + Send;

    /// Replaces the server's pack with `data`, stored under the given digest.
    ///
    /// A server holds at most one pack at a time: whatever the namespace
    /// contained before is gone once this returns.
    fn store_pack(
        &self,
        server: &ServerId,
        md5_hex: &str,
        data: Bytes,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Hook that ships a pack to an external delivery service instead of local
/// storage, returning the FastDL URL connecting clients will download from.
pub trait PackUploader: Send + Sync + 'static + Clone {
    fn upload(
        &self,
        pack: Bytes,
        md5_hex: &str,
        server: &ServerId,
        proxy: Option<&str>,
    ) -> impl Future<Output = Result<String, UploadError>> + Send;
}
