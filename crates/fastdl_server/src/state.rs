use crate::FastdlConfig;
use fastdl_core::traits::{PackStore, PackUploader};

#[derive(Clone)]
pub struct AppState<S: PackStore, U: PackUploader> {
    pub store: S,
    /// When set, uploads are delegated here and local storage is bypassed.
    pub uploader: Option<U>,
    pub config: FastdlConfig,
}
