use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No pack at: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Generic(String),
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Uploader transport error: {0}")]
    Transport(String),

    #[error("Uploader error: {0}")]
    Generic(String),
}

#[derive(Error, Debug)]
#[error("server id is not a non-empty hexadecimal string")]
pub struct InvalidServerId;
