use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use fastdl_core::prelude::*;
use tower_http::trace::TraceLayer;
use tracing::warn;

mod api;

pub mod state;

use state::AppState;

/// The builder for the FastDL endpoint.
#[derive(Clone, Debug, Default)]
pub struct FastdlServer {
    config: FastdlConfig,
}

impl FastdlServer {
    pub fn new(config: FastdlConfig) -> Self {
        Self { config }
    }
}

#[derive(Clone, Debug)]
pub struct FastdlConfig {
    /// The shared secret publishing game servers authenticate with.
    ///
    /// **NOTE:** This should be set to a secure value!
    pub license_key: String,
    /// The operator identity returned in the `X-SteamID64` response header.
    pub steam_id: String,
    /// When enabled, downloads must carry an `hl2://` Referer to prove they
    /// come from a connecting game client. Some CDN setups override the
    /// Referer header and need this turned off.
    pub strict_referrer: bool,
}

const DEFAULT_LICENSE_KEY: &str =
    "adab112537647316235350eb4d9848b6b32fa69d997b1dd31552cda8148e18f0";
const DEFAULT_STEAM_ID: &str = "76561198094516446";

impl Default for FastdlConfig {
    fn default() -> Self {
        Self {
            license_key: DEFAULT_LICENSE_KEY.to_string(),
            steam_id: DEFAULT_STEAM_ID.to_string(),
            strict_referrer: true,
        }
    }
}

/// Placeholder [`PackUploader`] for deployments without a custom uploader.
/// Never invoked; local storage handles every upload.
#[derive(Clone, Debug)]
pub struct NoUploader;

impl PackUploader for NoUploader {
    async fn upload(
        &self,
        _pack: bytes::Bytes,
        _md5_hex: &str,
        _server: &ServerId,
        _proxy: Option<&str>,
    ) -> Result<String, UploadError> {
        Err(UploadError::Generic("no uploader configured".into()))
    }
}

impl FastdlServer {
    /// Builds a router that stores uploaded packs in `store`.
    pub fn build<S: PackStore>(self, store: S) -> Router {
        self.router(store, None::<NoUploader>)
    }

    /// Builds a router that delegates every upload to `uploader` instead of
    /// touching local storage. Downloads still read from `store`.
    pub fn build_with_uploader<S: PackStore, U: PackUploader>(
        self,
        store: S,
        uploader: U,
    ) -> Router {
        self.router(store, Some(uploader))
    }

    fn router<S: PackStore, U: PackUploader>(self, store: S, uploader: Option<U>) -> Router {
        if self.config.license_key == DEFAULT_LICENSE_KEY {
            warn!("Default license key used. Consider setting `license_key` to a secure value!")
        }
        let state = AppState {
            store,
            uploader,
            config: self.config,
        };

        Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/", get(api::download).post(api::upload))
            .layer(DefaultBodyLimit::disable())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

pub mod prelude {
    pub use crate::state::*;
    pub use crate::{FastdlConfig, FastdlServer, NoUploader};
}
