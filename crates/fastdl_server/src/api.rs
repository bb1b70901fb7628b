use crate::state::AppState;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use fastdl_core::prelude::*;
use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use tracing::{error, warn};

pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(StorageError::NotFound(_)) = self.0.downcast_ref::<StorageError>() {
            return StatusCode::NOT_FOUND.into_response();
        }
        // Status only, no diagnostic body: error details stay in the log.
        error!("request failed: {:#}", self.0);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Everything `rawurlencode` escapes: all of ASCII except `A-Za-z0-9-_.~`.
const RAW_URL_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    server: Option<String>,
    asset: Option<String>,
    proxy: Option<String>,
}

/// GET|HEAD /
///
/// Serves a server's pack to a connecting game client, or redirects to the
/// delivery proxy for anything not stored here.
pub async fn download<S: PackStore, U: PackUploader>(
    State(state): State<AppState<S, U>>,
    Query(params): Query<DownloadParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if !is_game_client(&headers, state.config.strict_referrer) {
        warn!("download rejected: not a game client");
        return Ok(StatusCode::FORBIDDEN.into_response());
    }

    let (Some(server), Some(asset)) = (params.server, params.asset) else {
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };
    let Ok(server) = ServerId::parse(&server) else {
        warn!("download rejected: malformed server id");
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };
    let asset = asset.trim_matches('/');
    let proxy = params.proxy.as_deref().map(|p| p.trim_end_matches('/'));

    match state.store.read_asset(&server, asset).await {
        Ok(data) => Ok(pack_response(data)),
        Err(StorageError::NotFound(_)) => Ok(proxy_fallback(proxy, asset)),
        Err(e) => Err(e.into()),
    }
}

fn is_game_client(headers: &HeaderMap, strict_referrer: bool) -> bool {
    if header_str(headers, "user-agent") != Some(CLIENT_USER_AGENT) {
        return false;
    }
    if strict_referrer {
        return header_str(headers, "referer")
            .is_some_and(|r| r.starts_with(CLIENT_REFERER_PREFIX));
    }
    true
}

fn pack_response(data: Bytes) -> Response {
    let digest = STANDARD.encode(Md5::digest(&data));
    (
        StatusCode::OK,
        [
            (header::CONTENT_LENGTH, data.len().to_string()),
            (header::CONTENT_DISPOSITION, "attachment".to_string()),
            (header::CONTENT_TYPE, PACK_CONTENT_TYPE.to_string()),
            (HeaderName::from_static(CONTENT_MD5_HEADER), digest),
        ],
        data,
    )
        .into_response()
}

fn proxy_fallback(proxy: Option<&str>, asset: &str) -> Response {
    match proxy {
        Some(proxy) => (
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, format!("{proxy}/{asset}"))],
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /
///
/// Accepts a pack from a publishing game server. Either stores it locally,
/// replacing whatever the server had before, or hands it to the configured
/// uploader and echoes back the delivery URL it returns.
pub async fn upload<S: PackStore, U: PackUploader>(
    State(state): State<AppState<S, U>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Some(license) = header_str(&headers, LICENSE_KEY_HEADER) else {
        warn!("upload rejected: missing license key");
        return Ok(StatusCode::UNAUTHORIZED.into_response());
    };
    if license != state.config.license_key {
        warn!("upload rejected: license key mismatch");
        return Ok(StatusCode::FORBIDDEN.into_response());
    }

    if header_str(&headers, "user-agent") != Some(PUBLISHER_USER_AGENT) {
        warn!("upload rejected: unexpected user agent");
        return Ok(StatusCode::FORBIDDEN.into_response());
    }

    let server = match header_str(&headers, SERVER_ID_HEADER).map(ServerId::parse) {
        Some(Ok(id)) => id,
        _ => {
            warn!("upload rejected: missing or malformed server id");
            return Ok(StatusCode::BAD_REQUEST.into_response());
        }
    };

    // The digest is trusted as supplied; it only names the stored file.
    let md5_hex = match header_str(&headers, CONTENT_MD5_HEADER).map(|v| STANDARD.decode(v)) {
        Some(Ok(digest)) if !digest.is_empty() => hex::encode(digest),
        _ => {
            warn!("upload rejected: missing or malformed content digest");
            return Ok(StatusCode::BAD_REQUEST.into_response());
        }
    };

    let proxy = header_str(&headers, FASTDL_URL_HEADER);

    if let Some(uploader) = &state.uploader {
        let url = uploader.upload(body, &md5_hex, &server, proxy).await?;
        return Ok(created(&state.config.steam_id, CUSTOM_FASTDL_URL_HEADER, url));
    }

    state.store.store_pack(&server, &md5_hex, body).await?;
    Ok(created(
        &state.config.steam_id,
        FASTDL_URL_HEADER,
        fastdl_url(&server, proxy),
    ))
}

/// The FastDL URL a game server sets as its download URL after a local-mode
/// upload. The game client appends the requested asset to it.
fn fastdl_url(server: &ServerId, proxy: Option<&str>) -> String {
    match proxy {
        Some(proxy) => format!(
            "?server={server}&proxy={}&asset=",
            utf8_percent_encode(proxy, RAW_URL_ENCODE)
        ),
        None => format!("?server={server}&asset="),
    }
}

fn created(steam_id: &str, url_header: &'static str, url: String) -> Response {
    (
        StatusCode::CREATED,
        [
            (HeaderName::from_static(STEAM_ID_HEADER), steam_id.to_string()),
            (HeaderName::from_static(url_header), url),
        ],
        "OK",
    )
        .into_response()
}
