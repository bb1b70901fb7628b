//! # FastDL publisher client
//!
//! The `gluapack-srcds` side of the protocol: publishes a server's pack to a
//! FastDL endpoint and reports back the delivery URL the endpoint hands out.
//! Unlike the endpoint, which trusts the digest header as supplied, this
//! client always computes `Content-MD5` from the bytes it sends.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use fastdl_core::prelude::*;
use md5::{Digest, Md5};
use reqwest::{Client, StatusCode, header};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastdlClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned error {0}")]
    ServerError(StatusCode),

    #[error("Server response missing header {0}")]
    MissingHeader(&'static str),
}

pub type Result<T> = std::result::Result<T, FastdlClientError>;

/// The URL a published pack is delivered from.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    /// Value for the game server's download URL; the connecting client
    /// appends the requested asset path to it.
    pub fastdl_url: String,
    /// True when the endpoint delegated the pack to a custom uploader.
    pub custom: bool,
}

#[derive(Clone)]
pub struct FastdlClient {
    endpoint: String,
    license_key: String,
    server_id: ServerId,
    client: Client,
}

impl FastdlClient {
    pub fn new(
        endpoint: impl Into<String>,
        license_key: impl Into<String>,
        server_id: ServerId,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            license_key: license_key.into(),
            server_id,
            client: Client::new(),
        }
    }

    /// Publishes `pack` as this server's single pack, superseding whatever
    /// the endpoint stored before.
    pub async fn publish(&self, pack: Bytes, proxy: Option<&str>) -> Result<PublishReceipt> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::USER_AGENT, PUBLISHER_USER_AGENT)
            .header(LICENSE_KEY_HEADER, &self.license_key)
            .header(SERVER_ID_HEADER, self.server_id.as_str())
            .header(CONTENT_MD5_HEADER, content_md5(&pack));
        if let Some(proxy) = proxy {
            request = request.header(FASTDL_URL_HEADER, proxy);
        }

        let response = request.body(pack).send().await?;
        if response.status() != StatusCode::CREATED {
            return Err(FastdlClientError::ServerError(response.status()));
        }

        if let Some(url) = header_value(&response, CUSTOM_FASTDL_URL_HEADER) {
            return Ok(PublishReceipt {
                fastdl_url: url,
                custom: true,
            });
        }
        let url = header_value(&response, FASTDL_URL_HEADER)
            .ok_or(FastdlClientError::MissingHeader(FASTDL_URL_HEADER))?;
        Ok(PublishReceipt {
            fastdl_url: url,
            custom: false,
        })
    }

    /// Downloads an asset the way a connecting game client would. Meant for
    /// smoke-testing an endpoint after publishing.
    pub async fn fetch(&self, asset: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("server", self.server_id.as_str()), ("asset", asset)])
            .header(header::USER_AGENT, CLIENT_USER_AGENT)
            .header(header::REFERER, format!("{CLIENT_REFERER_PREFIX}fastdl"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FastdlClientError::ServerError(response.status()));
        }
        Ok(response.bytes().await?)
    }
}

fn content_md5(pack: &[u8]) -> String {
    STANDARD.encode(Md5::digest(pack))
}

fn header_value(response: &reqwest::Response, name: &'static str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
