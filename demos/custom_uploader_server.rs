//! Runs the endpoint with a custom uploader: uploads never touch local
//! storage, the hook ships each pack elsewhere and returns the FastDL URL
//! connecting clients will use.

use bytes::Bytes;
use fastdl::prelude::*;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::env;

#[derive(Clone)]
struct MyCdnUploader;

impl PackUploader for MyCdnUploader {
    async fn upload(
        &self,
        pack: Bytes,
        pack_md5: &str,
        server: &ServerId,
        proxy: Option<&str>,
    ) -> Result<String, UploadError> {
        // Ship `pack` to your CDN service here. `pack_md5` names the file;
        // requests for anything other than data/gluapack/<md5>.bsp.bz2
        // should be routed to `proxy` by whatever serves the returned URL.
        println!(
            "would upload {} bytes as {pack_md5}.bsp.bz2 for server {server}",
            pack.len()
        );

        let proxy = proxy
            .map(|p| utf8_percent_encode(p, NON_ALPHANUMERIC).to_string())
            .unwrap_or_default();
        Ok(format!(
            "http://my-fastdl-website.com/?server={server}&proxy={proxy}&asset="
        ))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Downloads still read from the local store, uploads go to the hook.
    let store = FsPackStore::new("./assets");
    let app = FastdlServer::default().build_with_uploader(store, MyCdnUploader);

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    println!("FastDL endpoint (custom uploader) listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
