//! Publishes a pack file to a running endpoint and prints the FastDL URL to
//! set as the game server's download URL.

use anyhow::Context;
use bytes::Bytes;
use fastdl::prelude::*;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let usage = "usage: publish_pack <pack.bsp.bz2> <server-id> [endpoint]";
    let path = args.next().context(usage)?;
    let server = args.next().context(usage)?;
    let endpoint = args
        .next()
        .unwrap_or_else(|| "http://localhost:3000/".to_string());

    let license = env::var("FASTDL_LICENSE_KEY").context("FASTDL_LICENSE_KEY not set")?;
    let server_id = ServerId::parse(&server)?;
    let pack = Bytes::from(std::fs::read(&path).with_context(|| format!("reading {path}"))?);

    let client = FastdlClient::new(endpoint, license, server_id);
    let proxy = env::var("FASTDL_PROXY").ok();
    let receipt = client.publish(pack, proxy.as_deref()).await?;

    println!("Published. Set sv_downloadurl to: {}", receipt.fastdl_url);
    if receipt.custom {
        println!("(delivered through the endpoint's custom uploader)");
    }
    Ok(())
}
