//! Wire-level constants of the FastDL protocol.
//!
//! The game client and the publishing game server identify themselves through
//! fixed user agents; everything else rides on custom `X-*` headers.

/// User agent connecting game clients download with.
pub const CLIENT_USER_AGENT: &str = "Half-Life 2";

/// Referer prefix of requests originating from a connecting game client.
/// Only checked in strict mode, which some CDN setups break by overriding
/// the Referer header.
pub const CLIENT_REFERER_PREFIX: &str = "hl2://";

/// User agent the publishing game server uploads with.
pub const PUBLISHER_USER_AGENT: &str = "gluapack-srcds";

pub const LICENSE_KEY_HEADER: &str = "x-license-key";
pub const SERVER_ID_HEADER: &str = "x-server-id";
pub const CONTENT_MD5_HEADER: &str = "content-md5";
pub const FASTDL_URL_HEADER: &str = "x-fastdl-url";
pub const CUSTOM_FASTDL_URL_HEADER: &str = "x-custom-fastdl-url";
pub const STEAM_ID_HEADER: &str = "x-steamid64";

/// Content type packs are served with.
pub const PACK_CONTENT_TYPE: &str = "application/x-bzip2";

/// Directory below a server's namespace where its pack lives.
pub const PACK_SUBDIR: &str = "data/gluapack";

/// Extension of stored packs.
pub const PACK_EXTENSION: &str = ".bsp.bz2";

/// The asset path a client requests for a pack with the given digest,
/// relative to the server's namespace.
pub fn pack_asset_path(md5_hex: &str) -> String {
    format!("{PACK_SUBDIR}/{md5_hex}{PACK_EXTENSION}")
}
