pub use fastdl_core::*;

#[cfg(feature = "server")]
pub mod server {
    pub use fastdl_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use fastdl_client::*;
}

#[cfg(feature = "fs")]
pub mod fs {
    pub use fastdl_fs::*;
}

pub mod prelude {
    pub use fastdl_core::prelude::*;

    #[cfg(feature = "server")]
    pub use fastdl_server::prelude::*;

    #[cfg(feature = "client")]
    pub use fastdl_client::FastdlClient;

    #[cfg(feature = "fs")]
    pub use fastdl_fs::FsPackStore;
}
