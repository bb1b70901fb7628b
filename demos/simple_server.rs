use fastdl::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Packs land in an `assets` directory next to the executable unless you
    // point the store somewhere else.
    let root = env::var("FASTDL_ROOT")
        .map(Into::into)
        .or_else(|_| FsPackStore::default_location())
        .expect("cannot locate a storage root");
    let store = FsPackStore::new(root);

    // Don't use the default config in production! Set a real license key.
    let app = FastdlServer::default().build(store);

    // Serve
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    println!("FastDL endpoint listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
