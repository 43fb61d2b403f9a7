//! Backend entry point: configuration, tracing, and the HTTP listener.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::Config;
use backend::server::create_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let server = create_server(config).await?;
    server.await
}
