use cargolink::config::Config;
use cargolink::db::PgPool;
use cargolink::engine::Engine;
use cargolink::error::Error;
use cargolink::server::serve;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "starting cargolink");

    let PgPool(pool) = PgPool::new(&config.database_url, config.max_connections).await?;

    let engine = Engine::new(pool, &config).await?;

    serve(engine, config.addr()?).await
}
