use std::sync::Arc;

use court_availability::clubwise::ClubwiseSource;
use court_availability::{server, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    info!(cache_dir = %config.cache_dir.display(), "loading captured session");
    let source = ClubwiseSource::from_cache_dir(&config.cache_dir, config.clubwise_url.clone())?;

    server::serve(config.addr, server::router(Arc::new(source))).await?;
    Ok(())
}
