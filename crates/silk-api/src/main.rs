use silk_api::{serve, ServerConfig};
use silk_core::{Error, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path =
        std::env::var("SILKFLOW_CONFIG").unwrap_or_else(|_| "silkflow".to_string());
    let config = ServerConfig::load(&config_path).map_err(|e| Error::Config(e.to_string()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    serve(config).await
}
