//! Pagesmith server binary.
//!
//! Loads `.env` when present, reads [`AppConfig`] from the environment, and
//! serves the task provisioning API until interrupted.

use pagesmith::config::AppConfig;
use pagesmith::server;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let dotenv = dotenvy::dotenv();
    server::init_tracing()?;
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "ignoring unreadable environment file"),
    }

    let config = AppConfig::from_env()?;
    info!(?config, "starting pagesmith");
    server::run(&config).await?;
    Ok(())
}
