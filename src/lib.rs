pub mod api;
pub mod client;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::core_state::CoreState;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `CLINIC_LOG`; both fall back to the built-in filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Open the database, apply migrations and serve until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env();
    tracing::info!(
        version = config::APP_VERSION,
        addr = %config.bind_addr,
        db = %config.db_path.display(),
        "Clinic records starting"
    );

    let core = Arc::new(CoreState::from_config(&config));
    core.initialize()?;

    api::serve(core, config.bind_addr).await?;
    Ok(())
}
