pub mod config;
pub mod debounce;
pub mod session;
pub mod store;

pub use config::{Config, ValidationResult};
pub use debounce::Debouncer;
pub use session::{Phase, SessionController, SessionState};
pub use store::CityStore;

use anyhow::Result;

/// Initialize logging for the application.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Harmattan core initialized");
    Ok(())
}
