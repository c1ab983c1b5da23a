//! Bootstrap binary: initializes logging, loads configuration, and ensures
//! the database schema exists. The engine itself is a library; this binary
//! prepares a fresh deployment for the service layer that embeds it.

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use volunteer_hub::{config, errors::Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;
    info!("Using database at {}", app_config.database_url);

    // 4. Connect and ensure the schema exists
    let _db = config::database::init_db(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    info!("volunteer-hub engine ready");
    Ok(())
}
