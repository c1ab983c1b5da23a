//! Configuration management for the volunteer engine.
//!
//! Configuration comes from environment variables (optionally via a `.env`
//! file loaded by the caller). The only required setting is the database
//! location; it falls back to a local `SQLite` file.

/// Database configuration and connection management
pub mod database;

/// Application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL, e.g. `sqlite://data/volunteer_hub.sqlite`
    pub database_url: String,
}

/// Loads the application configuration from the environment.
///
/// Reads `DATABASE_URL`, falling back to a default local `SQLite` file when
/// it is not set.
///
/// # Errors
/// Currently infallible; kept as a `Result` so new required settings can be
/// validated here without changing callers.
pub fn load_app_configuration() -> crate::errors::Result<AppConfig> {
    Ok(AppConfig {
        database_url: database::get_database_url(),
    })
}
