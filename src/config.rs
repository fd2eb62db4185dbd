//! Application configuration management.
//!
//! Configuration is loaded from environment variables via the `envy` crate,
//! with an optional `.env` file picked up first.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `PROVISIONING_QUEUE_DEPTH` (optional): buffered capacity of the
///   customer-created event queue, defaults to 64
/// - `PROVISIONING_MAX_RETRIES` (optional): delivery attempts for a
///   provisioning event before it is rejected, defaults to 3
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_queue_depth")]
    pub provisioning_queue_depth: usize,

    #[serde(default = "default_max_retries")]
    pub provisioning_max_retries: u32,
}

fn default_port() -> u16 {
    3000
}

fn default_queue_depth() -> usize {
    64
}

fn default_max_retries() -> u32 {
    3
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing (DATABASE_URL) or
    /// a value cannot be parsed into the expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
