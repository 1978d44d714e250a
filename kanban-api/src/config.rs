/// Configuration management for the board server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_PRODUCTION`: Enables HSTS and `Secure` cookies (default: false)
/// - `LOG_FORMAT`: `plain` or `json` (default: plain)
/// - `DATABASE_URL`: PostgreSQL connection string (absent: in-memory store)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_SECRET`: Token signing key, at least 32 characters
///   (absent: random per-process key)
/// - `SESSION_TTL_HOURS`: Session lifetime, at most five years (default: 24)
/// - `SESSION_COOKIE_NAME`: Session cookie name (default: kanban_session)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use kanban_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::env;

/// Minimum accepted length of `SESSION_SECRET`
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted `SESSION_TTL_HOURS` (five years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 5;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (HTTPS in front of the server)
    pub production: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; `None` selects the in-memory store
    pub url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for session token signing
    #[serde(skip_serializing)]
    pub secret: String,

    /// Session lifetime in hours
    pub ttl_hours: i64,

    /// Name of the session cookie
    pub cookie_name: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric or boolean variable has an invalid value
    /// - `SESSION_SECRET` is set but shorter than 32 characters
    /// - `SESSION_TTL_HOURS` is not between 1 and [`MAX_SESSION_TTL_HOURS`]
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()?;
        let production = parse_bool("API_PRODUCTION", lookup("API_PRODUCTION"))?;

        let log_json = match lookup("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            None => false,
            Some(format) if format == "plain" || format == "pretty" => false,
            Some(format) if format == "json" => true,
            Some(other) => anyhow::bail!("LOG_FORMAT must be 'plain' or 'json', got '{}'", other),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let secret = match lookup("SESSION_SECRET") {
            Some(secret) => {
                if secret.len() < MIN_SECRET_LEN {
                    anyhow::bail!(
                        "SESSION_SECRET must be at least {} characters long",
                        MIN_SECRET_LEN
                    );
                }
                secret
            }
            None => generate_secret(),
        };

        let ttl_hours = lookup("SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse::<i64>()?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS,
                ttl_hours
            );
        }

        let cookie_name =
            lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "kanban_session".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                production,
                log_json,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret,
                ttl_hours,
                cookie_name,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Session lifetime
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session.ttl_hours)
    }
}

fn parse_bool(name: &str, value: Option<String>) -> anyhow::Result<bool> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => anyhow::bail!("{} must be a boolean, got '{}'", name, other),
    }
}

/// Random key for deployments without `SESSION_SECRET`
///
/// 32 bytes from the OS RNG, hex encoded. Sessions signed with it do not
/// survive a restart.
fn generate_secret() -> String {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    hex::encode(key)
}
