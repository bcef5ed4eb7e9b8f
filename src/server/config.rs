//! Server configuration types
//!
//! Contains all configuration structures for the garage server. Loaded
//! once at startup; handlers receive it read-only behind an `Arc`.

use secrecy::SecretString;
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL (`sqlite:data/garage.db?mode=rwc`, or `sqlite::memory:`)
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/garage.db?mode=rwc".to_string(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret. Set via `GARAGE_AUTH__SECRET`; validation
    /// enforces a minimum length before the server starts.
    #[serde(default = "default_secret")]
    pub secret: SecretString,
    /// Access token lifetime ("15m")
    #[serde(default = "default_access_ttl")]
    pub access_ttl: String,
    /// Refresh token lifetime ("7d")
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl: String,
    /// Set the Secure attribute on the refresh cookie (behind TLS)
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            access_ttl: default_access_ttl(),
            refresh_ttl: default_refresh_ttl(),
            cookie_secure: false,
        }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_access_ttl() -> String {
    "15m".to_string()
}

fn default_refresh_ttl() -> String {
    "7d".to_string()
}

/// Rate limit configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// General API requests per window per client
    #[serde(default = "default_api_max")]
    pub api_max: u32,
    /// General API window in seconds
    #[serde(default = "default_api_window")]
    pub api_window_secs: u64,
    /// Auth endpoint requests per window per client (stricter)
    #[serde(default = "default_auth_max")]
    pub auth_max: u32,
    /// Auth endpoint window in seconds
    #[serde(default = "default_auth_window")]
    pub auth_window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_max: default_api_max(),
            api_window_secs: default_api_window(),
            auth_max: default_auth_max(),
            auth_window_secs: default_auth_window(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_api_max() -> u32 {
    100
}
fn default_api_window() -> u64 {
    60
}
fn default_auth_max() -> u32 {
    5
}
fn default_auth_window() -> u64 {
    60
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Exact origin to allow; permissive when unset
    #[serde(default)]
    pub allowed_origin: Option<String>,
}
