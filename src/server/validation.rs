//! Startup configuration validation
//!
//! The server refuses to start on a config it cannot run safely:
//! a missing or short signing secret, unparseable token lifetimes, or a
//! zero-size rate-limit window.

use anyhow::{bail, Result};
use secrecy::ExposeSecret;
use tracing::warn;

use garage_core::auth::token::parse_ttl;

use super::config::AppConfig;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Validate configuration before any component is constructed
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let secret_len = config.auth.secret.expose_secret().len();
    if secret_len < MIN_SECRET_LEN {
        bail!(
            "auth.secret must be at least {} bytes (got {}); set GARAGE_AUTH__SECRET",
            MIN_SECRET_LEN,
            secret_len
        );
    }

    if let Err(e) = parse_ttl(&config.auth.access_ttl) {
        bail!("auth.access_ttl: {}", e);
    }
    if let Err(e) = parse_ttl(&config.auth.refresh_ttl) {
        bail!("auth.refresh_ttl: {}", e);
    }

    if config.rate_limit.enabled {
        if config.rate_limit.api_max == 0 || config.rate_limit.auth_max == 0 {
            bail!("rate_limit maximums must be positive when rate limiting is enabled");
        }
        if config.rate_limit.api_window_secs == 0 || config.rate_limit.auth_window_secs == 0 {
            bail!("rate_limit windows must be positive when rate limiting is enabled");
        }
    } else {
        warn!("Rate limiting is DISABLED; auth endpoints are unthrottled");
    }

    if config.server.host == "0.0.0.0" && !config.auth.cookie_secure {
        warn!(
            "Server binds all interfaces without auth.cookie_secure; \
             refresh cookies will be sent over plain HTTP"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::AppConfig;
    use secrecy::SecretString;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig {
            server: Default::default(),
            database: Default::default(),
            auth: Default::default(),
            rate_limit: Default::default(),
            cors: Default::default(),
        };
        config.auth.secret = SecretString::from("0123456789abcdef0123456789abcdef");
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = valid_config();
        config.auth.secret = SecretString::from("too-short");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = valid_config();
        config.auth.secret = SecretString::from("");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_ttl_rejected() {
        let mut config = valid_config();
        config.auth.access_ttl = "fifteen minutes".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = valid_config();
        config.rate_limit.auth_window_secs = 0;
        assert!(validate_config(&config).is_err());

        config.rate_limit.enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
