//! Access and refresh token issuance and verification
//!
//! Both token kinds are HS256 JWTs signed with the same process-wide
//! secret; a `kind` claim keeps them from being interchangeable. Tokens
//! are stateless: nothing is persisted server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::auth::Role;
use crate::error::{Error, Result};

/// Token verification failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature does not verify against the configured secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// Signature is fine but the expiry has passed
    #[error("token expired")]
    Expired,

    /// Not a parseable JWT at all
    #[error("malformed token")]
    Malformed,

    /// Valid token of the other kind (refresh where access is required,
    /// or the reverse)
    #[error("wrong token kind, expected {expected}")]
    WrongKind {
        /// The kind the caller required
        expected: TokenKind,
    },
}

/// Which of the two token kinds a claim set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived, sent as `Authorization: Bearer`
    Access,
    /// Longer-lived, transported via http-only cookie
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID
    pub sub: Uuid,
    /// Email at issuance time (informational; the user row is authoritative)
    pub email: String,
    /// Role at issuance time
    pub role: Role,
    /// Access or refresh
    pub kind: TokenKind,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Token lifetimes
#[derive(Debug, Clone, Copy)]
pub struct TokenConfig {
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Parse lifetimes from duration strings (`"30s"`, `"15m"`, `"12h"`, `"7d"`).
    pub fn parse(access: &str, refresh: &str) -> Result<Self> {
        Ok(Self {
            access_ttl: parse_ttl(access).map_err(|message| Error::InvalidConfig {
                field: "auth.access_ttl".to_string(),
                message,
            })?,
            refresh_ttl: parse_ttl(refresh).map_err(|message| Error::InvalidConfig {
                field: "auth.refresh_ttl".to_string(),
                message,
            })?,
        })
    }
}

/// Parse a duration string with an s/m/h/d suffix.
pub fn parse_ttl(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    let (value, unit) = s.split_at(s.len().saturating_sub(1));
    let n: i64 = value
        .parse()
        .map_err(|_| format!("expected <number><s|m|h|d>, got '{}'", s))?;
    if n <= 0 {
        return Err(format!("duration must be positive, got '{}'", s));
    }
    match unit {
        "s" => Ok(Duration::seconds(n)),
        "m" => Ok(Duration::minutes(n)),
        "h" => Ok(Duration::hours(n)),
        "d" => Ok(Duration::days(n)),
        _ => Err(format!("expected <number><s|m|h|d>, got '{}'", s)),
    }
}

/// Issues and verifies both token kinds.
///
/// Constructed once at startup from validated configuration and shared
/// behind an `Arc`; the secret never leaves this struct.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    config: TokenConfig,
}

impl TokenService {
    /// Create a token service from the signing secret and lifetimes.
    ///
    /// The secret's minimum length is enforced by config validation
    /// before this is reached.
    pub fn new(secret: &SecretString, config: TokenConfig) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            config,
        }
    }

    /// Access token lifetime in seconds (reported to clients on login).
    pub fn access_ttl_secs(&self) -> i64 {
        self.config.access_ttl.num_seconds()
    }

    /// Issue an access token for a user.
    pub fn sign_access(&self, sub: Uuid, email: &str, role: Role) -> Result<String> {
        self.sign(TokenKind::Access, self.config.access_ttl, sub, email, role)
    }

    /// Issue a refresh token for a user.
    pub fn sign_refresh(&self, sub: Uuid, email: &str, role: Role) -> Result<String> {
        self.sign(TokenKind::Refresh, self.config.refresh_ttl, sub, email, role)
    }

    fn sign(
        &self,
        kind: TokenKind,
        ttl: Duration,
        sub: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        debug!(user_id = %sub, kind = %kind, "Signing token");

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("token encoding failed: {}", e)))
    }

    /// Verify an access token.
    pub fn verify_access(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        self.verify(TokenKind::Access, token)
    }

    /// Verify a refresh token.
    pub fn verify_refresh(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        self.verify(TokenKind::Refresh, token)
    }

    fn verify(&self, kind: TokenKind, token: &str) -> std::result::Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.kind != kind {
            return Err(TokenError::WrongKind { expected: kind });
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        let secret = SecretString::from("a-test-secret-that-is-long-enough!!");
        let config = TokenConfig::parse("15m", "7d").unwrap();
        TokenService::new(&secret, config)
    }

    #[test]
    fn test_access_round_trip() {
        let svc = service();
        let id = Uuid::new_v4();

        let token = svc.sign_access(id, "bob@garage.test", Role::Admin).unwrap();
        let claims = svc.verify_access(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "bob@garage.test");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_different_secret_is_invalid_signature() {
        let svc = service();
        let other = TokenService::new(
            &SecretString::from("another-secret-also-long-enough!!!!"),
            TokenConfig::parse("15m", "7d").unwrap(),
        );

        let token = svc
            .sign_access(Uuid::new_v4(), "bob@garage.test", Role::User)
            .unwrap();
        assert_eq!(
            other.verify_access(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let svc = service();
        assert_eq!(svc.verify_access("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(svc.verify_access(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_expired_token() {
        let secret = SecretString::from("a-test-secret-that-is-long-enough!!");
        let svc = TokenService::new(
            &secret,
            TokenConfig {
                access_ttl: Duration::seconds(-10),
                refresh_ttl: Duration::days(7),
            },
        );

        let token = svc
            .sign_access(Uuid::new_v4(), "bob@garage.test", Role::User)
            .unwrap();
        assert_eq!(svc.verify_access(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_refresh_rejected_as_access() {
        let svc = service();
        let token = svc
            .sign_refresh(Uuid::new_v4(), "bob@garage.test", Role::User)
            .unwrap();

        assert_eq!(
            svc.verify_access(&token),
            Err(TokenError::WrongKind {
                expected: TokenKind::Access
            })
        );
        assert!(svc.verify_refresh(&token).is_ok());
    }

    #[test]
    fn test_access_rejected_as_refresh() {
        let svc = service();
        let token = svc
            .sign_access(Uuid::new_v4(), "bob@garage.test", Role::User)
            .unwrap();
        assert!(matches!(
            svc.verify_refresh(&token),
            Err(TokenError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_ttl("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_ttl("12h").unwrap(), Duration::hours(12));
        assert_eq!(parse_ttl("7d").unwrap(), Duration::days(7));
        assert!(parse_ttl("15").is_err());
        assert!(parse_ttl("m").is_err());
        assert!(parse_ttl("-5m").is_err());
        assert!(parse_ttl("0d").is_err());
        assert!(parse_ttl("").is_err());
    }
}
