//! Rate limiting middleware for Axum
//!
//! Wraps the `RateLimiter` from garage-core as an Axum layer. Requests
//! are keyed by client address; `/api/v1/auth/*` gets its own, stricter
//! window than the rest of the API.

use axum::{
    extract::ConnectInfo,
    http::{HeaderValue, Request},
    response::{IntoResponse, Response},
};
use garage_core::utils::{RateLimitConfig, RateLimiter};
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::{Layer, Service};
use tracing::warn;

use crate::api::response::ApiError;
use crate::server::config::RateLimitSettings;

/// The auth endpoints live under this prefix and get the stricter window
const AUTH_PREFIX: &str = "/api/v1/auth";

// ============================================================================
// Rate Limit State (shared across requests)
// ============================================================================

/// Shared rate limiter state
#[derive(Clone)]
pub struct RateLimitState {
    /// General API traffic, keyed by client address
    api: Arc<RateLimiter>,
    /// Stricter limiter for auth endpoints
    auth: Arc<RateLimiter>,
    /// Whether rate limiting is enabled
    enabled: bool,
}

/// Outcome of a denied check: which limit applied and when it resets
pub struct RateLimitHit {
    limit: u32,
    retry_after: Duration,
}

impl RateLimitState {
    /// Create a new rate limit state from settings
    pub fn new(settings: &RateLimitSettings) -> Self {
        let api_config = RateLimitConfig::new(
            settings.api_max,
            Duration::from_secs(settings.api_window_secs),
        );
        let auth_config = RateLimitConfig::new(
            settings.auth_max,
            Duration::from_secs(settings.auth_window_secs),
        );

        Self {
            api: Arc::new(RateLimiter::new(api_config)),
            auth: Arc::new(RateLimiter::new(auth_config)),
            enabled: settings.enabled,
        }
    }

    /// Count a request against the right window, returning the hit on
    /// denial.
    pub async fn check_request(
        &self,
        key: &str,
        is_auth: bool,
    ) -> std::result::Result<(), RateLimitHit> {
        if !self.enabled {
            return Ok(());
        }

        let limiter = if is_auth { &self.auth } else { &self.api };
        let result = limiter.acquire(key).await;
        if result.allowed {
            Ok(())
        } else {
            Err(RateLimitHit {
                limit: limiter.limit(),
                retry_after: result.reset_after,
            })
        }
    }

    /// Spawn periodic cleanup task
    pub fn spawn_cleanup(&self) {
        let api = self.api.clone();
        let auth = self.auth.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                let _ = api.cleanup().await;
                let _ = auth.cleanup().await;
            }
        });
    }
}

// ============================================================================
// Axum Layer
// ============================================================================

/// Rate limiting layer for Axum
#[derive(Clone)]
pub struct RateLimitLayer {
    state: RateLimitState,
}

impl RateLimitLayer {
    /// Create a new rate limit layer
    pub fn new(settings: &RateLimitSettings) -> Self {
        Self {
            state: RateLimitState::new(settings),
        }
    }

    /// Get the inner state (for cleanup task spawning)
    pub fn state(&self) -> &RateLimitState {
        &self.state
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            state: self.state.clone(),
        }
    }
}

// ============================================================================
// Axum Service
// ============================================================================

/// Rate limiting service wrapper
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    state: RateLimitState,
}

type BoxFuture<T, E> =
    std::pin::Pin<Box<dyn std::future::Future<Output = std::result::Result<T, E>> + Send>>;

impl<S, B> Service<Request<B>> for RateLimitService<S>
where
    S: Service<Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<Response, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> BoxFuture<Response, S::Error> {
        let state = self.state.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let key = client_key(&req);
            let is_auth = req.uri().path().starts_with(AUTH_PREFIX);

            match state.check_request(&key, is_auth).await {
                Ok(()) => inner.call(req).await,
                Err(hit) => {
                    let retry_after = hit.retry_after.as_secs().max(1);
                    warn!(
                        key = %key,
                        auth_window = is_auth,
                        retry_after_secs = retry_after,
                        "Rate limit exceeded"
                    );

                    let mut response = ApiError::RateLimited { retry_after }.into_response();
                    let headers = response.headers_mut();
                    headers.insert("X-RateLimit-Limit", header_value(hit.limit as u64));
                    headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
                    headers.insert("Retry-After", header_value(retry_after));

                    Ok(response)
                }
            }
        })
    }
}

fn header_value(n: u64) -> HeaderValue {
    HeaderValue::from_str(&n.to_string()).unwrap_or(HeaderValue::from_static("0"))
}

/// Extract the rate limit key: the client's socket address, or the first
/// `X-Forwarded-For` hop when running behind a proxy.
fn client_key<B>(req: &Request<B>) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }

    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip) = value.split(',').next() {
                return format!("ip:{}", ip.trim());
            }
        }
    }

    "ip:unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::RateLimitSettings;

    fn settings(api_max: u32, auth_max: u32) -> RateLimitSettings {
        RateLimitSettings {
            enabled: true,
            api_max,
            api_window_secs: 60,
            auth_max,
            auth_window_secs: 60,
        }
    }

    #[tokio::test]
    async fn test_auth_window_is_separate() {
        let state = RateLimitState::new(&settings(10, 2));

        assert!(state.check_request("ip:1.2.3.4", true).await.is_ok());
        assert!(state.check_request("ip:1.2.3.4", true).await.is_ok());
        let hit = state.check_request("ip:1.2.3.4", true).await.unwrap_err();
        assert_eq!(hit.limit, 2);

        // General window unaffected by auth exhaustion
        assert!(state.check_request("ip:1.2.3.4", false).await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_allows_everything() {
        let mut s = settings(1, 1);
        s.enabled = false;
        let state = RateLimitState::new(&s);

        for _ in 0..10 {
            assert!(state.check_request("ip:1.2.3.4", true).await.is_ok());
        }
    }

    #[test]
    fn test_client_key_from_forwarded_header() {
        let req = Request::builder()
            .uri("/api/v1/services")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(client_key(&req), "ip:203.0.113.9");
    }

    #[test]
    fn test_client_key_unknown() {
        let req = Request::builder().uri("/health").body(()).unwrap();
        assert_eq!(client_key(&req), "ip:unknown");
    }
}
