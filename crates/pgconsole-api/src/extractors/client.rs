//! `ClientAddr` extractor: the key used for login throttling.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::state::AppState;

/// Client network address, or `"unknown"` when none is available.
///
/// `X-Forwarded-For` is only consulted when `server.trust_proxy_headers` is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl ClientAddr {
    /// The address as a string key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn resolve(parts: &Parts, trust_proxy_headers: bool) -> Self {
        if trust_proxy_headers {
            let forwarded = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(ip) = forwarded {
                return Self(ip.to_string());
            }
        }

        let addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Self(addr)
    }
}

impl FromRequestParts<AppState> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::resolve(parts, state.config.server.trust_proxy_headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(forwarded: Option<&str>, peer: Option<SocketAddr>) -> Parts {
        let mut builder = Request::builder().uri("/login");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        if let Some(addr) = peer {
            parts.extensions.insert(ConnectInfo(addr));
        }
        parts
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let peer: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        let parts = parts(Some("203.0.113.9"), Some(peer));
        assert_eq!(ClientAddr::resolve(&parts, false).as_str(), "10.1.2.3");
    }

    #[test]
    fn test_forwarded_header_when_trusted() {
        let peer: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        let parts = parts(Some("203.0.113.9, 10.0.0.1"), Some(peer));
        assert_eq!(ClientAddr::resolve(&parts, true).as_str(), "203.0.113.9");
    }

    #[test]
    fn test_unknown_without_connect_info() {
        let parts = parts(None, None);
        assert_eq!(ClientAddr::resolve(&parts, true).as_str(), "unknown");
    }
}
