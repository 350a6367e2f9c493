//! Client address resolution.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Address recorded when nothing better is known.
pub const FALLBACK_IP: &str = "127.0.0.1";

/// Caller address used for audit entries and login metadata.
///
/// Resolution order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then
/// the socket peer, then [`FALLBACK_IP`]. The headers are skipped when the
/// request carries `ProxyHeaders(false)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

/// Whether forwarding headers are honoured. Installed as a request extension
/// by the router; absent means trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyHeaders(pub bool);

/// Resolve the client address from headers and the optional socket peer.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_headers: bool) -> String {
    if trust_headers {
        if let Some(ip) = forwarded_ip(headers) {
            return ip;
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => FALLBACK_IP.to_string(),
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    headers
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let trust_headers = parts
            .extensions
            .get::<ProxyHeaders>()
            .map_or(true, |ProxyHeaders(trust)| *trust);
        Ok(ClientIp(resolve_client_ip(&parts.headers, peer, trust_headers)))
    }
}
