//! Request extractors
//!
//! - [`CurrentUser`]: bearer token required
//! - [`ClientIp`]: rate-limit key for anonymous feedback
//! - [`ClientOrigin`]: `X-Client-Id` of the calling tab, echoed on live events

use axum::extract::{ConnectInfo, FromRequestParts};
use http::request::Parts;
use shared::AppError;
use std::convert::Infallible;
use std::net::SocketAddr;

use super::jwt::{CurrentUser, verify_token};
use crate::state::AppState;

pub const CLIENT_ID_HEADER: &str = "x-client-id";

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::not_authenticated)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

        let user = CurrentUser::from(verify_token(token, &state.jwt_secret)?);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Extract client IP: X-Forwarded-For header first, then peer address.
pub fn extract_ip(parts: &Parts) -> String {
    if let Some(forwarded) = parts.headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(extract_ip(parts)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOrigin(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for ClientOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientOrigin(
            parts
                .headers
                .get(CLIENT_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(builder: http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn forwarded_for_wins() {
        let p = parts(
            http::Request::builder().header("x-forwarded-for", " 203.0.113.9 , 10.0.0.1"),
        );
        assert_eq!(extract_ip(&p), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_peer_then_unknown() {
        let mut p = parts(http::Request::builder());
        assert_eq!(extract_ip(&p), "unknown");

        p.extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 7], 4000))));
        assert_eq!(extract_ip(&p), "192.0.2.7");
    }

    #[tokio::test]
    async fn origin_header_is_optional() {
        let mut p = parts(http::Request::builder().header(CLIENT_ID_HEADER, "tab-1"));
        let ClientOrigin(origin) = ClientOrigin::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(origin.as_deref(), Some("tab-1"));

        let mut p = parts(http::Request::builder());
        let ClientOrigin(origin) = ClientOrigin::from_request_parts(&mut p, &()).await.unwrap();
        assert!(origin.is_none());
    }
}
