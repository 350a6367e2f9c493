//! Bearer token authentication.
//!
//! [`jwt_auth`] places the shared [`TokenService`] in request extensions;
//! [`AuthAdmin`] reads it back, validates the bearer token and yields the
//! caller's [`AdminIdentity`].

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{AdminIdentity, TokenService};
use crate::web::error::ApiError;

/// Extractor for authenticated administrators.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub AdminIdentity);

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::not_logged_in)?;

        let tokens = parts
            .extensions
            .get::<Arc<TokenService>>()
            .ok_or_else(|| ApiError::internal("token service not configured"))?;

        let claims = tokens.validate(token).map_err(|e| {
            tracing::debug!(reason = e.kind(), "token rejected");
            ApiError::from(e)
        })?;

        Ok(AuthAdmin(AdminIdentity::from(claims)))
    }
}

/// Middleware function to inject the token service into request extensions.
pub async fn jwt_auth(
    tokens: Arc<TokenService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(tokens);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn parts_with(header: Option<&str>, tokens: Option<Arc<TokenService>>) -> Parts {
        let mut builder = Request::builder().uri("/api/admin/info");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        if let Some(tokens) = tokens {
            parts.extensions.insert(tokens);
        }
        parts
    }

    #[test]
    fn test_bearer_token() {
        let parts = parts_with(Some("Bearer abc.def.ghi"), None);
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));

        let parts = parts_with(Some("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token(&parts), None);

        let parts = parts_with(Some("Bearer "), None);
        assert_eq!(bearer_token(&parts), None);

        let parts = parts_with(None, None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[tokio::test]
    async fn test_extracts_identity() {
        let tokens = Arc::new(TokenService::new("test-secret"));
        let token = tokens.issue(&AdminIdentity::new(7, "admin7", 2)).unwrap();
        let header = format!("Bearer {}", token);

        let mut parts = parts_with(Some(&header), Some(tokens));
        let AuthAdmin(identity) = AuthAdmin::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(identity.admin_id, 7);
        assert_eq!(identity.username, "admin7");
        assert_eq!(identity.site_id, 2);
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let tokens = Arc::new(TokenService::new("test-secret"));
        let mut parts = parts_with(None, Some(tokens));

        let err = AuthAdmin::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_foreign_signature_rejected() {
        let issuer = TokenService::new("secret1");
        let token = issuer.issue(&AdminIdentity::new(1, "admin1", 1)).unwrap();
        let header = format!("Bearer {}", token);

        let mut parts = parts_with(Some(&header), Some(Arc::new(TokenService::new("secret2"))));
        let err = AuthAdmin::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.message(), crate::web::error::NOT_LOGGED_IN_MESSAGE);
    }
}
