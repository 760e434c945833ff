//! Authentication middleware for Axum
//!
//! Tokens are read from `Authorization: Bearer <token>` first and from the
//! `token` cookie second. Every failure collapses into
//! `DomainError::Unauthenticated` so callers cannot tell a missing token
//! from a forged or expired one.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::{Identity, Role};
use crate::infrastructure::crypto::jwt::TokenService;
use crate::interfaces::http::common::ApiError;
use crate::shared::{DomainError, DomainResult};

/// Name of the cookie set by the login endpoint
pub const TOKEN_COOKIE: &str = "token";

/// Authentication state shared by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

/// Identity attached by [`optional_auth_middleware`]; `None` for
/// anonymous requests.
#[derive(Clone, Debug)]
pub struct Caller(pub Option<Identity>);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty())
}

pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

/// Resolve the caller's identity from the request headers.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> DomainResult<Identity> {
    let token = extract_token(headers).ok_or(DomainError::Unauthenticated)?;

    let claims = tokens.validate(token).map_err(|e| {
        debug!(error = %e, "Rejected session token");
        DomainError::Unauthenticated
    })?;

    Ok(claims.identity())
}

/// Require a valid token; the [`Identity`] is stored in the request
/// extensions for handlers.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &auth_state.tokens) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => ApiError(e).into_response(),
    }
}

/// Attach a [`Caller`] to every request. Invalid tokens are treated as
/// anonymous; the handler decides whether that is acceptable.
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let identity = authenticate(request.headers(), &auth_state.tokens).ok();
    request.extensions_mut().insert(Caller(identity));
    next.run(request).await
}

/// Admit only admins. Layered inside [`auth_middleware`], so the request
/// body of an admin-only route is never looked at for other callers.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    let allowed = request
        .extensions()
        .get::<Identity>()
        .ok_or(DomainError::Unauthenticated)
        .and_then(|identity| identity.require_role(Role::Admin));

    match allowed {
        Ok(()) => next.run(request).await,
        Err(e) => ApiError(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    use crate::domain::{Account, Role};
    use crate::infrastructure::crypto::jwt::JwtConfig;

    fn token_service() -> TokenService {
        TokenService::new(JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "profile-directory".into(),
        })
    }

    fn token(service: &TokenService, role: Role) -> String {
        let account = Account {
            id: "acc-1".into(),
            username: "tester".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        service.issue(&account).unwrap().token
    }

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_header() {
        let service = token_service();
        let token = token(&service, Role::Admin);
        let identity = authenticate(
            &headers(header::AUTHORIZATION, &format!("Bearer {}", token)),
            &service,
        )
        .unwrap();
        assert_eq!(identity.account_id, "acc-1");
        assert!(identity.is_admin());
    }

    #[test]
    fn test_cookie_fallback() {
        let service = token_service();
        let token = token(&service, Role::User);
        let identity = authenticate(
            &headers(header::COOKIE, &format!("theme=dark; token={}", token)),
            &service,
        )
        .unwrap();
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let service = token_service();
        let mut map = headers(header::COOKIE, "token=garbage");
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token(&service, Role::User))).unwrap(),
        );
        assert!(authenticate(&map, &service).is_ok());
    }

    #[test]
    fn test_failures_are_unauthenticated() {
        let service = token_service();
        let cases = [
            HeaderMap::new(),
            headers(header::AUTHORIZATION, "Bearer not-a-token"),
            headers(header::AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            headers(header::COOKIE, "session=abc"),
        ];
        for map in cases {
            assert!(matches!(
                authenticate(&map, &service),
                Err(DomainError::Unauthenticated)
            ));
        }
    }
}
