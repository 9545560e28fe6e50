//! Request authentication
//!
//! Extractor that turns a session cookie or bearer token into an
//! authentication context. Handlers take `CurrentUser` as an argument and
//! get a verified, non-deleted account.

use crate::handlers::AppState;
use crate::services::auth::{AuthContext, SESSION_COOKIE};
use crate::utils::errors::SixkulError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

/// Authenticated caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = SixkulError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| {
            SixkulError::Unauthenticated("missing session token".to_string())
        })?;

        let claims = state.services.auth_service.verify_token(&token)?;

        let user = state
            .db
            .users
            .find_by_id(claims.sub)
            .await?
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| {
                SixkulError::Unauthenticated("session refers to a deactivated account".to_string())
            })?;

        debug!(user_id = user.id, "Request authenticated");
        Ok(CurrentUser(state.services.auth_service.auth_context(user)))
    }
}

/// Pull the session token from the cookie or the Authorization header
fn extract_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_token_from_cookie() {
        let parts = parts_with_headers(&[("cookie", "sixkul_session=abc123; other=x")]);
        assert_eq!(extract_token(&parts), Some("abc123".to_string()));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let parts = parts_with_headers(&[("authorization", "Bearer tok-456")]);
        assert_eq!(extract_token(&parts), Some("tok-456".to_string()));
    }

    #[test]
    fn test_cookie_takes_precedence() {
        let parts = parts_with_headers(&[
            ("cookie", "sixkul_session=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        assert_eq!(extract_token(&parts), Some("from-cookie".to_string()));
    }

    #[test]
    fn test_missing_token() {
        let parts = parts_with_headers(&[]);
        assert_eq!(extract_token(&parts), None);
    }
}
