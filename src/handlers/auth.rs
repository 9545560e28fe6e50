//! Authentication handlers

use crate::handlers::{ok, AppState};
use crate::middleware::CurrentUser;
use crate::services::auth::SESSION_COOKIE;
use crate::utils::errors::Result;
use crate::utils::logging::{log_identity_check, log_user_action};
use axum::extract::{ConnectInfo, Json, State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// Verifies credentials against the school identity provider, resolves the
/// provisioned account and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, axum::Json<serde_json::Value>)> {
    let client_key = addr.ip().to_string();
    state.login_limiter.check(&client_key)?;

    let identity = match state
        .services
        .identity_service
        .verify_credentials(&request.username, &request.password)
        .await
    {
        Ok(identity) => {
            log_identity_check(&identity.email, true);
            identity
        }
        Err(e) => {
            log_identity_check(&request.username, false);
            return Err(e);
        }
    };

    let user = state
        .services
        .user_service
        .resolve_verified_identity(&identity.external_id, &identity.email)
        .await?;

    let token = state.services.auth_service.issue_token(&user)?;
    state.login_limiter.clear(&client_key);
    state.services.auth_service.log_auth_event(user.id, "login", true);
    log_user_action(user.id, "login", None);

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.settings.auth.cookie_secure)
        .build();

    Ok((
        jar.add(cookie),
        ok(serde_json::json!({
            "token": token,
            "user": user,
        })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    CurrentUser(ctx): CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, axum::Json<serde_json::Value>)> {
    log_user_action(ctx.user_id(), "logout", None);
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    Ok((jar, ok(serde_json::json!({ "logged_out": true }))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> Result<axum::Json<serde_json::Value>> {
    let profile = state.services.user_service.get_user(ctx.user_id()).await?;
    Ok(ok(profile))
}
