//! Authentication service implementation
//!
//! This service issues and verifies signed session tokens, and implements
//! role-based permission checking for the three account roles.

use crate::config::settings::Settings;
use crate::models::user::{User, UserRole};
use crate::utils::errors::{Result, SixkulError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sixkul_session";

/// Permission levels for different operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Student-level access
    Siswa,
    /// Supervisor access over owned extracurriculars
    Pembina,
    /// Full administrative access
    Admin,
}

impl From<UserRole> for Permission {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Permission::Admin,
            UserRole::Pembina => Permission::Pembina,
            UserRole::Siswa => Permission::Siswa,
        }
    }
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i64,
    /// Role at the time the session was issued
    pub role: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued at, seconds since epoch
    pub iat: i64,
}

/// Authentication context attached to a verified request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub permission: Permission,
}

impl AuthContext {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Authentication service for session tokens and access control
#[derive(Debug, Clone)]
pub struct AuthService {
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Issue a signed session token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.settings.auth.session_ttl_hours)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.session_secret.as_bytes()),
        )?;

        info!(user_id = user.id, role = %user.role, "Session token issued");
        Ok(token)
    }

    /// Verify a session token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.session_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(data.claims)
    }

    /// Build the authentication context for a loaded user
    pub fn auth_context(&self, user: User) -> AuthContext {
        let permission = Permission::from(user.role());
        AuthContext { user, permission }
    }

    /// Require a permission level or return an error
    pub fn require_permission(&self, ctx: &AuthContext, required: Permission) -> Result<()> {
        if !Self::permission_includes(ctx.permission, required) {
            warn!(
                user_id = ctx.user.id,
                held = ?ctx.permission,
                required = ?required,
                "Permission denied"
            );
            return Err(SixkulError::PermissionDenied(format!(
                "this operation requires {:?} access",
                required
            )));
        }

        debug!(user_id = ctx.user.id, required = ?required, "Permission granted");
        Ok(())
    }

    /// Get permission hierarchy, lowest first
    pub fn get_permission_hierarchy() -> Vec<Permission> {
        vec![Permission::Siswa, Permission::Pembina, Permission::Admin]
    }

    /// Check if permission A includes permission B
    pub fn permission_includes(higher: Permission, lower: Permission) -> bool {
        let hierarchy = Self::get_permission_hierarchy();
        let higher_level = hierarchy.iter().position(|&p| p == higher).unwrap_or(0);
        let lower_level = hierarchy.iter().position(|&p| p == lower).unwrap_or(0);

        higher_level >= lower_level
    }

    /// Log authentication event
    pub fn log_auth_event(&self, user_id: i64, action: &str, success: bool) {
        if success {
            info!(user_id = user_id, action = action, "Authentication event: success");
        } else {
            warn!(user_id = user_id, action = action, "Authentication event: failure");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.session_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    fn test_user(role: UserRole) -> User {
        User {
            id: 42,
            external_id: "ext-42".to_string(),
            email: "user@sekolah.sch.id".to_string(),
            full_name: "Test User".to_string(),
            role: role.as_str().to_string(),
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_permission_hierarchy() {
        assert!(AuthService::permission_includes(Permission::Admin, Permission::Siswa));
        assert!(AuthService::permission_includes(Permission::Admin, Permission::Pembina));
        assert!(AuthService::permission_includes(Permission::Pembina, Permission::Siswa));
        assert!(!AuthService::permission_includes(Permission::Siswa, Permission::Pembina));
        assert!(!AuthService::permission_includes(Permission::Pembina, Permission::Admin));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = AuthService::new(test_settings());
        let user = test_user(UserRole::Pembina);

        let token = auth.issue_token(&user).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "PEMBINA");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = AuthService::new(test_settings());
        let user = test_user(UserRole::Siswa);

        let mut token = auth.issue_token(&user).unwrap();
        token.push('x');

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = AuthService::new(test_settings());
        let user = test_user(UserRole::Admin);
        let token = auth.issue_token(&user).unwrap();

        let mut other_settings = test_settings();
        other_settings.auth.session_secret = "ffffffffffffffffffffffffffffffff".to_string();
        let other = AuthService::new(other_settings);

        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_require_permission() {
        let auth = AuthService::new(test_settings());

        let ctx = auth.auth_context(test_user(UserRole::Pembina));
        assert!(auth.require_permission(&ctx, Permission::Siswa).is_ok());
        assert!(auth.require_permission(&ctx, Permission::Pembina).is_ok());
        assert!(auth.require_permission(&ctx, Permission::Admin).is_err());
    }
}
