//! Middleware module
//!
//! Request authentication and rate limiting.

pub mod auth;
pub mod rate_limit;

pub use auth::CurrentUser;
pub use rate_limit::{LoginRateLimiter, RateLimitConfig};
