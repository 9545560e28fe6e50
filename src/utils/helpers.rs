//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the
//! application.

use regex::Regex;
use std::sync::OnceLock;

/// Maximum page size accepted on list endpoints.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size used when the client does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Calculate pagination offset from a 1-based page number
pub fn calculate_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

/// Clamp a requested limit to the allowed page-size range
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() > 5
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && phone.len() >= 10
}

fn nis_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4,12}$").expect("valid regex"))
}

fn nip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{8,18}$").expect("valid regex"))
}

/// Validate a student number (NIS): 4-12 digits
pub fn is_valid_nis(nis: &str) -> bool {
    nis_regex().is_match(nis)
}

/// Validate an employee number (NIP): 8-18 digits
pub fn is_valid_nip(nip: &str) -> bool {
    nip_regex().is_match(nip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 25), 0);
        assert_eq!(calculate_offset(3, 25), 50);
        // Page numbers below 1 are treated as the first page.
        assert_eq!(calculate_offset(0, 25), 0);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(10_000)), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), 1);
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("siswa@sekolah.sch.id"));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn test_nis_nip_validation() {
        assert!(is_valid_nis("202401"));
        assert!(!is_valid_nis("abc123"));
        assert!(!is_valid_nis("123"));

        assert!(is_valid_nip("198705132011011001"));
        assert!(!is_valid_nip("1234"));
        assert!(!is_valid_nip("19870513-2011"));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+62 812-3456-7890"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me maybe"));
    }
}
