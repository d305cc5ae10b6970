//! Field-level request validation shared by the public and admin handlers.

use crate::error::ApiError;

/// Basic structural email check: one '@', non-empty local part, and a
/// domain containing a dot.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

pub fn require_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::bad_request("a valid email address is required"));
    }
    Ok(())
}

pub fn require_min_len(value: &str, min: usize, field: &str) -> Result<(), ApiError> {
    if value.chars().count() < min {
        return Err(ApiError::bad_request(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    Ok(())
}

pub fn require_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn min_len_counts_characters_not_bytes() {
        assert!(require_min_len("ab", 2, "name").is_ok());
        assert!(require_min_len("a", 2, "name").is_err());
        // two-character name in Cyrillic
        assert!(require_min_len("Ив", 2, "name").is_ok());
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        assert!(require_non_empty("x", "field").is_ok());
        assert!(require_non_empty("   ", "field").is_err());
    }
}
