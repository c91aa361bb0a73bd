//! Input validation utilities.
//!
//! Checks applied to caller-supplied values before they are used to build store queries.

use crate::{PrescriptionError, PrescriptionResult};

/// Validates that a record id is safe to embed in a PostgREST filter.
///
/// Ids are interpolated into query strings such as `id=eq.{id}`, so the accepted alphabet is kept
/// narrow:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Restricts characters to ASCII alphanumerics, `-` and `_` (UUIDs and numeric ids both pass)
///
/// # Errors
///
/// Returns a `PrescriptionError::InvalidInput` if the id is invalid.
pub fn validate_record_id(id: &str) -> PrescriptionResult<()> {
    const MAX_RECORD_ID_LEN: usize = 64;

    if id.trim().is_empty() {
        return Err(PrescriptionError::InvalidInput(
            "prescription id cannot be empty".into(),
        ));
    }

    if id.len() > MAX_RECORD_ID_LEN {
        return Err(PrescriptionError::InvalidInput(format!(
            "prescription id exceeds maximum length of {} characters",
            MAX_RECORD_ID_LEN
        )));
    }

    let ok = id
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if !ok {
        return Err(PrescriptionError::InvalidInput(
            "prescription id contains invalid characters (only alphanumeric, '-', '_' allowed)"
                .into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuids_and_numeric_ids() {
        assert!(validate_record_id("3f2c1a9e-4b7d-4e3a-9c1f-2a6b8d0e5f71").is_ok());
        assert!(validate_record_id("42").is_ok());
    }

    #[test]
    fn rejects_filter_injection_and_oversized_ids() {
        assert!(validate_record_id("").is_err());
        assert!(validate_record_id("   ").is_err());
        assert!(validate_record_id("1&user_id=neq.x").is_err());
        assert!(validate_record_id("1,2").is_err());
        assert!(validate_record_id(&"a".repeat(65)).is_err());
    }
}
