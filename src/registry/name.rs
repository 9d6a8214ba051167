//! Client identifier validation and canonicalization.
//!
//! # Responsibilities
//! - Decide whether a user-supplied identifier can become a hostname prefix
//! - Derive the map key used by the registry
//!
//! # Design Decisions
//! - Labels are checked by hand instead of with a regex (same rule as
//!   `^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$`)
//! - Canonical ids replace `.` with `_`, which can never appear in a valid
//!   identifier, so distinct valid identifiers never share a key

/// Maximum length of a single dot-separated label.
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of the full identifier.
pub const MAX_IDENTIFIER_LEN: usize = 1500;

/// Separator substituted for `.` when building canonical ids.
pub const CANONICAL_SEPARATOR: char = '_';

/// Returns true if `identifier` is a valid (possibly multi-label) hostname prefix.
pub fn validate(identifier: &str) -> bool {
    if identifier.is_empty() || identifier.len() > MAX_IDENTIFIER_LEN {
        return false;
    }
    identifier.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    if bytes.len() > MAX_LABEL_LEN {
        return false;
    }
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Derive the registry key for an identifier.
pub fn canonicalize(identifier: &str) -> String {
    identifier.replace('.', &CANONICAL_SEPARATOR.to_string())
}
