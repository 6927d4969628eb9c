use subtle::ConstantTimeEq;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Whether a request carrying `provided` may proceed.
///
/// With no key configured every request is allowed; otherwise the header
/// must be present and match exactly.
pub fn api_key_authorized(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(expected), Some(provided)) => constant_time_compare(expected, provided),
    }
}
