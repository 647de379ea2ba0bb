use crate::error::{AppError, Result};
use rand::RngCore;
use rand::rngs::OsRng;
use base64::{Engine as _, engine::general_purpose};
use subtle::ConstantTimeEq;

/// The size of the CSRF token in bytes.
const CSRF_TOKEN_SIZE: usize = 32;

/// Generates a new random CSRF token.
///
/// # Returns
///
/// A URL-safe base64-encoded CSRF token.
pub fn generate_csrf_token() -> Result<String> {
    let mut token = [0u8; CSRF_TOKEN_SIZE];
    OsRng
        .try_fill_bytes(&mut token)
        .map_err(|e| AppError::Internal(format!("Failed to generate CSRF token: {}", e)))?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(token))
}

/// Compares a submitted token with the session's token in constant time.
pub fn tokens_match(expected: &str, submitted: &str) -> bool {
    if expected.is_empty() || submitted.is_empty() {
        return false;
    }
    expected.as_bytes().ct_eq(submitted.as_bytes()).into()
}
