//! `NeonClient::from_environ` behavior.
//!
//! Kept in its own test binary: it mutates process environment.

use assert_matches::assert_matches;
use neon_client::{NeonClient, NeonError, NEON_API_BASE_URL, NEON_API_KEY_ENVIRON};

#[test]
fn from_environ_requires_api_key() {
    std::env::remove_var(NEON_API_KEY_ENVIRON);
    let err = NeonClient::from_environ().unwrap_err();
    assert_matches!(err, NeonError::MissingApiKey(var) if var == "NEON_API_KEY");

    std::env::set_var(NEON_API_KEY_ENVIRON, "from-env");
    let client = NeonClient::from_environ().unwrap();
    assert_eq!(client.base_url(), NEON_API_BASE_URL);
    std::env::remove_var(NEON_API_KEY_ENVIRON);
}
