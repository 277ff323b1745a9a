//! CSRF token lifecycle
//!
//! Double-submit tokens: an opaque random value lives in a cookie readable
//! by same-origin script, and every mutating request must echo it back in a
//! header. The pair is compared in constant time.

use ring::rand::{SecureRandom, SystemRandom};
use subtle::ConstantTimeEq;

use crate::errors::GateError;

/// Raw entropy per token; hex-encoding doubles this to 64 characters.
const CSRF_TOKEN_BYTES: usize = 32;

/// Why a CSRF pair was rejected.
///
/// Internal observability only; every variant maps to 403 outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfRejection {
    MissingCookie,
    MissingHeader,
    Mismatch,
}

impl CsrfRejection {
    /// Discriminant name, safe to log.
    pub fn label(&self) -> &'static str {
        match self {
            CsrfRejection::MissingCookie => "missing_cookie",
            CsrfRejection::MissingHeader => "missing_header",
            CsrfRejection::Mismatch => "mismatch",
        }
    }
}

/// Generate a fresh CSRF token: 32 random bytes, hex-encoded.
///
/// The RNG is safe for concurrent use from multiple request tasks. Each
/// call produces an independent value; rotation is the caller's concern.
pub fn issue_csrf_token() -> Result<String, GateError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| GateError::Crypto("Failed to generate CSRF token".to_string()))?;
    Ok(hex::encode(bytes))
}

/// Check a submitted cookie/header pair.
///
/// Both values must be present; surrounding whitespace is trimmed before
/// the constant-time comparison so that proxy-mangled headers do not fail
/// spuriously.
pub fn verify_csrf_pair(
    cookie: Option<&str>,
    header: Option<&str>,
) -> Result<(), CsrfRejection> {
    let cookie = cookie.ok_or(CsrfRejection::MissingCookie)?.trim();
    let header = header.ok_or(CsrfRejection::MissingHeader)?.trim();

    if cookie.as_bytes().ct_eq(header.as_bytes()).into() {
        Ok(())
    } else {
        Err(CsrfRejection::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = issue_csrf_token().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_successive_tokens_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(issue_csrf_token().unwrap()));
        }
    }

    #[test]
    fn test_matching_pair_passes() {
        assert_eq!(verify_csrf_pair(Some("abc123"), Some("abc123")), Ok(()));
    }

    #[test]
    fn test_whitespace_is_trimmed_before_comparison() {
        assert_eq!(verify_csrf_pair(Some(" abc123 "), Some("abc123")), Ok(()));
        assert_eq!(verify_csrf_pair(Some("abc123"), Some("\tabc123\r\n")), Ok(()));
    }

    #[test]
    fn test_missing_values_are_rejected() {
        assert_eq!(
            verify_csrf_pair(None, Some("abc123")),
            Err(CsrfRejection::MissingCookie)
        );
        assert_eq!(
            verify_csrf_pair(Some("abc123"), None),
            Err(CsrfRejection::MissingHeader)
        );
        assert_eq!(verify_csrf_pair(None, None), Err(CsrfRejection::MissingCookie));
    }

    #[test]
    fn test_mismatch_is_rejected() {
        assert_eq!(
            verify_csrf_pair(Some("abc123"), Some("abc124")),
            Err(CsrfRejection::Mismatch)
        );
        assert_eq!(
            verify_csrf_pair(Some("abc123"), Some("ABC123")),
            Err(CsrfRejection::Mismatch)
        );
        // Prefix of the cookie value must not pass.
        assert_eq!(
            verify_csrf_pair(Some("abc123"), Some("abc")),
            Err(CsrfRejection::Mismatch)
        );
    }

    proptest! {
        #[test]
        fn prop_padded_token_matches_bare_token(token in "[0-9a-f]{64}", pad in "[ \t]{0,4}") {
            let padded = format!("{pad}{token}{pad}");
            prop_assert_eq!(verify_csrf_pair(Some(&padded), Some(&token)), Ok(()));
            prop_assert_eq!(verify_csrf_pair(Some(&token), Some(&padded)), Ok(()));
        }

        #[test]
        fn prop_distinct_tokens_never_match(a in "[0-9a-f]{64}", b in "[0-9a-f]{64}") {
            prop_assume!(a != b);
            prop_assert_eq!(
                verify_csrf_pair(Some(&a), Some(&b)),
                Err(CsrfRejection::Mismatch)
            );
        }
    }
}
