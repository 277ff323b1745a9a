//! Per-request gate decision
//!
//! A pure, synchronous classification of one request: pass it through,
//! authorize it, or reject it before the wrapped application ever runs.
//! The axum middleware in `jwt-cookie-csrf-axum` acts on the decision; this
//! module never touches a response.

use headers::{Cookie, HeaderMapExt};
use http::{HeaderMap, Method};

use crate::config::GateConfig;
use crate::csrf::{CsrfRejection, verify_csrf_pair};
use crate::token::{TokenVerdict, verify_session_token};

/// Why authentication failed on a gated request.
///
/// Logged by discriminant only; collapses to 401 outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingCookie,
    Expired,
    Malformed,
    SignatureInvalid,
}

impl AuthRejection {
    /// Discriminant name, safe to log.
    pub fn label(&self) -> &'static str {
        match self {
            AuthRejection::MissingCookie => "missing_cookie",
            AuthRejection::Expired => "expired",
            AuthRejection::Malformed => "malformed",
            AuthRejection::SignatureInvalid => "signature_invalid",
        }
    }
}

/// Outcome of evaluating one request against the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Safe method or excluded path; forward without checks.
    PassThrough,
    /// Session and CSRF checks both passed; forward, then rotate the CSRF
    /// cookie.
    Authorized,
    /// No valid session token; respond 401 without running the wrapped
    /// application.
    RejectUnauthenticated(AuthRejection),
    /// Session was valid but the CSRF pair was not; respond 403 without
    /// running the wrapped application.
    RejectCsrf(CsrfRejection),
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn cookie_value<'a>(cookies: Option<&'a Cookie>, name: &str) -> Option<&'a str> {
    cookies.and_then(|c| c.get(name))
}

/// Whether the request already carries a CSRF cookie.
///
/// Used on the pass-through path to keep first issuance idempotent: an
/// existing cookie is never overwritten there.
pub fn has_csrf_cookie(config: &GateConfig, headers: &HeaderMap) -> bool {
    let cookies = headers.typed_get::<Cookie>();
    cookie_value(cookies.as_ref(), config.csrf_cookie_name()).is_some()
}

/// Classify one request and run the session/CSRF checks.
///
/// Reads only the method, path and headers; configuration is an immutable
/// snapshot shared across request tasks. Token values are never logged.
pub fn evaluate(
    config: &GateConfig,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> GateDecision {
    if config.is_excluded_path(path) || is_safe_method(method) {
        tracing::debug!(%method, path, "request passes through unchecked");
        return GateDecision::PassThrough;
    }

    let cookies = headers.typed_get::<Cookie>();

    let Some(session_token) = cookie_value(cookies.as_ref(), config.session_cookie_name()) else {
        tracing::warn!(%method, path, reason = "missing_cookie", "rejecting unauthenticated request");
        return GateDecision::RejectUnauthenticated(AuthRejection::MissingCookie);
    };

    match verify_session_token(config, session_token) {
        TokenVerdict::Valid(_) => {}
        verdict => {
            let rejection = match verdict {
                TokenVerdict::Expired => AuthRejection::Expired,
                TokenVerdict::SignatureInvalid => AuthRejection::SignatureInvalid,
                _ => AuthRejection::Malformed,
            };
            tracing::warn!(%method, path, reason = rejection.label(), "rejecting unauthenticated request");
            return GateDecision::RejectUnauthenticated(rejection);
        }
    }

    let csrf_cookie = cookie_value(cookies.as_ref(), config.csrf_cookie_name());
    let csrf_header = headers
        .get(config.csrf_header_name())
        .and_then(|h| h.to_str().ok());

    match verify_csrf_pair(csrf_cookie, csrf_header) {
        Ok(()) => {
            tracing::debug!(%method, path, "request authorized");
            GateDecision::Authorized
        }
        Err(rejection) => {
            tracing::warn!(%method, path, reason = rejection.label(), "rejecting request with bad CSRF pair");
            GateDecision::RejectCsrf(rejection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::issue_session_token;
    use chrono::Duration;
    use serde_json::json;

    fn test_config() -> GateConfig {
        GateConfig::new("test_secret")
    }

    fn valid_token(config: &GateConfig) -> String {
        issue_session_token(config, &json!({"user_id": 1}), Duration::seconds(3600)).unwrap()
    }

    fn headers_with(entries: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in entries {
            headers.append(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        headers
    }

    #[test]
    fn test_safe_methods_pass_through() {
        let config = test_config();
        let headers = HeaderMap::new();

        for method in [Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE] {
            assert_eq!(
                evaluate(&config, &method, "/", &headers),
                GateDecision::PassThrough
            );
        }
    }

    #[test]
    fn test_excluded_paths_pass_through_for_any_method() {
        let config = test_config();
        let headers = HeaderMap::new();

        assert_eq!(
            evaluate(&config, &Method::POST, "/login", &headers),
            GateDecision::PassThrough
        );
        assert_eq!(
            evaluate(&config, &Method::DELETE, "/logout", &headers),
            GateDecision::PassThrough
        );
    }

    #[test]
    fn test_gated_request_without_session_is_401() {
        let config = test_config();

        assert_eq!(
            evaluate(&config, &Method::POST, "/", &HeaderMap::new()),
            GateDecision::RejectUnauthenticated(AuthRejection::MissingCookie)
        );
    }

    #[test]
    fn test_gated_request_with_bad_session_is_401() {
        let config = test_config();

        let headers = headers_with(&[("cookie", "auth_token=garbage")]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectUnauthenticated(AuthRejection::Malformed)
        );

        let expired =
            issue_session_token(&config, &json!({"user_id": 1}), Duration::seconds(-60)).unwrap();
        let headers = headers_with(&[("cookie", &format!("auth_token={expired}"))]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectUnauthenticated(AuthRejection::Expired)
        );

        let foreign = issue_session_token(
            &GateConfig::new("other_secret"),
            &json!({"user_id": 1}),
            Duration::seconds(3600),
        )
        .unwrap();
        let headers = headers_with(&[("cookie", &format!("auth_token={foreign}"))]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectUnauthenticated(AuthRejection::SignatureInvalid)
        );
    }

    #[test]
    fn test_valid_session_without_csrf_pair_is_403() {
        let config = test_config();
        let token = valid_token(&config);

        let headers = headers_with(&[("cookie", &format!("auth_token={token}"))]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectCsrf(CsrfRejection::MissingCookie)
        );

        let headers = headers_with(&[("cookie", &format!("auth_token={token}; csrf_token=abc"))]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectCsrf(CsrfRejection::MissingHeader)
        );

        let headers = headers_with(&[
            ("cookie", &format!("auth_token={token}; csrf_token=abc")),
            ("x-csrf-token", "abd"),
        ]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectCsrf(CsrfRejection::Mismatch)
        );
    }

    #[test]
    fn test_matching_pair_is_authorized() {
        let config = test_config();
        let token = valid_token(&config);

        let headers = headers_with(&[
            ("cookie", &format!("auth_token={token}; csrf_token=abc")),
            ("x-csrf-token", "abc"),
        ]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::Authorized
        );
    }

    #[test]
    fn test_configured_header_name_is_authoritative() {
        let config = test_config().with_csrf_header_name("X-Request-Token");
        let token = valid_token(&config);

        // Token in the default header must not satisfy a custom config.
        let headers = headers_with(&[
            ("cookie", &format!("auth_token={token}; csrf_token=abc")),
            ("x-csrf-token", "abc"),
        ]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::RejectCsrf(CsrfRejection::MissingHeader)
        );

        let headers = headers_with(&[
            ("cookie", &format!("auth_token={token}; csrf_token=abc")),
            ("x-request-token", "abc"),
        ]);
        assert_eq!(
            evaluate(&config, &Method::POST, "/", &headers),
            GateDecision::Authorized
        );
    }

    #[test]
    fn test_has_csrf_cookie() {
        let config = test_config();

        assert!(!has_csrf_cookie(&config, &HeaderMap::new()));

        let headers = headers_with(&[("cookie", "csrf_token=abc")]);
        assert!(has_csrf_cookie(&config, &headers));

        let headers = headers_with(&[("cookie", "other=abc")]);
        assert!(!has_csrf_cookie(&config, &headers));
    }
}
