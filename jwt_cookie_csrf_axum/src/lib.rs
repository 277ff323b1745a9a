//! jwt_cookie_csrf_axum - Axum integration for jwt-cookie-csrf
//!
//! Provides the [`csrf_gate`] middleware that enforces the session-token
//! and double-submit CSRF checks on every inbound request before it reaches
//! the wrapped application.

mod middleware;

pub use middleware::csrf_gate;

// Re-export what an integrating application needs for login flows and
// configuration, so it does not have to depend on the core crate directly.
pub use jwt_cookie_csrf::{
    GateConfig, GateError, JwtAlgorithm, issue_csrf_token, issue_session_token, set_auth_cookie,
    set_csrf_cookie,
};
