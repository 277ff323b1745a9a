//! jwt_cookie_csrf - JWT session cookie and double-submit CSRF gating
//!
//! This crate is the framework-free core of a request gating layer. It
//! issues and verifies signed session tokens carried in an `HttpOnly`
//! cookie, manages double-submit CSRF tokens, and classifies each request
//! into a [`GateDecision`] that the transport integration acts on. The
//! axum middleware lives in the companion `jwt-cookie-csrf-axum` crate.

mod config;
mod cookie;
mod csrf;
mod errors;
mod gate;
mod token;

pub use config::{GateConfig, JwtAlgorithm};
pub use cookie::{CookieAttributes, set_auth_cookie, set_cookie, set_csrf_cookie};
pub use csrf::{CsrfRejection, issue_csrf_token, verify_csrf_pair};
pub use errors::GateError;
pub use gate::{AuthRejection, GateDecision, evaluate, has_csrf_cookie};
pub use token::{TokenVerdict, issue_session_token, verify_session_token};
