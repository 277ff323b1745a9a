//! The request gate as axum middleware
//!
//! Wire it in with [`axum::middleware::from_fn_with_state`], handing it the
//! [`GateConfig`] built at startup:
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{Router, middleware, routing::get};
//! use jwt_cookie_csrf::GateConfig;
//! use jwt_cookie_csrf_axum::csrf_gate;
//!
//! let config = Arc::new(GateConfig::new("secret"));
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(middleware::from_fn_with_state(config, csrf_gate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;

use jwt_cookie_csrf::{
    GateConfig, GateDecision, evaluate, has_csrf_cookie, issue_csrf_token, set_csrf_cookie,
};

/// Gate one request: reject it, pass it through, or pass it through and
/// rotate the CSRF cookie.
///
/// Rejections happen before `next` runs, so an untrusted request never
/// reaches the wrapped application. Rotation happens after, regardless of
/// the inner status code, so a captured CSRF pair is good for at most one
/// mutating request. Cancellation of the surrounding transport propagates
/// through the plain `next.run` await.
pub async fn csrf_gate(
    State(config): State<Arc<GateConfig>>,
    req: Request,
    next: Next,
) -> Response {
    match evaluate(&config, req.method(), req.uri().path(), req.headers()) {
        GateDecision::PassThrough => {
            let had_csrf_cookie = has_csrf_cookie(&config, req.headers());
            let mut response = next.run(req).await;
            if !had_csrf_cookie {
                if let Err(e) = attach_fresh_csrf_cookie(&config, &mut response) {
                    return internal_error(e);
                }
            }
            response
        }
        GateDecision::Authorized => {
            let mut response = next.run(req).await;
            if let Err(e) = attach_fresh_csrf_cookie(&config, &mut response) {
                return internal_error(e);
            }
            response
        }
        GateDecision::RejectUnauthenticated(_) => {
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
        GateDecision::RejectCsrf(_) => {
            (StatusCode::FORBIDDEN, "CSRF token mismatch").into_response()
        }
    }
}

fn attach_fresh_csrf_cookie(
    config: &GateConfig,
    response: &mut Response,
) -> Result<(), jwt_cookie_csrf::GateError> {
    let token = issue_csrf_token()?;
    set_csrf_cookie(response.headers_mut(), config, &token)
}

fn internal_error(e: jwt_cookie_csrf::GateError) -> Response {
    // RNG or header failure, not a request problem. The error text carries
    // no token material.
    tracing::error!("Failed to issue CSRF cookie: {e}");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
