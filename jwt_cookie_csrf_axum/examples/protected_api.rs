//! Minimal API wired through the gate.
//!
//! `POST /login` issues the session and CSRF cookies; `GET /profile` is a
//! safe read; `PUT /profile` is gated and demonstrates CSRF rotation.
//!
//! Run with: cargo run --example protected_api

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration;
use http::HeaderMap;
use serde_json::json;

use jwt_cookie_csrf::{
    GateConfig, issue_csrf_token, issue_session_token, set_auth_cookie, set_csrf_cookie,
};
use jwt_cookie_csrf_axum::csrf_gate;

async fn login(State(config): State<Arc<GateConfig>>) -> impl IntoResponse {
    let token = issue_session_token(&config, &json!({"user_id": 1}), Duration::hours(1))
        .expect("sign session token");
    let csrf = issue_csrf_token().expect("issue CSRF token");

    let mut headers = HeaderMap::new();
    set_auth_cookie(&mut headers, &config, &token).expect("set auth cookie");
    set_csrf_cookie(&mut headers, &config, &csrf).expect("set CSRF cookie");
    (headers, "logged in")
}

async fn profile() -> &'static str {
    "profile data"
}

async fn update_profile() -> &'static str {
    "profile updated"
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config =
        Arc::new(GateConfig::from_env().unwrap_or_else(|_| GateConfig::new("demo_secret")));

    let app = Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
        .layer(middleware::from_fn_with_state(config.clone(), csrf_gate))
        .with_state(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .expect("bind 127.0.0.1:3000");
    tracing::info!("listening on {}", listener.local_addr().expect("local addr"));
    axum::serve(listener, app).await.expect("serve");
}
