use thiserror::Error;

/// Internal failures of the gating layer itself.
///
/// These are distinct from per-request rejections: a broken signing key or
/// an unwritable cookie header is a deployment problem, not something a
/// caller can fix by presenting different credentials. Per-request outcomes
/// are expressed through [`crate::GateDecision`] instead.
#[derive(Debug, Error, Clone)]
pub enum GateError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Claims error: {0}")]
    Claims(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}
