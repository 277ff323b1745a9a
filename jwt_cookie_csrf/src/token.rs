//! Session token issue and verify
//!
//! Session tokens are JWTs signed with the configured HMAC secret. Issuing
//! stamps an `exp` claim; verification enforces signature and expiry and
//! reports a tagged verdict rather than a bare boolean so callers can log
//! why a token was rejected without leaking its contents.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::GateConfig;
use crate::errors::GateError;

/// Outcome of session token verification.
///
/// Only [`TokenVerdict::Valid`] authorizes a request; the other variants
/// exist for observability and all collapse to 401 at the response boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerdict {
    Valid(Map<String, Value>),
    Expired,
    Malformed,
    SignatureInvalid,
}

impl TokenVerdict {
    /// Discriminant name, safe to log.
    pub fn label(&self) -> &'static str {
        match self {
            TokenVerdict::Valid(_) => "valid",
            TokenVerdict::Expired => "expired",
            TokenVerdict::Malformed => "malformed",
            TokenVerdict::SignatureInvalid => "signature_invalid",
        }
    }
}

/// Sign a session token carrying `claims` plus `exp = now + ttl`.
///
/// `claims` must serialize to a JSON object. A failure of the signing
/// primitive itself is a [`GateError::Crypto`], which is an internal
/// condition and never part of the per-request rejection taxonomy.
pub fn issue_session_token<T: Serialize>(
    config: &GateConfig,
    claims: &T,
    ttl: Duration,
) -> Result<String, GateError> {
    let value = serde_json::to_value(claims)
        .map_err(|e| GateError::Claims(format!("Failed to serialize claims: {e}")))?;

    let Value::Object(mut payload) = value else {
        return Err(GateError::Claims(
            "Claims must serialize to a JSON object".to_string(),
        ));
    };

    let expires_at = Utc::now() + ttl;
    payload.insert("exp".to_string(), Value::from(expires_at.timestamp()));

    jsonwebtoken::encode(
        &Header::new(config.jwt_algorithm().into()),
        &payload,
        &EncodingKey::from_secret(config.jwt_secret()),
    )
    .map_err(|e| GateError::Crypto(format!("Failed to sign session token: {e}")))
}

/// Verify a session token against the configured secret and algorithm.
pub fn verify_session_token(config: &GateConfig, token: &str) -> TokenVerdict {
    let mut validation = Validation::new(config.jwt_algorithm().into());
    validation.leeway = 0;

    match jsonwebtoken::decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(config.jwt_secret()),
        &validation,
    ) {
        Ok(data) => TokenVerdict::Valid(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => TokenVerdict::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenVerdict::SignatureInvalid
            }
            _ => TokenVerdict::Malformed,
        },
    }
}
