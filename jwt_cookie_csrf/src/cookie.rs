//! Cookie writing
//!
//! The single place where cookie attribute policy is encoded. Every cookie
//! this layer sets goes out with `Path=/; SameSite=Strict`; callers choose
//! `HttpOnly` depending on whether client script must read the value.

use http::header::{HeaderMap, SET_COOKIE};

use crate::config::GateConfig;
use crate::errors::GateError;

/// Per-cookie attribute overrides.
///
/// Defaults match the session cookie: `HttpOnly`, `Secure`, no `Max-Age`.
#[derive(Debug, Clone, Copy)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub max_age: Option<i64>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            max_age: None,
        }
    }
}

/// Append a `Set-Cookie` header with the gate's attribute policy applied.
pub fn set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    attributes: CookieAttributes,
) -> Result<(), GateError> {
    let mut cookie = format!("{name}={value}; Path=/; SameSite=Strict");
    if attributes.secure {
        cookie.push_str("; Secure");
    }
    if attributes.http_only {
        cookie.push_str("; HttpOnly");
    }
    if let Some(max_age) = attributes.max_age {
        cookie.push_str(&format!("; Max-Age={max_age}"));
    }

    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| GateError::Cookie(format!("Failed to encode cookie {name}")))?,
    );
    Ok(())
}

/// Set the session cookie for a freshly issued token.
///
/// `HttpOnly` so script can never read the credential.
pub fn set_auth_cookie(
    headers: &mut HeaderMap,
    config: &GateConfig,
    token: &str,
) -> Result<(), GateError> {
    set_cookie(
        headers,
        config.session_cookie_name(),
        token,
        CookieAttributes::default(),
    )
}

/// Set the CSRF cookie.
///
/// Deliberately not `HttpOnly`: the client script has to read this value
/// and echo it in the CSRF header.
pub fn set_csrf_cookie(
    headers: &mut HeaderMap,
    config: &GateConfig,
    token: &str,
) -> Result<(), GateError> {
    set_cookie(
        headers,
        config.csrf_cookie_name(),
        token,
        CookieAttributes {
            http_only: false,
            ..CookieAttributes::default()
        },
    )
}
