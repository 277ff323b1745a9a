//! Gate configuration
//!
//! A [`GateConfig`] is built once at startup and injected into the
//! middleware; after construction it is only ever read, so request handlers
//! can share it behind an `Arc` without locking.

use std::collections::HashSet;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::errors::GateError;

const DEFAULT_SESSION_COOKIE_NAME: &str = "auth_token";
const DEFAULT_CSRF_COOKIE_NAME: &str = "csrf_token";
const DEFAULT_CSRF_HEADER_NAME: &str = "X-CSRF-Token";
const DEFAULT_EXCLUDED_PATHS: [&str; 2] = ["/login", "/logout"];

/// Signing algorithm for session tokens.
///
/// Restricted to the symmetric HMAC family: the gate holds a single shared
/// secret, so the asymmetric variants of [`jsonwebtoken::Algorithm`] do not
/// apply here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JwtAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl From<JwtAlgorithm> for Algorithm {
    fn from(alg: JwtAlgorithm) -> Self {
        match alg {
            JwtAlgorithm::HS256 => Algorithm::HS256,
            JwtAlgorithm::HS384 => Algorithm::HS384,
            JwtAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

impl FromStr for JwtAlgorithm {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(JwtAlgorithm::HS256),
            "HS384" => Ok(JwtAlgorithm::HS384),
            "HS512" => Ok(JwtAlgorithm::HS512),
            other => Err(GateError::Config(format!(
                "Unsupported JWT algorithm: {other}"
            ))),
        }
    }
}

/// Immutable settings for the request gate.
///
/// Constructed with [`GateConfig::new`] or [`GateConfig::from_env`] before
/// traffic is served; there is no mutation entry point once requests are in
/// flight.
#[derive(Debug, Clone)]
pub struct GateConfig {
    jwt_secret: Vec<u8>,
    jwt_algorithm: JwtAlgorithm,
    session_cookie_name: String,
    csrf_cookie_name: String,
    csrf_header_name: String,
    excluded_paths: HashSet<String>,
}

impl GateConfig {
    /// Create a configuration with the given signing secret and defaults
    /// for everything else.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_algorithm: JwtAlgorithm::default(),
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE_NAME.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER_NAME.to_string(),
            excluded_paths: DEFAULT_EXCLUDED_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Build a configuration from environment variables.
    ///
    /// Reads `JWT_SECRET` (required, must be non-empty), `JWT_ALGORITHM`,
    /// `SESSION_COOKIE_NAME`, `CSRF_COOKIE_NAME`, `CSRF_HEADER_NAME` and
    /// `EXCLUDED_PATHS` (comma separated). A `.env` file is loaded first if
    /// present.
    pub fn from_env() -> Result<Self, GateError> {
        dotenvy::dotenv().ok();

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| GateError::Config("JWT_SECRET must be set".to_string()))?;
        if jwt_secret.is_empty() {
            return Err(GateError::Config("JWT_SECRET must not be empty".to_string()));
        }

        let mut config = Self::new(jwt_secret.into_bytes());

        if let Ok(alg) = std::env::var("JWT_ALGORITHM") {
            config.jwt_algorithm = alg.parse()?;
        }
        if let Ok(name) = std::env::var("SESSION_COOKIE_NAME") {
            config.session_cookie_name = name;
        }
        if let Ok(name) = std::env::var("CSRF_COOKIE_NAME") {
            config.csrf_cookie_name = name;
        }
        if let Ok(name) = std::env::var("CSRF_HEADER_NAME") {
            config.csrf_header_name = name;
        }
        if let Ok(paths) = std::env::var("EXCLUDED_PATHS") {
            config.excluded_paths = paths
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }

        Ok(config)
    }

    pub fn with_algorithm(mut self, algorithm: JwtAlgorithm) -> Self {
        self.jwt_algorithm = algorithm;
        self
    }

    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    pub fn with_csrf_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.csrf_cookie_name = name.into();
        self
    }

    pub fn with_csrf_header_name(mut self, name: impl Into<String>) -> Self {
        self.csrf_header_name = name.into();
        self
    }

    pub fn with_excluded_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn jwt_secret(&self) -> &[u8] {
        &self.jwt_secret
    }

    pub fn jwt_algorithm(&self) -> JwtAlgorithm {
        self.jwt_algorithm
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    pub fn csrf_cookie_name(&self) -> &str {
        &self.csrf_cookie_name
    }

    pub fn csrf_header_name(&self) -> &str {
        &self.csrf_header_name
    }

    /// Exact string match against the excluded path list.
    pub fn is_excluded_path(&self, path: &str) -> bool {
        self.excluded_paths.contains(path)
    }
}
