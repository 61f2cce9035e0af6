use thiserror::Error;

/// Top-level error type for the `rpdac-api` crate.
///
/// Covers every failure mode of the REST surface: transport, authentication,
/// structured API errors and decoding. `rpdac-core` wraps these with the
/// operation and identifiers involved before they reach the user.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The access token was rejected (HTTP 401).
    #[error("Invalid or expired access token")]
    InvalidToken,

    /// The token could not be turned into a header value.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// A by-name lookup returned no match.
    #[error("{resource} with name \"{name}\" in project \"{project}\" not found")]
    NotFound {
        resource: &'static str,
        project: String,
        name: String,
    },

    /// Structured error body returned by the service.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error: either an empty
    /// by-name lookup or an HTTP 404 from the service.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the service rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken | Self::Authentication { .. } | Self::Api { status: 401 | 403, .. }
        )
    }

    /// Returns `true` if the request never got a response in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the service could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Extract the service error code, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_lookup_and_http_404() {
        let lookup = Error::NotFound {
            resource: "dashboard",
            project: "p".into(),
            name: "d".into(),
        };
        assert!(lookup.is_not_found());

        let http = Error::Api {
            status: 404,
            code: Some(40_020),
            message: "missing".into(),
        };
        assert!(http.is_not_found());

        let server = Error::Api {
            status: 500,
            code: None,
            message: "boom".into(),
        };
        assert!(!server.is_not_found());
    }

    #[test]
    fn not_found_message_names_project_and_resource() {
        let err = Error::NotFound {
            resource: "filter",
            project: "test_project".into(),
            name: "mk-e2e".into(),
        };
        assert_eq!(
            err.to_string(),
            "filter with name \"mk-e2e\" in project \"test_project\" not found"
        );
    }
}
