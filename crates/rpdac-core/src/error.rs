// ── Core error types ──
//
// Every failure that aborts the reconciliation of one object. Remote
// failures keep the `rpdac_api::Error` as their source and add the
// operation and identifiers involved. A lookup that finds nothing is not
// an error at this layer: `get_by_name` returns `Ok(None)`.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::Kind;
use crate::reconcile::ApplyReport;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup ───────────────────────────────────────────────────────
    /// An explicitly addressed object does not exist.
    #[error("{kind} \"{name}\" not found in project \"{project}\"")]
    NotFound {
        kind: Kind,
        project: String,
        name: String,
    },

    /// Update or delete was called with an object that was not fetched
    /// from the service.
    #[error("{kind} \"{name}\" has no remote origin")]
    MissingOrigin { kind: &'static str, name: String },

    /// An object was handed to the service of another kind.
    #[error("{found} \"{name}\" cannot be handled as a {expected}")]
    KindMismatch {
        expected: Kind,
        found: Kind,
        name: String,
    },

    // ── Resolution ───────────────────────────────────────────────────
    #[error("filter \"{filter}\" used by widget \"{widget}\" not found")]
    FilterNotResolved { filter: String, widget: String },

    #[error("no mapping for field \"{field}\"")]
    FieldNotMapped { field: String },

    /// A widget could not be translated or created. Earlier widgets of the
    /// same dashboard stay on the service.
    #[error("widget \"{widget}\" of dashboard \"{dashboard}\" failed")]
    WidgetFailed {
        dashboard: String,
        widget: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("cannot build client for {endpoint}")]
    Client {
        endpoint: String,
        #[source]
        source: rpdac_api::Error,
    },

    #[error("{operation} ({identifier}) failed")]
    Remote {
        operation: &'static str,
        identifier: String,
        #[source]
        source: rpdac_api::Error,
    },

    // ── Files ────────────────────────────────────────────────────────
    #[error("cannot decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("object kind '{kind}' in {} is not supported", path.display())]
    UnsupportedKind { path: PathBuf, kind: String },

    #[error("cannot encode {kind} \"{name}\": {message}")]
    Encode {
        kind: Kind,
        name: String,
        message: String,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "'{}' is a directory, apply it recursively to include every object in it",
        path.display()
    )]
    NotRecursive { path: PathBuf },

    // ── Batch ────────────────────────────────────────────────────────
    #[error("{failed} of {total} files failed to apply")]
    BatchFailed {
        failed: usize,
        total: usize,
        report: Box<ApplyReport>,
    },
}

impl CoreError {
    pub(crate) fn remote(
        operation: &'static str,
        identifier: impl ToString,
        source: rpdac_api::Error,
    ) -> Self {
        Self::Remote {
            operation,
            identifier: identifier.to_string(),
            source,
        }
    }

    /// The underlying API error, when the failure came from the service.
    pub fn api_error(&self) -> Option<&rpdac_api::Error> {
        match self {
            Self::Remote { source, .. } | Self::Client { source, .. } => Some(source),
            Self::WidgetFailed { source, .. } => source.api_error(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            _ => self.api_error().is_some_and(rpdac_api::Error::is_not_found),
        }
    }
}

/// `err` followed by each of its sources, joined with `": "`.
///
/// A cause whose text already ends the message is not repeated, since
/// `#[error("...: {0}")]` variants print their source themselves.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Attach the operation and identifier to a failed API call.
pub(crate) trait RemoteContext<T> {
    fn context(self, operation: &'static str, identifier: impl ToString) -> Result<T, CoreError>;
}

impl<T> RemoteContext<T> for Result<T, rpdac_api::Error> {
    fn context(self, operation: &'static str, identifier: impl ToString) -> Result<T, CoreError> {
        self.map_err(|source| CoreError::remote(operation, identifier, source))
    }
}
