//! Error types for sf-script.

/// Result type alias for sf-script operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sf-script operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// An I/O failure on the named output resource.
    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        let kind = ErrorKind::Io {
            path: path.into(),
            message: err.to_string(),
        };
        Self::with_source(kind, err)
    }

    /// Returns true if a required parameter was absent or empty.
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingParameter(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A required parameter was not supplied.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// The output path cannot be mapped onto the host's storage.
    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    /// Writing an output resource failed.
    #[error("Failed to write {path}: {message}")]
    Io { path: String, message: String },
}
