//! Error types for the fetch pipeline.

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fetch operations.
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

    /// A non-2xx answer from Salesforce.
    pub fn non_ok(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::NonOkResponse {
            status,
            status_text: status_text.into(),
            body: body.into(),
        })
    }

    /// Wrap a retrieval failure as "Unable to retrieve data from Salesforce".
    pub fn retrieve(inner: Error) -> Self {
        Self::new(ErrorKind::Retrieve(Box::new(inner)))
    }

    /// The kind of the underlying failure, looking through retrieval wrapping.
    pub fn root_kind(&self) -> &ErrorKind {
        match &self.kind {
            ErrorKind::Retrieve(inner) => inner.root_kind(),
            kind => kind,
        }
    }

    /// HTTP status of a non-2xx response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self.root_kind() {
            ErrorKind::NonOkResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Salesforce answered with a non-2xx status.
    #[error("Non-OK API response from Salesforce: {status} {status_text}: {body}")]
    NonOkResponse {
        status: u16,
        status_text: String,
        body: String,
    },

    /// No response was obtained (network, DNS, timeout, invalid URL).
    #[error("{0}")]
    Transport(String),

    /// The response body is not valid JSON.
    #[error("Invalid JSON in Salesforce response: {0}")]
    Json(String),

    /// A retrieval failure wrapped with a descriptive prefix.
    #[error("Unable to retrieve data from Salesforce: {0}")]
    Retrieve(Box<Error>),

    /// Parameter or output failure reported by the host context.
    #[error("{0}")]
    Script(String),

    /// Invalid fetcher configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<busbar_sf_script::Error> for Error {
    fn from(err: busbar_sf_script::Error) -> Self {
        Error::with_source(ErrorKind::Script(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
