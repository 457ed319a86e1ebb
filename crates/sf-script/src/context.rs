//! The capability surface a host hands to a running script.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWrite;

use crate::error::{Error, ErrorKind, Result};

/// Resolved parameter values, keyed by the ids declared in the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Get a parameter that must be present and non-empty.
    pub fn require(&self, id: &str) -> Result<&str> {
        match self.get(id) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::new(ErrorKind::MissingParameter(id.to_string()))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Runtime context supplied by the host for a single invocation.
///
/// Scripts only read parameters and write output resources through this
/// trait; everything else (connector resolution, storage layout, lifecycle)
/// stays on the host side.
pub trait ExecutionContext: Send + Sync {
    /// Writable text stream returned by [`open_write_text`](Self::open_write_text).
    ///
    /// Content is committed when the stream is shut down.
    type TextSink: AsyncWrite + Unpin + Send;

    /// Resolved parameter values.
    fn parameters(&self) -> &Parameters;

    /// Replace the output resource at `path` with `text` in one write.
    ///
    /// On error the previous content, if any, is left in place.
    fn write_text(&self, path: &str, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Open the output resource at `path` for streaming text into it.
    fn open_write_text(&self, path: &str) -> impl Future<Output = Result<Self::TextSink>> + Send;
}
