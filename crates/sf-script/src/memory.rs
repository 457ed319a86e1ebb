//! In-memory execution context.
//!
//! Used by tests and by hosts that embed scripts and want the output handed
//! back rather than written to storage. Clones share the same store.

use std::collections::BTreeMap;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;

use crate::context::{ExecutionContext, Parameters};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Store {
    files: BTreeMap<String, String>,
    writes: usize,
}

/// Execution context that keeps output resources in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryContext {
    parameters: Parameters,
    store: Arc<Mutex<Store>>,
    fail_writes: bool,
}

impl MemoryContext {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    /// Make every write fail, to exercise output error paths.
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Content of the output resource at `path`, if one was committed.
    pub fn file(&self, path: &str) -> Option<String> {
        self.lock().files.get(path).cloned()
    }

    /// All committed output resources.
    pub fn files(&self) -> BTreeMap<String, String> {
        self.lock().files.clone()
    }

    /// Number of committed writes since creation.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A poisoned store still holds consistent data: writes commit in one step.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "output is read-only"),
            ));
        }
        Ok(())
    }
}

impl ExecutionContext for MemoryContext {
    type TextSink = MemorySink;

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    async fn write_text(&self, path: &str, text: &str) -> Result<()> {
        self.check_writable(path)?;
        commit(&self.store, path, text.to_string());
        Ok(())
    }

    async fn open_write_text(&self, path: &str) -> Result<Self::TextSink> {
        self.check_writable(path)?;
        Ok(MemorySink {
            path: path.to_string(),
            buf: Vec::new(),
            store: Arc::clone(&self.store),
            committed: false,
        })
    }
}

fn commit(store: &Mutex<Store>, path: &str, text: String) {
    let mut store = store.lock().unwrap_or_else(|e| e.into_inner());
    store.files.insert(path.to_string(), text);
    store.writes += 1;
}

/// Text stream into a [`MemoryContext`].
///
/// Bytes are buffered and committed as a whole on shutdown; a sink dropped
/// without shutdown leaves the store untouched.
#[derive(Debug)]
pub struct MemorySink {
    path: String,
    buf: Vec<u8>,
    store: Arc<Mutex<Store>>,
    committed: bool,
}

impl AsyncWrite for MemorySink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.committed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sink already shut down",
            )));
        }
        this.buf.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.committed {
            return Poll::Ready(Ok(()));
        }

        let text = String::from_utf8(std::mem::take(&mut this.buf))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        commit(&this.store, &this.path, text);
        this.committed = true;
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_write_text() {
        let ctx = MemoryContext::new(Parameters::new());
        ctx.write_text("out.json", "{}").await.unwrap();

        assert_eq!(ctx.file("out.json").as_deref(), Some("{}"));
        assert_eq!(ctx.write_count(), 1);
    }

    #[tokio::test]
    async fn test_sink_commits_on_shutdown_only() {
        let ctx = MemoryContext::new(Parameters::new());

        let mut sink = ctx.open_write_text("out.json").await.unwrap();
        sink.write_all(b"{\"a\":").await.unwrap();
        sink.write_all(b"1}").await.unwrap();
        assert_eq!(ctx.file("out.json"), None);

        sink.shutdown().await.unwrap();
        assert_eq!(ctx.file("out.json").as_deref(), Some("{\"a\":1}"));
        assert_eq!(ctx.write_count(), 1);

        assert!(sink.write_all(b"more").await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_sink_writes_nothing() {
        let ctx = MemoryContext::new(Parameters::new());
        {
            let mut sink = ctx.open_write_text("out.json").await.unwrap();
            sink.write_all(b"partial").await.unwrap();
        }
        assert!(ctx.files().is_empty());
        assert_eq!(ctx.write_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let ctx = MemoryContext::new(Parameters::new()).with_failing_writes();

        assert!(ctx.write_text("out.json", "{}").await.is_err());
        assert!(ctx.open_write_text("out.json").await.is_err());
        assert!(ctx.files().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let ctx = MemoryContext::new(Parameters::new());
        let clone = ctx.clone();
        clone.write_text("a", "1").await.unwrap();
        assert_eq!(ctx.file("a").as_deref(), Some("1"));
    }
}
