//! Filesystem-backed execution context.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::context::{ExecutionContext, Parameters};
use crate::error::{Error, ErrorKind, Result};

/// Execution context whose output resources are files below `root`.
///
/// Output paths are relative to `root`; absolute paths and `..` components
/// are rejected. Missing parent directories are created on write.
///
/// Writes go to a temporary file in the target's directory and replace the
/// target only once complete, so a failed or abandoned write leaves any
/// previous file untouched.
#[derive(Debug, Clone)]
pub struct LocalContext {
    root: PathBuf,
    parameters: Parameters,
}

impl LocalContext {
    pub fn new(root: impl Into<PathBuf>, parameters: Parameters) -> Self {
        Self {
            root: root.into(),
            parameters,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an output resource path onto the filesystem.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let mut has_file = false;

        for component in relative.components() {
            match component {
                Component::Normal(_) => has_file = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::new(ErrorKind::InvalidPath(path.to_string())));
                }
            }
        }

        if !has_file {
            return Err(Error::new(ErrorKind::InvalidPath(path.to_string())));
        }

        Ok(self.root.join(relative))
    }

    async fn prepare(&self, path: &str) -> Result<PathBuf> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(path, e))?;
        }
        Ok(target)
    }
}

impl ExecutionContext for LocalContext {
    type TextSink = LocalSink;

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    async fn write_text(&self, path: &str, text: &str) -> Result<()> {
        let mut sink = self.open_write_text(path).await?;
        sink.write_all(text.as_bytes())
            .await
            .map_err(|e| Error::io(path, e))?;
        sink.shutdown().await.map_err(|e| Error::io(path, e))?;
        Ok(())
    }

    async fn open_write_text(&self, path: &str) -> Result<Self::TextSink> {
        let target = self.prepare(path).await?;
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let (file, temp) = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(dir)
            .map_err(|e| Error::io(path, e))?
            .into_parts();
        debug!(path = %target.display(), temp = %temp.display(), "Output file opened");

        Ok(LocalSink {
            file: Some(BufWriter::new(File::from_std(file))),
            temp: Some(temp),
            target,
        })
    }
}

/// Text stream into a file below a [`LocalContext`] root.
///
/// Shutdown renames the temporary file over the target. Dropping the sink
/// before that deletes the temporary file.
#[derive(Debug)]
pub struct LocalSink {
    file: Option<BufWriter<File>>,
    temp: Option<TempPath>,
    target: PathBuf,
}

impl LocalSink {
    fn closed() -> io::Error {
        io::Error::new(io::ErrorKind::BrokenPipe, "sink already shut down")
    }
}

impl AsyncWrite for LocalSink {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut().file.as_mut() {
            Some(file) => Pin::new(file).poll_write(cx, buf),
            None => Poll::Ready(Err(Self::closed())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().file.as_mut() {
            Some(file) => Pin::new(file).poll_flush(cx),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if let Some(file) = this.file.as_mut() {
            ready!(Pin::new(file).poll_shutdown(cx))?;
            this.file = None;
        }

        // A failed rename hands the temporary path back in the error, which
        // removes the file when dropped.
        if let Some(temp) = this.temp.take() {
            temp.persist(&this.target).map_err(|e| e.error)?;
            debug!(path = %this.target.display(), "Output file committed");
        }

        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(root: &Path) -> LocalContext {
        LocalContext::new(root, Parameters::new())
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_resolve_rejects_escaping_paths() {
        let ctx = context(Path::new("/srv/run"));

        assert_eq!(
            ctx.resolve("out/data.json").unwrap(),
            PathBuf::from("/srv/run/out/data.json")
        );
        assert_eq!(
            ctx.resolve("./data.json").unwrap(),
            PathBuf::from("/srv/run/./data.json")
        );
        for bad in ["../data.json", "out/../../x", "/etc/passwd", "", "."] {
            let err = ctx.resolve(bad).unwrap_err();
            assert!(
                matches!(err.kind, ErrorKind::InvalidPath(_)),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_write_text_creates_parents_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        ctx.write_text("nested/out.json", "first, longer content")
            .await
            .unwrap();
        ctx.write_text("nested/out.json", "second").await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("nested/out.json")).unwrap();
        assert_eq!(written, "second");
    }

    #[tokio::test]
    async fn test_open_write_text_streams_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let mut sink = ctx.open_write_text("stream.json").await.unwrap();
        sink.write_all(b"{\n  \"a\": 1\n}").await.unwrap();
        sink.shutdown().await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("stream.json")).unwrap();
        assert_eq!(written, "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn test_write_into_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("taken")).unwrap();
        let ctx = context(dir.path());

        let err = ctx.write_text("taken", "x").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Io { ref path, .. } if path == "taken"));
        assert_eq!(entries(dir.path()), vec!["taken"]);
    }

    #[tokio::test]
    async fn test_dropped_sink_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "previous good data").unwrap();
        let ctx = context(dir.path());

        let mut sink = ctx.open_write_text("data.json").await.unwrap();
        sink.write_all(&[b'x'; 20_000]).await.unwrap();
        sink.flush().await.unwrap();
        drop(sink);

        let kept = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert_eq!(kept, "previous good data");
        assert_eq!(entries(dir.path()), vec!["data.json"]);
    }

    #[tokio::test]
    async fn test_target_untouched_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "previous good data").unwrap();
        let ctx = context(dir.path());

        let mut sink = ctx.open_write_text("data.json").await.unwrap();
        sink.write_all(b"{\"fresh\":true}").await.unwrap();
        sink.flush().await.unwrap();

        let during = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert_eq!(during, "previous good data");

        sink.shutdown().await.unwrap();
        let after = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert_eq!(after, "{\"fresh\":true}");
        assert_eq!(entries(dir.path()), vec!["data.json"]);

        let err = sink.write_all(b"late").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
