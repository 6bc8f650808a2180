use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::Result;

/// Destination file for a binary response.
///
/// The file is created on the first non-empty chunk, so a failed job never
/// creates or truncates it. The handle closes when the sink is dropped,
/// whichever way the transfer ends.
#[derive(Debug)]
pub struct OutputFile {
    path:    PathBuf,
    file:    Option<File>,
    written: u64,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:    path.into(),
            file:    None,
            written: 0,
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn is_open(&self) -> bool { self.file.is_some() }

    pub fn bytes_written(&self) -> u64 { self.written }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }

        if self.file.is_none() {
            debug!(path = %self.path.display(), "opening output file");
            self.file = Some(File::create(&self.path).await?);
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk).await?;
            self.written += chunk.len() as u64;
        }
        Ok(())
    }

    /// Flush and close the file. Returns the number of bytes written.
    pub async fn finish(mut self) -> Result<u64> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(self.written)
    }
}

/// Whether a file could be created next to `path`.
///
/// Probes the parent directory with an anonymous temporary file, which is
/// removed again immediately.
pub fn output_dir_writable(path: &Path) -> bool {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    dir.is_dir() && tempfile::tempfile_in(dir).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn no_file_without_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        let mut sink = OutputFile::new(&path);
        sink.write(b"").await.unwrap();
        assert!(!sink.is_open());
        assert_eq!(sink.finish().await.unwrap(), 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn appends_chunks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        let mut sink = OutputFile::new(&path);
        sink.write(b"hello ").await.unwrap();
        sink.write(b"world").await.unwrap();
        assert_eq!(sink.bytes_written(), 11);
        assert_eq!(sink.finish().await.unwrap(), 11);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn truncates_existing_file_on_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        std::fs::write(&path, b"previous contents").unwrap();

        let mut sink = OutputFile::new(&path);
        sink.write(b"new").await.unwrap();
        sink.finish().await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn writable_directory() {
        let dir = tempdir().unwrap();
        assert!(output_dir_writable(&dir.path().join("out.jpg")));
        assert!(!output_dir_writable(&dir.path().join("missing/out.jpg")));
    }
}
