// SPDX-License-Identifier: MPL-2.0
//! Destination writing reports to a local directory.
//!
//! Each report becomes `<id>.json` next to the uploaded screenshot
//! `<id>.png`. Both are written through a temporary file and renamed into
//! place, so readers never observe a partial file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use super::DestinationAdapter;
use crate::error::BoxError;
use crate::report::{BugReport, SubmitResult};

/// Errors raised while writing report files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("file export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Writes reports and screenshots into one directory.
#[derive(Debug, Clone)]
pub struct FileSystemAdapter {
    directory: PathBuf,
}

impl FileSystemAdapter {
    /// Adapter writing into `directory`, created on first use.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Adapter writing into `ShakeNbake/reports` under the user's documents
    /// folder, or the current directory when there is none.
    #[must_use]
    pub fn in_documents() -> Self {
        let base = dirs::document_dir().unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
        Self::new(base.join("ShakeNbake").join("reports"))
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolves `filename` inside the directory, refusing anything that would
    /// escape it.
    fn target(&self, filename: &str) -> Result<PathBuf, ExportError> {
        let name = Path::new(filename)
            .file_name()
            .filter(|name| name.len() == filename.len())
            .ok_or_else(|| ExportError::InvalidFileName(filename.to_string()))?;
        Ok(self.directory.join(name))
    }

    async fn write(&self, path: PathBuf, content: Vec<u8>) -> Result<String, ExportError> {
        let directory = self.directory.clone();
        tokio::task::spawn_blocking(move || -> Result<String, ExportError> {
            fs::create_dir_all(&directory)?;
            write_atomic(&path, &content)?;
            Ok(file_url(&path))
        })
        .await?
    }
}

/// Writes `content` to `path` through a sibling temporary file.
///
/// # Errors
///
/// Returns the I/O error of the write or the rename. The temporary file is
/// removed when the rename fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content)?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

fn file_url(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let text = absolute.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

#[async_trait]
impl DestinationAdapter for FileSystemAdapter {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn upload_image(&self, image: &[u8], filename: &str) -> Result<String, BoxError> {
        let path = self.target(filename)?;
        let url = self.write(path, image.to_vec()).await?;
        tracing::debug!(url = %url, "screenshot written");
        Ok(url)
    }

    async fn create_issue(&self, report: &BugReport) -> Result<SubmitResult, BoxError> {
        let path = self.target(&format!("{}.json", report.id()))?;
        let content = serde_json::to_vec_pretty(report).map_err(ExportError::from)?;
        let url = self.write(path, content).await?;
        tracing::debug!(url = %url, "report written");
        Ok(SubmitResult {
            id: report.id().to_string(),
            url,
            success: true,
        })
    }

    async fn test_connection(&self) -> bool {
        let directory = self.directory.clone();
        let written = tokio::task::spawn_blocking(move || -> io::Result<()> {
            fs::create_dir_all(&directory)?;
            let path = directory.join(".shakenbake-write-check");
            write_atomic(&path, b"ok")?;
            fs::remove_file(&path)
        })
        .await;

        match written {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                tracing::warn!(directory = %self.directory.display(), %err, "report directory is not writable");
                false
            }
            Err(err) => {
                tracing::warn!(%err, "report directory check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DeviceContext;
    use crate::report::{ReportBuilder, ReportInput};
    use crate::plugins::PluginRegistry;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn report() -> BugReport {
        let mut builder = ReportBuilder::new(
            PluginRegistry::new(),
            Arc::new(FileSystemAdapter::new("unused")),
        );
        let input = ReportInput {
            annotated_screenshot: STANDARD.encode(b"png"),
            ..ReportInput::new("Crash on launch")
        };
        builder.build(input, DeviceContext::empty()).unwrap()
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.png");
        write_atomic(&path, b"bytes").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"bytes");
        assert!(!dir.path().join("a.png.tmp").exists());
    }

    #[tokio::test]
    async fn writes_screenshot_and_report() {
        let dir = tempdir().unwrap();
        let adapter = FileSystemAdapter::new(dir.path().join("reports"));
        let report = report();

        let image_url = adapter
            .upload_image(b"png bytes", &format!("{}.png", report.id()))
            .await
            .unwrap();
        let result = adapter.create_issue(&report).await.unwrap();

        assert!(image_url.starts_with("file://"));
        assert!(image_url.ends_with(&format!("{}.png", report.id())));
        assert_eq!(result.id, report.id());
        assert!(result.success);

        let json_path = dir.path().join("reports").join(format!("{}.json", report.id()));
        let saved: BugReport = serde_json::from_slice(&fs::read(json_path).unwrap()).unwrap();
        assert_eq!(saved, report);
    }

    #[tokio::test]
    async fn rejects_filenames_leaving_the_directory() {
        let dir = tempdir().unwrap();
        let adapter = FileSystemAdapter::new(dir.path());
        assert!(adapter.upload_image(b"x", "../escape.png").await.is_err());
        assert!(adapter.upload_image(b"x", "").await.is_err());
        assert!(!dir.path().parent().unwrap().join("escape.png").exists());
    }

    #[tokio::test]
    async fn test_connection_reports_writability() {
        let dir = tempdir().unwrap();
        assert!(FileSystemAdapter::new(dir.path().join("new")).test_connection().await);

        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();
        assert!(!FileSystemAdapter::new(blocker.join("nested")).test_connection().await);
    }
}
