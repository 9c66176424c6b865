use crate::domain::ports::ResultSink;
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// `available_numbers_<brand>_<YYYYMMDD_HHMMSS>.txt`
pub fn output_file_name(brand: &str, started_at: DateTime<Local>) -> String {
    format!(
        "available_numbers_{}_{}.txt",
        brand.to_lowercase(),
        started_at.format("%Y%m%d_%H%M%S")
    )
}

/// Appends one number per line, opening and closing the file on every write.
/// The file (and its directory) is created on the first write.
#[derive(Debug, Clone)]
pub struct FileRecorder {
    path: PathBuf,
}

impl FileRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Recorder for a run started at `started_at`, inside `output_dir`.
    pub fn for_run(output_dir: impl AsRef<Path>, brand: &str, started_at: DateTime<Local>) -> Self {
        Self::new(output_dir.as_ref().join(output_file_name(brand, started_at)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileRecorder {
    async fn record(&self, number: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", number).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
