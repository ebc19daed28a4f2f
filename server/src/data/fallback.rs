//! Local record file used when the upstream has no data

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::upstream::UpstreamError;

#[derive(Debug, Clone)]
pub struct FallbackSource {
    path: PathBuf,
}

impl FallbackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file; any failure is reported, never swallowed
    pub async fn load(&self) -> Result<Value, UpstreamError> {
        let path_text = self.path.display().to_string();
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| UpstreamError::FallbackRead {
                path: path_text.clone(),
                source,
            })?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|source| {
            UpstreamError::FallbackParse {
                path: path_text.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %path_text, "Loaded fallback data");
        Ok(value)
    }
}
