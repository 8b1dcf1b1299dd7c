// File upload endpoints

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

use super::Api;
use crate::error::Result;
use crate::models::FileUpload;

impl Api {
    /// Upload a single file
    ///
    /// Multipart bodies cannot be replayed, so a 401 here is not retried;
    /// callers see the failure directly.
    pub async fn upload_file(&self, path: &Path) -> Result<FileUpload> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let request = self
            .http
            .client()
            .post(self.endpoint("/files/upload"))
            .multipart(form)
            .build()?;

        let response = self.http.execute(request).await?;
        Self::parse(response).await
    }

    /// Upload several files, one call per file, all in flight together
    pub async fn upload_files(&self, paths: &[PathBuf]) -> Result<Vec<FileUpload>> {
        let uploads = paths.iter().map(|path| self.upload_file(path));
        futures::future::try_join_all(uploads).await
    }
}
