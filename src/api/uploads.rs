// Image upload endpoints
// Multipart uploads ride the same authenticated pipeline as JSON requests

use std::path::Path;

use super::CmsApi;
use crate::error::{ApiError, Result};
use crate::models::UploadResult;

/// Upload target, one per backend upload route
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum UploadKind {
    /// Inline article image
    Image,
    /// Article thumbnail
    Thumbnail,
    /// Site setting image (hero and similar)
    Setting,
}

impl UploadKind {
    fn route(&self) -> &'static str {
        match self {
            UploadKind::Image => "/upload/image",
            UploadKind::Thumbnail => "/upload/thumbnail",
            UploadKind::Setting => "/upload/settings",
        }
    }
}

impl CmsApi {
    /// Upload an image file. The backend expects the file under the
    /// `image` form field on every upload route.
    pub async fn upload(&self, kind: UploadKind, file: &Path) -> Result<UploadResult> {
        let bytes = tokio::fs::read(file).await.map_err(|err| {
            ApiError::Internal(anyhow::anyhow!("Failed to read {}: {}", file.display(), err))
        })?;

        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = guess_mime(&file_name);

        tracing::debug!(file = %file.display(), route = kind.route(), "Uploading image");
        self.client
            .post_multipart(kind.route(), "image", &file_name, mime, bytes)
            .await
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(|ext| ext.to_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
