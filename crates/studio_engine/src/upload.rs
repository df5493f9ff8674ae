use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use studio_logging::{studio_debug, studio_info};
use url::Url;

use crate::client::{parse_url, status_text, url_with_query};
use crate::filename::{media_type_for_path, public_url, upload_file_name};
use crate::{SourceFile, StudioClient, StudioError, UploadedAsset};

impl SourceFile {
    /// Reads `path`, guessing the media type from its extension.
    pub async fn load(path: &Path) -> Result<Self, StudioError> {
        let media_type = media_type_for_path(path).ok_or_else(|| StudioError::Validation {
            media_type: path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_else(|| "unknown".to_string()),
        })?;
        Self::load_as(path, media_type).await
    }

    /// Reads `path` with a media type chosen by the caller.
    pub async fn load_as(path: &Path, media_type: &str) -> Result<Self, StudioError> {
        let lowered = media_type.to_ascii_lowercase();
        if !(lowered.starts_with("image/") || lowered.starts_with("video/")) {
            return Err(StudioError::Validation {
                media_type: media_type.to_string(),
            });
        }
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            media_type: media_type.to_string(),
            bytes: bytes.into(),
        })
    }
}

impl StudioClient {
    /// Uploads `file` through a signed URL and returns its public location.
    ///
    /// The public URL is derived locally from the content host and the
    /// generated filename; the service never echoes it back.
    pub async fn upload(&self, file: &SourceFile) -> Result<UploadedAsset, StudioError> {
        let file_name = upload_file_name(&file.name);
        let signed_url = self.request_signed_url(&file_name).await?;
        studio_debug!("Got signed URL for {}", file_name);

        let response = self
            .http()
            .put(signed_url)
            .header(CONTENT_TYPE, file.media_type.as_str())
            .body(file.bytes.clone())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::UploadTransfer {
                status: status_text(status),
            });
        }

        let remote_url = public_url(&self.config().content_host, &file_name);
        studio_info!(
            "Uploaded {} ({} bytes) to {}",
            file.name,
            file.bytes.len(),
            remote_url
        );
        Ok(UploadedAsset { remote_url })
    }

    pub async fn upload_path(&self, path: &Path) -> Result<UploadedAsset, StudioError> {
        let file = SourceFile::load(path).await?;
        self.upload(&file).await
    }

    pub async fn upload_path_as(
        &self,
        path: &Path,
        media_type: &str,
    ) -> Result<UploadedAsset, StudioError> {
        let file = SourceFile::load_as(path, media_type).await?;
        self.upload(&file).await
    }

    async fn request_signed_url(&self, file_name: &str) -> Result<Url, StudioError> {
        let endpoint = format!(
            "{}/get-emd-upload-url",
            self.config().asset_host.trim_end_matches('/')
        );
        let url = url_with_query(&endpoint, "fileName", file_name)?;
        let response = self.http().get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::SignedUrl {
                status: status_text(status),
            });
        }
        let body = response.text().await?;
        parse_url(body.trim())
    }
}
