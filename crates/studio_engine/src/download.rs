use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use studio_logging::{studio_info, studio_warn};
use url::Url;

use crate::client::{parse_url, read_body, status_text, url_with_query};
use crate::filename::{download_file_name, extension_for};
use crate::persist::AtomicFileWriter;
use crate::{SavedFile, StudioClient, StudioError};

/// Raw media returned by one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// One way of retrieving a result URL.
#[async_trait::async_trait]
pub trait DownloadStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, client: &StudioClient, target: &str)
        -> Result<FetchedMedia, StudioError>;
}

/// Fetches through the service's `download-proxy` endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyStrategy;

#[async_trait::async_trait]
impl DownloadStrategy for ProxyStrategy {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn fetch(
        &self,
        client: &StudioClient,
        target: &str,
    ) -> Result<FetchedMedia, StudioError> {
        let endpoint = format!(
            "{}/download-proxy",
            client.config().api_host.trim_end_matches('/')
        );
        let url = url_with_query(&endpoint, "url", target)?;
        fetch_media(client, url).await
    }
}

/// Fetches the target itself, with a cache-busting `t` parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectStrategy;

impl DirectStrategy {
    fn cache_busted(target: &str) -> String {
        let separator = if target.contains('?') { '&' } else { '?' };
        format!("{target}{separator}t={}", Utc::now().timestamp_millis())
    }
}

#[async_trait::async_trait]
impl DownloadStrategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn fetch(
        &self,
        client: &StudioClient,
        target: &str,
    ) -> Result<FetchedMedia, StudioError> {
        let url = parse_url(&Self::cache_busted(target))?;
        fetch_media(client, url).await
    }
}

async fn fetch_media(client: &StudioClient, url: Url) -> Result<FetchedMedia, StudioError> {
    let response = client.http().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(StudioError::HttpStatus(status_text(status)));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = read_body(response, client.config().max_download_bytes).await?;
    Ok(FetchedMedia {
        bytes,
        content_type,
    })
}

/// Tries each strategy in order and saves the first success to disk.
pub struct Downloader {
    strategies: Vec<Box<dyn DownloadStrategy>>,
    writer: AtomicFileWriter,
    prefix: String,
}

impl Downloader {
    /// Proxy first, then direct.
    pub fn new(output_dir: PathBuf, prefix: impl Into<String>) -> Self {
        Self {
            strategies: vec![Box::new(ProxyStrategy), Box::new(DirectStrategy)],
            writer: AtomicFileWriter::new(output_dir),
            prefix: prefix.into(),
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<Box<dyn DownloadStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub async fn download(
        &self,
        client: &StudioClient,
        target: &str,
    ) -> Result<SavedFile, StudioError> {
        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let outcome = match strategy.fetch(client, target).await {
                Ok(media) => {
                    // Name the file after the target, not the proxy URL.
                    let extension = extension_for(target, media.content_type.as_deref());
                    let file_name = download_file_name(&self.prefix, &extension);
                    self.save(file_name, media.bytes.clone())
                        .await
                        .map(|path| (path, extension, media))
                }
                Err(err) => Err(err),
            };
            let (path, extension, media) = match outcome {
                Ok(saved) => saved,
                Err(err) => {
                    studio_warn!(
                        "{} download of {} failed, trying next: {}",
                        strategy.name(),
                        target,
                        err
                    );
                    attempts.push(format!("{}: {}", strategy.name(), err));
                    continue;
                }
            };

            studio_info!(
                "Saved {} via {} to {:?} ({} bytes)",
                target,
                strategy.name(),
                path,
                media.bytes.len()
            );
            return Ok(SavedFile {
                path,
                extension,
                bytes_written: media.bytes.len() as u64,
                strategy: strategy.name(),
            });
        }

        Err(StudioError::Download {
            url: target.to_string(),
            attempts,
        })
    }

    // File I/O and fsync run off the async workers.
    async fn save(&self, file_name: String, bytes: Bytes) -> Result<PathBuf, StudioError> {
        let writer = self.writer.clone();
        let path = tokio::task::spawn_blocking(move || writer.write(&file_name, &bytes))
            .await
            .map_err(|err| StudioError::Io(io::Error::other(err)))??;
        Ok(path)
    }
}
