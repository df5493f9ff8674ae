use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::parse_url;
use crate::StudioError;

/// Which family of transformation the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectMode {
    #[default]
    ImageEffects,
    VideoEffects,
}

impl EffectMode {
    /// Path segment of the submission and status endpoints.
    pub fn endpoint(self) -> &'static str {
        match self {
            EffectMode::ImageEffects => "image-gen",
            EffectMode::VideoEffects => "video-gen",
        }
    }

    /// Model identifier sent with the job.
    pub fn model(self) -> &'static str {
        match self {
            EffectMode::ImageEffects => "image-effects",
            EffectMode::VideoEffects => "video-effects",
        }
    }
}

/// Endpoints, identities and cadence for talking to the effect service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Job submission, status and download-proxy host.
    pub api_host: String,
    /// Host issuing signed upload URLs.
    pub asset_host: String,
    /// Public host serving uploaded files as `{content_host}/{file_name}`.
    pub content_host: String,
    pub user_id: String,
    pub effect_id: String,
    pub mode: EffectMode,
    pub tool_type: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_download_bytes: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_host: "https://api.chromastudio.ai".to_string(),
            asset_host: "https://api.chromastudio.ai".to_string(),
            content_host: "https://contents.maxstudio.ai".to_string(),
            user_id: "DObRu1vyStbUynoQmTcHBlhs55z2".to_string(),
            effect_id: "simpsonsCharacter".to_string(),
            mode: EffectMode::ImageEffects,
            tool_type: "image-effects".to_string(),
            poll_interval_ms: 2_000,
            max_poll_attempts: 60,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 60_000,
            max_download_bytes: 200 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Points every host at one base URL; handy for local mocks.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            api_host: base.clone(),
            asset_host: base.clone(),
            content_host: format!("{base}/contents"),
            ..Self::default()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub(crate) fn jobs_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_host.trim_end_matches('/'),
            self.mode.endpoint()
        )
    }

    /// `{jobs_url}/{user_id}/{job_id}/status`, each segment percent-encoded.
    pub(crate) fn status_url(&self, job_id: &str) -> Result<Url, StudioError> {
        let jobs_url = self.jobs_url();
        let mut url = parse_url(&jobs_url)?;
        url.path_segments_mut()
            .map_err(|()| StudioError::InvalidUrl {
                url: jobs_url.clone(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(&self.user_id)
            .push(job_id)
            .push("status");
        Ok(url)
    }
}
