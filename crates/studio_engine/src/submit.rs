use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use studio_logging::studio_info;

use crate::client::{parse_url, read_json, status_text, ACCEPT_JSON};
use crate::{EffectMode, JobHandle, ServiceConfig, StudioClient, StudioError, UploadedAsset};

const CLIENT_HINTS: &[(&str, &str)] = &[
    ("sec-ch-ua-platform", "\"Windows\""),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"143\", \"Chromium\";v=\"143\", \"Not A(Brand\";v=\"24\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageJobRequest<'a> {
    model: &'a str,
    tool_type: &'a str,
    effect_id: &'a str,
    image_url: &'a str,
    user_id: &'a str,
    remove_watermark: bool,
    is_private: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoJobRequest<'a> {
    image_url: [&'a str; 1],
    effect_id: &'a str,
    user_id: &'a str,
    remove_watermark: bool,
    model: &'a str,
    is_private: bool,
}

/// JSON body for a job on `asset_url`; its shape depends on the mode.
pub fn job_request_body(
    config: &ServiceConfig,
    asset_url: &str,
) -> Result<serde_json::Value, StudioError> {
    let body = match config.mode {
        EffectMode::ImageEffects => serde_json::to_value(ImageJobRequest {
            model: config.mode.model(),
            tool_type: &config.tool_type,
            effect_id: &config.effect_id,
            image_url: asset_url,
            user_id: &config.user_id,
            remove_watermark: true,
            is_private: true,
        })?,
        EffectMode::VideoEffects => serde_json::to_value(VideoJobRequest {
            image_url: [asset_url],
            effect_id: &config.effect_id,
            user_id: &config.user_id,
            remove_watermark: true,
            model: config.mode.model(),
            is_private: true,
        })?,
    };
    Ok(body)
}

fn submission_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for &(name, value) in CLIENT_HINTS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

impl StudioClient {
    /// Creates a remote job for `asset`.
    ///
    /// A network failure after the request left leaves the job's existence
    /// unknown; the error is reported as-is and nothing is reconciled.
    pub async fn submit(&self, asset: &UploadedAsset) -> Result<JobHandle, StudioError> {
        let config = self.config();
        let url = parse_url(&config.jobs_url())?;
        let body = serde_json::to_vec(&job_request_body(config, &asset.remote_url)?)?;

        let response = self
            .http()
            .post(url)
            .headers(submission_headers())
            .body(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::Submission {
                status: status_text(status),
            });
        }

        let job: JobHandle = read_json(response).await?;
        studio_info!("Job submitted: {} status {:?}", job.job_id, job.status);
        Ok(job)
    }
}
