use std::path::PathBuf;

use bytes::Bytes;
use serde::Deserialize;

use crate::StudioError;

pub type SessionId = u64;

/// A local file ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub remote_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed,
    Error,
    /// Any status the service adds later; treated as still running.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Error)
    }
}

/// Response of the job submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHandle {
    pub job_id: String,
    #[serde(default)]
    pub status: JobStatus,
}

/// One output entry; the first non-empty locator wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub media_url: Option<String>,
    pub video: Option<String>,
    pub image: Option<String>,
}

impl ResultItem {
    pub fn locator(&self) -> Option<&str> {
        [&self.media_url, &self.video, &self.image]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .find(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResultField {
    Many(Vec<ResultItem>),
    One(ResultItem),
}

/// Response of the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<ResultField>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusPayload {
    /// Output URL of a completed job.
    pub fn output_url(&self) -> Option<&str> {
        let item = match self.result.as_ref()? {
            ResultField::Many(items) => items.first()?,
            ResultField::One(item) => item,
        };
        item.locator()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMedia {
    pub job_id: String,
    pub result_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub extension: String,
    pub bytes_written: u64,
    /// Name of the strategy that produced the bytes.
    pub strategy: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub session: SessionId,
    pub job_id: String,
    /// 1-based count of non-terminal polls.
    pub attempt: u32,
    pub status: JobStatus,
}

#[derive(Debug)]
pub enum EngineEvent {
    UploadCompleted {
        session: SessionId,
        result: Result<UploadedAsset, StudioError>,
    },
    JobSubmitted {
        session: SessionId,
        job: JobHandle,
    },
    Progress(JobProgress),
    GenerationCompleted {
        session: SessionId,
        result: Result<GeneratedMedia, StudioError>,
    },
    DownloadCompleted {
        session: SessionId,
        url: String,
        result: Result<SavedFile, StudioError>,
    },
}

#[cfg(test)]
mod tests {
    use super::{JobStatus, StatusPayload};

    #[test]
    fn single_result_prefers_media_url() {
        let payload: StatusPayload = serde_json::from_str(
            r#"{"status":"completed","result":{"image":"https://x/i.png","mediaUrl":"https://x/m.png"}}"#,
        )
        .unwrap();
        assert_eq!(payload.status, JobStatus::Completed);
        assert_eq!(payload.output_url(), Some("https://x/m.png"));
    }

    #[test]
    fn list_result_uses_first_entry_and_skips_empty_locators() {
        let payload: StatusPayload = serde_json::from_str(
            r#"{"status":"completed","result":[{"mediaUrl":"","video":"https://x/v.mp4"},{"image":"https://x/2.png"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.output_url(), Some("https://x/v.mp4"));
    }

    #[test]
    fn missing_result_has_no_output() {
        let payload: StatusPayload =
            serde_json::from_str(r#"{"status":"completed","result":[]}"#).unwrap();
        assert_eq!(payload.output_url(), None);
    }

    #[test]
    fn unknown_status_is_not_terminal_failure() {
        let payload: StatusPayload = serde_json::from_str(r#"{"status":"rendering"}"#).unwrap();
        assert_eq!(payload.status, JobStatus::Unknown);
        assert!(!payload.status.is_failure());
    }
}
