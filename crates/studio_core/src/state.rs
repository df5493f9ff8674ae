use std::path::{Path, PathBuf};

use crate::media::ResultMedia;
use crate::view_model::{phase_controls, AppViewModel, ButtonView, DOWNLOADING_LABEL, DOWNLOAD_LABEL};

/// Identifies one pipeline cycle. Engine messages tagged with an older
/// session are dropped.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    /// Asset uploaded and either not yet submitted or its result is shown.
    Ready,
    Submitting,
    /// Waiting on the remote job; `attempt` counts non-terminal polls so far.
    Polling {
        attempt: u32,
    },
    Error,
}

impl Phase {
    /// True while a pipeline call is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            Phase::Uploading | Phase::Submitting | Phase::Polling { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub result_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub remote_url: String,
}

/// A local file chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub media_type: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            media_type: media_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionId,
    phase: Phase,
    asset: Option<UploadedAsset>,
    job: Option<Job>,
    result: Option<ResultMedia>,
    download_target: Option<String>,
    downloading: bool,
    last_saved: Option<PathBuf>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let controls = phase_controls(self.phase, self.asset.is_some());
        let download_enabled = self.download_target.is_some() && !self.downloading;
        AppViewModel {
            phase: self.phase,
            generate: ButtonView {
                enabled: controls.generate_enabled,
                label: controls.generate_label,
            },
            download: ButtonView {
                enabled: download_enabled,
                label: if self.downloading {
                    DOWNLOADING_LABEL.to_string()
                } else {
                    DOWNLOAD_LABEL.to_string()
                },
            },
            status_text: controls.status_text,
            loading_visible: controls.loading_visible,
            preview_url: self.asset.as_ref().map(|asset| asset.remote_url.clone()),
            result: self.result.clone(),
            result_placeholder_visible: self.result.is_none(),
            job_id: self.job.as_ref().map(|job| job.id.clone()),
            last_saved: self.last_saved.clone(),
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn asset(&self) -> Option<&UploadedAsset> {
        self.asset.as_ref()
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn result(&self) -> Option<&ResultMedia> {
        self.result.as_ref()
    }

    pub fn download_target(&self) -> Option<&str> {
        self.download_target.as_deref()
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn generate_enabled(&self) -> bool {
        phase_controls(self.phase, self.asset.is_some()).generate_enabled
    }

    pub(crate) fn download_enabled(&self) -> bool {
        self.download_target.is_some() && !self.downloading
    }

    /// Starts a fresh session for a newly selected file.
    pub(crate) fn begin_upload(&mut self) -> SessionId {
        self.session += 1;
        self.phase = Phase::Uploading;
        self.asset = None;
        self.job = None;
        self.result = None;
        self.download_target = None;
        self.downloading = false;
        self.mark_dirty();
        self.session
    }

    pub(crate) fn apply_uploaded(&mut self, remote_url: String) {
        self.asset = Some(UploadedAsset { remote_url });
        self.phase = Phase::Ready;
        self.mark_dirty();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.phase = Phase::Submitting;
        self.mark_dirty();
    }

    pub(crate) fn apply_submitted(&mut self, job_id: String, status: JobStatus) {
        self.job = Some(Job {
            id: job_id,
            status,
            result_url: None,
        });
        self.phase = Phase::Polling { attempt: 0 };
        self.mark_dirty();
    }

    pub(crate) fn apply_poll_progress(&mut self, attempt: u32, status: JobStatus) {
        if let Some(job) = self.job.as_mut() {
            if job.status.is_terminal() {
                return;
            }
            job.status = status;
        }
        self.phase = Phase::Polling { attempt };
        self.mark_dirty();
    }

    pub(crate) fn apply_generated(&mut self, result_url: String) {
        if let Some(job) = self.job.as_mut() {
            job.status = JobStatus::Completed;
            job.result_url = Some(result_url.clone());
        }
        self.result = Some(ResultMedia::from_url(result_url.clone()));
        self.download_target = Some(result_url);
        self.phase = Phase::Ready;
        self.mark_dirty();
    }

    pub(crate) fn apply_generation_failed(&mut self) {
        if let Some(job) = self.job.as_mut() {
            job.status = JobStatus::Failed;
        }
        self.phase = Phase::Error;
        self.mark_dirty();
    }

    pub(crate) fn begin_download(&mut self) {
        self.downloading = true;
        self.mark_dirty();
    }

    pub(crate) fn apply_download_finished(&mut self, saved: Option<PathBuf>) {
        self.downloading = false;
        if saved.is_some() {
            self.last_saved = saved;
        }
        self.mark_dirty();
    }

    /// Returns every pipeline field to its initial value. When work is in
    /// flight, downloads included, the session advances so its late events
    /// are ignored; the abandoned session is returned for cancellation.
    pub(crate) fn reset(&mut self) -> Option<SessionId> {
        let abandoned = if self.phase.is_busy() || self.downloading {
            let old = self.session;
            self.session += 1;
            Some(old)
        } else {
            None
        };
        self.phase = Phase::Idle;
        self.asset = None;
        self.job = None;
        self.result = None;
        self.download_target = None;
        self.downloading = false;
        self.last_saved = None;
        self.mark_dirty();
        abandoned
    }
}
