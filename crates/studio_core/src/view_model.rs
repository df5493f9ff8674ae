use std::path::PathBuf;

use crate::{Phase, ResultMedia};

pub const GENERATE_LABEL: &str = "Generate";
pub const DOWNLOAD_LABEL: &str = "Download";
pub const DOWNLOADING_LABEL: &str = "Downloading...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonView {
    pub enabled: bool,
    pub label: String,
}

/// Render instructions for the pipeline phase, independent of any UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseControls {
    pub generate_enabled: bool,
    pub generate_label: String,
    pub status_text: Option<String>,
    pub loading_visible: bool,
}

/// Maps a phase to its control states. `has_asset` only matters after an
/// error, where a held asset allows retrying without a new upload.
pub fn phase_controls(phase: Phase, has_asset: bool) -> PhaseControls {
    let busy = |text: String| PhaseControls {
        generate_enabled: false,
        generate_label: text.clone(),
        status_text: Some(text),
        loading_visible: true,
    };

    match phase {
        Phase::Idle => PhaseControls {
            generate_enabled: false,
            generate_label: GENERATE_LABEL.to_string(),
            status_text: None,
            loading_visible: false,
        },
        Phase::Uploading => busy("UPLOADING...".to_string()),
        Phase::Ready => PhaseControls {
            generate_enabled: true,
            generate_label: GENERATE_LABEL.to_string(),
            status_text: Some("READY".to_string()),
            loading_visible: false,
        },
        Phase::Submitting => busy("SUBMITTING JOB...".to_string()),
        Phase::Polling { attempt: 0 } => busy("QUEUED...".to_string()),
        Phase::Polling { attempt } => busy(format!("PROCESSING... ({attempt})")),
        Phase::Error => PhaseControls {
            generate_enabled: has_asset,
            generate_label: GENERATE_LABEL.to_string(),
            status_text: Some("ERROR".to_string()),
            loading_visible: false,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub generate: ButtonView,
    pub download: ButtonView,
    pub status_text: Option<String>,
    pub loading_visible: bool,
    /// Public URL of the uploaded asset.
    pub preview_url: Option<String>,
    pub result: Option<ResultMedia>,
    pub result_placeholder_visible: bool,
    pub job_id: Option<String>,
    pub last_saved: Option<PathBuf>,
    pub dirty: bool,
}
