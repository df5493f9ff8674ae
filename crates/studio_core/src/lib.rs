//! Studio core: pure pipeline state machine and view-model helpers.
mod effect;
mod media;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use media::{is_supported_media_type, ResultKind, ResultMedia};
pub use msg::Msg;
pub use state::{AppState, Job, JobStatus, Phase, SelectedFile, SessionId, UploadedAsset};
pub use update::{update, UNSUPPORTED_FILE_MESSAGE};
pub use view_model::{
    phase_controls, AppViewModel, ButtonView, PhaseControls, DOWNLOADING_LABEL, DOWNLOAD_LABEL,
    GENERATE_LABEL,
};
