use crate::{SelectedFile, SessionId};

/// Work requested by [`crate::update`]; executed outside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the selected file and report back with `Msg::UploadFinished`.
    Upload {
        session: SessionId,
        file: SelectedFile,
    },
    /// Submit a transformation job for the uploaded asset, then poll it.
    SubmitJob {
        session: SessionId,
        asset_url: String,
    },
    /// Fetch the result and save it locally.
    Download { session: SessionId, url: String },
    /// Abort any in-flight work belonging to `session`.
    CancelSession { session: SessionId },
    /// Blocking, user-facing notification.
    Notify { message: String },
}
