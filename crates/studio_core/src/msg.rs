use std::path::PathBuf;

use crate::{JobStatus, SelectedFile, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file to transform.
    FileSelected(SelectedFile),
    /// Engine finished the upload stage; `Ok` carries the public asset URL.
    UploadFinished {
        session: SessionId,
        result: Result<String, String>,
    },
    /// User clicked Generate.
    GenerateClicked,
    /// Engine created the remote job.
    JobSubmitted {
        session: SessionId,
        job_id: String,
        status: JobStatus,
    },
    /// A non-terminal status poll came back; `attempt` is 1-based.
    PollProgress {
        session: SessionId,
        attempt: u32,
        status: JobStatus,
    },
    /// Engine reached a terminal job state; `Ok` carries the result URL.
    GenerationFinished {
        session: SessionId,
        result: Result<String, String>,
    },
    /// User clicked Download.
    DownloadClicked,
    /// Engine finished the download; `Ok` carries the saved path.
    DownloadFinished {
        session: SessionId,
        result: Result<PathBuf, String>,
    },
    /// User clicked Reset.
    ResetClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
