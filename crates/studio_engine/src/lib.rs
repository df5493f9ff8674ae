//! Studio engine: the upload, submit, poll and download pipeline plus the
//! background runner that executes core effects.
mod client;
mod config;
mod download;
mod engine;
mod error;
mod filename;
mod id;
mod persist;
mod poll;
mod submit;
mod types;
mod upload;

pub use client::{ChannelProgressSink, NullProgressSink, ProgressSink, StudioClient};
pub use config::{EffectMode, ServiceConfig};
pub use download::{DirectStrategy, DownloadStrategy, Downloader, FetchedMedia, ProxyStrategy};
pub use engine::{EngineConfig, EngineHandle};
pub use error::StudioError;
pub use filename::{
    download_file_name, extension_for, media_type_for_path, public_url, upload_file_name,
};
pub use id::{generate_id, DOWNLOAD_SUFFIX_LEN, UPLOAD_ID_LEN};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use submit::job_request_body;
pub use types::{
    EngineEvent, GeneratedMedia, JobHandle, JobProgress, JobStatus, ResultField, ResultItem,
    SavedFile, SessionId, SourceFile, StatusPayload, UploadedAsset,
};
