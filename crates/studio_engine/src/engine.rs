use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use studio_logging::{studio_debug, studio_info};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::client::ChannelProgressSink;
use crate::{
    Downloader, EngineEvent, ServiceConfig, SessionId, StudioClient, StudioError, UploadedAsset,
};

/// Everything the background engine needs to run the pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub service: ServiceConfig,
    pub output_dir: PathBuf,
    pub download_prefix: String,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            service: ServiceConfig::default(),
            output_dir,
            download_prefix: "simpsons".to_string(),
        }
    }
}

enum EngineCommand {
    Upload {
        session: SessionId,
        path: PathBuf,
        media_type: String,
    },
    Generate {
        session: SessionId,
        asset_url: String,
    },
    Download {
        session: SessionId,
        url: String,
    },
    Cancel {
        session: SessionId,
    },
}

type TokenMap = Arc<Mutex<HashMap<SessionId, CancellationToken>>>;

/// Runs pipeline work on a background tokio runtime and reports
/// [`EngineEvent`]s. Work for a session stops silently once cancelled.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, StudioError> {
        let client = StudioClient::new(config.service)?;
        let downloader = Arc::new(Downloader::new(config.output_dir, config.download_prefix));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("studio-engine-worker")
            .build()?;

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = Worker {
            client,
            downloader,
            tokens: Arc::new(Mutex::new(HashMap::new())),
            event_tx,
        };

        thread::Builder::new()
            .name("studio-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    worker.dispatch(&runtime, command);
                }
                studio_debug!("Engine command channel closed, shutting down");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn upload(&self, session: SessionId, path: PathBuf, media_type: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Upload {
            session,
            path,
            media_type: media_type.into(),
        });
    }

    pub fn generate(&self, session: SessionId, asset_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Generate {
            session,
            asset_url: asset_url.into(),
        });
    }

    pub fn download(&self, session: SessionId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            session,
            url: url.into(),
        });
    }

    pub fn cancel(&self, session: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { session });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv_timeout(timeout)
            .ok()
    }
}

struct Worker {
    client: StudioClient,
    downloader: Arc<Downloader>,
    tokens: TokenMap,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl Worker {
    fn dispatch(&self, runtime: &Runtime, command: EngineCommand) {
        match command {
            EngineCommand::Upload {
                session,
                path,
                media_type,
            } => {
                let token = self.register(session);
                let tokens = self.tokens.clone();
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();
                runtime.spawn(async move {
                    let outcome = tokio::select! {
                        _ = token.cancelled() => None,
                        result = client.upload_path_as(&path, &media_type) => Some(result),
                    };
                    release(&tokens, session);
                    match outcome {
                        Some(result) => {
                            let _ = event_tx.send(EngineEvent::UploadCompleted { session, result });
                        }
                        None => studio_debug!("Upload for session {} cancelled", session),
                    }
                });
            }
            EngineCommand::Generate { session, asset_url } => {
                let token = self.register(session);
                let tokens = self.tokens.clone();
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();
                runtime.spawn(async move {
                    let sink = ChannelProgressSink::new(event_tx.clone());
                    let asset = UploadedAsset {
                        remote_url: asset_url,
                    };
                    let outcome = tokio::select! {
                        _ = token.cancelled() => None,
                        result = client.generate(session, &asset, &sink) => Some(result),
                    };
                    release(&tokens, session);
                    match outcome {
                        Some(result) => {
                            let _ = event_tx
                                .send(EngineEvent::GenerationCompleted { session, result });
                        }
                        None => studio_debug!("Generation for session {} cancelled", session),
                    }
                });
            }
            EngineCommand::Download { session, url } => {
                let token = self.register(session);
                let tokens = self.tokens.clone();
                let client = self.client.clone();
                let downloader = self.downloader.clone();
                let event_tx = self.event_tx.clone();
                runtime.spawn(async move {
                    let outcome = tokio::select! {
                        _ = token.cancelled() => None,
                        result = downloader.download(&client, &url) => Some(result),
                    };
                    release(&tokens, session);
                    match outcome {
                        Some(result) => {
                            let _ = event_tx.send(EngineEvent::DownloadCompleted {
                                session,
                                url,
                                result,
                            });
                        }
                        None => studio_debug!("Download for session {} cancelled", session),
                    }
                });
            }
            EngineCommand::Cancel { session } => {
                let token = self
                    .tokens
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&session);
                if let Some(token) = token {
                    studio_info!("Cancelling in-flight work for session {}", session);
                    token.cancel();
                }
            }
        }
    }

    fn register(&self, session: SessionId) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session, token.clone());
        token
    }
}

// Runs before the completion event is sent, so a follow-up command for the
// same session always registers after this removal.
fn release(tokens: &TokenMap, session: SessionId) {
    tokens
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&session);
}
