use std::thread;
use std::time::Duration;

use studio_core::{Effect, JobStatus, Msg};
use studio_engine::{EngineEvent, EngineHandle};
use studio_logging::{studio_debug, studio_error, studio_info, studio_warn};

/// Executes core effects on the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// `forward` returns `false` once the receiving side is gone.
    pub fn new<F>(engine: EngineHandle, forward: F) -> Self
    where
        F: Fn(Msg) -> bool + Send + 'static,
    {
        let runner = Self { engine };
        runner.spawn_event_loop(forward);
        runner
    }

    /// Runs every effect and returns the notification texts, already shown to the user.
    pub fn execute(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::Upload { session, file } => {
                    studio_info!("Upload session={} file={:?}", session, file.path);
                    self.engine.upload(session, file.path, file.media_type);
                }
                Effect::SubmitJob { session, asset_url } => {
                    studio_info!("SubmitJob session={} asset={}", session, asset_url);
                    self.engine.generate(session, asset_url);
                }
                Effect::Download { session, url } => {
                    studio_info!("Download session={} url={}", session, url);
                    self.engine.download(session, url);
                }
                Effect::CancelSession { session } => {
                    self.engine.cancel(session);
                }
                Effect::Notify { message } => {
                    studio_error!("{}", message);
                    eprintln!("!! {message}");
                    notices.push(message);
                }
            }
        }
        notices
    }

    fn spawn_event_loop<F>(&self, forward: F)
    where
        F: Fn(Msg) -> bool + Send + 'static,
    {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            if !forward(map_event(event)) {
                studio_debug!("Message loop gone, stopping engine event relay");
                break;
            }
        });
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { session, result } => Msg::UploadFinished {
            session,
            result: result.map(|asset| asset.remote_url).map_err(|err| {
                studio_warn!("Upload for session {} failed: {}", session, err);
                err.to_string()
            }),
        },
        EngineEvent::JobSubmitted { session, job } => Msg::JobSubmitted {
            session,
            job_id: job.job_id,
            status: map_status(job.status),
        },
        EngineEvent::Progress(progress) => Msg::PollProgress {
            session: progress.session,
            attempt: progress.attempt,
            status: map_status(progress.status),
        },
        EngineEvent::GenerationCompleted { session, result } => Msg::GenerationFinished {
            session,
            result: result.map(|media| media.result_url).map_err(|err| {
                studio_warn!("Generation for session {} failed: {}", session, err);
                err.to_string()
            }),
        },
        EngineEvent::DownloadCompleted {
            session,
            url,
            result,
        } => Msg::DownloadFinished {
            session,
            result: result.map(|saved| saved.path).map_err(|err| {
                studio_warn!("Download of {} failed: {}", url, err);
                err.to_string()
            }),
        },
    }
}

fn map_status(status: studio_engine::JobStatus) -> JobStatus {
    match status {
        studio_engine::JobStatus::Queued | studio_engine::JobStatus::Unknown => JobStatus::Queued,
        studio_engine::JobStatus::Processing => JobStatus::Processing,
        studio_engine::JobStatus::Completed => JobStatus::Completed,
        studio_engine::JobStatus::Failed | studio_engine::JobStatus::Error => JobStatus::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::map_event;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use studio_core::{JobStatus, Msg};
    use studio_engine::{
        EngineEvent, GeneratedMedia, JobHandle, JobProgress, SavedFile, StudioError,
        UploadedAsset,
    };

    #[test]
    fn upload_outcomes_keep_their_session() {
        let ok = map_event(EngineEvent::UploadCompleted {
            session: 4,
            result: Ok(UploadedAsset {
                remote_url: "https://c/a.png".to_string(),
            }),
        });
        assert_eq!(
            ok,
            Msg::UploadFinished {
                session: 4,
                result: Ok("https://c/a.png".to_string()),
            }
        );

        let failed = map_event(EngineEvent::UploadCompleted {
            session: 5,
            result: Err(StudioError::SignedUrl {
                status: "403 Forbidden".to_string(),
            }),
        });
        assert_eq!(
            failed,
            Msg::UploadFinished {
                session: 5,
                result: Err("failed to get signed URL: 403 Forbidden".to_string()),
            }
        );
    }

    #[test]
    fn job_statuses_collapse_to_core_states() {
        let submitted = map_event(EngineEvent::JobSubmitted {
            session: 1,
            job: JobHandle {
                job_id: "j".to_string(),
                status: studio_engine::JobStatus::Unknown,
            },
        });
        assert_eq!(
            submitted,
            Msg::JobSubmitted {
                session: 1,
                job_id: "j".to_string(),
                status: JobStatus::Queued,
            }
        );

        let progress = map_event(EngineEvent::Progress(JobProgress {
            session: 1,
            job_id: "j".to_string(),
            attempt: 3,
            status: studio_engine::JobStatus::Processing,
        }));
        assert_eq!(
            progress,
            Msg::PollProgress {
                session: 1,
                attempt: 3,
                status: JobStatus::Processing,
            }
        );
    }

    #[test]
    fn generation_and_download_results_are_flattened() {
        let generated = map_event(EngineEvent::GenerationCompleted {
            session: 2,
            result: Ok(GeneratedMedia {
                job_id: "j".to_string(),
                result_url: "https://r/out.png".to_string(),
            }),
        });
        assert_eq!(
            generated,
            Msg::GenerationFinished {
                session: 2,
                result: Ok("https://r/out.png".to_string()),
            }
        );

        let timed_out = map_event(EngineEvent::GenerationCompleted {
            session: 2,
            result: Err(StudioError::JobTimeout { attempts: 60 }),
        });
        assert!(matches!(
            timed_out,
            Msg::GenerationFinished { result: Err(ref message), .. } if message.contains("60")
        ));

        let saved = map_event(EngineEvent::DownloadCompleted {
            session: 2,
            url: "https://r/out.png".to_string(),
            result: Ok(SavedFile {
                path: PathBuf::from("output/simpsons_abc.png"),
                extension: "png".to_string(),
                bytes_written: 3,
                strategy: "proxy",
            }),
        });
        assert_eq!(
            saved,
            Msg::DownloadFinished {
                session: 2,
                result: Ok(PathBuf::from("output/simpsons_abc.png")),
            }
        );
    }
}
