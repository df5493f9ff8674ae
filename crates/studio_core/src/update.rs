use crate::media::is_supported_media_type;
use crate::{AppState, Effect, Msg, SessionId};

pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload an image file.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => {
            // Controls are disabled while a pipeline call is outstanding;
            // a selection arriving anyway is dropped.
            if state.phase().is_busy() {
                return (state, Vec::new());
            }
            if !is_supported_media_type(&file.media_type) {
                return (
                    state,
                    vec![Effect::Notify {
                        message: UNSUPPORTED_FILE_MESSAGE.to_string(),
                    }],
                );
            }
            // A running download belongs to the old session and is abandoned.
            let abandoned = state.is_downloading().then_some(state.session());
            let session = state.begin_upload();
            let mut effects: Vec<Effect> = abandoned
                .map(|session| Effect::CancelSession { session })
                .into_iter()
                .collect();
            effects.push(Effect::Upload { session, file });
            effects
        }
        Msg::UploadFinished { session, result } => {
            if is_stale(&state, session) {
                return (state, Vec::new());
            }
            match result {
                Ok(remote_url) => {
                    state.apply_uploaded(remote_url);
                    Vec::new()
                }
                Err(message) => {
                    // Upload failures discard the whole cycle.
                    state.reset();
                    vec![Effect::Notify {
                        message: format!("Upload failed: {message}"),
                    }]
                }
            }
        }
        Msg::GenerateClicked => {
            if !state.generate_enabled() {
                return (state, Vec::new());
            }
            let Some(asset_url) = state.asset().map(|asset| asset.remote_url.clone()) else {
                return (state, Vec::new());
            };
            state.begin_submit();
            vec![Effect::SubmitJob {
                session: state.session(),
                asset_url,
            }]
        }
        Msg::JobSubmitted {
            session,
            job_id,
            status,
        } => {
            if is_stale(&state, session) {
                return (state, Vec::new());
            }
            state.apply_submitted(job_id, status);
            Vec::new()
        }
        Msg::PollProgress {
            session,
            attempt,
            status,
        } => {
            if is_stale(&state, session) {
                return (state, Vec::new());
            }
            state.apply_poll_progress(attempt, status);
            Vec::new()
        }
        Msg::GenerationFinished { session, result } => {
            if is_stale(&state, session) {
                return (state, Vec::new());
            }
            match result {
                Ok(result_url) => {
                    state.apply_generated(result_url);
                    Vec::new()
                }
                Err(message) => {
                    state.apply_generation_failed();
                    vec![Effect::Notify {
                        message: format!("Generation failed: {message}"),
                    }]
                }
            }
        }
        Msg::DownloadClicked => {
            if !state.download_enabled() {
                return (state, Vec::new());
            }
            let Some(url) = state.download_target().map(ToOwned::to_owned) else {
                return (state, Vec::new());
            };
            state.begin_download();
            vec![Effect::Download {
                session: state.session(),
                url,
            }]
        }
        Msg::DownloadFinished { session, result } => {
            if is_stale(&state, session) {
                return (state, Vec::new());
            }
            match result {
                Ok(path) => {
                    state.apply_download_finished(Some(path));
                    Vec::new()
                }
                Err(message) => {
                    state.apply_download_finished(None);
                    vec![Effect::Notify { message }]
                }
            }
        }
        Msg::ResetClicked => match state.reset() {
            Some(session) => vec![Effect::CancelSession { session }],
            None => Vec::new(),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn is_stale(state: &AppState, session: SessionId) -> bool {
    session != state.session()
}
