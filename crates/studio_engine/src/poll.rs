use reqwest::header::ACCEPT;
use studio_logging::{studio_debug, studio_info, studio_warn};

use crate::client::{read_json, status_text, ProgressSink, ACCEPT_JSON};
use crate::{
    EngineEvent, GeneratedMedia, JobProgress, JobStatus, SessionId, StatusPayload, StudioClient,
    StudioError, UploadedAsset,
};

const GENERIC_FAILURE: &str = "Job processing failed";

impl StudioClient {
    /// Polls the job until it completes, fails, or runs out of attempts.
    ///
    /// Every non-terminal answer is reported to `sink` with its 1-based
    /// attempt number. Any non-success HTTP status ends the loop at once.
    pub async fn poll_job(
        &self,
        session: SessionId,
        job_id: &str,
        sink: &dyn ProgressSink,
    ) -> Result<StatusPayload, StudioError> {
        let url = self.config().status_url(job_id)?;
        let max_attempts = self.config().max_poll_attempts;
        let interval = self.config().poll_interval();

        for attempt in 1..=max_attempts {
            let response = self
                .http()
                .get(url.clone())
                .header(ACCEPT, ACCEPT_JSON)
                .send()
                .await
                .map_err(|err| StudioError::PollTransport {
                    status: err.to_string(),
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(StudioError::PollTransport {
                    status: status_text(status),
                });
            }

            let payload: StatusPayload = read_json(response).await?;
            studio_debug!(
                "Poll {} for job {} - status {:?}",
                attempt,
                job_id,
                payload.status
            );

            match payload.status {
                JobStatus::Completed => return Ok(payload),
                status if status.is_failure() => {
                    let message = payload
                        .error
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                    return Err(StudioError::JobProcessing { message });
                }
                status => {
                    sink.emit(EngineEvent::Progress(JobProgress {
                        session,
                        job_id: job_id.to_string(),
                        attempt,
                        status,
                    }));
                    if attempt < max_attempts {
                        tokio::time::sleep(interval).await;
                    }
                }
            }
        }

        studio_warn!("Job {} timed out after {} polls", job_id, max_attempts);
        Err(StudioError::JobTimeout {
            attempts: max_attempts,
        })
    }

    /// Submits a job for `asset`, waits for it, and extracts the output URL.
    pub async fn generate(
        &self,
        session: SessionId,
        asset: &UploadedAsset,
        sink: &dyn ProgressSink,
    ) -> Result<GeneratedMedia, StudioError> {
        let job = self.submit(asset).await?;
        let job_id = job.job_id.clone();
        sink.emit(EngineEvent::JobSubmitted { session, job });

        let payload = self.poll_job(session, &job_id, sink).await?;
        let result_url = payload
            .output_url()
            .ok_or(StudioError::MissingOutputUrl)?
            .to_string();
        studio_info!("Job {} produced {}", job_id, result_url);
        Ok(GeneratedMedia { job_id, result_url })
    }
}
