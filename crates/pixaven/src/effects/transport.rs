use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{MetaObserver, check_success, decode_body, finalize, request_payload};
use crate::data::{
    BINARY_HEADER, InputMode, Job, JobResponse, JobSpec, Progress, ResponseMode, ResponseResult,
    TransferPhase, TransportOptions,
};
use crate::effects::http::{BoxStream, HttpClient, WireBody, WireRequest, WireResponse};
use crate::effects::sink::OutputFile;
use crate::error::{Error, Result};

/// Sends finalized jobs to the Pixaven Image API.
///
/// Each call to [`send`](Transport::send) performs exactly one request and
/// never retries. The HTTP status is not authoritative: only the `success`
/// flag of the body (JSON delivery) or the meta header (binary delivery)
/// decides whether a job failed.
pub struct Transport<C: HttpClient> {
    client:  C,
    options: TransportOptions,
}

#[cfg(feature = "reqwest")]
impl Default for Transport<crate::effects::http::ReqwestClient> {
    fn default() -> Self { Self::new(crate::effects::http::ReqwestClient::new()) }
}

impl<C: HttpClient> Transport<C> {
    /// Create a transport around `client` with default options.
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: TransportOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate `spec` and send it.
    ///
    /// A configuration error recorded while building the spec is returned
    /// without touching the network.
    pub async fn send(&self, spec: JobSpec) -> ResponseResult {
        let job = finalize(spec).inspect_err(|err| {
            warn!(error = %err, "Pixaven job rejected before sending");
        })?;
        self.send_job(job).await
    }

    /// Send an already validated job.
    pub async fn send_job(&self, job: Job) -> ResponseResult {
        let request = self.build_request(&job).await?;
        debug!(
            url = %request.url,
            input = job.input.kind(),
            response = job.response.kind(),
            binary = job.response.is_binary(),
            "sending Pixaven job"
        );

        self.report_progress(TransferPhase::Connecting, 0, None);
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!(status = response.status, "received Pixaven response headers");

        let result = match &job.response {
            ResponseMode::Json => self.receive_json(response).await,
            ResponseMode::Buffer => self.receive_buffer(response).await,
            ResponseMode::File(path) => self.receive_file(response, path).await,
        };

        if let Err(Error::Api { message, .. }) = &result {
            warn!(message = %message, "Pixaven API reported a failed job");
        }
        result
    }

    /// Build the wire request for `job`.
    pub async fn build_request(&self, job: &Job) -> Result<WireRequest> {
        let payload = request_payload(job)?;

        let mut headers = vec![("User-Agent".to_string(), self.options.user_agent.clone())];
        if job.response.is_binary() {
            headers.push((BINARY_HEADER.to_string(), "1".to_string()));
        }

        let (url, body) = match &job.input {
            InputMode::Fetch(_) => (self.options.url_for("fetch"), WireBody::Json(payload)),
            InputMode::Upload(path) => {
                let file = read_input(path).await?;
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("file")
                    .to_string();
                (self.options.url_for("upload"), WireBody::Multipart {
                    file_name,
                    file,
                    data: payload,
                })
            }
        };

        Ok(WireRequest {
            url,
            api_key: job.api_key.clone(),
            headers,
            body,
            timeout: (job.timeout_seconds > 0).then(|| Duration::from_secs(job.timeout_seconds)),
            proxy: job.proxy.clone(),
        })
    }

    async fn receive_json(&self, response: WireResponse<C::Error>) -> ResponseResult {
        let body = self.collect(response.body, response.content_length).await?;
        let metadata = check_success(decode_body(&body)?)?;
        Ok(JobResponse::new(metadata))
    }

    async fn receive_buffer(&self, response: WireResponse<C::Error>) -> ResponseResult {
        let metadata = binary_metadata(&response.headers)?;
        let body = self.collect(response.body, response.content_length).await?;
        Ok(JobResponse::new(metadata).with_buffer(body))
    }

    async fn receive_file(&self, response: WireResponse<C::Error>, path: &Path) -> ResponseResult {
        let metadata = binary_metadata(&response.headers)?;

        let total_bytes = response.content_length;
        let mut body = response.body;
        let mut sink = OutputFile::new(path);
        let mut bytes_received = 0u64;

        self.report_progress(TransferPhase::Receiving, 0, total_bytes);
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Error::Transport(e.to_string()))?;
            sink.write(&chunk).await?;
            bytes_received += chunk.len() as u64;
            self.report_progress(TransferPhase::Receiving, bytes_received, total_bytes);
        }

        let written = sink.finish().await?;
        debug!(path = %path.display(), bytes = written, "binary response written to file");
        self.report_progress(TransferPhase::Completed, bytes_received, total_bytes);

        Ok(JobResponse::new(metadata))
    }

    async fn collect(
        &self,
        mut body: BoxStream<'static, std::result::Result<Bytes, C::Error>>,
        total_bytes: Option<u64>,
    ) -> Result<Bytes> {
        let mut buffer = BytesMut::new();

        self.report_progress(TransferPhase::Receiving, 0, total_bytes);
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Error::Transport(e.to_string()))?;
            buffer.extend_from_slice(&chunk);
            self.report_progress(TransferPhase::Receiving, buffer.len() as u64, total_bytes);
        }

        debug!(bytes = buffer.len(), "response body received");
        self.report_progress(TransferPhase::Completed, buffer.len() as u64, total_bytes);
        Ok(buffer.freeze())
    }

    fn report_progress(&self, phase: TransferPhase, bytes_received: u64, total_bytes: Option<u64>) {
        if let Some(ref callback) = self.options.on_progress {
            callback(&Progress {
                phase,
                bytes_received,
                total_bytes,
            });
        }
    }
}

/// Metadata for a binary response, taken from the meta header.
fn binary_metadata(headers: &[(String, String)]) -> Result<Map<String, Value>> {
    let mut observer = MetaObserver::new();
    for (name, value) in headers {
        observer.observe(name, value);
    }
    check_success(observer.into_metadata()?)
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::InputNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Io(e)),
    }
}
