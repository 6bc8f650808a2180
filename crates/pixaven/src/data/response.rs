use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::Result;

/// Successful outcome of a job.
///
/// `metadata` is the decoded JSON body (JSON delivery) or the decoded meta
/// header (binary delivery). `buffer` is only populated for buffer delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct JobResponse {
    pub metadata: Map<String, Value>,
    pub buffer:   Option<Bytes>,
}

impl JobResponse {
    pub fn new(metadata: Map<String, Value>) -> Self {
        Self {
            metadata,
            buffer: None,
        }
    }

    #[must_use]
    pub fn with_buffer(mut self, buffer: Bytes) -> Self {
        self.buffer = Some(buffer);
        self
    }

    /// The `id` the API assigns to the job, when present.
    pub fn id(&self) -> Option<&str> { self.metadata.get("id").and_then(Value::as_str) }
}

/// Result delivered by a send: either a [`JobResponse`] or the error that
/// ended the job.
pub type ResponseResult = Result<JobResponse>;
