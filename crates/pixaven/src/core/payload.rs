use serde_json::{Map, Value, json};

use crate::data::{InputMode, Job, ResponseMode};
use crate::error::{Error, Result};

/// Operations map as sent to the API.
///
/// Binary delivery adds `response.mode = "binary"`; JSON delivery leaves the
/// map untouched.
pub fn operations_for(operations: &Map<String, Value>, response: &ResponseMode) -> Map<String, Value> {
    let mut operations = operations.clone();
    if response.is_binary() {
        operations.insert("response".to_string(), json!({ "mode": "binary" }));
    }
    operations
}

/// Serialized JSON payload for a job: the request body for fetch jobs and the
/// `data` form field for uploads.
///
/// Fetch jobs carry the remote image address under `url`, ahead of the
/// operations.
pub fn request_payload(job: &Job) -> Result<String> {
    let mut payload = Map::new();
    if let InputMode::Fetch(url) = &job.input {
        payload.insert("url".to_string(), Value::String(url.clone()));
    }
    payload.extend(operations_for(&job.operations, &job.response));

    serde_json::to_string(&payload)
        .map_err(|e| Error::configuration(format!("unable to serialize job operations: {e}")))
}
