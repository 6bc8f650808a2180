use serde_json::{Map, Value};

use crate::data::META_HEADER;
use crate::error::{Error, Result};

const BODY_DECODE: &str = "unable to parse JSON response from the Pixaven Image API";
const HEADER_DECODE: &str = "unable to parse JSON data from X-Pixaven-Meta header";
const UNKNOWN_FAILURE: &str = "the Pixaven Image API reported a failure without a message";

/// Watches response headers as they are delivered and keeps the value of the
/// meta header.
#[derive(Debug, Default)]
pub struct MetaObserver {
    raw: Option<String>,
}

impl MetaObserver {
    pub fn new() -> Self { Self::default() }

    /// Feed one response header. Names are compared case-insensitively.
    pub fn observe(&mut self, name: &str, value: &str) {
        if name.trim().eq_ignore_ascii_case(META_HEADER) {
            self.raw = Some(value.trim().to_string());
        }
    }

    pub fn raw(&self) -> Option<&str> { self.raw.as_deref() }

    /// Decode the captured header. A missing header is a decode error.
    pub fn into_metadata(self) -> Result<Map<String, Value>> {
        let raw = self.raw.ok_or_else(|| Error::Decode(HEADER_DECODE.to_string()))?;
        serde_json::from_str(&raw).map_err(|_| Error::Decode(HEADER_DECODE.to_string()))
    }
}

/// Decode a JSON response body into a metadata object.
pub fn decode_body(body: &[u8]) -> Result<Map<String, Value>> {
    serde_json::from_slice(body).map_err(|_| Error::Decode(BODY_DECODE.to_string()))
}

/// Check the `success` flag of decoded metadata.
///
/// Anything other than `success: true` is an API failure carrying the
/// server's `message` and the full metadata.
pub fn check_success(metadata: Map<String, Value>) -> Result<Map<String, Value>> {
    if metadata.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(metadata);
    }

    let message = metadata
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_FAILURE)
        .to_string();
    Err(Error::Api { message, metadata })
}
