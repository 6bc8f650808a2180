use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Value};

use super::proxy::ProxyConfig;
use crate::error::Error;

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A named server-side transform.
///
/// Parameters are opaque to the client; the API validates their shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Flip,
    Resize,
    Scale,
    Watermark,
    Mask,
    Filter,
    Adjust,
    Auto,
    Border,
    Padding,
    /// Store the processed image in external storage.
    Store,
    /// Output format and encoding.
    Output,
    /// Deliver the response through a webhook.
    Webhook,
    Cdn,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::Flip,
        Operation::Resize,
        Operation::Scale,
        Operation::Watermark,
        Operation::Mask,
        Operation::Filter,
        Operation::Adjust,
        Operation::Auto,
        Operation::Border,
        Operation::Padding,
        Operation::Store,
        Operation::Output,
        Operation::Webhook,
        Operation::Cdn,
    ];

    /// Key used for this operation in the request payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Flip => "flip",
            Operation::Resize => "resize",
            Operation::Scale => "scale",
            Operation::Watermark => "watermark",
            Operation::Mask => "mask",
            Operation::Filter => "filter",
            Operation::Adjust => "adjust",
            Operation::Auto => "auto",
            Operation::Border => "border",
            Operation::Padding => "padding",
            Operation::Store => "store",
            Operation::Output => "output",
            Operation::Webhook => "webhook",
            Operation::Cdn => "cdn",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Where the input image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Local file sent as a multipart upload.
    Upload(PathBuf),
    /// Remote URL the API downloads itself.
    Fetch(String),
}

impl InputMode {
    pub fn kind(&self) -> &'static str {
        match self {
            InputMode::Upload(_) => "upload",
            InputMode::Fetch(_) => "fetch",
        }
    }
}

/// How the API response is delivered back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMode {
    /// Metadata in a JSON body.
    Json,
    /// Binary body streamed to a file, metadata in the meta header.
    File(PathBuf),
    /// Binary body collected in memory, metadata in the meta header.
    Buffer,
}

impl ResponseMode {
    /// Whether the API is asked for a binary body.
    pub fn is_binary(&self) -> bool { !matches!(self, ResponseMode::Json) }

    pub fn kind(&self) -> &'static str {
        match self {
            ResponseMode::Json => "json",
            ResponseMode::File(_) => "file",
            ResponseMode::Buffer => "buffer",
        }
    }
}

/// Accumulated, mutable configuration for one job.
///
/// Built through [`RequestBuilder`](crate::RequestBuilder). Validation failures
/// are recorded rather than raised; the first one sticks and is reported when
/// the job is finalized or sent.
#[derive(Debug)]
pub struct JobSpec {
    pub(crate) api_key:         String,
    pub(crate) input:           Option<InputMode>,
    pub(crate) operations:      Map<String, Value>,
    pub(crate) response:        Option<ResponseMode>,
    pub(crate) timeout_seconds: u64,
    pub(crate) proxy:           Option<ProxyConfig>,
    pub(crate) pending_error:   Option<Error>,
}

impl Default for JobSpec {
    fn default() -> Self {
        Self {
            api_key:         String::new(),
            input:           None,
            operations:      Map::new(),
            response:        None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            proxy:           None,
            pending_error:   None,
        }
    }
}

impl JobSpec {
    pub fn api_key(&self) -> &str { &self.api_key }

    pub fn input(&self) -> Option<&InputMode> { self.input.as_ref() }

    pub fn operations(&self) -> &Map<String, Value> { &self.operations }

    pub fn operation(&self, op: Operation) -> Option<&Value> { self.operations.get(op.as_str()) }

    pub fn response(&self) -> Option<&ResponseMode> { self.response.as_ref() }

    pub fn timeout_seconds(&self) -> u64 { self.timeout_seconds }

    pub fn proxy(&self) -> Option<&ProxyConfig> { self.proxy.as_ref() }

    pub fn pending_error(&self) -> Option<&Error> { self.pending_error.as_ref() }

    /// Record a validation failure. Only the first one is kept.
    pub(crate) fn fail(&mut self, err: Error) {
        if self.pending_error.is_none() {
            self.pending_error = Some(err);
        }
    }
}

/// A validated job, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub api_key:         String,
    pub input:           InputMode,
    pub operations:      Map<String, Value>,
    pub response:        ResponseMode,
    pub timeout_seconds: u64,
    pub proxy:           Option<ProxyConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_are_unique() {
        let mut names: Vec<_> = Operation::ALL.iter().map(Operation::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn default_spec_is_empty() {
        let spec = JobSpec::default();
        assert_eq!(spec.timeout_seconds(), DEFAULT_TIMEOUT_SECS);
        assert!(spec.input().is_none());
        assert!(spec.response().is_none());
        assert!(spec.operations().is_empty());
        assert!(spec.pending_error().is_none());
    }

    #[test]
    fn first_failure_sticks() {
        let mut spec = JobSpec::default();
        spec.fail(Error::configuration("first"));
        spec.fail(Error::configuration("second"));
        assert_eq!(spec.pending_error().unwrap().to_string(), "first");
    }

    #[test]
    fn binary_modes() {
        assert!(!ResponseMode::Json.is_binary());
        assert!(ResponseMode::Buffer.is_binary());
        assert!(ResponseMode::File(PathBuf::from("out.jpg")).is_binary());
    }
}
