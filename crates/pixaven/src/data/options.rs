use std::fmt;
use std::sync::Arc;

/// Base URL of the Pixaven Image API.
pub const DEFAULT_ENDPOINT: &str = "https://api.pixaven.com/1.0";

/// Request header asking the API for a binary response body.
pub const BINARY_HEADER: &str = "X-Pixaven-Binary";

/// Response header carrying job metadata for binary responses.
pub const META_HEADER: &str = "X-Pixaven-Meta";

/// Phases of a job transfer.
///
/// A job moves through these phases in order:
/// Connecting → Receiving → Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPhase {
    /// Request sent, waiting for response headers.
    #[default]
    Connecting,

    /// Response headers received, body is streaming.
    Receiving,

    /// Body fully received.
    Completed,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferPhase::Connecting => write!(f, "Connecting"),
            TransferPhase::Receiving => write!(f, "Receiving"),
            TransferPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Progress snapshot passed to [`TransportOptions::on_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase:          TransferPhase,
    pub bytes_received: u64,
    pub total_bytes:    Option<u64>,
}

/// Transport-level configuration shared by every job sent through a
/// [`Transport`](crate::Transport).
///
/// # Examples
///
/// ```
/// use pixaven::TransportOptions;
///
/// let options = TransportOptions::default()
///     .endpoint("http://127.0.0.1:8080/1.0")
///     .user_agent("my-app/2.1");
/// ```
#[derive(Clone)]
pub struct TransportOptions {
    /// Base URL; `/fetch` and `/upload` are appended to it.
    ///
    /// Default: [`DEFAULT_ENDPOINT`]
    pub endpoint: String,

    /// Value of the `User-Agent` request header.
    ///
    /// Default: `pixaven-rust/<crate version>`
    pub user_agent: String,

    /// Callback invoked on phase transitions and after each received chunk.
    ///
    /// Default: None
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for TransportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportOptions")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            endpoint:    DEFAULT_ENDPOINT.to_string(),
            user_agent:  concat!("pixaven-rust/", env!("CARGO_PKG_VERSION")).to_string(),
            on_progress: None,
        }
    }
}

impl TransportOptions {
    /// Set the API base URL. A trailing slash is ignored.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the progress callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixaven::{TransferPhase, TransportOptions};
    /// use std::sync::Arc;
    ///
    /// let options = TransportOptions::default().on_progress(Arc::new(|progress| {
    ///     if progress.phase == TransferPhase::Completed {
    ///         println!("received {} bytes", progress.bytes_received);
    ///     }
    /// }));
    /// ```
    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Full URL for an endpoint path such as `fetch` or `upload`.
    pub fn url_for(&self, path: &str) -> String { format!("{}/{}", self.endpoint, path) }
}
