//! Client for the Pixaven Image API.
//!
//! A job is described with a fluent [`RequestBuilder`] and sent as exactly
//! one HTTPS request. The image is either uploaded from a local file or
//! fetched by the API from a URL, and the result comes back as JSON metadata,
//! as a file streamed to disk, or as an in-memory buffer.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Job specification, options and response types
//! - [`core`] - Pure validation, state transitions and payload building
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Deferred errors**: builder calls never fail; the first violated constraint is reported at send time
//! - **Streaming**: binary responses are written to disk chunk by chunk, the file is only created once bytes arrive
//! - **Header metadata**: binary responses carry job metadata in the `X-Pixaven-Meta` header
//! - **Single attempt**: no retries, no caching; HTTP status is not authoritative, the `success` flag is
//!
//! # Example
//!
//! ```no_run
//! use pixaven::RequestBuilder;
//! use serde_json::json;
//!
//! # async fn run() -> pixaven::Result<()> {
//! let image = RequestBuilder::new("your-api-key")
//!     .upload("photo.jpg")
//!     .scale(json!({ "width": 50 }))
//!     .to_buffer()
//!     .await?;
//!
//! assert!(image.buffer.is_some());
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use builder::RequestBuilder;
pub use data::{
    InputMode, Job, JobResponse, JobSpec, Operation, Progress, ProxyConfig, ResponseMode,
    ResponseResult, TransferPhase, TransportOptions,
};
pub use effects::{HttpClient, Transport};
pub use error::{Error, Result};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
