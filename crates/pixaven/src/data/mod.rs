//! Data types for job configuration and results.
//!
//! This module contains the job specification accumulated by the builder,
//! its validated form, transport options, and the response shapes returned
//! to callers. Nothing here performs I/O.

pub mod job;
pub mod options;
pub mod proxy;
pub mod response;

pub use job::{DEFAULT_TIMEOUT_SECS, InputMode, Job, JobSpec, Operation, ResponseMode};
pub use options::{
    BINARY_HEADER, DEFAULT_ENDPOINT, META_HEADER, Progress, TransferPhase, TransportOptions,
};
pub use proxy::ProxyConfig;
pub use response::{JobResponse, ResponseResult};
