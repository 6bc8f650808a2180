//! I/O for sending jobs: the HTTP client seam, the output file sink and the
//! transport that ties them together.

mod http;
mod sink;
mod transport;

pub use http::{BoxStream, HttpClient, WireBody, WireRequest, WireResponse};
pub use sink::{OutputFile, output_dir_writable};
pub use transport::Transport;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
