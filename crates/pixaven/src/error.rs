//! Error types for pixaven.

use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Conflicting or missing builder calls, surfaced when the job is sent.
    #[error("{0}")]
    Configuration(String),

    #[error("input file `{}` does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("invalid proxy `{0}`: expected a valid HTTP proxy string")]
    ProxyParse(String),

    #[error("unable to open output file path `{}` for writing", path.display())]
    OutputNotWritable { path: PathBuf },

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Decode(String),

    /// The API answered with `success: false`.
    ///
    /// Displays as the server-supplied message; the full metadata object is
    /// kept so callers can inspect the rest of the response.
    #[error("{message}")]
    Api {
        message:  String,
        metadata: Map<String, Value>,
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Metadata returned by the API alongside a failure, if any.
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        match self {
            Error::Api { metadata, .. } => Some(metadata),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
