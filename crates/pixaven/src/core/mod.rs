//! Pure transformations and validation for Pixaven jobs.
//!
//! This module holds the input/response state machines, proxy parsing, the
//! deferred validation pass, payload serialization and metadata
//! interpretation. None of these functions perform I/O.

mod meta;
mod payload;
mod proxy;
mod validation;

pub use meta::{MetaObserver, check_success, decode_body};
pub use payload::{operations_for, request_payload};
pub use proxy::parse_proxy;
pub use validation::{
    check_binary_compatible, finalize, is_empty_params, set_input, set_operation, set_response,
};
