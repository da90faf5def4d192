#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP request and event-stream plumbing for chat clients
//!
//! The request side opens a streaming POST and hands back the raw body; the
//! streaming side turns that body into `data: ` records one chunk at a time.

pub mod error;
pub mod request_builder;
pub mod streaming;

pub use error::CommonRequestError;
pub use request_builder::{ByteStream, Endpoint, RequestBuilder, RequestConfig};
pub use streaming::{EventDispatcher, ReadState, StreamOutcome};

/// Re-export common types for convenience
pub use futures_util::stream::BoxStream;
pub use serde::{Deserialize, Serialize};
