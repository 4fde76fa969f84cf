use std::io;
use thiserror::Error;

/// Error type for charset sniffing operations.
///
/// Detection itself never fails: every byte sequence is valid input and
/// "no confident answer" is reported as `None`. These variants cover misuse
/// of the API and the I/O done by the convenience front ends.
#[derive(Error, Debug)]
pub enum SnifferError {
    /// IO error while reading the input.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A chunk reference that does not lie inside its buffer.
    #[error("Invalid chunk range: offset {offset} + len {len} exceeds buffer of {buf_len} bytes")]
    InvalidRange {
        offset: usize,
        len: usize,
        buf_len: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error while fetching a remote resource.
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Result type alias for sniffing operations.
pub type Result<T> = std::result::Result<T, SnifferError>;
