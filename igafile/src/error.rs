//! Error type for file-level operations

use igafile_core::{IgaError, ValidationError};
use thiserror::Error;

/// Errors from opening, saving or checking an IGA file
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system refused an open, read, write or map
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes are not a well-framed TSS container
    #[error("malformed container: {0}")]
    Format(#[from] IgaError),
    /// The container decoded but its model breaks an invariant
    #[error("invalid model: {0}")]
    Invalid(#[from] ValidationError),
}

impl Error {
    /// Combine a protocol error with the I/O error a stream adapter stashed
    ///
    /// A bare [`IgaError::Stream`] says nothing about the cause, so the
    /// underlying I/O error replaces it when one was recorded.
    pub(crate) fn from_stream(err: IgaError, io: Option<std::io::Error>) -> Self {
        match (err, io) {
            (IgaError::Stream, Some(io)) if io.kind() != std::io::ErrorKind::UnexpectedEof => {
                Error::Io(io)
            }
            (err, _) => Error::Format(err),
        }
    }
}

/// Result type for file-level operations
pub type Result<T> = std::result::Result<T, Error>;
