use std::io;

use thiserror::Error;

use crate::hooks::VerifyError;

/// An error on a relay connection.
///
/// Every variant is fatal for the connection it occurs on and leaves the
/// rest of the process untouched.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The byte stream violated the frame format. The stream cannot be
    /// resynchronized afterwards.
    #[error("framing error: {0}")]
    Framing(&'static str),

    /// A well-framed message was illegal in the current protocol state.
    #[error("protocol error: {0}")]
    Protocol(&'static str),

    /// The embedder's validator rejected a transaction or block.
    #[error("rejected by verifier: {0}")]
    Semantic(#[from] VerifyError),

    /// The peer requested a version string missing from the version table.
    #[error("unsupported peer version {0:?}")]
    UnknownVersion(String),

    /// The engine's own bookkeeping became inconsistent.
    #[error("internal error: {0}")]
    Internal(&'static str),

    /// The underlying stream failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
