//! Error types for gridcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridcalc-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Address text outside the supported `letters + digits` shape
    #[error("Malformed cell address: {0}")]
    MalformedAddress(String),

    /// Range text that is not two addresses joined by `:`
    #[error("Malformed cell range: {0}")]
    MalformedRange(String),
}

impl Error {
    pub(crate) fn address<S: Into<String>>(msg: S) -> Self {
        Error::MalformedAddress(msg.into())
    }
}
