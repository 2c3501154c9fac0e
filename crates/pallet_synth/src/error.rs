//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid sampler input, per-channel histogram failures, invalid
//! configuration, and generic errors.
use thiserror::Error;

use crate::histogram::ColorChannel;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by sampler, histogram and configuration constructors.
///
/// Histogram channel failures arrive as [`Error::InvalidChannel`], the
/// channel-annotated form of [`Error::InvalidArgument`]. Use
/// [`Error::is_invalid_argument`] to match both.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Sampler input was rejected: no entries, a negative or non-finite weight,
    /// or a zero total.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An [`Error::InvalidArgument`] raised while building the sampler for `channel`.
    /// `source` holds the unwrapped error.
    #[error("invalid histogram channel {channel}: {source}")]
    InvalidChannel {
        channel: ColorChannel,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns `true` if the error stems from invalid sampler input, including
    /// failures wrapped with the histogram channel they occurred in.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::InvalidArgument(_) => true,
            Error::InvalidChannel { source, .. } => source.is_invalid_argument(),
            _ => false,
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
