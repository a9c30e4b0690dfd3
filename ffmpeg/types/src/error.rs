/*!
    Error type shared by the workspace crates.
*/

use thiserror::Error;

/**
    Errors raised while opening, decoding, encoding or saving media.

    Unsupported pixel formats during frame conversion are not errors; the
    converters report them as `None`.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("image error: {0}")]
    Image(String),
    #[error("output already finalized")]
    Finalized,
}

impl Error {
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn image(message: impl Into<String>) -> Self {
        Self::Image(message.into())
    }
}

/**
    Type alias for results that may return an [`Error`].
*/
pub type Result<T> = std::result::Result<T, Error>;
