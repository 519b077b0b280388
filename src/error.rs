//! Error types for loading and saving bitmaps

use thiserror::Error;

/// Errors produced by the image codecs
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading or writing the underlying file or stream failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not start with the expected signature
    #[error("bad magic number")]
    BadMagic,

    /// The file is well formed but uses a feature that is not handled
    #[error("unsupported format: {0}")]
    Unsupported(String),

    /// The stream ended before the image was complete
    #[error("truncated image data")]
    Truncated,

    /// Support for the format was not compiled in
    #[error("{0} support is not available")]
    Unavailable(&'static str),

    /// The PNG/JPEG backend reported an error
    #[error("image backend error: {0}")]
    Image(String),

    /// Saving to a file whose extension names no known format
    #[error("unknown file extension: {0:?}")]
    UnknownExtension(String),
}

impl CodecError {
    /// Map an i/o error, treating a short read as truncation
    pub(crate) fn from_read(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CodecError::Truncated
        } else {
            CodecError::Io(e)
        }
    }
}

#[cfg(any(feature = "png", feature = "jpeg"))]
impl From<image::ImageError> for CodecError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(e) => CodecError::from_read(e),
            e => CodecError::Image(e.to_string()),
        }
    }
}
