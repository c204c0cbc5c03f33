use thiserror::Error;

/// Failures reported by frame conversion, detection and snapshot encoding.
#[derive(Debug, Error)]
pub enum LikeALookError {
    /// RGBA buffer length does not match the frame geometry.
    #[error("RGBA buffer must be {expected} bytes, got {actual}")]
    InvalidBufferSize {
        /// Required length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Uploaded bytes are not a readable image.
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    /// Image has no pixels.
    #[error("image dimensions are zero")]
    ZeroDimensions,

    /// Snapshot encoding failed.
    #[error("failed to encode image: {0}")]
    EncodeError(String),

    /// Snapshot quality outside `[0.0, 1.0]`.
    #[error("quality must be between 0.0 and 1.0, got {0}")]
    InvalidQuality(f32),

    /// Detector scan parameters are out of range.
    #[error("invalid detector parameters: {0}")]
    InvalidDetectorParams(String),

    /// Face model could not be read.
    #[error("failed to load face model: {0}")]
    ModelLoad(String),
}
