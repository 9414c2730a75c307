use thiserror::Error;

use super::audio_models::CaptureFormat;

/// Errors that can occur while capturing, editing or exporting a clip.
///
/// `EmptyCapture` and `FullClipDeletion` are recoverable, user-facing
/// outcomes rather than faults; callers surface them as notices.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    #[error("nothing recorded")]
    EmptyCapture,

    #[error("format mismatch: expected {expected}, got {actual}")]
    FormatMismatch {
        expected: CaptureFormat,
        actual: CaptureFormat,
    },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("cannot delete the entire clip")]
    FullClipDeletion,

    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("no clip loaded")]
    NoClip,

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("frame source error: {0}")]
    Source(String),
}

impl ClipError {
    /// Whether the error is a user-facing notice that leaves the engine usable.
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::EmptyCapture | Self::FullClipDeletion)
    }
}
