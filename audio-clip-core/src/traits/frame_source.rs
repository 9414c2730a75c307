use std::sync::Arc;

use crate::models::audio_models::{AudioFrame, CaptureFormat};
use crate::models::error::ClipError;

/// Callback invoked when a block of captured frames is available.
///
/// Fires on the source's real-time thread. Implementations forward the block
/// to a `FrameSink` and return immediately.
pub type FrameCallback = Arc<dyn Fn(AudioFrame) + Send + Sync + 'static>;

/// Interface for the external real-time capture collaborator.
///
/// Device access, permission prompts and callback scheduling live behind this
/// trait; the engine only sees the frame blocks it delivers.
pub trait FrameSource: Send {
    /// Start delivering frame blocks via `callback`.
    fn start(&mut self, callback: FrameCallback) -> Result<(), ClipError>;

    /// Stop delivering frames. No callback fires after this returns.
    fn stop(&mut self) -> Result<(), ClipError>;

    /// The format the source expects to deliver, if known up front.
    ///
    /// Informational only: the accumulator trusts the first delivered block.
    fn format_hint(&self) -> Option<CaptureFormat> {
        None
    }
}
