use crate::models::error::ClipError;
use crate::models::state::RecorderState;
use crate::processing::sample_buffer::SampleBuffer;

/// Event delegate for clip recorder notifications.
///
/// Called on the thread driving the `ClipRecorder`.
pub trait ClipDelegate: Send + Sync {
    /// Called when the recorder state changes.
    fn on_state_changed(&self, state: &RecorderState);

    /// Called with a recoverable, user-facing condition: nothing recorded,
    /// a refused whole-clip deletion, or a capture aborted by a format change.
    fn on_notice(&self, notice: &ClipError);

    /// Called when a new clip replaces the current one (recording or edit).
    fn on_clip_ready(&self, clip: &SampleBuffer);
}
