use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::{AccumulatorDiagnostics, AudioFrame, CaptureFormat};
use crate::models::error::ClipError;
use crate::models::state::AccumulatorState;
use crate::processing::sample_buffer::SampleBuffer;

/// Chunk slots reserved per channel when a session starts.
const INITIAL_CHUNK_CAPACITY: usize = 256;

/// Per-session capture data, detached from the shared state in one step by
/// `finalize` and `discard` so the heavy work happens outside the lock.
#[derive(Default)]
struct CapturedChunks {
    format: Option<CaptureFormat>,
    pending: Vec<Vec<Vec<f32>>>,
    total_frames: usize,
    fault: Option<ClipError>,
}

/// State shared between the controlling thread and the capture callback.
struct SharedCapture {
    state: AccumulatorState,
    chunks: CapturedChunks,
    diagnostics: AccumulatorDiagnostics,
}

impl SharedCapture {
    fn new() -> Self {
        Self {
            state: AccumulatorState::Idle,
            chunks: CapturedChunks::default(),
            diagnostics: AccumulatorDiagnostics::default(),
        }
    }

    /// Append one frame block. Never fails: a bad block is recorded as the
    /// session fault and surfaced later by `finalize`.
    fn accept(&mut self, frame: AudioFrame) -> bool {
        if !self.state.is_recording() {
            self.diagnostics.chunks_dropped += 1;
            return false;
        }
        if self.chunks.fault.is_some() {
            self.diagnostics.chunks_rejected += 1;
            return false;
        }

        if let Err(e) = frame.validate() {
            self.reject(e);
            return false;
        }

        let format = frame.format();
        match self.chunks.format {
            None => {
                self.chunks.format = Some(format);
                self.chunks.pending = (0..format.channel_count)
                    .map(|_| Vec::with_capacity(INITIAL_CHUNK_CAPACITY))
                    .collect();
            }
            Some(expected) if expected != format => {
                self.reject(ClipError::FormatMismatch {
                    expected,
                    actual: format,
                });
                return false;
            }
            Some(_) => {}
        }

        let frames = frame.frame_count();
        for (pending, samples) in self.chunks.pending.iter_mut().zip(frame.channels) {
            pending.push(samples);
        }
        self.chunks.total_frames += frames;
        self.diagnostics.chunks_ingested += 1;
        self.diagnostics.total_frames += frames as u64;
        true
    }

    fn reject(&mut self, error: ClipError) {
        log::warn!("rejecting capture chunk, session aborted: {}", error);
        self.chunks.fault = Some(error);
        self.diagnostics.chunks_rejected += 1;
    }
}

/// Producer handle for the real-time capture callback.
///
/// Cheap to clone. `ingest` only moves the chunk into a pending list under a
/// short critical section; it never coalesces and never returns an error.
#[derive(Clone)]
pub struct FrameSink {
    shared: Arc<Mutex<SharedCapture>>,
}

impl FrameSink {
    /// Hand a block of frames to the accumulator.
    ///
    /// Returns `false` when the block was not kept: no recording in progress,
    /// or the block was rejected (see `ChunkAccumulator::finalize`).
    pub fn ingest(&self, frame: AudioFrame) -> bool {
        self.shared.lock().accept(frame)
    }

    /// Convenience for sources that deliver interleaved samples.
    pub fn ingest_interleaved(&self, samples: &[f32], sample_rate: u32, channel_count: u16) -> bool {
        self.ingest(AudioFrame::from_interleaved(samples, sample_rate, channel_count))
    }
}

/// Collects fixed-size multichannel frame blocks during a recording and
/// coalesces them into a `SampleBuffer`.
///
/// ```text
/// [capture callback] → FrameSink::ingest → [pending chunks per channel]
///                                                   ↓ finalize (off the real-time path)
///                                             [SampleBuffer]
/// ```
///
/// The format (sample rate, channel count) is fixed by the first block of a
/// session. A block that disagrees poisons the session: it and everything
/// after it are dropped and `finalize` reports the mismatch.
pub struct ChunkAccumulator {
    shared: Arc<Mutex<SharedCapture>>,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(SharedCapture::new())),
        }
    }

    /// A producer handle feeding this accumulator.
    pub fn sink(&self) -> FrameSink {
        FrameSink {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> AccumulatorState {
        self.shared.lock().state
    }

    /// Format established by the first block of the current session.
    pub fn format(&self) -> Option<CaptureFormat> {
        self.shared.lock().chunks.format
    }

    pub fn total_frames(&self) -> usize {
        self.shared.lock().chunks.total_frames
    }

    pub fn diagnostics(&self) -> AccumulatorDiagnostics {
        self.shared.lock().diagnostics.clone()
    }

    /// Begin a session. Transitions: idle → recording.
    ///
    /// Calling this mid-recording abandons the current session first.
    pub fn start(&mut self) {
        let abandoned = {
            let mut s = self.shared.lock();
            if s.state.is_recording() {
                log::warn!("restarting capture, dropping {} pending frames", s.chunks.total_frames);
            }
            s.state = AccumulatorState::Recording;
            s.diagnostics = AccumulatorDiagnostics::default();
            std::mem::take(&mut s.chunks)
        };
        drop(abandoned);
        log::debug!("accumulator recording");
    }

    /// Append a block from the controlling side. Same semantics as `FrameSink::ingest`.
    pub fn ingest(&self, frame: AudioFrame) -> bool {
        self.shared.lock().accept(frame)
    }

    /// End the session and coalesce its chunks in arrival order.
    /// Transitions: recording → finalizing → idle.
    ///
    /// Returns `ClipError::EmptyCapture` when no frames arrived (or no session
    /// was running), and the recorded fault when a block was rejected.
    pub fn finalize(&mut self) -> Result<SampleBuffer, ClipError> {
        let chunks = {
            let mut s = self.shared.lock();
            if !s.state.is_recording() {
                return Err(ClipError::EmptyCapture);
            }
            s.state = AccumulatorState::Finalizing;
            std::mem::take(&mut s.chunks)
        };

        let result = coalesce(chunks);

        self.shared.lock().state = AccumulatorState::Idle;
        match &result {
            Ok(buffer) => log::debug!(
                "finalized {} frames x {} channels at {} Hz",
                buffer.frame_count(),
                buffer.channel_count(),
                buffer.sample_rate()
            ),
            Err(e) => log::warn!("capture finalize failed: {}", e),
        }
        result
    }

    /// Drop everything captured in the current session.
    /// Transitions: recording → discarding → idle.
    pub fn discard(&mut self) {
        let chunks = {
            let mut s = self.shared.lock();
            if !s.state.is_recording() {
                return;
            }
            s.state = AccumulatorState::Discarding;
            std::mem::take(&mut s.chunks)
        };

        log::debug!("discarding {} captured frames", chunks.total_frames);
        drop(chunks);

        self.shared.lock().state = AccumulatorState::Idle;
    }
}

impl Default for ChunkAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy every pending chunk into one preallocated sequence per channel.
fn coalesce(chunks: CapturedChunks) -> Result<SampleBuffer, ClipError> {
    if let Some(fault) = chunks.fault {
        return Err(fault);
    }
    let format = match chunks.format {
        Some(format) if chunks.total_frames > 0 => format,
        _ => return Err(ClipError::EmptyCapture),
    };

    let channels = chunks
        .pending
        .into_iter()
        .map(|pending| {
            let mut channel = Vec::with_capacity(chunks.total_frames);
            for chunk in &pending {
                channel.extend_from_slice(chunk);
            }
            channel
        })
        .collect();

    SampleBuffer::new(format.sample_rate, channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn mono(samples: &[f32]) -> AudioFrame {
        AudioFrame::new(48000, vec![samples.to_vec()])
    }

    #[test]
    fn chunks_coalesce_in_arrival_order() {
        let mut acc = ChunkAccumulator::new();
        acc.start();

        let a = [0.1, 0.2, 0.3];
        let b = [0.4];
        let c = [0.5, 0.6, 0.7, 0.8, 0.9];
        assert!(acc.ingest(mono(&a)));
        assert!(acc.ingest(mono(&b)));
        assert!(acc.ingest(mono(&c)));
        assert_eq!(acc.total_frames(), 9);

        let buffer = acc.finalize().unwrap();
        let expected: Vec<f32> = a.iter().chain(&b).chain(&c).copied().collect();
        assert_eq!(buffer.channel(0).unwrap(), expected.as_slice());
        assert_eq!(buffer.sample_rate(), 48000);
        assert!(acc.state().is_idle());
    }

    #[test]
    fn stereo_channels_stay_aligned() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        let sink = acc.sink();
        sink.ingest_interleaved(&[1.0, -1.0, 2.0, -2.0], 44100, 2);
        sink.ingest_interleaved(&[3.0, -3.0], 44100, 2);

        let buffer = acc.finalize().unwrap();
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.channel(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.channel(1).unwrap(), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn finalize_without_chunks_is_empty_capture() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        assert_eq!(acc.finalize(), Err(ClipError::EmptyCapture));
        assert!(acc.state().is_idle());
    }

    #[test]
    fn finalize_with_only_empty_chunks_is_empty_capture() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        assert!(acc.ingest(mono(&[])));
        assert_eq!(acc.format(), Some(CaptureFormat::new(48000, 1)));
        assert_eq!(acc.finalize(), Err(ClipError::EmptyCapture));
    }

    #[test]
    fn finalize_when_idle_is_empty_capture() {
        let mut acc = ChunkAccumulator::new();
        assert_eq!(acc.finalize(), Err(ClipError::EmptyCapture));
    }

    #[test]
    fn finalize_consumes_session_once() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        acc.ingest(mono(&[0.5]));
        assert!(acc.finalize().is_ok());
        assert_eq!(acc.finalize(), Err(ClipError::EmptyCapture));
        assert_eq!(acc.total_frames(), 0);
        assert_eq!(acc.format(), None);
    }

    #[test]
    fn channel_mismatch_poisons_session() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        assert!(acc.ingest(AudioFrame::new(48000, vec![vec![0.0; 4], vec![0.0; 4]])));
        assert!(!acc.ingest(mono(&[0.0; 4])));
        // Later well-formed chunks are refused too.
        assert!(!acc.ingest(AudioFrame::new(48000, vec![vec![0.0; 4], vec![0.0; 4]])));

        assert_eq!(acc.diagnostics().chunks_rejected, 2);
        assert_eq!(
            acc.finalize(),
            Err(ClipError::FormatMismatch {
                expected: CaptureFormat::new(48000, 2),
                actual: CaptureFormat::new(48000, 1),
            })
        );
        assert!(acc.state().is_idle());
    }

    #[test]
    fn sample_rate_change_is_mismatch() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        acc.ingest(mono(&[0.0; 4]));
        assert!(!acc.ingest(AudioFrame::new(44100, vec![vec![0.0; 4]])));
        assert!(matches!(acc.finalize(), Err(ClipError::FormatMismatch { .. })));
    }

    #[test]
    fn ragged_frame_is_rejected() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        assert!(!acc.ingest(AudioFrame::new(48000, vec![vec![0.0; 4], vec![0.0; 2]])));
        assert!(matches!(acc.finalize(), Err(ClipError::MalformedFrame(_))));
    }

    #[test]
    fn chunks_outside_recording_are_dropped() {
        let mut acc = ChunkAccumulator::new();
        let sink = acc.sink();
        assert!(!sink.ingest(mono(&[1.0])));

        acc.start();
        sink.ingest(mono(&[1.0]));
        acc.finalize().unwrap();
        assert!(!sink.ingest(mono(&[1.0])));
        assert_eq!(acc.diagnostics().chunks_dropped, 1);
    }

    #[test]
    fn discard_resets_to_idle() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        acc.ingest(mono(&[0.1, 0.2]));
        acc.discard();

        assert!(acc.state().is_idle());
        assert_eq!(acc.total_frames(), 0);
        assert_eq!(acc.format(), None);
        assert_eq!(acc.finalize(), Err(ClipError::EmptyCapture));
    }

    #[test]
    fn restart_drops_previous_session() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        acc.ingest(AudioFrame::new(48000, vec![vec![0.0; 4], vec![0.0; 4]]));
        acc.start();
        // A new session may pick a new format.
        assert!(acc.ingest(mono(&[0.7])));
        let buffer = acc.finalize().unwrap();
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.frame_count(), 1);
    }

    #[test]
    fn producer_thread_preserves_order() {
        let mut acc = ChunkAccumulator::new();
        acc.start();
        let sink = acc.sink();

        let producer = thread::spawn(move || {
            for block in 0..100 {
                let samples: Vec<f32> = (0..128).map(|i| (block * 128 + i) as f32).collect();
                assert!(sink.ingest(AudioFrame::new(16000, vec![samples])));
            }
        });
        producer.join().unwrap();

        let buffer = acc.finalize().unwrap();
        assert_eq!(buffer.frame_count(), 100 * 128);
        let channel = buffer.channel(0).unwrap();
        assert!(channel.iter().enumerate().all(|(i, &s)| s == i as f32));
    }
}
