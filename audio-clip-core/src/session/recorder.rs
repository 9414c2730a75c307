use std::sync::Arc;

use chrono::Utc;

use crate::models::audio_models::AccumulatorDiagnostics;
use crate::models::config::ExportConfiguration;
use crate::models::error::ClipError;
use crate::models::export_result::{export_file_name, ExportMetadata, ExportResult};
use crate::models::region::Region;
use crate::models::state::RecorderState;
use crate::processing::region_editor::{self, Edit};
use crate::processing::sample_buffer::SampleBuffer;
use crate::processing::wav_format;
use crate::session::accumulator::ChunkAccumulator;
use crate::storage::metadata;
use crate::storage::wav_writer::WavFileWriter;
use crate::traits::clip_delegate::ClipDelegate;
use crate::traits::frame_source::{FrameCallback, FrameSource};

/// Record, edit and export a single clip.
///
/// Generic over the capture backend via the `FrameSource` trait. Holds at
/// most one clip; every edit replaces it with a new buffer.
///
/// ```text
/// [FrameSource] → FrameSink → [ChunkAccumulator] → finalize → [clip]
///                                                               ↓ trim / delete
///                                                   [wav_format::encode] → [WavFileWriter]
/// ```
///
/// Selections are given in seconds, in either order, and clamped to the
/// clip. Selections whose clamped length is below
/// `ExportConfiguration::min_selection_secs` count as "no selection": preview
/// and export then cover the whole clip and delete does nothing.
pub struct ClipRecorder<S: FrameSource> {
    source: S,
    accumulator: ChunkAccumulator,
    config: ExportConfiguration,
    writer: WavFileWriter,
    clip: Option<SampleBuffer>,
    state: RecorderState,
    delegate: Option<Arc<dyn ClipDelegate>>,
}

impl<S: FrameSource> ClipRecorder<S> {
    pub fn new(source: S, config: ExportConfiguration) -> Result<Self, ClipError> {
        config.validate().map_err(ClipError::ConfigurationFailed)?;
        let writer = WavFileWriter::new(config.output_directory.clone());
        Ok(Self {
            source,
            accumulator: ChunkAccumulator::new(),
            config,
            writer,
            clip: None,
            state: RecorderState::Idle,
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn ClipDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> RecorderState {
        self.state.clone()
    }

    /// The current clip, if one is loaded.
    pub fn clip(&self) -> Option<&SampleBuffer> {
        self.clip.as_ref()
    }

    pub fn diagnostics(&self) -> AccumulatorDiagnostics {
        self.accumulator.diagnostics()
    }

    /// Start capture. Transitions: idle / clip ready → recording.
    ///
    /// The current clip is dropped once the source has started; if it fails
    /// to start, the clip and state are left as they were.
    pub fn start_recording(&mut self) -> Result<(), ClipError> {
        if self.state.is_recording() {
            return Err(ClipError::ConfigurationFailed("already recording".into()));
        }

        self.accumulator.start();

        let sink = self.accumulator.sink();
        let callback: FrameCallback = Arc::new(move |frame| {
            sink.ingest(frame);
        });

        if let Err(e) = self.source.start(callback) {
            log::error!("frame source failed to start: {}", e);
            self.accumulator.discard();
            return Err(e);
        }

        self.clip = None;
        if let Some(format) = self.source.format_hint() {
            log::debug!("recording, source reports {}", format);
        }
        self.set_state(RecorderState::Recording);
        Ok(())
    }

    /// Stop capture and load the recorded clip.
    /// Transitions: recording → finalizing → clip ready / idle.
    ///
    /// An empty or aborted capture yields the error, reports it to the
    /// delegate as a notice, and leaves the recorder idle without a clip.
    pub fn stop_recording(&mut self) -> Result<&SampleBuffer, ClipError> {
        if !self.state.is_recording() {
            return Err(ClipError::ConfigurationFailed("not recording".into()));
        }

        self.stop_source();
        self.set_state(RecorderState::Finalizing);

        match self.accumulator.finalize() {
            Ok(buffer) => Ok(self.replace_clip(buffer)),
            Err(e) => {
                self.set_state(RecorderState::Idle);
                if e.is_notice() || matches!(e, ClipError::FormatMismatch { .. } | ClipError::MalformedFrame(_)) {
                    self.notify(&e);
                }
                Err(e)
            }
        }
    }

    /// Abandon the capture in progress. Transitions: recording → idle.
    pub fn cancel_recording(&mut self) {
        if !self.state.is_recording() {
            return;
        }
        self.stop_source();
        self.accumulator.discard();
        self.set_state(RecorderState::Idle);
    }

    /// Drop the clip (and any capture in progress). Transitions: any → idle.
    pub fn clear(&mut self) {
        self.cancel_recording();
        self.clip = None;
        if !self.state.is_idle() {
            self.set_state(RecorderState::Idle);
        }
    }

    /// Load a clip obtained elsewhere, e.g. decoded from a file.
    pub fn load_clip(&mut self, clip: SampleBuffer) -> Result<&SampleBuffer, ClipError> {
        if self.state.is_recording() {
            return Err(ClipError::ConfigurationFailed("cannot load a clip while recording".into()));
        }
        Ok(self.replace_clip(clip))
    }

    /// Non-destructive trim of the current clip to a selection.
    pub fn trimmed(&self, start: f64, end: f64) -> Result<SampleBuffer, ClipError> {
        let clip = self.current_clip()?;
        Ok(match self.selection(clip, start, end) {
            Some(region) => region_editor::trim(clip, &region),
            None => clip.clone(),
        })
    }

    /// Encode the selection (or the whole clip) for playback.
    pub fn preview(&self, start: f64, end: f64) -> Result<Vec<u8>, ClipError> {
        let clip = self.current_clip()?;
        wav_format::encode(clip, self.selection(clip, start, end).as_ref(), self.config.bit_depth)
    }

    /// Cut the selection out of the clip. Returns whether the clip changed.
    ///
    /// Deleting the whole clip is refused with `ClipError::FullClipDeletion`,
    /// reported to the delegate as a notice; the clip stays as it was.
    pub fn delete_selection(&mut self, start: f64, end: f64) -> Result<bool, ClipError> {
        let clip = self.current_clip()?;
        let Some(region) = self.selection(clip, start, end) else {
            return Ok(false);
        };

        match region_editor::delete_region(clip, &region) {
            Ok(Edit::Edited(buffer)) => {
                self.replace_clip(buffer);
                Ok(true)
            }
            Ok(Edit::Unchanged) => Ok(false),
            Err(e) => {
                self.notify(&e);
                Err(e)
            }
        }
    }

    /// Write the selection (or the whole clip) to a new WAV file in the
    /// configured output directory.
    pub fn export(&self, start: f64, end: f64) -> Result<ExportResult, ClipError> {
        let clip = self.current_clip()?;
        let region = self.selection(clip, start, end);
        let wav = wav_format::encode(clip, region.as_ref(), self.config.bit_depth)?;

        let (first, last) = match &region {
            Some(region) => region_editor::frame_range(clip, region),
            None => (0, clip.frame_count()),
        };
        let frame_count = (last - first) as u64;
        let duration_secs = frame_count as f64 / clip.sample_rate() as f64;

        let file_name = export_file_name(Utc::now(), duration_secs);
        let (file_path, checksum) = self.writer.write(&file_name, &wav)?;

        let metadata = ExportMetadata::new(
            &file_path.to_string_lossy(),
            clip.sample_rate(),
            clip.channel_count(),
            self.config.bit_depth,
            frame_count,
            &checksum,
        );
        if self.config.write_metadata {
            metadata::write_metadata(&metadata, &file_path)?;
        }

        log::info!(
            "exported {:.2}s ({} frames, {}-bit) to {:?}",
            duration_secs,
            frame_count,
            self.config.bit_depth.bits(),
            file_path
        );

        Ok(ExportResult {
            file_path,
            duration_secs,
            metadata,
            checksum,
        })
    }

    // --- Internal helpers ---

    /// Clamp a selection to `clip`; `None` when what remains is below the
    /// minimum selection length.
    fn selection(&self, clip: &SampleBuffer, start: f64, end: f64) -> Option<Region> {
        Region::selection(start, end, clip.duration(), self.config.min_selection_secs)
    }

    fn current_clip(&self) -> Result<&SampleBuffer, ClipError> {
        self.clip.as_ref().ok_or(ClipError::NoClip)
    }

    fn replace_clip(&mut self, clip: SampleBuffer) -> &SampleBuffer {
        let duration_secs = clip.duration();
        if let Some(ref delegate) = self.delegate {
            delegate.on_clip_ready(&clip);
        }
        self.set_state(RecorderState::ClipReady { duration_secs });
        self.clip.insert(clip)
    }

    fn stop_source(&mut self) {
        if let Err(e) = self.source.stop() {
            log::error!("frame source failed to stop: {}", e);
        }
    }

    fn set_state(&mut self, new_state: RecorderState) {
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&self.state);
        }
    }

    fn notify(&self, notice: &ClipError) {
        log::warn!("{}", notice);
        if let Some(ref delegate) = self.delegate {
            delegate.on_notice(notice);
        }
    }
}

impl<S: FrameSource> Drop for ClipRecorder<S> {
    fn drop(&mut self) {
        if self.state.is_recording() {
            self.stop_source();
        }
    }
}
