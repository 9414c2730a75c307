//! # audio-clip-core
//!
//! Platform-agnostic clip engine.
//!
//! Assembles live capture frames into a multichannel sample buffer, edits it
//! by region (trim, delete-and-splice), and exports it as RIFF/WAVE integer
//! PCM at 16 or 24 bits. Capture backends implement the `FrameSource` trait
//! and plug into the generic `ClipRecorder`.
//!
//! ## Architecture
//!
//! ```text
//! audio-clip-core (this crate)
//! ├── traits/       ← FrameSource, ClipDelegate
//! ├── models/       ← ClipError, Region, ExportConfiguration, CaptureFormat, state machines
//! ├── processing/   ← Quantizer, SampleBuffer, region editor, WAV encoding
//! ├── session/      ← ChunkAccumulator, ClipRecorder (generic orchestrator)
//! └── storage/      ← WavFileWriter, metadata sidecars
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AccumulatorDiagnostics, AudioFrame, BitDepth, CaptureFormat};
pub use models::config::ExportConfiguration;
pub use models::error::ClipError;
pub use models::export_result::{ExportMetadata, ExportResult};
pub use models::region::{Region, MIN_SELECTION_SECS};
pub use models::state::{AccumulatorState, RecorderState};
pub use processing::quantizer::quantize;
pub use processing::region_editor::{delete_region, trim, Edit};
pub use processing::sample_buffer::SampleBuffer;
pub use processing::wav_format::encode;
pub use session::accumulator::{ChunkAccumulator, FrameSink};
pub use session::recorder::ClipRecorder;
pub use storage::wav_writer::WavFileWriter;
pub use traits::clip_delegate::ClipDelegate;
pub use traits::frame_source::{FrameCallback, FrameSource};
