//! RIFF/WAVE integer PCM encoding.
//!
//! Output is a fixed 44-byte header followed directly by the payload; no
//! extension chunks and no pad byte.

use crate::models::audio_models::BitDepth;
use crate::models::error::ClipError;
use crate::models::region::Region;
use crate::processing::quantizer;
use crate::processing::region_editor;
use crate::processing::sample_buffer::SampleBuffer;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * block_align
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(sample_rate: u32, bit_depth: BitDepth, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let block_align = (channels as u32 * bit_depth.bits() as u32 / 8) as u16;
    let byte_rate = sample_rate * block_align as u32;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.bits().to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Encode `buffer`, or the part of it inside `region`, as a WAV byte stream.
///
/// The region is converted to frames with `floor(t * sample_rate)` after
/// clamping to the buffer's duration. `None` encodes the whole buffer.
pub fn encode(buffer: &SampleBuffer, region: Option<&Region>, bit_depth: BitDepth) -> Result<Vec<u8>, ClipError> {
    let (start, end) = match region {
        Some(region) => region_editor::frame_range(buffer, region),
        None => (0, buffer.frame_count()),
    };
    let frames = end.saturating_sub(start);
    let channels = buffer.channel_count();

    let block_align = channels as u64 * bit_depth.bytes_per_sample() as u64;
    let byte_rate = buffer.sample_rate() as u64 * block_align;
    if block_align > u16::MAX as u64 || byte_rate > u32::MAX as u64 {
        return Err(ClipError::EncodingFailed(format!(
            "{} channels at {} Hz do not fit a PCM header",
            channels,
            buffer.sample_rate()
        )));
    }
    let data_size = frames as u64 * block_align;
    if data_size > (u32::MAX - 36) as u64 {
        return Err(ClipError::EncodingFailed(format!(
            "payload of {} bytes exceeds the 4 GiB WAV limit",
            data_size
        )));
    }

    let mut out = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
    out.extend_from_slice(&generate_wav_header(
        buffer.sample_rate(),
        bit_depth,
        channels,
        data_size as u32,
    ));
    quantizer::quantize_into(&buffer.interleaved(start, end), bit_depth, &mut out);

    debug_assert_eq!(out.len(), WAV_HEADER_SIZE + data_size as usize);
    Ok(out)
}
