//! Float to integer PCM conversion.
//!
//! Samples are clamped to `[-1.0, 1.0]`, then scaled asymmetrically:
//! negative values by `2^(bits-1)` and non-negative values by
//! `2^(bits-1) - 1`, so `-1.0` lands on the most negative code and `+1.0`
//! on the most positive one without overflow. Scaling happens in `f64` and
//! rounds half away from zero.

use crate::models::audio_models::BitDepth;

/// Quantize one sample to a signed integer code at `bit_depth`.
pub fn quantize_sample(sample: f32, bit_depth: BitDepth) -> i32 {
    let clamped = (sample as f64).clamp(-1.0, 1.0);
    let scale = if clamped < 0.0 {
        -(bit_depth.min_code() as f64)
    } else {
        bit_depth.max_code() as f64
    };
    // NaN survives the clamp and casts to 0.
    (clamped * scale).round() as i32
}

/// Quantize samples to little-endian PCM bytes.
///
/// 16-bit codes take 2 bytes each, 24-bit codes 3 bytes each with no padding.
pub fn quantize(samples: &[f32], bit_depth: BitDepth) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * bit_depth.bytes_per_sample());
    quantize_into(samples, bit_depth, &mut out);
    out
}

/// Append quantized little-endian PCM bytes to `out`.
pub fn quantize_into(samples: &[f32], bit_depth: BitDepth, out: &mut Vec<u8>) {
    out.reserve(samples.len() * bit_depth.bytes_per_sample());
    match bit_depth {
        BitDepth::Sixteen => {
            for &sample in samples {
                let code = quantize_sample(sample, bit_depth) as i16;
                out.extend_from_slice(&code.to_le_bytes());
            }
        }
        BitDepth::TwentyFour => {
            for &sample in samples {
                let code = quantize_sample(sample, bit_depth);
                out.extend_from_slice(&code.to_le_bytes()[..3]);
            }
        }
    }
}
