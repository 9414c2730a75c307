use crate::models::audio_models::CaptureFormat;
use crate::models::error::ClipError;

/// Frame positions this close below an integer snap up to it, absorbing
/// rounding noise in `secs * sample_rate` (e.g. `0.3 - 0.1` seconds).
const FRAME_EPSILON: f64 = 1e-6;

/// An immutable multichannel block of `f32` samples.
///
/// Every channel has the same length; the constructor enforces it and no
/// method hands out mutable access, so the invariant holds for the buffer's
/// whole life. Edits produce new buffers.
///
/// Samples are not clamped at rest. Clamping happens only at quantization.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Build a buffer from planar channel data.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, ClipError> {
        if sample_rate == 0 {
            return Err(ClipError::InvalidBuffer("sample rate must be positive".into()));
        }
        if channels.is_empty() {
            return Err(ClipError::InvalidBuffer("at least one channel is required".into()));
        }
        if channels.len() > u16::MAX as usize {
            return Err(ClipError::InvalidBuffer(format!(
                "too many channels: {}",
                channels.len()
            )));
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(ClipError::InvalidBuffer("channels differ in length".into()));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// A buffer of `frame_count` zero samples per channel.
    pub fn silence(sample_rate: u32, channel_count: u16, frame_count: usize) -> Result<Self, ClipError> {
        Self::new(sample_rate, vec![vec![0.0; frame_count]; channel_count as usize])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn format(&self) -> CaptureFormat {
        CaptureFormat::new(self.sample_rate, self.channel_count())
    }

    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel, or `None` when `index` is out of range.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Frame index for a time in seconds: `floor(clamp(t, 0, duration) * sample_rate)`.
    ///
    /// A time at or past the end maps to `frame_count` exactly, so the
    /// full extent of a buffer always round-trips through seconds. Products
    /// within `FRAME_EPSILON` of the next frame count as that frame.
    ///
    /// Re-trimming a trimmed buffer to `[0, b - a]` reproduces it exactly
    /// only when `a` and `b` fall on frame boundaries; otherwise the floor
    /// of each endpoint can drop one more frame the second time.
    pub fn frame_at(&self, secs: f64) -> usize {
        let frame_count = self.frame_count();
        let duration = self.duration();
        if secs.is_nan() || secs <= 0.0 {
            return 0;
        }
        if secs >= duration {
            return frame_count;
        }
        ((secs * self.sample_rate as f64 + FRAME_EPSILON).floor() as usize).min(frame_count)
    }

    /// Copy of frames `[start_frame, end_frame)`.
    ///
    /// Bounds are clamped to the buffer; `end_frame <= start_frame` yields a
    /// zero-length buffer with the same format.
    pub fn slice(&self, start_frame: usize, end_frame: usize) -> SampleBuffer {
        let frame_count = self.frame_count();
        let start = start_frame.min(frame_count);
        let end = end_frame.min(frame_count).max(start);
        SampleBuffer {
            sample_rate: self.sample_rate,
            channels: self.channels.iter().map(|c| c[start..end].to_vec()).collect(),
        }
    }

    /// `self` followed by `suffix`. Both must share sample rate and channel count.
    pub fn concat(&self, suffix: &SampleBuffer) -> Result<SampleBuffer, ClipError> {
        if self.format() != suffix.format() {
            return Err(ClipError::FormatMismatch {
                expected: self.format(),
                actual: suffix.format(),
            });
        }
        let channels = self
            .channels
            .iter()
            .zip(&suffix.channels)
            .map(|(head, tail)| {
                let mut joined = Vec::with_capacity(head.len() + tail.len());
                joined.extend_from_slice(head);
                joined.extend_from_slice(tail);
                joined
            })
            .collect();
        Ok(SampleBuffer {
            sample_rate: self.sample_rate,
            channels,
        })
    }

    /// Frame-major interleaving of frames `[start_frame, end_frame)`:
    /// `[c0f0, c1f0, ..., c0f1, c1f1, ...]`. Mono data is copied as-is.
    pub fn interleaved(&self, start_frame: usize, end_frame: usize) -> Vec<f32> {
        let frame_count = self.frame_count();
        let start = start_frame.min(frame_count);
        let end = end_frame.min(frame_count).max(start);

        if self.channels.len() == 1 {
            return self.channels[0][start..end].to_vec();
        }

        let mut out = Vec::with_capacity((end - start) * self.channels.len());
        for frame in start..end {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo(left: &[f32], right: &[f32]) -> SampleBuffer {
        SampleBuffer::new(4, vec![left.to_vec(), right.to_vec()]).unwrap()
    }

    #[test]
    fn rejects_ragged_channels() {
        let result = SampleBuffer::new(48000, vec![vec![0.0; 3], vec![0.0; 2]]);
        assert!(matches!(result, Err(ClipError::InvalidBuffer(_))));
    }

    #[test]
    fn rejects_zero_rate_and_no_channels() {
        assert!(SampleBuffer::new(0, vec![vec![0.0]]).is_err());
        assert!(SampleBuffer::new(48000, Vec::new()).is_err());
    }

    #[test]
    fn derived_fields() {
        let buf = SampleBuffer::silence(48000, 2, 24000).unwrap();
        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), 24000);
        assert!((buf.duration() - 0.5).abs() < 1e-12);
        assert!(buf.channel(2).is_none());
    }

    #[test]
    fn slice_keeps_channels_aligned() {
        let buf = stereo(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0]);
        let sliced = buf.slice(1, 3);

        assert_eq!(sliced.channel(0).unwrap(), &[2.0, 3.0]);
        assert_eq!(sliced.channel(1).unwrap(), &[6.0, 7.0]);
        assert_eq!(sliced.sample_rate(), 4);
    }

    #[test]
    fn inverted_slice_is_empty() {
        let buf = stereo(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        let sliced = buf.slice(2, 1);

        assert!(sliced.is_empty());
        assert_eq!(sliced.channel_count(), 2);
        assert_eq!(buf.slice(10, 20).frame_count(), 0);
    }

    #[test]
    fn concat_sums_lengths() {
        let head = stereo(&[1.0, 2.0], &[3.0, 4.0]);
        let tail = stereo(&[5.0], &[6.0]);
        let joined = head.concat(&tail).unwrap();

        assert_eq!(joined.frame_count(), 3);
        assert_eq!(joined.channel(0).unwrap(), &[1.0, 2.0, 5.0]);
        assert_eq!(joined.channel(1).unwrap(), &[3.0, 4.0, 6.0]);
    }

    #[test]
    fn concat_rejects_format_mismatch() {
        let head = stereo(&[1.0], &[2.0]);
        let mono = SampleBuffer::new(4, vec![vec![1.0]]).unwrap();
        let other_rate = SampleBuffer::new(8, vec![vec![1.0], vec![2.0]]).unwrap();

        assert!(matches!(head.concat(&mono), Err(ClipError::FormatMismatch { .. })));
        assert!(matches!(head.concat(&other_rate), Err(ClipError::FormatMismatch { .. })));
    }

    #[test]
    fn interleave_is_frame_major() {
        let buf = stereo(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert_eq!(buf.interleaved(0, 3), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(buf.interleaved(1, 2), vec![2.0, 5.0]);
    }

    #[test]
    fn frame_at_clamps() {
        let buf = SampleBuffer::silence(10, 1, 25).unwrap(); // 2.5 s
        assert_eq!(buf.frame_at(-1.0), 0);
        assert_eq!(buf.frame_at(0.55), 5);
        assert_eq!(buf.frame_at(2.5), 25);
        assert_eq!(buf.frame_at(99.0), 25);
        assert_eq!(buf.frame_at(f64::NAN), 0);
    }

    #[test]
    fn frame_at_absorbs_rounding_noise() {
        let buf = SampleBuffer::silence(10, 1, 50).unwrap();
        // 0.3 - 0.1 is 0.19999999999999998 in f64.
        assert_eq!(buf.frame_at(0.3 - 0.1), 2);
        assert_eq!(buf.frame_at(0.199), 1);
    }

    #[test]
    fn unaligned_endpoints_can_lose_a_frame_on_retrim() {
        let buf = SampleBuffer::silence(10, 1, 50).unwrap();
        // [1.25, 4.5] covers frames 12..45; its length 3.25 s floors to 32.
        let (start, end) = (buf.frame_at(1.25), buf.frame_at(4.5));
        assert_eq!(end - start, 33);

        let trimmed = buf.slice(start, end);
        assert_eq!(trimmed.frame_at(4.5 - 1.25), 32);
    }
}
