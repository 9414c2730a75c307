use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ClipError;

/// Sample rate and channel layout of a capture session.
///
/// Fixed by the first ingested frame and compared against every later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
}

impl CaptureFormat {
    pub fn new(sample_rate: u32, channel_count: u16) -> Self {
        Self {
            sample_rate,
            channel_count,
        }
    }
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz / {} ch", self.sample_rate, self.channel_count)
    }
}

/// PCM output bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    #[default]
    Sixteen,
    TwentyFour,
}

impl BitDepth {
    pub fn bits(self) -> u16 {
        match self {
            Self::Sixteen => 16,
            Self::TwentyFour => 24,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        self.bits() as usize / 8
    }

    /// Most negative code, e.g. -32768 at 16 bits.
    pub fn min_code(self) -> i32 {
        -(1 << (self.bits() - 1))
    }

    /// Most positive code, e.g. 32767 at 16 bits.
    pub fn max_code(self) -> i32 {
        (1 << (self.bits() - 1)) - 1
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = ClipError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(Self::Sixteen),
            24 => Ok(Self::TwentyFour),
            other => Err(ClipError::UnsupportedBitDepth(other)),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

/// One block of frames handed over by the capture callback.
///
/// Planar layout: `channels[c]` holds the samples of channel `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl AudioFrame {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Split interleaved samples `[L0, R0, L1, R1, ...]` into planar channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], sample_rate: u32, channel_count: u16) -> Self {
        let channel_count = channel_count.max(1) as usize;
        let frame_count = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn format(&self) -> CaptureFormat {
        CaptureFormat::new(self.sample_rate, self.channels.len() as u16)
    }

    /// Frames in this block, taken from the first channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Checks that the frame has at least one channel and no ragged channels.
    pub fn validate(&self) -> Result<(), ClipError> {
        if self.channels.is_empty() {
            return Err(ClipError::MalformedFrame("frame has no channels".into()));
        }
        if self.sample_rate == 0 {
            return Err(ClipError::MalformedFrame("sample rate must be positive".into()));
        }
        let frames = self.frame_count();
        if let Some((index, channel)) = self
            .channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frames)
        {
            return Err(ClipError::MalformedFrame(format!(
                "channel {} has {} samples, expected {}",
                index,
                channel.len(),
                frames
            )));
        }
        Ok(())
    }
}

/// Diagnostics for debugging capture sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatorDiagnostics {
    pub chunks_ingested: u64,
    pub chunks_rejected: u64,
    pub chunks_dropped: u64,
    pub total_frames: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_depth_codes() {
        assert_eq!(BitDepth::Sixteen.min_code(), -32768);
        assert_eq!(BitDepth::Sixteen.max_code(), 32767);
        assert_eq!(BitDepth::TwentyFour.min_code(), -8_388_608);
        assert_eq!(BitDepth::TwentyFour.max_code(), 8_388_607);
        assert_eq!(BitDepth::TwentyFour.bytes_per_sample(), 3);
    }

    #[test]
    fn bit_depth_from_bits() {
        assert_eq!(BitDepth::try_from(16), Ok(BitDepth::Sixteen));
        assert_eq!(BitDepth::try_from(24), Ok(BitDepth::TwentyFour));
        assert_eq!(BitDepth::try_from(32), Err(ClipError::UnsupportedBitDepth(32)));
        assert_eq!(BitDepth::default(), BitDepth::Sixteen);
    }

    #[test]
    fn bit_depth_serializes_as_bits() {
        assert_eq!(serde_json::to_string(&BitDepth::TwentyFour).unwrap(), "24");
        let parsed: BitDepth = serde_json::from_str("16").unwrap();
        assert_eq!(parsed, BitDepth::Sixteen);
        assert!(serde_json::from_str::<BitDepth>("8").is_err());
    }

    #[test]
    fn deinterleave_stereo() {
        let frame = AudioFrame::from_interleaved(&[1.0, 4.0, 2.0, 5.0, 3.0, 6.0], 44100, 2);
        assert_eq!(frame.channels, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(frame.frame_count(), 3);
        assert_eq!(frame.format(), CaptureFormat::new(44100, 2));
    }

    #[test]
    fn deinterleave_drops_partial_frame() {
        let frame = AudioFrame::from_interleaved(&[1.0, 2.0, 3.0], 48000, 2);
        assert_eq!(frame.frame_count(), 1);
    }

    #[test]
    fn ragged_frame_is_malformed() {
        let frame = AudioFrame::new(48000, vec![vec![0.0; 4], vec![0.0; 3]]);
        assert!(matches!(frame.validate(), Err(ClipError::MalformedFrame(_))));
        assert!(AudioFrame::new(48000, Vec::new()).validate().is_err());
        assert!(AudioFrame::new(48000, vec![vec![0.0; 4]]).validate().is_ok());
    }
}
