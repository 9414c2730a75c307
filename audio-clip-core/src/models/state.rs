/// Chunk accumulator state machine.
///
/// State transitions:
/// ```text
/// idle → recording → finalizing → idle
///                  ↘ discarding ↗
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    Idle,
    Recording,
    Finalizing,
    Discarding,
}

impl AccumulatorState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}

/// Clip recorder state, as reported to a `ClipDelegate`.
///
/// State transitions:
/// ```text
/// idle → recording → finalizing → clip ready ⟲ (edits)
///          ↓              ↓            ↓
///        idle (cancel)  idle (empty)  recording / idle (clear)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderState {
    Idle,
    Recording,
    Finalizing,
    ClipReady { duration_secs: f64 },
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn has_clip(&self) -> bool {
        matches!(self, Self::ClipReady { .. })
    }

    /// Duration of the loaded clip, if any.
    pub fn duration(&self) -> Option<f64> {
        match self {
            Self::ClipReady { duration_secs } => Some(*duration_secs),
            _ => None,
        }
    }
}
