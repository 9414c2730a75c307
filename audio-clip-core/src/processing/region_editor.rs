//! Selection-bounded edits over a `SampleBuffer`.
//!
//! Both operations take the current buffer by reference and return a new
//! one; the caller swaps its reference to the result.

use crate::models::error::ClipError;
use crate::models::region::Region;
use crate::processing::sample_buffer::SampleBuffer;

/// Outcome of a destructive edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// The region covered no whole frame; the input buffer stands.
    Unchanged,
    /// The spliced replacement buffer.
    Edited(SampleBuffer),
}

impl Edit {
    /// The buffer to keep: the edited one, or `original` when unchanged.
    pub fn resolve(self, original: SampleBuffer) -> SampleBuffer {
        match self {
            Self::Unchanged => original,
            Self::Edited(buffer) => buffer,
        }
    }
}

/// Frame range `[start, end)` covered by `region` in `buffer`.
pub fn frame_range(buffer: &SampleBuffer, region: &Region) -> (usize, usize) {
    (buffer.frame_at(region.start()), buffer.frame_at(region.end()))
}

/// Keep only the frames inside `region`.
pub fn trim(buffer: &SampleBuffer, region: &Region) -> SampleBuffer {
    let (start, end) = frame_range(buffer, region);
    buffer.slice(start, end)
}

/// Remove the frames inside `region` and splice the remainder together.
///
/// Deleting every frame is refused with `ClipError::FullClipDeletion`; an
/// edit must always leave at least one frame.
pub fn delete_region(buffer: &SampleBuffer, region: &Region) -> Result<Edit, ClipError> {
    let (start, end) = frame_range(buffer, region);
    if end <= start {
        return Ok(Edit::Unchanged);
    }

    let remaining = buffer.frame_count() - (end - start);
    if remaining == 0 {
        log::warn!(
            "refusing to delete entire clip ({} frames)",
            buffer.frame_count()
        );
        return Err(ClipError::FullClipDeletion);
    }

    let spliced = buffer
        .slice(0, start)
        .concat(&buffer.slice(end, buffer.frame_count()))?;
    log::debug!(
        "deleted frames {}..{}, {} -> {} frames",
        start,
        end,
        buffer.frame_count(),
        spliced.frame_count()
    );
    Ok(Edit::Edited(spliced))
}
