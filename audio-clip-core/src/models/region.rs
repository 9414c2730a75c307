use serde::{Deserialize, Serialize};

/// Selections shorter than this are treated as "no selection".
pub const MIN_SELECTION_SECS: f64 = 0.02;

/// A time interval in seconds, normalized so that `start <= end`.
///
/// Endpoints may arrive in either order (a drag can go left or right);
/// the constructor sorts them. Clamping against a buffer's duration happens
/// at the point of use, since a region outlives any single buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    start: f64,
    end: f64,
}

impl Region {
    pub fn new(start: f64, end: f64) -> Self {
        let (start, end) = (nan_to_zero(start), nan_to_zero(end));
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Normalize a user selection against a clip of `duration` seconds.
    ///
    /// The endpoints are clamped to `[0, duration]` first; the result is
    /// `None` when what remains is shorter than `min_secs`.
    pub fn selection(start: f64, end: f64, duration: f64, min_secs: f64) -> Option<Self> {
        let region = Self::new(start, end).clamped(duration);
        if region.length() < min_secs {
            None
        } else {
            Some(region)
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// The region clamped to `[0, duration]`.
    pub fn clamped(&self, duration: f64) -> Self {
        let duration = nan_to_zero(duration).max(0.0);
        Self {
            start: self.start.clamp(0.0, duration),
            end: self.end.clamp(0.0, duration),
        }
    }
}

fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
