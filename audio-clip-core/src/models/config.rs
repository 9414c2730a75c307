use std::path::PathBuf;

use super::audio_models::BitDepth;
use super::region::MIN_SELECTION_SECS;

/// Configuration for editing and exporting clips.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfiguration {
    /// Bit depth for PCM output (default: 16).
    pub bit_depth: BitDepth,

    /// Selections shorter than this many seconds count as "no selection"
    /// (default: 0.02).
    pub min_selection_secs: f64,

    /// Directory where exported files are written.
    pub output_directory: PathBuf,

    /// Write a JSON metadata sidecar next to each export (default: true).
    pub write_metadata: bool,
}

impl ExportConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_selection_secs.is_finite() || self.min_selection_secs < 0.0 {
            return Err(format!(
                "minimum selection must be a non-negative number of seconds: {}",
                self.min_selection_secs
            ));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err("output directory must not be empty".into());
        }
        Ok(())
    }
}

impl Default for ExportConfiguration {
    fn default() -> Self {
        Self {
            bit_depth: BitDepth::Sixteen,
            min_selection_secs: MIN_SELECTION_SECS,
            output_directory: PathBuf::from("."),
            write_metadata: true,
        }
    }
}
