use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audio_models::BitDepth;

/// Result returned when a clip export completes successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    pub metadata: ExportMetadata,
    pub checksum: String,
}

/// Metadata stored alongside an exported clip.
///
/// Serializable for the JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub id: String,
    pub file_path: String,
    pub created_at: String,
    pub sample_rate: u32,
    pub channel_count: u16,
    pub bit_depth: BitDepth,
    pub frame_count: u64,
    pub duration_secs: f64,
    pub checksum: String,
}

impl ExportMetadata {
    pub fn new(
        file_path: &str,
        sample_rate: u32,
        channel_count: u16,
        bit_depth: BitDepth,
        frame_count: u64,
        checksum: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_path: file_path.to_string(),
            created_at: Utc::now().to_rfc3339(),
            sample_rate,
            channel_count,
            bit_depth,
            frame_count,
            duration_secs: frame_count as f64 / sample_rate as f64,
            checksum: checksum.to_string(),
        }
    }
}

/// File name for an exported clip: `recording_<timestamp>_<seconds>s.wav`.
///
/// The timestamp has `:` replaced so the name is valid on every platform;
/// the duration is rounded to hundredths.
pub fn export_file_name(created_at: DateTime<Utc>, duration_secs: f64) -> String {
    let stamp = created_at.format("%Y-%m-%dT%H-%M-%S");
    let rounded = (duration_secs * 100.0).round() / 100.0;
    format!("recording_{}_{}s.wav", stamp, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_rounds_duration() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(export_file_name(at, 2.456), "recording_2024-03-09T14-05-07_2.46s.wav");
        assert_eq!(export_file_name(at, 3.0), "recording_2024-03-09T14-05-07_3s.wav");
    }

    #[test]
    fn metadata_derives_duration() {
        let metadata = ExportMetadata::new("clip.wav", 48000, 2, BitDepth::TwentyFour, 96000, "abc");
        assert_eq!(metadata.duration_secs, 2.0);
        assert!(!metadata.id.is_empty());

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"bit_depth\":24"));
        let parsed: ExportMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
    }
}
