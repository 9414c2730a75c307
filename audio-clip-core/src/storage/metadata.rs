use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::ClipError;
use crate::models::export_result::ExportMetadata;

/// Sidecar path for an exported clip: `clip.wav` → `clip.metadata.json`.
pub fn metadata_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("metadata.json")
}

/// Write export metadata as a JSON sidecar file.
pub fn write_metadata(metadata: &ExportMetadata, recording_path: &Path) -> Result<PathBuf, ClipError> {
    let path = metadata_path(recording_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| ClipError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| ClipError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read export metadata from a JSON sidecar file.
pub fn read_metadata(recording_path: &Path) -> Result<ExportMetadata, ClipError> {
    let json = fs::read_to_string(metadata_path(recording_path))
        .map_err(|e| ClipError::StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: ExportMetadata = serde_json::from_str(&json)
        .map_err(|e| ClipError::StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_models::BitDepth;

    #[test]
    fn sidecar_sits_next_to_recording() {
        let path = Path::new("/tmp/exports/recording_1.5s.wav");
        assert_eq!(metadata_path(path), PathBuf::from("/tmp/exports/recording_1.5s.metadata.json"));
    }

    #[test]
    fn write_then_read() {
        let dir = std::env::temp_dir().join(format!("audio_clip_meta_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let recording = dir.join("clip.wav");
        let metadata = ExportMetadata::new(&recording.to_string_lossy(), 44100, 1, BitDepth::Sixteen, 44100, "00ff");

        let sidecar = write_metadata(&metadata, &recording).unwrap();
        assert_eq!(sidecar, dir.join("clip.metadata.json"));
        assert_eq!(read_metadata(&recording).unwrap(), metadata);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_sidecar_is_storage_error() {
        let result = read_metadata(Path::new("/nonexistent/clip.wav"));
        assert!(matches!(result, Err(ClipError::StorageError(_))));
    }
}
