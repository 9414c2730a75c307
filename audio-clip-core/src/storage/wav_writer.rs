use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::ClipError;
use crate::processing::wav_format;

/// Attempts at finding a free file name before giving up.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Writes encoded WAV byte streams into an output directory.
///
/// Files are never overwritten: when the requested name is taken, a numeric
/// suffix is appended (`clip.wav`, `clip-1.wav`, `clip-2.wav`, ...).
#[derive(Debug, Clone)]
pub struct WavFileWriter {
    output_directory: PathBuf,
}

impl WavFileWriter {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Write `wav` to a new file and return its path and SHA-256 checksum.
    pub fn write(&self, file_name: &str, wav: &[u8]) -> Result<(PathBuf, String), ClipError> {
        if wav.len() < wav_format::WAV_HEADER_SIZE || &wav[0..4] != b"RIFF" {
            return Err(ClipError::StorageError("refusing to write a non-WAV byte stream".into()));
        }

        fs::create_dir_all(&self.output_directory)
            .map_err(|e| ClipError::StorageError(format!("failed to create directory: {}", e)))?;

        let (path, mut file) = self.create_unique(file_name)?;
        file.write_all(wav)
            .map_err(|e| ClipError::StorageError(format!("write failed: {}", e)))?;
        file.flush().map_err(|e| ClipError::StorageError(e.to_string()))?;

        let checksum = sha256_hex(wav);
        log::info!("wrote {} bytes to {:?}", wav.len(), path);
        Ok((path, checksum))
    }

    fn create_unique(&self, file_name: &str) -> Result<(PathBuf, File), ClipError> {
        let requested = Path::new(file_name);
        let stem = requested
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ClipError::StorageError(format!("invalid file name: {:?}", file_name)))?;
        let extension = requested.extension().and_then(|e| e.to_str()).unwrap_or("wav");

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{}.{}", stem, extension)
            } else {
                format!("{}-{}.{}", stem, attempt, extension)
            };
            let path = self.output_directory.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(ClipError::StorageError(format!("failed to create file: {}", e))),
            }
        }
        Err(ClipError::StorageError(format!(
            "no free file name for {:?} in {:?}",
            file_name, self.output_directory
        )))
    }
}

/// SHA-256 hex digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex_encode(&Sha256::digest(data))
}

/// SHA-256 hex digest of a file on disk.
pub fn sha256_file(path: &Path) -> Result<String, ClipError> {
    let data =
        fs::read(path).map_err(|e| ClipError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    Ok(sha256_hex(&data))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
