//! Artifact reader: the only place the engine touches artifact files.

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::utils::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Path does not exist. Expected, not an error.
    Missing,
    Text(String),
    /// The first `max_bytes` of a longer file.
    Truncated(String),
    /// Present but could not be read or decoded.
    Unreadable(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ArtifactReader {
    max_bytes: u64,
}

impl ArtifactReader {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Reads at most `max_bytes` of UTF-8 text, as `Truncated` when the file
    /// is longer. Never fails; I/O and decode problems come back as
    /// `Unreadable` and are logged.
    pub fn read(&self, path: &Path) -> Artifact {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Artifact::Missing,
            Err(e) => return unreadable(path, e.to_string()),
        };

        // one byte past the limit tells a longer file from one exactly at it
        let mut buf = Vec::new();
        if let Err(e) = file.take(self.max_bytes.saturating_add(1)).read_to_end(&mut buf) {
            return unreadable(path, e.to_string());
        }

        let truncated = buf.len() as u64 > self.max_bytes;
        if truncated {
            buf.truncate(self.max_bytes as usize);
            tracing::debug!(path = %path.display(), limit = self.max_bytes, "artifact truncated");
        }

        let text = match String::from_utf8(buf) {
            Ok(text) => text,
            // cut inside a multi-byte character at the limit
            Err(e) if truncated && e.utf8_error().error_len().is_none() => {
                let valid = e.utf8_error().valid_up_to();
                let mut bytes = e.into_bytes();
                bytes.truncate(valid);
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Err(e) => return unreadable(path, format!("not valid UTF-8: {}", e)),
        };

        if truncated { Artifact::Truncated(text) } else { Artifact::Text(text) }
    }
}

fn unreadable(path: &Path, reason: String) -> Artifact {
    tracing::warn!(path = %path.display(), %reason, "unreadable artifact");
    Artifact::Unreadable(reason)
}

/// `Ok(false)` when `path` is absent or not a directory. Any other failure to
/// stat it is a host-level problem and propagates.
pub fn probe_dir(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Child directories of `dir`, sorted by name, minus `ignored`.
pub fn device_dirs(dir: &Path, ignored: &[&str]) -> Result<Vec<(String, PathBuf)>> {
    let mut devices: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .flatten()
        .filter(|e| e.path().is_dir())
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .filter(|(name, _)| !ignored.contains(&name.as_str()))
        .collect();

    devices.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(devices)
}
