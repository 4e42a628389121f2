//! Container `creation_time` extraction for videos.

use crate::error::MetadataError;
use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

/// Source of a video's raw `creation_time` tag.
pub trait VideoProbe: Send + Sync {
    /// The tag value as stored in the container, or `None` when absent.
    fn creation_time(&self, path: &Path) -> Result<Option<String>, MetadataError>;
}

/// Probes containers with the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: String,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    tags: Option<HashMap<String, String>>,
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self::with_program("ffprobe")
    }

    /// Use a specific ffprobe binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoProbe for FfprobeProbe {
    fn creation_time(&self, path: &Path) -> Result<Option<String>, MetadataError> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .map_err(|e| MetadataError::ProbeFailed {
                path: path.to_path_buf(),
                reason: format!("could not run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(MetadataError::ProbeFailed {
                path: path.to_path_buf(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        creation_time_from_json(&output.stdout).map_err(|e| MetadataError::ProbeFailed {
            path: path.to_path_buf(),
            reason: format!("unreadable ffprobe output: {}", e),
        })
    }
}

fn creation_time_from_json(json: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let probe: FfprobeOutput = serde_json::from_slice(json)?;
    Ok(probe
        .format
        .and_then(|f| f.tags)
        .and_then(|mut tags| tags.remove("creation_time")))
}

/// Parse a container `creation_time` tag.
///
/// A trailing `Z` is dropped and the rest read as a naive ISO-8601 date-time.
/// Fractional seconds are truncated. An explicit numeric offset is discarded
/// and the wall-clock time as written is kept.
pub fn parse_creation_time(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%:z")
                .ok()
                .map(|dt| dt.naive_local())
        })?;

    naive.with_nanosecond(0)
}
