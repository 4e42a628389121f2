//! # Metadata Module
//!
//! Reads the capture timestamp embedded in a photo or video.
//!
//! ## Supported Formats
//! - Images: `.JPG`, `.jpg`, `.bmp` - EXIF `DateTime` field
//! - Videos: `.MP4`, `.mp4` - container `creation_time` tag via a [`VideoProbe`]
//!
//! Extensions are matched case-sensitively. Filesystem timestamps are never
//! used as a fallback: a file without embedded metadata is an error.

mod image;
mod video;

pub use image::{parse_exif_datetime, read_exif_datetime};
pub use video::{parse_creation_time, FfprobeProbe, VideoProbe};

use crate::error::MetadataError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image extensions, matched case-sensitively including the dot
pub const IMAGE_EXTENSIONS: &[&str] = &[".JPG", ".jpg", ".bmp"];

/// Video extensions, matched case-sensitively including the dot
pub const VIDEO_EXTENSIONS: &[&str] = &[".MP4", ".mp4"];

/// Logical kind of a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Image,
    Video,
}

impl Category {
    /// Short tag used in folder and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "img",
            Category::Video => "vid",
        }
    }

    /// Classify a dotted extension such as `.JPG`
    pub fn from_extension(extension: &str) -> Option<Self> {
        if IMAGE_EXTENSIONS.contains(&extension) {
            Some(Category::Image)
        } else if VIDEO_EXTENSIONS.contains(&extension) {
            Some(Category::Video)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category and capture time of one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureInfo {
    pub category: Category,
    pub timestamp: NaiveDateTime,
}

/// The dotted extension of `path`, or an empty string when it has none.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Determine the category of a file purely from its extension.
pub fn category_for(path: &Path) -> Result<Category, MetadataError> {
    let extension = dotted_extension(path);
    Category::from_extension(&extension).ok_or_else(|| MetadataError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension,
    })
}

/// Extracts category and capture time from media files.
pub struct MetadataExtractor {
    probe: Box<dyn VideoProbe>,
}

impl MetadataExtractor {
    /// Extractor that probes videos with `ffprobe`
    pub fn new() -> Self {
        Self::with_probe(Box::new(FfprobeProbe::new()))
    }

    /// Extractor with a custom video prober
    pub fn with_probe(probe: Box<dyn VideoProbe>) -> Self {
        Self { probe }
    }

    /// Read the category and capture timestamp of `path`.
    pub fn extract(&self, path: &Path) -> Result<CaptureInfo, MetadataError> {
        let category = category_for(path)?;
        let timestamp = match category {
            Category::Image => read_exif_datetime(path)?,
            Category::Video => self.video_timestamp(path)?,
        };
        Ok(CaptureInfo {
            category,
            timestamp,
        })
    }

    fn video_timestamp(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
        let raw = self
            .probe
            .creation_time(path)?
            .ok_or_else(|| MetadataError::MissingMetadata {
                path: path.to_path_buf(),
                reason: "no creation_time tag in container metadata".to_string(),
            })?;

        parse_creation_time(&raw).ok_or_else(|| MetadataError::MissingMetadata {
            path: path.to_path_buf(),
            reason: format!("unparseable creation_time {:?}", raw),
        })
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}
