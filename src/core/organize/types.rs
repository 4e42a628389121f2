//! Types for the organize module.

use crate::core::metadata::Category;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source file and the destination path derived for it, before any
/// collision resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedCopy {
    pub source: PathBuf,
    pub category: Category,
    pub timestamp: NaiveDateTime,
    /// Relative to the destination root
    pub relative_path: PathBuf,
}

/// Where a file actually landed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Numbered suffix used to avoid a collision (2, 3, ...), if any
    pub suffix: Option<u64>,
    pub size_bytes: u64,
}

impl CopyRecord {
    pub fn was_renamed(&self) -> bool {
        self.suffix.is_some()
    }
}
