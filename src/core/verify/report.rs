//! Verification report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of comparing two trees by content.
///
/// A failed comparison is a normal result, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationReport {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    /// Files scanned under the source root
    pub source_files: usize,
    /// Files scanned under the destination root
    pub destination_files: usize,
    /// Source files whose content is present in the destination
    pub verified: usize,
    /// Source paths whose content is absent from the destination
    pub missing_from_destination: Vec<PathBuf>,
    /// Destination paths whose content is absent from the source
    pub missing_from_source: Vec<PathBuf>,
}

impl VerificationReport {
    /// True when both trees hold exactly the same set of contents
    pub fn is_success(&self) -> bool {
        self.missing_from_destination.is_empty() && self.missing_from_source.is_empty()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return write!(
                f,
                "Verification passed: {}/{} files verified",
                self.verified, self.source_files
            );
        }

        writeln!(
            f,
            "Verification FAILED: {}/{} files verified",
            self.verified, self.source_files
        )?;

        if !self.missing_from_destination.is_empty() {
            writeln!(
                f,
                "Missing from destination {}:",
                self.destination_root.display()
            )?;
            for path in &self.missing_from_destination {
                writeln!(f, "  {}", path.display())?;
            }
        }

        if !self.missing_from_source.is_empty() {
            writeln!(f, "Missing from source {}:", self.source_root.display())?;
            for path in &self.missing_from_source {
                writeln!(f, "  {}", path.display())?;
            }
        }

        Ok(())
    }
}
