//! # Error Module
//!
//! Error types for the capture-time renamer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - every error names the file or directory involved
//! - **Fail loudly** - a file without a usable timestamp stops the run
//!
//! Verification differences are not errors. They are reported through
//! [`crate::core::verify::VerificationReport`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum RenamerError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("Destination already exists and was not cleared: {path}")]
    DestinationConflict { path: PathBuf },

    #[error("Source {source_dir} and destination {destination} overlap")]
    OverlappingRoots {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    #[error("Invalid label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while listing the source directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while reading a capture timestamp
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("\"{extension}\" is not an accepted file extension: {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("No capture timestamp in {path}: {reason}")]
    MissingMetadata { path: PathBuf, reason: String },

    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to probe video {path}: {reason}")]
    ProbeFailed { path: PathBuf, reason: String },
}

/// Errors while copying a file into the destination tree
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ran out of numbered names for {path}")]
    NamesExhausted { path: PathBuf },
}

/// Errors while hashing a tree for verification
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two files in the same tree hashed to the same digest.
    #[error("Duplicate content hash {hash}: {first} and {second}")]
    DuplicateContentHash {
        hash: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, RenamerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_extension() {
        let error = MetadataError::UnsupportedFormat {
            path: PathBuf::from("/photos/notes.txt"),
            extension: ".txt".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("\".txt\""));
        assert!(message.contains("/photos/notes.txt"));
    }

    #[test]
    fn duplicate_hash_names_both_files() {
        let error = VerifyError::DuplicateContentHash {
            hash: "abc".to_string(),
            first: PathBuf::from("/dest/a.jpg"),
            second: PathBuf::from("/dest/b.jpg"),
        };
        let message = error.to_string();
        assert!(message.contains("/dest/a.jpg"));
        assert!(message.contains("/dest/b.jpg"));
    }

    #[test]
    fn metadata_error_converts_to_top_level() {
        let error: RenamerError = MetadataError::MissingMetadata {
            path: PathBuf::from("/photos/IMG_0001.JPG"),
            reason: "no DateTime field".to_string(),
        }
        .into();
        assert!(matches!(error, RenamerError::Metadata(_)));
        assert!(error.to_string().contains("no DateTime field"));
    }
}
