//! # Core Module
//!
//! The front-end agnostic rename-and-verify engine.
//!
//! ## Modules
//! - `metadata` - Reads capture timestamps from images and videos
//! - `organize` - Derives destination paths and copies files
//! - `verify` - Compares two trees by content hash
//! - `pipeline` - Orchestrates the full workflow

pub mod metadata;
pub mod organize;
pub mod pipeline;
pub mod verify;

// Re-export commonly used types
pub use metadata::{CaptureInfo, Category, MetadataExtractor};
pub use organize::{CopyRecord, DestinationPlanner};
pub use pipeline::{PipelineResult, RenamePipeline};
pub use verify::VerificationReport;
