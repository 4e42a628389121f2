//! # Pipeline Module
//!
//! Orchestrates a full run.
//!
//! ## Pipeline Stages
//! 1. **Extract** - Read category and capture time of each source entry
//! 2. **Derive** - Compute the dated relative destination path
//! 3. **Copy** - Copy into the destination, numbering on collision
//! 4. **Verify** - Compare source and destination by content hash
//!
//! Processing is sequential and stops at the first file that fails.

mod destination;
mod executor;

pub use destination::prepare_destination;
pub use executor::{
    PipelineBuilder, PipelineConfig, PipelineResult, RenamePipeline, DEFAULT_LABEL,
};
