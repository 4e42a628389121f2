//! # Capture Sort
//!
//! Copies a flat folder of photos and videos into a tree organised by capture
//! time, then proves the copy is complete by comparing content hashes.
//!
//! ## Core Philosophy
//! - **Never touch the source** - files are copied, never moved or deleted
//! - **Never overwrite** - name collisions get a numbered suffix
//! - **Trust but verify** - every run ends with a content comparison
//!
//! ## Architecture
//! - `core` - Metadata extraction, path derivation, copying, verification
//! - `events` - Progress reporting through channels
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{RenamerError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
