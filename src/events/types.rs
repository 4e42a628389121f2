//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the rename pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Copy phase events
    Copy(CopyEvent),
    /// Verification phase events
    Verify(VerifyEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the copy phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CopyEvent {
    /// Copying has started
    Started { total_files: usize },
    /// Progress update during copying
    Progress(CopyProgress),
    /// A file landed in the destination tree
    FileCopied {
        source: PathBuf,
        destination: PathBuf,
        /// True when a numbered suffix was needed to avoid a collision
        renamed: bool,
    },
    /// Copying completed
    Completed { total_copied: usize },
}

/// Progress information during copying
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyProgress {
    pub completed: usize,
    pub total: usize,
    pub current_path: PathBuf,
}

/// Events during verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerifyEvent {
    /// Hashing of one tree has started
    Started { root: PathBuf, total_files: usize },
    /// A file was hashed
    Progress(HashProgress),
    /// Both trees were compared
    Completed {
        verified: usize,
        total: usize,
        passed: bool,
    },
}

/// Progress information while hashing a tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    pub completed: usize,
    pub total: usize,
    pub current_path: PathBuf,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline finished (verification may still have failed)
    Completed { summary: PipelineSummary },
    /// Pipeline aborted on a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Copying,
    Verifying,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Files copied into the destination
    pub files_copied: usize,
    /// Copies that needed a numbered suffix
    pub files_renamed: usize,
    /// Whether the destination matched the source by content
    pub verified: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Copying => write!(f, "Copying"),
            PipelinePhase::Verifying => write!(f, "Verifying"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Copy(CopyEvent::FileCopied {
            source: PathBuf::from("/src/IMG_0001.JPG"),
            destination: PathBuf::from("/dest/2023-06_img/x.JPG"),
            renamed: true,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Copy(CopyEvent::FileCopied { renamed, .. }) => assert!(renamed),
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn phase_display() {
        assert_eq!(PipelinePhase::Copying.to_string(), "Copying");
        assert_eq!(PipelinePhase::Verifying.to_string(), "Verifying");
    }
}
