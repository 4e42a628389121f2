//! Pipeline execution implementation.

use super::destination::ensure_disjoint;
use crate::core::metadata::{dotted_extension, FfprobeProbe, MetadataExtractor, VideoProbe};
use crate::core::organize::{CopyExecutor, CopyRecord, DestinationPlanner, PlannedCopy};
use crate::core::verify::{verify_with_events, VerificationReport};
use crate::error::{RenamerError, Result, ScanError};
use crate::events::{
    null_sender, CopyEvent, CopyProgress, Event, EventSender, PipelineEvent, PipelinePhase,
    PipelineSummary,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Label used when none is given
pub const DEFAULT_LABEL: &str = "camera";

/// Result of a full run
#[derive(Debug)]
pub struct PipelineResult {
    /// One record per copied file, in processing order
    pub copies: Vec<CopyRecord>,
    /// Content comparison of source and destination
    pub report: VerificationReport,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn files_renamed(&self) -> usize {
        self.copies.iter().filter(|c| c.was_renamed()).count()
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Flat directory of media files
    pub source: PathBuf,
    /// Root of the dated tree
    pub destination: PathBuf,
    /// Free-text device label embedded in file names
    pub label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    probe: Option<Box<dyn VideoProbe>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            probe: None,
        }
    }

    /// Directory to read media from (one level, not recursive)
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source = source.into();
        self
    }

    /// Directory to build the dated tree in
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.config.destination = destination.into();
        self
    }

    /// Device label embedded in every file name
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    /// Set the video metadata prober
    pub fn probe(mut self, probe: Box<dyn VideoProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> RenamePipeline {
        let probe = self
            .probe
            .unwrap_or_else(|| Box::new(FfprobeProbe::new()));
        RenamePipeline {
            config: self.config,
            extractor: MetadataExtractor::with_probe(probe),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract, rename, copy, then verify.
///
/// The first file that cannot be classified or dated aborts the whole run.
pub struct RenamePipeline {
    config: PipelineConfig,
    extractor: MetadataExtractor,
}

impl RenamePipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Derive every destination path without copying anything.
    ///
    /// Collision suffixes are not predicted; they depend on what is on disk
    /// when the copy happens.
    pub fn plan(&self) -> Result<Vec<PlannedCopy>> {
        validate_label(&self.config.label)?;
        list_source_entries(&self.config.source)?
            .iter()
            .map(|path| self.plan_file(path))
            .collect()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult> {
        events.send(Event::Pipeline(PipelineEvent::Started));

        let result = self.execute(events);
        match &result {
            Ok(result) => {
                events.send(Event::Pipeline(PipelineEvent::Completed {
                    summary: PipelineSummary {
                        files_copied: result.copies.len(),
                        files_renamed: result.files_renamed(),
                        verified: result.report.is_success(),
                        duration_ms: result.duration_ms,
                    },
                }));
            }
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
            }
        }
        result
    }

    fn execute(&self, events: &EventSender) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let config = &self.config;

        validate_label(&config.label)?;
        ensure_disjoint(&config.source, &config.destination)?;
        let entries = list_source_entries(&config.source)?;

        fs::create_dir_all(&config.destination).map_err(|source| RenamerError::Io {
            path: config.destination.clone(),
            source,
        })?;

        // Phase 1: Copying
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Copying,
        }));
        events.send(Event::Copy(CopyEvent::Started {
            total_files: entries.len(),
        }));
        info!(
            source = %config.source.display(),
            destination = %config.destination.display(),
            files = entries.len(),
            "copying"
        );

        let mut copies = Vec::with_capacity(entries.len());
        for (i, path) in entries.iter().enumerate() {
            let planned = self.plan_file(path)?;
            let record =
                CopyExecutor::copy(path, &config.destination, &planned.relative_path)?;

            events.send(Event::Copy(CopyEvent::FileCopied {
                source: record.source.clone(),
                destination: record.destination.clone(),
                renamed: record.was_renamed(),
            }));
            events.send(Event::Copy(CopyEvent::Progress(CopyProgress {
                completed: i + 1,
                total: entries.len(),
                current_path: path.clone(),
            })));

            copies.push(record);
        }

        events.send(Event::Copy(CopyEvent::Completed {
            total_copied: copies.len(),
        }));

        // Phase 2: Verifying
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Verifying,
        }));

        let report = verify_with_events(&config.source, &config.destination, events)?;

        Ok(PipelineResult {
            copies,
            report,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn plan_file(&self, path: &Path) -> Result<PlannedCopy> {
        let info = self.extractor.extract(path)?;
        let relative_path = DestinationPlanner::relative_path(
            info.category,
            info.timestamp,
            &self.config.label,
            &dotted_extension(path),
        );
        debug!(
            source = %path.display(),
            relative = %relative_path.display(),
            "planned"
        );
        Ok(PlannedCopy {
            source: path.to_path_buf(),
            category: info.category,
            timestamp: info.timestamp,
            relative_path,
        })
    }
}

/// Direct entries of `source`, sorted by file name.
fn list_source_entries(source: &Path) -> std::result::Result<Vec<PathBuf>, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: source.to_path_buf(),
        });
    }

    let read_error = |e: std::io::Error| ScanError::ReadDirectory {
        path: source.to_path_buf(),
        source: e,
    };

    let mut entries = fs::read_dir(source)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_error)?;
    entries.sort();
    Ok(entries)
}

/// Labels end up inside a single file name.
fn validate_label(label: &str) -> Result<()> {
    let invalid = |reason: &str| RenamerError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    };

    if label.is_empty() {
        return Err(invalid("label is empty"));
    }
    if label.contains(['/', '\\']) {
        return Err(invalid("label contains a path separator"));
    }
    if label.contains('\0') {
        return Err(invalid("label contains a NUL byte"));
    }
    Ok(())
}
