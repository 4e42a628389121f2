//! # Verify Module
//!
//! Confirms a copy by content rather than by path.
//!
//! Both trees are hashed file by file (BLAKE3 over the full bytes) and the two
//! sets of digests are compared. A file that was renamed or moved but kept
//! its bytes counts as present in both trees.

mod index;
mod report;

pub use index::{hash_file, HashIndex};
pub use report::VerificationReport;

use crate::error::VerifyError;
use crate::events::{null_sender, Event, EventSender, VerifyEvent};
use std::path::Path;
use tracing::{info, warn};

/// Compare `source_root` and `destination_root` by content.
pub fn verify(
    source_root: &Path,
    destination_root: &Path,
) -> Result<VerificationReport, VerifyError> {
    verify_with_events(source_root, destination_root, &null_sender())
}

/// Compare two trees by content, reporting hashing progress.
pub fn verify_with_events(
    source_root: &Path,
    destination_root: &Path,
    events: &EventSender,
) -> Result<VerificationReport, VerifyError> {
    let source = HashIndex::build(source_root, events)?;
    let destination = HashIndex::build(destination_root, events)?;

    let missing_from_destination = source.missing_from(&destination);
    let missing_from_source = destination.missing_from(&source);

    let report = VerificationReport {
        source_root: source_root.to_path_buf(),
        destination_root: destination_root.to_path_buf(),
        source_files: source.len(),
        destination_files: destination.len(),
        verified: source.len() - missing_from_destination.len(),
        missing_from_destination,
        missing_from_source,
    };

    if report.is_success() {
        info!(
            verified = report.verified,
            total = report.source_files,
            "verification passed"
        );
    } else {
        warn!(
            missing_from_destination = report.missing_from_destination.len(),
            missing_from_source = report.missing_from_source.len(),
            "verification failed"
        );
    }

    events.send(Event::Verify(VerifyEvent::Completed {
        verified: report.verified,
        total: report.source_files,
        passed: report.is_success(),
    }));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventChannel;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn identical_content_under_new_names_passes() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(src.path(), "IMG_0001.JPG", b"one");
        write(src.path(), "IMG_0002.JPG", b"two");
        write(dest.path(), "2023-06_img/first.JPG", b"one");
        write(dest.path(), "2023-07_img/second.JPG", b"two");

        let report = verify(src.path(), dest.path()).unwrap();
        assert!(report.is_success());
        assert_eq!(report.verified, 2);
        assert_eq!(report.source_files, 2);
    }

    #[test]
    fn tampered_copy_fails_both_ways() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(src.path(), "IMG_0001.JPG", b"original");
        write(src.path(), "IMG_0002.JPG", b"untouched");
        write(dest.path(), "2023-06_img/a.JPG", b"originaX");
        write(dest.path(), "2023-06_img/b.JPG", b"untouched");

        let report = verify(src.path(), dest.path()).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.verified, 1);
        assert_eq!(
            report.missing_from_destination,
            vec![src.path().join("IMG_0001.JPG")]
        );
        assert_eq!(
            report.missing_from_source,
            vec![dest.path().join("2023-06_img/a.JPG")]
        );
    }

    #[test]
    fn extra_destination_file_is_reported() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(src.path(), "a.jpg", b"a");
        write(dest.path(), "x/a.jpg", b"a");
        write(dest.path(), "x/stray.jpg", b"stray");

        let report = verify(src.path(), dest.path()).unwrap();
        assert!(!report.is_success());
        assert!(report.missing_from_destination.is_empty());
        assert_eq!(report.missing_from_source.len(), 1);
    }

    #[test]
    fn duplicate_in_destination_is_an_error() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(src.path(), "a.jpg", b"a");
        write(dest.path(), "x/a.jpg", b"a");
        write(dest.path(), "x/a_2.jpg", b"a");

        let err = verify(src.path(), dest.path()).unwrap_err();
        assert!(matches!(err, VerifyError::DuplicateContentHash { .. }));
    }

    #[test]
    fn completion_event_is_sent() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(src.path(), "a.jpg", b"a");
        write(dest.path(), "x/a.jpg", b"a");

        let (sender, receiver) = EventChannel::new();
        verify_with_events(src.path(), dest.path(), &sender).unwrap();

        let completed = receiver.drain().into_iter().any(|e| {
            matches!(
                e,
                Event::Verify(VerifyEvent::Completed {
                    verified: 1,
                    total: 1,
                    passed: true
                })
            )
        });
        assert!(completed);
    }
}
