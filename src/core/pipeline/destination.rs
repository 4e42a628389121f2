//! Destination precondition: the run starts against an absent or fresh root.

use crate::error::{RenamerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Make sure `destination` does not exist before a run.
///
/// When it exists, `confirm_delete` is asked whether to remove it. A refusal
/// is [`RenamerError::DestinationConflict`]. A destination nested with the
/// source in either direction is refused without asking.
pub fn prepare_destination<F>(source: &Path, destination: &Path, confirm_delete: F) -> Result<()>
where
    F: FnOnce(&Path) -> bool,
{
    ensure_disjoint(source, destination)?;

    if !destination.exists() {
        return Ok(());
    }

    if !confirm_delete(destination) {
        return Err(RenamerError::DestinationConflict {
            path: destination.to_path_buf(),
        });
    }

    let removed = if destination.is_dir() {
        fs::remove_dir_all(destination)
    } else {
        fs::remove_file(destination)
    };
    removed.map_err(|source| RenamerError::Io {
        path: destination.to_path_buf(),
        source,
    })?;

    info!(path = %destination.display(), "removed existing destination");
    Ok(())
}

/// Refuse roots where one is the other or lives below it.
///
/// The verifier walks both trees recursively, so a destination inside the
/// source would be hashed as part of the source.
pub(crate) fn ensure_disjoint(source: &Path, destination: &Path) -> Result<()> {
    let (Some(source_real), Some(destination_real)) = (resolve(source), resolve(destination))
    else {
        return Ok(());
    };

    if destination_real.starts_with(&source_real) || source_real.starts_with(&destination_real) {
        return Err(RenamerError::OverlappingRoots {
            source_dir: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonical form of `path`, which need not exist yet.
///
/// The nearest existing ancestor is canonicalized and the missing tail
/// re-attached.
fn resolve(path: &Path) -> Option<PathBuf> {
    let mut tail = Vec::new();
    let mut current = path;

    loop {
        if let Ok(real) = current.canonicalize() {
            return Some(tail.iter().rev().fold(real, |acc, part| acc.join(part)));
        }
        tail.push(current.file_name()?);
        current = match current.parent()? {
            parent if parent.as_os_str().is_empty() => Path::new("."),
            parent => parent,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_destination_needs_no_prompt() {
        let src = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out");
        let mut asked = false;

        prepare_destination(src.path(), &dest, |_| {
            asked = true;
            true
        })
        .unwrap();

        assert!(!asked);
    }

    #[test]
    fn declined_prompt_is_conflict() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(dest.path().join("keep.jpg"), b"keep").unwrap();

        let err = prepare_destination(src.path(), dest.path(), |_| false).unwrap_err();

        assert!(matches!(err, RenamerError::DestinationConflict { .. }));
        assert!(dest.path().join("keep.jpg").exists());
    }

    #[test]
    fn confirmed_prompt_clears_destination() {
        let src = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out");
        fs::create_dir_all(dest.join("2023-06_img")).unwrap();
        fs::write(dest.join("2023-06_img/old.jpg"), b"old").unwrap();

        prepare_destination(src.path(), &dest, |_| true).unwrap();

        assert!(!dest.exists());
    }

    #[test]
    fn destination_above_source_is_refused() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("photos");
        fs::create_dir_all(&src).unwrap();

        let err = prepare_destination(&src, temp.path(), |_| true).unwrap_err();

        assert!(matches!(err, RenamerError::OverlappingRoots { .. }));
        assert!(src.exists());
    }

    #[test]
    fn destination_inside_source_is_refused() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("clip.mp4"), b"clip").unwrap();
        let mut asked = false;

        // Not created yet: the nearest existing ancestor decides
        let err = prepare_destination(src.path(), &src.path().join("sorted/2023"), |_| {
            asked = true;
            true
        })
        .unwrap_err();

        assert!(matches!(err, RenamerError::OverlappingRoots { .. }));
        assert!(!asked);
        assert!(!src.path().join("sorted").exists());
    }

    #[test]
    fn destination_equal_to_source_is_refused() {
        let src = TempDir::new().unwrap();
        let err = ensure_disjoint(src.path(), &src.path().join(".")).unwrap_err();
        assert!(matches!(err, RenamerError::OverlappingRoots { .. }));
    }

    #[test]
    fn sibling_directories_are_disjoint() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("photos");
        fs::create_dir_all(&src).unwrap();

        // A shared name prefix is not nesting
        assert!(ensure_disjoint(&src, &temp.path().join("photos-sorted")).is_ok());
    }
}
