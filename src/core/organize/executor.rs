//! Collision-safe copying into the destination tree.

use super::types::CopyRecord;
use crate::error::CopyError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Copies files into the destination tree without ever overwriting
pub struct CopyExecutor;

impl CopyExecutor {
    /// Copy `source` to `destination_root/relative_path`.
    ///
    /// Missing parent directories are created. When the target name is taken,
    /// `_2`, `_3`, ... is appended to the file stem until a free name is found.
    /// Modification time and permissions are carried over.
    pub fn copy(
        source: &Path,
        destination_root: &Path,
        relative_path: &Path,
    ) -> Result<CopyRecord, CopyError> {
        let target = destination_root.join(relative_path);

        let mut reader = File::open(source).map_err(|e| Self::copy_error(source, &target, e))?;
        let metadata = reader
            .metadata()
            .map_err(|e| Self::copy_error(source, &target, e))?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| CopyError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let (destination, suffix, writer) = Self::create_unique(source, &target)?;

        // A half-finished copy must not occupy the name on the next run
        let written = match Self::fill(&mut reader, writer, &metadata, &destination) {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&destination);
                return Err(Self::copy_error(source, &destination, e));
            }
        };

        debug!(
            from = %source.display(),
            to = %destination.display(),
            bytes = written,
            "copied"
        );

        Ok(CopyRecord {
            source: source.to_path_buf(),
            destination,
            suffix,
            size_bytes: written,
        })
    }

    /// Write the content, then carry over mtime and permissions.
    ///
    /// The writer is closed on return, error or not.
    fn fill(
        reader: &mut File,
        mut writer: File,
        metadata: &fs::Metadata,
        destination: &Path,
    ) -> io::Result<u64> {
        let written = io::copy(reader, &mut writer)?;

        if let Ok(modified) = metadata.modified() {
            if let Err(e) = writer.set_modified(modified) {
                warn!(path = %destination.display(), "could not preserve mtime: {}", e);
            }
        }
        writer.set_permissions(metadata.permissions())?;
        Ok(written)
    }

    /// Open the first free name for `target`, creating it atomically.
    fn create_unique(
        source: &Path,
        target: &Path,
    ) -> Result<(PathBuf, Option<u64>, File), CopyError> {
        let mut suffix: Option<u64> = None;

        loop {
            let candidate = match suffix {
                None => target.to_path_buf(),
                Some(n) => numbered_path(target, n),
            };

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => {
                    if suffix.is_some() {
                        debug!(
                            taken = %target.display(),
                            chosen = %candidate.display(),
                            "name collision resolved"
                        );
                    }
                    return Ok((candidate, suffix, file));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    suffix = Some(match suffix {
                        None => 2,
                        Some(n) => n.checked_add(1).ok_or_else(|| CopyError::NamesExhausted {
                            path: target.to_path_buf(),
                        })?,
                    });
                }
                Err(e) => return Err(Self::copy_error(source, &candidate, e)),
            }
        }
    }

    fn copy_error(from: &Path, to: &Path, source: io::Error) -> CopyError {
        CopyError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }
}

/// `dir/stem.ext` becomes `dir/stem_{n}.ext`
fn numbered_path(path: &Path, n: u64) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
