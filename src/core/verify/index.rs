//! Content hash index of a directory tree.

use crate::error::VerifyError;
use crate::events::{Event, EventSender, HashProgress, VerifyEvent};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BUFFER_SIZE: usize = 1024 * 1024;

/// BLAKE3 digest of a file's full content, as lowercase hex.
pub fn hash_file(path: &Path) -> Result<String, VerifyError> {
    let read_error = |source: std::io::Error| VerifyError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_error)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Mapping from content hash to the single file holding that content.
///
/// Every file under the root has a distinct hash, so `len()` equals the
/// number of files scanned.
#[derive(Debug, Clone)]
pub struct HashIndex {
    root: PathBuf,
    entries: BTreeMap<String, PathBuf>,
}

impl HashIndex {
    /// Hash every regular file under `root`.
    ///
    /// Fails with [`VerifyError::DuplicateContentHash`] if two files share
    /// a digest.
    pub fn build(root: &Path, events: &EventSender) -> Result<Self, VerifyError> {
        let files = list_files(root)?;
        let total = files.len();

        events.send(Event::Verify(VerifyEvent::Started {
            root: root.to_path_buf(),
            total_files: total,
        }));

        let mut entries: BTreeMap<String, PathBuf> = BTreeMap::new();
        for (i, path) in files.into_iter().enumerate() {
            let hash = hash_file(&path)?;

            events.send(Event::Verify(VerifyEvent::Progress(HashProgress {
                completed: i + 1,
                total,
                current_path: path.clone(),
            })));

            if let Some(first) = entries.get(&hash) {
                return Err(VerifyError::DuplicateContentHash {
                    hash,
                    first: first.clone(),
                    second: path,
                });
            }
            entries.insert(hash, path);
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.entries.contains_key(hash)
    }

    /// Path holding the content with this hash
    pub fn path_for(&self, hash: &str) -> Option<&Path> {
        self.entries.get(hash).map(PathBuf::as_path)
    }

    /// Paths whose content is absent from `other`, in hash order
    pub fn missing_from(&self, other: &HashIndex) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|(hash, _)| !other.contains(hash))
            .map(|(_, path)| path.clone())
            .collect()
    }
}

/// Regular files under `root`, recursively, sorted by path.
///
/// Symlinks are not followed into directories; a symlink to a file counts
/// as a file.
fn list_files(root: &Path) -> Result<Vec<PathBuf>, VerifyError> {
    if !root.is_dir() {
        return Err(VerifyError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| VerifyError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            reason: e.to_string(),
        })?;

        let file_type = entry.file_type();
        let is_file = file_type.is_file()
            || (file_type.is_symlink()
                && fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false));

        if is_file {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
