//! EXIF `DateTime` extraction for still images.

use crate::error::MetadataError;
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF date format: "YYYY:MM:DD HH:MM:SS"
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Read the EXIF `DateTime` field of an image.
pub fn read_exif_datetime(path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| match e {
            exif::Error::Io(source) => MetadataError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => MetadataError::MissingMetadata {
                path: path.to_path_buf(),
                reason: format!("no readable EXIF block ({})", other),
            },
        })?;

    let missing = |reason: &str| MetadataError::MissingMetadata {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let field = exif
        .get_field(Tag::DateTime, In::PRIMARY)
        .ok_or_else(|| missing("no DateTime field"))?;

    let raw = match field.value {
        Value::Ascii(ref vec) => vec
            .first()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .ok_or_else(|| missing("DateTime field is empty"))?,
        _ => return Err(missing("DateTime field is not text")),
    };

    parse_exif_datetime(raw).ok_or_else(|| MetadataError::MissingMetadata {
        path: path.to_path_buf(),
        reason: format!("unparseable DateTime {:?}", raw),
    })
}

/// Parse an EXIF date-time string, tolerating trailing NULs and padding.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Minimal JPEG: SOI, an APP1 segment holding a big-endian TIFF block with
    /// a single IFD0 `DateTime` entry, then EOI.
    fn jpeg_with_datetime(datetime: &str) -> Vec<u8> {
        let mut value = datetime.as_bytes().to_vec();
        value.push(0);

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2a");
        tiff.extend_from_slice(&8u32.to_be_bytes());
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0132u16.to_be_bytes());
        tiff.extend_from_slice(&2u16.to_be_bytes());
        tiff.extend_from_slice(&(value.len() as u32).to_be_bytes());
        tiff.extend_from_slice(&26u32.to_be_bytes());
        tiff.extend_from_slice(&0u32.to_be_bytes());
        tiff.extend_from_slice(&value);

        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend_from_slice(&tiff);

        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
        jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        jpeg.extend_from_slice(&app1);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        jpeg
    }

    fn temp_file_with(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn reads_datetime_from_jpeg() {
        let file = temp_file_with(&jpeg_with_datetime("2023:06:15 10:30:00"));
        let ts = read_exif_datetime(file.path()).unwrap();
        assert_eq!(ts.to_string(), "2023-06-15 10:30:00");
    }

    #[test]
    fn jpeg_without_exif_is_missing_metadata() {
        let file = temp_file_with(&[0xFF, 0xD8, 0xFF, 0xD9]);
        let err = read_exif_datetime(file.path()).unwrap_err();
        assert!(matches!(err, MetadataError::MissingMetadata { .. }));
    }

    #[test]
    fn non_image_bytes_are_missing_metadata() {
        let file = temp_file_with(b"BM not really a bitmap");
        let err = read_exif_datetime(file.path()).unwrap_err();
        assert!(matches!(err, MetadataError::MissingMetadata { .. }));
    }

    #[test]
    fn garbled_datetime_is_missing_metadata() {
        let file = temp_file_with(&jpeg_with_datetime("2023:13:45 99:99:99"));
        let err = read_exif_datetime(file.path()).unwrap_err();
        assert!(err.to_string().contains("unparseable"));
    }

    #[test]
    fn nonexistent_file_is_io_error() {
        let err = read_exif_datetime(Path::new("/nonexistent/IMG_0001.JPG")).unwrap_err();
        assert!(matches!(err, MetadataError::Io { .. }));
    }

    #[test]
    fn parse_tolerates_trailing_nul() {
        assert!(parse_exif_datetime("2024:01:15 14:30:00\0").is_some());
        assert!(parse_exif_datetime("2024-01-15 14:30:00").is_none());
    }
}
