//! Destination path derivation.

use crate::core::metadata::Category;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Timestamp format used in file names
pub const FILE_NAME_TS_FORMAT: &str = "%Y-%m-%d|%H-%M-%S";

/// Folder format, one folder per month and category
const FOLDER_TS_FORMAT: &str = "%Y-%m";

/// Derives destination paths from capture metadata
pub struct DestinationPlanner;

impl DestinationPlanner {
    /// Relative destination for a file:
    /// `{YYYY-MM}_{cat}/{YYYY-MM-DD|HH-MM-SS}_{cat}_from_{label}{ext}`.
    ///
    /// `extension` includes the leading dot and is kept verbatim.
    pub fn relative_path(
        category: Category,
        timestamp: NaiveDateTime,
        label: &str,
        extension: &str,
    ) -> PathBuf {
        PathBuf::from(Self::folder_name(category, timestamp))
            .join(Self::file_name(category, timestamp, label, extension))
    }

    fn folder_name(category: Category, timestamp: NaiveDateTime) -> String {
        format!("{}_{}", timestamp.format(FOLDER_TS_FORMAT), category)
    }

    fn file_name(
        category: Category,
        timestamp: NaiveDateTime,
        label: &str,
        extension: &str,
    ) -> String {
        format!(
            "{}_{}_from_{}{}",
            timestamp.format(FILE_NAME_TS_FORMAT),
            category,
            label,
            extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn image_path_layout() {
        let path = DestinationPlanner::relative_path(
            Category::Image,
            ts(2023, 6, 15, 10, 30, 0),
            "camera",
            ".JPG",
        );
        assert_eq!(
            path,
            PathBuf::from("2023-06_img/2023-06-15|10-30-00_img_from_camera.JPG")
        );
    }

    #[test]
    fn video_path_layout() {
        let path = DestinationPlanner::relative_path(
            Category::Video,
            ts(2023, 6, 15, 10, 30, 0),
            "camera",
            ".mp4",
        );
        assert_eq!(
            path,
            PathBuf::from("2023-06_vid/2023-06-15|10-30-00_vid_from_camera.mp4")
        );
    }

    #[test]
    fn single_digit_fields_are_zero_padded() {
        let path = DestinationPlanner::relative_path(
            Category::Image,
            ts(2024, 1, 5, 7, 8, 9),
            "phone",
            ".bmp",
        );
        assert_eq!(
            path,
            PathBuf::from("2024-01_img/2024-01-05|07-08-09_img_from_phone.bmp")
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let t = ts(2022, 12, 31, 23, 59, 59);
        let a = DestinationPlanner::relative_path(Category::Video, t, "gopro", ".MP4");
        let b = DestinationPlanner::relative_path(Category::Video, t, "gopro", ".MP4");
        assert_eq!(a, b);
    }
}
