//! Report Records - Typed Section Data
//!
//! Every field is an opaque string. Dates, hashes and sizes are printed as given.

use serde::{Deserialize, Serialize};

/// Case details shown in the first section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    pub case_number: String,
    pub investigator: String,
    pub date: String,
    pub description: String,
}

impl CaseInfo {
    /// Label/value rows in display order
    pub fn rows(&self) -> Vec<[&str; 2]> {
        vec![
            ["Case Number:", self.case_number.as_str()],
            ["Investigator:", self.investigator.as_str()],
            ["Date:", self.date.as_str()],
            ["Description:", self.description.as_str()],
        ]
    }
}

/// Disk image acquisition details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub image_type: String,
    pub image_hash: String,
    pub acquisition_date: String,
    pub device_model: String,
    pub total_capacity: String,
}

impl ImageInfo {
    pub fn rows(&self) -> Vec<[&str; 2]> {
        vec![
            ["Image Type:", self.image_type.as_str()],
            ["Image Hash:", self.image_hash.as_str()],
            ["Acquisition Date:", self.acquisition_date.as_str()],
            ["Device Model:", self.device_model.as_str()],
            ["Total Capacity:", self.total_capacity.as_str()],
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemInfo {
    pub fs_type: String,
    pub volume_label: String,
    pub created_date: String,
    pub last_mounted: String,
}

impl FileSystemInfo {
    pub fn rows(&self) -> Vec<[&str; 2]> {
        vec![
            ["File System Type:", self.fs_type.as_str()],
            ["Volume Label:", self.volume_label.as_str()],
            ["Created Date:", self.created_date.as_str()],
            ["Last Mounted:", self.last_mounted.as_str()],
        ]
    }
}

/// One timeline row. Position in the list is the presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: String,
    pub event: String,
}

impl TimelineEntry {
    pub fn new(timestamp: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            event: event.into(),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![self.timestamp.clone(), self.event.clone()]
    }
}

/// A file flagged as evidentially significant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotableFile {
    pub filename: String,
    pub path: String,
    pub size: String,
    pub last_modified: String,
}

impl NotableFile {
    pub fn new(
        filename: impl Into<String>,
        path: impl Into<String>,
        size: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            size: size.into(),
            last_modified: last_modified.into(),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.filename.clone(),
            self.path.clone(),
            self.size.clone(),
            self.last_modified.clone(),
        ]
    }
}

/// Everything one report is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub case: CaseInfo,
    pub image: ImageInfo,
    pub file_system: FileSystemInfo,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    #[serde(default)]
    pub notable_files: Vec<NotableFile>,
}
