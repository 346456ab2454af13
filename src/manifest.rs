//! Report Manifest - Chain of Custody Record
//!
//! Written next to a report on request. Records what was generated, from which
//! inputs, and the digest of the produced file.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hashing::{compute_input_hash, compute_manifest_hash};
use crate::records::ReportRequest;
use crate::report::{GeneratedReport, ReportError, SECTIONS};
use crate::GENERATOR_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub title: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportManifest {
    pub id: String,
    pub generator_version: String,
    pub created_at: DateTime<Utc>,
    pub output: String,
    pub report_sha256: String,
    pub input_hash: String,
    pub page_count: usize,
    pub sections: Vec<SectionSummary>,
    pub request: ReportRequest,
    pub manifest_hash: String,
}

impl ReportManifest {
    pub fn new(
        request: &ReportRequest,
        report: &GeneratedReport,
    ) -> Result<Self, serde_json::Error> {
        let row_counts = [
            request.case.rows().len(),
            request.image.rows().len(),
            request.file_system.rows().len(),
            request.timeline.len(),
            request.notable_files.len(),
        ];
        let sections = SECTIONS
            .iter()
            .zip(row_counts)
            .map(|(title, rows)| SectionSummary {
                title: title.to_string(),
                rows,
            })
            .collect();

        let mut manifest = Self {
            id: Uuid::new_v4().to_string(),
            generator_version: GENERATOR_VERSION.to_string(),
            created_at: Utc::now(),
            output: report.path.display().to_string(),
            report_sha256: report.sha256.clone(),
            input_hash: compute_input_hash(request, GENERATOR_VERSION)?,
            page_count: report.page_count,
            sections,
            request: request.clone(),
            manifest_hash: String::new(), // Computed after
        };
        manifest.manifest_hash = manifest.compute_hash()?;
        Ok(manifest)
    }

    /// Hash over every field except `manifest_hash` itself
    pub fn compute_hash(&self) -> Result<String, serde_json::Error> {
        let mut unsealed = self.clone();
        unsealed.manifest_hash = String::new();
        compute_manifest_hash(&unsealed)
    }

    pub fn verify(&self) -> Result<bool, serde_json::Error> {
        Ok(self.compute_hash()? == self.manifest_hash)
    }

    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ReportError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}
