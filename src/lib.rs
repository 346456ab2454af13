//! Forensic Report Generator
//!
//! Turns case, disk-image and file-system metadata, a timeline and a list of
//! notable files into a paginated PDF.
//!
//! # Guarantees
//! 1. Section order is fixed: Case, Image, File System, Timeline, Notable Files
//! 2. Rows are printed in the order given, never sorted
//! 3. Malformed row tokens are rejected before anything is rendered
//! 4. Identical inputs produce identical PDF bytes
//! 5. A failed write leaves no file behind

pub mod cli;
pub mod fonts;
pub mod hashing;
pub mod layout;
pub mod manifest;
pub mod pdf;
pub mod records;
pub mod report;
pub mod tokens;
pub mod viewer;

pub use cli::Cli;
pub use hashing::{canonical_json, compute_input_hash, compute_manifest_hash, sha256_hex};
pub use layout::{Flowable, Page, PageGeometry};
pub use manifest::ReportManifest;
pub use records::{CaseInfo, FileSystemInfo, ImageInfo, NotableFile, ReportRequest, TimelineEntry};
pub use report::{generate, GeneratedReport, ReportAssembler, ReportError};
pub use tokens::{parse_notable_file, parse_timeline_entry, RecordKind, ShapeError};
pub use viewer::{open_in_default_viewer, ViewerError};

pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
