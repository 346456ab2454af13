//! Report Assembler - Records to Document
//!
//! Maps the five record groups onto a fixed story (title block plus five
//! sections) and hands it to the layout layer. Content only: pagination and
//! wrapping belong to `layout`.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

use crate::hashing::sha256_hex;
use crate::layout::{
    self, inches, Color, Flowable, Page, PageGeometry, Paragraph, ParagraphStyle, Table,
};
use crate::pdf::{self, PdfError};
use crate::records::{
    CaseInfo, FileSystemInfo, ImageInfo, NotableFile, ReportRequest, TimelineEntry,
};
use crate::tokens::ShapeError;

pub const REPORT_TITLE: &str = "FORENSIC REPORT GENERATOR";
pub const AUTHOR_CREDIT: &str = "KIRANRAJ, HAARIESHRAJ,BHUVANESH";

pub const CASE_SECTION: &str = "Case Information";
pub const IMAGE_SECTION: &str = "Image Information";
pub const FILE_SYSTEM_SECTION: &str = "File System Information";
pub const TIMELINE_SECTION: &str = "Timeline of Key Events";
pub const NOTABLE_FILES_SECTION: &str = "Notable Files";

/// Section headings in the order they appear
pub const SECTIONS: [&str; 5] = [
    CASE_SECTION,
    IMAGE_SECTION,
    FILE_SYSTEM_SECTION,
    TIMELINE_SECTION,
    NOTABLE_FILES_SECTION,
];

pub const TIMELINE_HEADER: [&str; 2] = ["Date/Time", "Event"];
pub const NOTABLE_FILES_HEADER: [&str; 4] = ["Filename", "Path", "Size", "Last Modified"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid row data: {0}")]
    Shape(#[from] ShapeError),

    #[error("Rendering error: {0}")]
    Render(#[from] PdfError),

    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest to {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub path: PathBuf,
    pub sha256: String,
    pub page_count: usize,
    pub byte_len: usize,
}

/// The report assembler - one story per request
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    geometry: PageGeometry,
}

impl ReportAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Build the ordered list of flowables for a request
    pub fn story(&self, request: &ReportRequest) -> Vec<Flowable> {
        let title = ParagraphStyle::title();
        let mut story = vec![
            Flowable::Paragraph(Paragraph::new(REPORT_TITLE, title)),
            Flowable::Spacer(12.0),
            Flowable::Paragraph(Paragraph::new(AUTHOR_CREDIT, title)),
            Flowable::Spacer(10.0),
        ];

        push_section(&mut story, CASE_SECTION, field_table(request.case.rows()));
        push_section(&mut story, IMAGE_SECTION, field_table(request.image.rows()));
        push_section(
            &mut story,
            FILE_SYSTEM_SECTION,
            field_table(request.file_system.rows()),
        );
        push_section(&mut story, TIMELINE_SECTION, timeline_table(&request.timeline));
        story.push(heading(NOTABLE_FILES_SECTION));
        story.push(Flowable::Table(notable_files_table(&request.notable_files)));

        story
    }

    /// Place the story onto pages
    pub fn layout(&self, request: &ReportRequest) -> Vec<Page> {
        layout::layout(&self.story(request), &self.geometry)
    }

    /// Render the complete document in memory
    pub fn render(&self, request: &ReportRequest) -> Result<(Vec<u8>, usize), ReportError> {
        let pages = self.layout(request);
        debug!(
            "Laid out {} timeline rows and {} notable files on {} page(s)",
            request.timeline.len(),
            request.notable_files.len(),
            pages.len()
        );
        let bytes = pdf::write_pdf(&pages, &self.geometry)?;
        Ok((bytes, pages.len()))
    }

    /// Render and write the report to `output`.
    ///
    /// The file appears at `output` only once fully written.
    pub fn generate(
        &self,
        request: &ReportRequest,
        output: &Path,
    ) -> Result<GeneratedReport, ReportError> {
        let (bytes, page_count) = self.render(request)?;
        write_atomically(output, &bytes)?;

        let report = GeneratedReport {
            path: output.to_path_buf(),
            sha256: sha256_hex(&bytes),
            page_count,
            byte_len: bytes.len(),
        };
        info!(
            "Wrote {} ({} page(s), {} bytes, sha256 {})",
            output.display(),
            report.page_count,
            report.byte_len,
            report.sha256
        );
        Ok(report)
    }
}

/// Generate a report with default page geometry
pub fn generate(
    case: CaseInfo,
    image: ImageInfo,
    file_system: FileSystemInfo,
    timeline: Vec<TimelineEntry>,
    notable_files: Vec<NotableFile>,
    output: &Path,
) -> Result<GeneratedReport, ReportError> {
    let request = ReportRequest {
        case,
        image,
        file_system,
        timeline,
        notable_files,
    };
    ReportAssembler::new().generate(&request, output)
}

fn heading(text: &str) -> Flowable {
    Flowable::Paragraph(Paragraph::new(text, ParagraphStyle::heading2()))
}

fn push_section(story: &mut Vec<Flowable>, title: &str, table: Table) {
    story.push(heading(title));
    story.push(Flowable::Table(table));
    story.push(Flowable::Spacer(12.0));
}

fn owned_rows<const N: usize>(
    header: [&str; N],
    rows: impl Iterator<Item = Vec<String>>,
) -> Vec<Vec<String>> {
    std::iter::once(header.iter().map(|s| s.to_string()).collect())
        .chain(rows)
        .collect()
}

fn field_table(rows: Vec<[&str; 2]>) -> Table {
    let rows = rows
        .into_iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect();
    Table::new(vec![inches(2.0), inches(4.0)])
        .with_rows(rows)
        .with_grid(1.0, Color::BLACK)
}

fn timeline_table(entries: &[TimelineEntry]) -> Table {
    Table::new(vec![inches(2.0), inches(4.0)])
        .with_rows(owned_rows(
            TIMELINE_HEADER,
            entries.iter().map(TimelineEntry::cells),
        ))
        .with_grid(1.0, Color::BLACK)
        .with_header(Color::GREY, Color::WHITESMOKE)
}

fn notable_files_table(files: &[NotableFile]) -> Table {
    Table::new(vec![inches(1.5), inches(2.5), inches(1.0), inches(1.5)])
        .with_rows(owned_rows(
            NOTABLE_FILES_HEADER,
            files.iter().map(NotableFile::cells),
        ))
        .with_grid(1.0, Color::BLACK)
        .with_header(Color::GREY, Color::WHITESMOKE)
}

/// Create the temporary file with the mode a plain write would give the report.
///
/// An existing report keeps its mode; a new one gets 0666 minus the umask.
#[cfg(unix)]
fn create_temp(dir: &Path, target: &Path) -> std::io::Result<NamedTempFile> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let file = Builder::new()
        .prefix(".forensic-report")
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(target) {
        file.as_file().set_permissions(existing.permissions())?;
    }
    Ok(file)
}

#[cfg(not(unix))]
fn create_temp(dir: &Path, _target: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().prefix(".forensic-report").tempfile_in(dir)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let write_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = create_temp(dir, path).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn request() -> ReportRequest {
        ReportRequest {
            case: CaseInfo {
                case_number: "2024-017".to_string(),
                investigator: "J. Doe".to_string(),
                date: "2024-03-01".to_string(),
                description: "Laptop seizure".to_string(),
            },
            image: ImageInfo {
                image_type: "E01".to_string(),
                image_hash: "abc123".to_string(),
                acquisition_date: "2024-03-02".to_string(),
                device_model: "WD Blue".to_string(),
                total_capacity: "500GB".to_string(),
            },
            file_system: FileSystemInfo {
                fs_type: "NTFS".to_string(),
                volume_label: "OS".to_string(),
                created_date: "2020-01-01".to_string(),
                last_mounted: "2024-02-28".to_string(),
            },
            timeline: vec![TimelineEntry::new("2024-01-01 10:00", "Drive connected")],
            notable_files: vec![NotableFile::new(
                "notes.txt",
                "/evid/notes.txt",
                "1024",
                "2024-01-02",
            )],
        }
    }

    fn table_rows(flowable: &Flowable) -> &Vec<Vec<String>> {
        match flowable {
            Flowable::Table(t) => &t.rows,
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_title_block_first() {
        let story = ReportAssembler::new().story(&request());
        match (&story[0], &story[2]) {
            (Flowable::Paragraph(a), Flowable::Paragraph(b)) => {
                assert_eq!(a.text, REPORT_TITLE);
                assert_eq!(b.text, "KIRANRAJ, HAARIESHRAJ,BHUVANESH");
                assert_eq!(a.style, ParagraphStyle::title());
            }
            other => panic!("unexpected title block {other:?}"),
        }
    }

    #[test]
    fn test_field_tables_have_label_column() {
        let story = ReportAssembler::new().story(&request());
        // title block (4) + heading
        let case_rows = table_rows(&story[5]);
        assert_eq!(case_rows[0], ["Case Number:", "2024-017"]);
        assert_eq!(case_rows.len(), 4);
        match &story[5] {
            Flowable::Table(t) => {
                assert_eq!(t.col_widths, [144.0, 288.0]);
                assert!(t.header.is_none());
                assert!(t.grid.is_some());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_notable_files_table_shape() {
        let story = ReportAssembler::new().story(&request());
        let last = story.last().unwrap();
        let rows = table_rows(last);
        assert_eq!(rows[0], NOTABLE_FILES_HEADER);
        assert_eq!(rows[1], ["notes.txt", "/evid/notes.txt", "1024", "2024-01-02"]);
        match last {
            Flowable::Table(t) => {
                assert_eq!(t.col_widths, [108.0, 180.0, 72.0, 108.0]);
                assert_eq!(t.header.unwrap().background, Color::GREY);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_timeline_keeps_header_row() {
        let mut req = request();
        req.timeline.clear();
        let story = ReportAssembler::new().story(&req);
        let timeline = story
            .iter()
            .skip_while(|f| !matches!(f, Flowable::Paragraph(p) if p.text == TIMELINE_SECTION))
            .nth(1)
            .unwrap();
        assert_eq!(table_rows(timeline), &vec![vec!["Date/Time".to_string(), "Event".to_string()]]);
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("case.pdf");
        let r = request();
        let report = generate(
            r.case,
            r.image,
            r.file_system,
            r.timeline,
            r.notable_files,
            &out,
        )
        .unwrap();
        assert!(out.exists());
        assert_eq!(report.path, out);
        assert_eq!(report.page_count, 1);
        assert_eq!(std::fs::read(&out).unwrap().len(), report.byte_len);
        assert_eq!(report.sha256.len(), 64);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_report_gets_plain_write_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("case.pdf");
        let plain = dir.path().join("plain.bin");
        fs::write(&plain, b"x").unwrap();

        write_atomically(&out, b"%PDF-1.5").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&out), mode(&plain));
        assert_ne!(mode(&out), 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_report_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("case.pdf");
        fs::write(&out, b"old").unwrap();
        fs::set_permissions(&out, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&out, b"%PDF-1.5").unwrap();

        assert_eq!(fs::read(&out).unwrap(), b"%PDF-1.5");
        assert_eq!(fs::metadata(&out).unwrap().permissions().mode() & 0o777, 0o640);
    }
}
