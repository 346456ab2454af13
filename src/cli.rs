//! Command-Line Adapter
//!
//! Flags map one-to-one onto record fields. Repeated row arguments are split
//! by `tokens` into typed entries.

use std::path::PathBuf;

use chrono::Local;
use clap::Parser;

use crate::records::{CaseInfo, FileSystemInfo, ImageInfo, ReportRequest};
use crate::tokens::{parse_notable_files, parse_timeline, ShapeError};

pub const DEFAULT_IMAGE_TYPE: &str = "E01";
pub const DEFAULT_OUTPUT: &str = "forensic_report.pdf";

#[derive(Parser, Debug, Clone)]
#[command(name = "forensic-report")]
#[command(about = "Forensic Report Generator - builds a PDF case report", version)]
pub struct Cli {
    /// Case number
    #[arg(long)]
    pub case_number: String,

    /// Investigator name
    #[arg(long)]
    pub investigator: String,

    /// Investigation date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Case description
    #[arg(long)]
    pub description: String,

    /// Image file type
    #[arg(long, default_value = DEFAULT_IMAGE_TYPE)]
    pub image_type: String,

    /// Image file hash
    #[arg(long)]
    pub image_hash: String,

    /// Image acquisition date
    #[arg(long)]
    pub acquisition_date: String,

    /// Device model
    #[arg(long)]
    pub device_model: String,

    /// Total device capacity
    #[arg(long)]
    pub capacity: String,

    /// File system type
    #[arg(long)]
    pub fs_type: String,

    /// Volume label
    #[arg(long)]
    pub volume_label: String,

    /// File system created date
    #[arg(long)]
    pub fs_created: String,

    /// Last mounted date
    #[arg(long)]
    pub last_mounted: String,

    /// Timeline events in format: "YYYY-MM-DD HH:MM,Event description"
    #[arg(long, num_args = 1.., required = true)]
    pub timeline: Vec<String>,

    /// Notable files in format: "filename,path,size,last_modified"
    #[arg(long, num_args = 1.., required = true)]
    pub notable_files: Vec<String>,

    /// Output PDF file name
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write a JSON manifest (hashes and inputs) to this path
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Do not open the report after generating it
    #[arg(long)]
    pub no_open: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Today's date as `YYYY-MM-DD`, evaluated at call time
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

impl Cli {
    /// Build the typed request. Fails on the first malformed row token.
    pub fn to_request(&self) -> Result<ReportRequest, ShapeError> {
        let case = CaseInfo {
            case_number: self.case_number.clone(),
            investigator: self.investigator.clone(),
            date: self.date.clone().unwrap_or_else(today),
            description: self.description.clone(),
        };
        let image = ImageInfo {
            image_type: self.image_type.clone(),
            image_hash: self.image_hash.clone(),
            acquisition_date: self.acquisition_date.clone(),
            device_model: self.device_model.clone(),
            total_capacity: self.capacity.clone(),
        };
        let file_system = FileSystemInfo {
            fs_type: self.fs_type.clone(),
            volume_label: self.volume_label.clone(),
            created_date: self.fs_created.clone(),
            last_mounted: self.last_mounted.clone(),
        };

        Ok(ReportRequest {
            case,
            image,
            file_system,
            timeline: parse_timeline(&self.timeline)?,
            notable_files: parse_notable_files(&self.notable_files)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[rustfmt::skip]
    const REQUIRED: &[&str] = &[
        "forensic-report",
        "--case-number", "2024-017",
        "--investigator", "J. Doe",
        "--description", "Laptop seizure",
        "--image-hash", "abc123",
        "--acquisition-date", "2024-03-02",
        "--device-model", "WD Blue",
        "--capacity", "500GB",
        "--fs-type", "NTFS",
        "--volume-label", "OS",
        "--fs-created", "2020-01-01",
        "--last-mounted", "2024-02-28",
    ];

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        let args: Vec<&str> = REQUIRED.iter().chain(extra).copied().collect();
        Cli::try_parse_from(args)
    }

    fn rows() -> Vec<&'static str> {
        vec![
            "--timeline",
            "2024-01-01 10:00,Drive connected",
            "2024-01-01 11:00,Imaged, verified",
            "--notable-files",
            "notes.txt,/evid/notes.txt,1024,2024-01-02",
        ]
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&rows()).unwrap();
        assert_eq!(cli.image_type, "E01");
        assert_eq!(cli.output, PathBuf::from("forensic_report.pdf"));
        assert!(cli.date.is_none());
        assert!(cli.manifest.is_none());
        assert!(!cli.no_open);
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        let request = parse(&rows()).unwrap().to_request().unwrap();
        assert_eq!(request.case.date, today());
        assert!(chrono::NaiveDate::parse_from_str(&request.case.date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_explicit_date_kept_verbatim() {
        let mut args = rows();
        args.extend(["--date", "not-a-date"]);
        let request = parse(&args).unwrap().to_request().unwrap();
        assert_eq!(request.case.date, "not-a-date");
    }

    #[test]
    fn test_rows_split_in_order() {
        let request = parse(&rows()).unwrap().to_request().unwrap();
        assert_eq!(request.timeline.len(), 2);
        assert_eq!(request.timeline[1].event, "Imaged, verified");
        assert_eq!(request.notable_files[0].size, "1024");
        assert_eq!(request.image.total_capacity, "500GB");
        assert_eq!(request.file_system.created_date, "2020-01-01");
    }

    #[test]
    fn test_repeated_flag_appends() {
        #[rustfmt::skip]
        let args = [
            "--timeline", "2024-01-01 10:00,first",
            "--notable-files", "a,b,c,d",
            "--timeline", "2024-01-01 09:00,second",
        ];
        let request = parse(&args).unwrap().to_request().unwrap();
        let events: Vec<_> = request.timeline.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, ["first", "second"]);
    }

    #[test]
    fn test_missing_required_flag_is_usage_error() {
        let err = Cli::try_parse_from(["forensic-report", "--case-number", "1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_missing_timeline_is_usage_error() {
        let err = parse(&["--notable-files", "a,b,c,d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_malformed_notable_file_is_shape_error() {
        let args = ["--timeline", "2024-01-01 10:00,x", "--notable-files", "a,b,c"];
        let err = parse(&args).unwrap().to_request().unwrap_err();
        assert_eq!(err.found, 3);
        assert_eq!(err.token, "a,b,c");
    }
}
