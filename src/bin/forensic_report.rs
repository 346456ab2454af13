//! Forensic Report Generator CLI
//!
//! Parses case metadata flags, writes the PDF, then opens it.
//! Returns non-zero on malformed rows, write failure, a missing output file
//! or a manifest that could not be written.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use forensic_report::{
    open_in_default_viewer, Cli, GeneratedReport, ReportAssembler, ReportError, ReportManifest,
    ReportRequest,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    initialize_logging(cli.verbose);

    let (request, report) = match run(&cli) {
        Ok(built) => built,
        Err(e) => {
            error!("{}", e);
            eprintln!("Failed to generate the report: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The build returned, but only trust what is on disk
    if !report.path.exists() {
        eprintln!("Failed to generate the report: {}", report.path.display());
        return ExitCode::FAILURE;
    }
    println!("Report generated: {}", report.path.display());

    if let Some(path) = &cli.manifest {
        if let Err(e) = write_manifest(&request, &report, path) {
            error!("{}", e);
            eprintln!("Report written, but the manifest failed: {}", e);
            return ExitCode::FAILURE;
        }
        info!("Manifest written to {}", path.display());
    }

    if cli.no_open {
        return ExitCode::SUCCESS;
    }
    if let Err(e) = open_in_default_viewer(&report.path) {
        warn!("{}", e);
    }
    ExitCode::SUCCESS
}

fn initialize_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn run(cli: &Cli) -> Result<(ReportRequest, GeneratedReport), ReportError> {
    let request = cli.to_request()?;
    info!(
        "Building report for case {} ({} timeline events, {} notable files)",
        request.case.case_number,
        request.timeline.len(),
        request.notable_files.len()
    );

    let report = ReportAssembler::new().generate(&request, &cli.output)?;
    Ok((request, report))
}

fn write_manifest(
    request: &ReportRequest,
    report: &GeneratedReport,
    path: &std::path::Path,
) -> Result<(), ReportError> {
    ReportManifest::new(request, report)?.write(path)
}
