//! Default Viewer
//!
//! Hands the finished report to the platform's file launcher.

use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Report not found: {0}")]
    Missing(String),

    #[error("Failed to launch {launcher}: {source}")]
    Launch {
        launcher: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Launcher command and leading arguments for this platform
pub fn launcher() -> (&'static str, &'static [&'static str]) {
    const WINDOWS: &[&str] = &["/C", "start", ""];
    const NONE: &[&str] = &[];

    if cfg!(target_os = "windows") {
        ("cmd", WINDOWS)
    } else if cfg!(target_os = "macos") {
        ("open", NONE)
    } else {
        ("xdg-open", NONE)
    }
}

/// Open `path` with the default application. Does not wait for the viewer.
pub fn open_in_default_viewer(path: &Path) -> Result<(), ViewerError> {
    if !path.exists() {
        return Err(ViewerError::Missing(path.display().to_string()));
    }

    let (program, args) = launcher();
    debug!("Opening {} with {}", path.display(), program);
    Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| ViewerError::Launch {
            launcher: program,
            source,
        })
}
