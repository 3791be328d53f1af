use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::presenter::format_report;

/// Writes the report to `{location}_weather.txt` under `dir`, replacing any
/// earlier save for the same location. Returns the written path.
pub fn save_report(
    dir: &Path,
    location: &str,
    report: &str,
    at: DateTime<Local>,
) -> io::Result<PathBuf> {
    let path = dir.join(format!("{location}_weather.txt"));
    fs::write(&path, format_report(location, report, at))?;
    Ok(path)
}
