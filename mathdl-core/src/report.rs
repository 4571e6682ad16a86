// Run outcome: URL logs and the operator summary

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub instance: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub candidates: usize,
    pub found: usize,
    pub missing: Vec<String>,
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<String>,
    pub archive: PathBuf,
    pub archived_entries: Vec<String>,
    pub missing_log: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_log: Option<PathBuf>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Write one URL per line, replacing whatever was there.
pub fn write_url_log(path: &Path, urls: &[String]) -> Result<()> {
    let file = File::create(path).map_err(|e| CoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for url in urls {
        writeln!(writer, "{}", url).map_err(|e| CoreError::io(path, e))?;
    }
    writer.flush().map_err(|e| CoreError::io(path, e))?;
    Ok(())
}

/// Generate a plain-text summary of one instance run
pub fn render_summary(report: &RunReport) -> String {
    let mut summary = String::new();
    summary.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    summary.push_str(&format!("# {} summary\n", report.instance));
    summary.push_str(&format!("  Candidates probed: {}\n", report.candidates));
    summary.push_str(&format!("  Found: {}\n", report.found));
    summary.push_str(&format!("  Missing: {}\n", report.missing.len()));
    summary.push_str(&format!("  Downloaded: {}\n", report.downloaded.len()));
    summary.push_str(&format!("  Failed downloads: {}\n", report.failed.len()));
    summary.push_str(&format!(
        "  Archive: {} ({} files)\n",
        report.archive.display(),
        report.archived_entries.len()
    ));

    let elapsed = report.finished_at - report.started_at;
    summary.push_str(&format!("  Elapsed: {}s\n", elapsed.num_seconds()));

    if !report.missing.is_empty() {
        summary.push_str(&format!(
            "  Missing files logged to {}\n",
            report.missing_log.display()
        ));
    }

    if !report.failed.is_empty() {
        summary.push_str("\n  Failed downloads:\n");
        for url in &report.failed {
            summary.push_str(&format!("    {}\n", url));
        }
        if let Some(ref failed_log) = report.failed_log {
            summary.push_str(&format!("  Failures logged to {}\n", failed_log.display()));
        }
    }

    summary
}

pub fn render_json(reports: &[RunReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}
