use crate::archive;
use crate::catalog::Candidate;
use crate::config::{InstanceConfig, ProbePolicy};
use crate::error::{CoreError, Result};
use crate::report::{self, RunReport};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use mathdl_fetch::Transport;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Callback for reporting pipeline progress lines
pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Options for a pipeline run
pub struct RunOptions {
    /// Every candidate path, archive and log is resolved against this directory
    pub output_dir: PathBuf,
    pub show_progress_bars: bool,
}

/// Probe results, both in enumeration order
#[derive(Debug, Default)]
pub struct ProbeOutcome {
    pub downloads: Vec<Candidate>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Written(PathBuf),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<String>,
}

fn emit(progress: Option<&ProgressCallback>, msg: String) {
    if let Some(callback) = progress {
        callback(msg);
    }
}

/// Whether `url` exists under `policy`. Transport errors count as missing.
pub async fn probe_candidate<T: Transport>(
    transport: &T,
    url: &str,
    policy: &ProbePolicy,
) -> bool {
    match transport.probe(url, policy.method, policy.timeout()).await {
        Ok(response) => policy.check.accepts(&response),
        Err(e) => {
            debug!("Probe failed for {}: {}", url, e);
            false
        }
    }
}

pub async fn probe_all<T: Transport>(
    transport: &T,
    candidates: Vec<Candidate>,
    policy: &ProbePolicy,
    progress: Option<&ProgressCallback>,
) -> ProbeOutcome {
    let mut outcome = ProbeOutcome::default();

    for candidate in candidates {
        if probe_candidate(transport, candidate.remote_url(), policy).await {
            emit(progress, format!("✓ Found: {}", candidate.remote_url()));
            outcome.downloads.push(candidate);
        } else {
            emit(progress, format!("✗ Missing: {}", candidate.remote_url()));
            outcome.missing.push(candidate.remote_url().to_string());
        }
    }

    info!(
        "Probe complete: {} found, {} missing",
        outcome.downloads.len(),
        outcome.missing.len()
    );
    outcome
}

/// Write `body` next to `target` and move it into place.
fn write_document(target: &Path, body: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
    }

    let mut partial = target.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let staged = fs::write(&partial, body)
        .map_err(|e| CoreError::io(&partial, e))
        .and_then(|_| fs::rename(&partial, target).map_err(|e| CoreError::io(target, e)));
    if staged.is_err() {
        let _ = fs::remove_file(&partial);
    }
    staged
}

/// Download one candidate. Transport failures are reported, filesystem failures are errors.
pub async fn fetch_candidate<T: Transport>(
    transport: &T,
    candidate: &Candidate,
    output_dir: &Path,
    timeout: Duration,
) -> Result<FetchStatus> {
    let body = match transport.fetch(candidate.remote_url(), timeout).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to download {}: {}", candidate.remote_url(), e);
            return Ok(FetchStatus::Failed(e.to_string()));
        }
    };

    let target = output_dir.join(candidate.local_path());
    write_document(&target, &body)?;
    debug!("Wrote {} ({} bytes)", target.display(), body.len());
    Ok(FetchStatus::Written(target))
}

pub async fn fetch_all<T: Transport>(
    transport: &T,
    downloads: &[Candidate],
    output_dir: &Path,
    timeout: Duration,
    show_progress_bars: bool,
    progress: Option<&ProgressCallback>,
) -> Result<FetchOutcome> {
    let pb = if show_progress_bars {
        let pb = ProgressBar::new(downloads.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] Downloading {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let say = |msg: String| pb.suspend(|| emit(progress, msg));

    let mut outcome = FetchOutcome::default();
    for candidate in downloads {
        say(format!(
            "⬇ Downloading: {} → {}",
            candidate.remote_url(),
            candidate.local_path().display()
        ));

        match fetch_candidate(transport, candidate, output_dir, timeout).await {
            Ok(FetchStatus::Written(path)) => outcome.downloaded.push(path),
            Ok(FetchStatus::Failed(reason)) => {
                say(format!(
                    "  ✗ Failed to download: {} ({})",
                    candidate.remote_url(),
                    reason
                ));
                outcome.failed.push(candidate.remote_url().to_string());
            }
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Fetch complete: {} written, {} failed",
        outcome.downloaded.len(),
        outcome.failed.len()
    );
    Ok(outcome)
}

/// Run one instance end to end: enumerate, probe, fetch, archive, report.
pub async fn run_instance<T: Transport>(
    transport: &T,
    instance: &InstanceConfig,
    options: &RunOptions,
    progress: Option<ProgressCallback>,
) -> Result<RunReport> {
    let started_at = Utc::now();
    let progress = progress.as_ref();
    let output_dir = options.output_dir.as_path();

    let candidates = instance.candidates();
    let candidate_count = candidates.len();
    info!("[{}] {} candidates", instance.name, candidate_count);
    emit(
        progress,
        format!("🔎 Probing {} candidates for {}", candidate_count, instance.name),
    );

    let ProbeOutcome { downloads, missing } =
        probe_all(transport, candidates, &instance.probe, progress).await;

    emit(progress, "\n📥 Downloading available files...\n".to_string());
    let fetched = fetch_all(
        transport,
        &downloads,
        output_dir,
        instance.fetch_timeout(),
        options.show_progress_bars,
        progress,
    )
    .await?;

    emit(
        progress,
        format!("\n📦 Zipping into {}...", instance.archive.file_name),
    );
    let archive = archive::create_archive(output_dir, &instance.archive)?;

    let missing_log = output_dir.join(&instance.missing_log);
    report::write_url_log(&missing_log, &missing)?;

    let failed_log = match &instance.failed_log {
        Some(name) => {
            let path = output_dir.join(name);
            report::write_url_log(&path, &fetched.failed)?;
            Some(path)
        }
        None => None,
    };

    Ok(RunReport {
        instance: instance.name.clone(),
        started_at,
        finished_at: Utc::now(),
        candidates: candidate_count,
        found: downloads.len(),
        missing,
        downloaded: fetched.downloaded,
        failed: fetched.failed,
        archive: archive.path,
        archived_entries: archive.entries,
        missing_log,
        failed_log,
    })
}
