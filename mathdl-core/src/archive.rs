// Zip packaging of downloaded documents

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Which files go into an instance's archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSpec {
    /// Archive file name, created directly under the output root
    pub file_name: String,
    /// Directory to walk, relative to the output root. `None` walks the whole root.
    #[serde(default)]
    pub scan_dir: Option<String>,
    /// Only files with this extension are archived. `None` archives everything found.
    #[serde(default)]
    pub extension: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

/// Files to archive, as paths relative to `root`, sorted.
pub fn collect_files(root: &Path, spec: &ArchiveSpec) -> Result<Vec<PathBuf>> {
    let scan_root = match &spec.scan_dir {
        Some(dir) => root.join(dir),
        None => root.to_path_buf(),
    };
    if !scan_root.is_dir() {
        debug!("Archive scan directory {} does not exist", scan_root.display());
        return Ok(Vec::new());
    }

    let archive_path = root.join(&spec.file_name);
    let files = WalkDir::new(&scan_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            // Unreadable subtrees are skipped
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| *path != archive_path)
        .filter(|path| match &spec.extension {
            Some(ext) => path
                .extension()
                .map(|e| e.eq_ignore_ascii_case(ext.trim_start_matches('.')))
                .unwrap_or(false),
            None => true,
        })
        .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();

    Ok(files)
}

/// Entry name for a relative path: `/`-separated regardless of platform.
pub fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// Fixed timestamp and mode so identical inputs give identical archives
fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

/// Rebuild the archive described by `spec` from what is on disk under `root`.
pub fn create_archive(root: &Path, spec: &ArchiveSpec) -> Result<ArchiveSummary> {
    let files = collect_files(root, spec)?;
    let archive_path = root.join(&spec.file_name);

    let file = File::create(&archive_path).map_err(|e| CoreError::io(&archive_path, e))?;
    let mut zip = ZipWriter::new(file);
    let mut entries = Vec::with_capacity(files.len());

    for relative in files {
        let name = entry_name(&relative);
        let source_path = root.join(&relative);
        let mut source = File::open(&source_path).map_err(|e| CoreError::io(&source_path, e))?;

        zip.start_file(name.as_str(), entry_options())?;
        io::copy(&mut source, &mut zip).map_err(|e| CoreError::io(&source_path, e))?;
        debug!("Archived {}", name);
        entries.push(name);
    }

    zip.finish()?;
    info!(
        "Wrote {} with {} entries",
        archive_path.display(),
        entries.len()
    );

    Ok(ArchiveSummary {
        path: archive_path,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let relative = Path::new("HMMT").join("2020").join("feb").join("geo.pdf");
        assert_eq!(entry_name(&relative), "HMMT/2020/feb/geo.pdf");
    }

    #[test]
    fn test_entry_name_skips_current_dir() {
        assert_eq!(entry_name(Path::new("./AIME/aime1990.pdf")), "AIME/aime1990.pdf");
    }
}
