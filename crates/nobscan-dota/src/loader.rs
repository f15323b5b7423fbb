// Directory ingestion: enumerate match documents, parse, filter and convert.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use nobscan_core::model::MatchRecord;

use crate::matches::{parse_match_from_reader, Rejection};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: String,
        source: walkdir::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Loaded set
// ---------------------------------------------------------------------------

/// A match document that was read but left out of the analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Discarded {
    pub path: PathBuf,
    pub match_id: u64,
    pub reason: Rejection,
}

#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    /// Valid matches in sorted path order.
    pub records: Vec<MatchRecord>,
    pub discarded: Vec<Discarded>,
}

impl MatchSet {
    pub fn files(&self) -> usize {
        self.records.len() + self.discarded.len()
    }
}

/// Every `*.json` file under `dir`, recursively, sorted by path. Symlinks
/// are followed; a link loop is reported as a walk error.
pub fn match_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Walk {
            path: dir.display().to_string(),
            source: e,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

/// Read every match document under `dir`. Invalid matches are kept aside in
/// [`MatchSet::discarded`]; an unreadable or malformed file aborts the load.
pub fn load_matches(dir: &Path) -> Result<MatchSet, LoadError> {
    let mut set = MatchSet::default();
    for path in match_files(dir)? {
        let file = std::fs::File::open(&path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let raw = parse_match_from_reader(BufReader::new(file)).map_err(|e| LoadError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        match raw.check() {
            Ok(()) => set.records.push(raw.into_record()),
            Err(reason) => {
                debug!("Discarding match {} ({}): {}", raw.match_id, path.display(), reason);
                set.discarded.push(Discarded {
                    path,
                    match_id: raw.match_id,
                    reason,
                });
            }
        }
    }
    info!(
        "Loaded {} valid matches from {} files in {} ({} discarded)",
        set.records.len(),
        set.files(),
        dir.display(),
        set.discarded.len()
    );
    Ok(set)
}
