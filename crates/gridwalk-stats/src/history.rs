//! Append-only comparison history stored as a pretty-printed JSON array.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::compare::Comparison;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed history file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HistoryError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// All comparisons stored at `path`, oldest first. A missing file is an
/// empty history.
pub fn load(path: &Path) -> Result<Vec<Comparison>, HistoryError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(HistoryError::io(path, e)),
    };
    serde_json::from_str(&text).map_err(|e| HistoryError::json(path, e))
}

/// Append `comparison` to the history at `path`, creating the file and its
/// parent directories as needed. Returns the number of stored comparisons.
///
/// The new history is written to a temporary file in the same directory and
/// renamed over `path`, so a failed write leaves the previous file intact.
pub fn append(path: &Path, comparison: &Comparison) -> Result<usize, HistoryError> {
    let mut entries = load(path)?;
    entries.push(comparison.clone());
    replace_json(path, &entries)?;

    log::info!("saved comparison to {} ({} total)", path.display(), entries.len());
    Ok(entries.len())
}

/// Serialize `value` into a sibling temporary file, then move it onto `path`.
fn replace_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), HistoryError> {
    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
            dir
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HistoryError::io(dir, e))?;
    {
        let mut w = io::BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut w, value).map_err(|e| HistoryError::json(path, e))?;
        w.flush().map_err(|e| HistoryError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| HistoryError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| HistoryError::io(path, e.error))?;
    Ok(())
}
