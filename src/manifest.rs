use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One conversion of a batch.
#[derive(Debug, PartialEq, Deserialize)]
pub struct Job {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Job {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Job {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Parses `"{source}|{destination}"`. Empty segments are dropped, anything
    /// after the second segment is ignored.
    pub fn from_pair(pair: &str) -> Option<Self> {
        let files: Vec<&str> = pair.split('|').filter(|s| !s.is_empty()).collect();

        if files.len() < 2 {
            return None;
        }

        Some(Job::new(files[0].trim(), files[1].trim()))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("Couldn't find manifest '{}'", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a JSON list of `{"source": ..., "destination": ...}` objects. Relative
/// paths are taken relative to the manifest's directory.
pub fn from_file(path: &Path) -> Result<Vec<Job>, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let jobs: Vec<Job> = serde_json::from_reader(reader)?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));

    Ok(jobs
        .into_iter()
        .map(|job| Job::new(base.join(job.source), base.join(job.destination)))
        .collect())
}
