use std::error::Error;
use std::fmt::{Display, Formatter, Result};
use std::path::{Path, PathBuf};

type Underlying = Box<dyn Error + Send + Sync>;

/// A failed conversion inside a batch, remembering which files it was about.
#[derive(Debug)]
pub struct JobError {
    source: PathBuf,
    destination: PathBuf,
    original_error: Underlying,
}

impl JobError {
    pub fn new(source: &Path, destination: &Path, original_error: impl Into<Underlying>) -> Self {
        JobError {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            original_error: original_error.into(),
        }
    }
}

impl Display for JobError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{} -> {}: {}",
            self.source.display(),
            self.destination.display(),
            self.original_error
        )
    }
}

impl Error for JobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.original_error)
    }
}
