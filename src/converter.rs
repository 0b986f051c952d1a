use std::path::{Path, PathBuf};

use crate::encoder::encode;
use crate::pgm::{read_source, PgmParser, PgmParserError, SourceKind};
use crate::utils::{encode_png, write_atomically};

/// Problems with the arguments themselves, detected before any file is read.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Source path can't be empty")]
    EmptySourcePath,

    #[error("Destination path can't be empty")]
    EmptyDestinationPath,

    #[error("The source file '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("The output directory '{}' does not exist", .0.display())]
    DestinationDirectoryMissing(PathBuf),

    #[error("The destination '{}' is not a file path", .0.display())]
    DestinationNotAFile(PathBuf),

    #[error("'{}' has an unknown file extension, expected .pgm or .pgm.gz", .0.display())]
    UnsupportedExtension(PathBuf),
}

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Couldn't parse '{}': {source}", .path.display())]
    Format {
        path: PathBuf,
        source: PgmParserError,
    },

    #[error("Couldn't access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Couldn't encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

fn validate(source: &Path, destination: &Path) -> Result<SourceKind, ValidationError> {
    if source.as_os_str().is_empty() {
        return Err(ValidationError::EmptySourcePath);
    }

    if destination.as_os_str().is_empty() {
        return Err(ValidationError::EmptyDestinationPath);
    }

    if !source.is_file() {
        return Err(ValidationError::SourceNotFound(source.to_path_buf()));
    }

    let output_dir = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !output_dir.is_dir() {
        return Err(ValidationError::DestinationDirectoryMissing(
            output_dir.to_path_buf(),
        ));
    }

    if destination.file_name().is_none() || destination.is_dir() {
        return Err(ValidationError::DestinationNotAFile(destination.to_path_buf()));
    }

    SourceKind::from_path(source)
        .ok_or_else(|| ValidationError::UnsupportedExtension(source.to_path_buf()))
}

/// Converts the 16 bit ASCII grayscale heightmap at `source` into a PNG at
/// `destination` with the high byte of each sample in red and the low byte in
/// green. An existing `destination` is overwritten; on failure it is left as it was.
pub fn convert(source: &Path, destination: &Path) -> Result<(), ConvertError> {
    let kind = validate(source, destination)?;

    let bytes = read_source(source, kind).map_err(|e| ConvertError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;

    let grid = PgmParser::parse_bytes(&bytes).map_err(|e| ConvertError::Format {
        path: source.to_path_buf(),
        source: e,
    })?;

    let png = encode_png(&encode(&grid))?;

    write_atomically(destination, &png).map_err(|e| ConvertError::Io {
        path: destination.to_path_buf(),
        source: e,
    })
}
