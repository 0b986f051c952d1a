mod grid;
mod parser;

use flate2::bufread::GzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

pub use grid::HeightGrid;
pub use parser::{PgmParser, PgmParserError};

/// How a heightmap source is stored on disk, derived from its file name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceKind {
    /// `*.pgm`
    Plain,
    /// `*.pgm.gz`
    Gzip,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_ascii_lowercase();

        if file_name.ends_with(".pgm.gz") {
            Some(SourceKind::Gzip)
        } else if file_name.ends_with(".pgm") {
            Some(SourceKind::Plain)
        } else {
            None
        }
    }

    /// `file_name` without its `.pgm` or `.pgm.gz` extension.
    pub fn strip_extension(self, file_name: &str) -> &str {
        let extension_len = match self {
            SourceKind::Plain => ".pgm".len(),
            SourceKind::Gzip => ".pgm.gz".len(),
        };

        &file_name[..file_name.len().saturating_sub(extension_len)]
    }
}

/// Reads the raw (decompressed) bytes of a heightmap source.
pub fn read_source(path: &Path, kind: SourceKind) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;

    let mut buf = BufReader::new(file);
    let mut bytes = Vec::new();

    match kind {
        SourceKind::Plain => buf.read_to_end(&mut bytes)?,
        SourceKind::Gzip => GzDecoder::new(buf).read_to_end(&mut bytes)?,
    };

    Ok(bytes)
}
