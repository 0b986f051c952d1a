mod job_error;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use image::{codecs::png::PngEncoder, ColorType, ImageResult, RgbaImage};
use std::io::Write;
use std::path::Path;

pub use job_error::JobError;

pub fn encode_png(img: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);

    let (w, h) = img.dimensions();
    encoder.encode(img.as_raw(), w, h, ColorType::Rgba8)?;

    Ok(buf)
}

/// Replaces `file_path` with `bytes` in one step, or leaves it untouched on failure.
pub fn write_atomically(file_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    AtomicFile::new(file_path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(bytes))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(err) => err,
            atomicwrites::Error::User(err) => err,
        })
}
