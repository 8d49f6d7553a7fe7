use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::persist::{AtomicFileWriter, PersistError};

/// One file queued for the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Serializes entries into a deflate-compressed zip held in memory.
/// Colliding entry names are written as-is; on extraction the last one
/// wins (distinct source names can still sanitize to the same entry
/// name).
pub fn build_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.bytes)?;
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Writes the archive bytes into the downloads directory under the given
/// filename, atomically.
pub fn deliver_archive(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, ArchiveError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    Ok(writer.write(file_name, bytes)?)
}
