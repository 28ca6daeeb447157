//! Deterministic zip writing
//!
//! Entries are written in the manifest's sorted order with fixed
//! timestamps, so two archives of the same manifest are byte-identical.
//! The zip is written to a temporary file and renamed into place on
//! success - a partial archive never exists at the destination path.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ProvepackError, ProvepackResult};
use crate::package::manifest::{entry_name, ArchiveManifest, EntrySource};

/// Write the manifest to a zip archive at `dest`, atomically.
pub fn write_archive(manifest: &ArchiveManifest, dest: &Path) -> ProvepackResult<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| archive_error(dest, format!("creating temp file: {e}")))?;
    let (file, temp_path) = temp.into_parts();

    write_entries(manifest, file).map_err(|e| archive_error(dest, e.to_string()))?;

    temp_path
        .persist(dest)
        .map_err(|e| archive_error(dest, e.to_string()))?;
    Ok(())
}

fn write_entries(manifest: &ArchiveManifest, file: File) -> io::Result<()> {
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    for (path, source) in manifest.entries() {
        writer
            .start_file(entry_name(path), options)
            .map_err(io::Error::other)?;
        match source {
            EntrySource::CopyFrom(from) => {
                let mut reader = File::open(from)?;
                io::copy(&mut reader, &mut writer)?;
            }
            EntrySource::Content(bytes) => writer.write_all(bytes)?,
        }
    }

    writer.finish().map_err(io::Error::other)?;
    Ok(())
}

fn archive_error(dest: &Path, message: String) -> ProvepackError {
    ProvepackError::ArchiveWriteFailed {
        path: dest.to_path_buf(),
        message,
    }
}
