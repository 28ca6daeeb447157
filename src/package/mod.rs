//! Source packaging
//!
//! Materializes the archive manifest into a staging tree under the run's
//! internal directory and writes the zip next to it. The staging tree
//! mirrors the archive exactly; a downstream consumer can inspect either.

pub mod archive;
pub mod manifest;

use std::fs;
use std::path::PathBuf;

use crate::context::ResolvedContext;
use crate::error::ProvepackResult;
use crate::paths::PathAnchor;

pub use manifest::{ArchiveManifest, EntrySource, RenderedFiles};

/// Result of packaging a run
#[derive(Debug, Clone)]
pub struct PackageOutput {
    /// Fresh per-run directory holding the staging tree and the archive
    pub run_dir: PathBuf,
    pub archive_path: PathBuf,
    /// Archive entry names, sorted
    pub entry_names: Vec<String>,
}

/// Stage and archive a resolved run.
///
/// The run directory is recreated from scratch - no state survives from a
/// previous invocation.
pub fn package(
    context: &ResolvedContext,
    anchor: &PathAnchor,
    rendered: &RenderedFiles,
) -> ProvepackResult<PackageOutput> {
    let built = ArchiveManifest::build(context, anchor, rendered)?;

    let run_dir = anchor
        .original()
        .join(manifest::INTERNAL_DIR)
        .join(manifest::LATEST_DIR);
    if run_dir.exists() {
        fs::remove_dir_all(&run_dir)?;
    }
    fs::create_dir_all(&run_dir)?;

    for (path, source) in built.entries() {
        let dest = run_dir.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        match source {
            EntrySource::CopyFrom(from) => {
                fs::copy(from, &dest)?;
            }
            EntrySource::Content(bytes) => fs::write(&dest, bytes)?,
        }
    }

    let archive_path = run_dir.join(manifest::ARCHIVE_NAME);
    archive::write_archive(&built, &archive_path)?;

    Ok(PackageOutput {
        run_dir,
        archive_path,
        entry_names: built.entry_names(),
    })
}
