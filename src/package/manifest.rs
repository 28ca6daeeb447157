//! Archive manifest
//!
//! The exact set of entries a run's archive will contain, built once from
//! the resolved context. Nothing outside this enumeration is ever
//! packaged, and every archive path is relative to a source root computed
//! from the job itself - never from where the tool happened to be invoked.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::context::ResolvedContext;
use crate::error::{ProvepackError, ProvepackResult};
use crate::paths::{self, PathAnchor};

/// Staging prefix every job file lives under inside the archive
pub const STAGING_PREFIX: &str = ".provepack_sources";

/// Per-run state directory, created under the anchor
pub const INTERNAL_DIR: &str = ".provepack_internal";

/// Run directory name under the internal directory
pub const LATEST_DIR: &str = "latest";

/// Archive file name
pub const ARCHIVE_NAME: &str = "provepack_job.zip";

/// Resolved run configuration, inside the staging prefix
pub const RUN_CONF_NAME: &str = "run.conf";

/// Fixed top-level metadata entries
pub const METADATA_NAME: &str = ".provepack_metadata.json";
pub const LAYOUT_NAME: &str = ".configuration_layout.json";
pub const DEBUG_LOG_NAME: &str = "provepack_debug_log.txt";

/// Zero-byte marker recorded at every directory that was an active
/// working directory during the run
pub const CWD_MARKER: &str = ".cwd";

/// Zero-byte marker recorded at the resolved project directory
pub const PROJECT_MARKER: &str = ".project_directory";

/// Rendered in-memory entries of a run
#[derive(Debug, Clone)]
pub struct RenderedFiles {
    pub run_conf: String,
    pub metadata: String,
    pub layout: String,
    pub debug_log: String,
}

/// Where an archive entry's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// Copy an existing file
    CopyFrom(PathBuf),
    /// Rendered content
    Content(Vec<u8>),
}

/// The set of archive entries about to be written, keyed by archive path.
///
/// Built once per run and never mutated afterwards; iteration order is
/// the sorted entry order the zip is written in.
#[derive(Debug, Clone)]
pub struct ArchiveManifest {
    entries: BTreeMap<PathBuf, EntrySource>,
}

impl ArchiveManifest {
    /// Enumerate the archive entries for a resolved run.
    pub fn build(
        context: &ResolvedContext,
        anchor: &PathAnchor,
        rendered: &RenderedFiles,
    ) -> ProvepackResult<Self> {
        let mut packaged: Vec<PathBuf> = Vec::new();
        for rel in context
            .sources
            .iter()
            .chain(&context.inlining)
            .chain(&context.summaries)
            .chain(&context.files)
        {
            packaged.push(anchor.absolute(rel));
        }

        let project_abs = anchor.absolute(&context.project_directory);
        let visited = anchor.visited();

        let mut dirs: Vec<PathBuf> = packaged
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();
        dirs.push(project_abs.clone());
        dirs.extend(visited.iter().cloned());

        let source_root = paths::common_ancestor(dirs.iter().map(PathBuf::as_path))
            .ok_or_else(|| ProvepackError::ArchiveWriteFailed {
                path: PathBuf::from(ARCHIVE_NAME),
                message: "packaged paths share no source root".to_string(),
            })?;

        let mut entries: BTreeMap<PathBuf, EntrySource> = BTreeMap::new();
        for absolute in packaged {
            entries.insert(
                staged(&source_root, &absolute),
                EntrySource::CopyFrom(absolute),
            );
        }

        entries.insert(
            PathBuf::from(STAGING_PREFIX).join(RUN_CONF_NAME),
            EntrySource::Content(rendered.run_conf.clone().into_bytes()),
        );
        entries.insert(
            PathBuf::from(METADATA_NAME),
            EntrySource::Content(rendered.metadata.clone().into_bytes()),
        );
        entries.insert(
            PathBuf::from(LAYOUT_NAME),
            EntrySource::Content(rendered.layout.clone().into_bytes()),
        );
        entries.insert(
            PathBuf::from(DEBUG_LOG_NAME),
            EntrySource::Content(rendered.debug_log.clone().into_bytes()),
        );

        // Top-level copy of the artifact under its own name
        let artifact = anchor.absolute(&context.files[0]);
        let artifact_name = artifact
            .file_name()
            .ok_or_else(|| ProvepackError::PathNotFound {
                path: artifact.clone(),
            })?;
        entries.insert(
            PathBuf::from(artifact_name),
            EntrySource::CopyFrom(artifact),
        );

        for dir in &visited {
            entries.insert(
                staged(&source_root, dir).join(CWD_MARKER),
                EntrySource::Content(Vec::new()),
            );
        }
        if context.build_mode.runs_build() {
            entries.insert(
                staged(&source_root, &project_abs).join(PROJECT_MARKER),
                EntrySource::Content(Vec::new()),
            );
        }

        Ok(Self { entries })
    }

    /// Entries in the order they are written
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &EntrySource)> {
        self.entries.iter().map(|(p, s)| (p.as_path(), s))
    }

    /// Archive entry names, forward-slash separated
    pub fn entry_names(&self) -> Vec<String> {
        self.entries.keys().map(|p| entry_name(p)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Archive path of `absolute` under the staging prefix.
fn staged(source_root: &Path, absolute: &Path) -> PathBuf {
    let relative = paths::relative_from(absolute, source_root);
    let mut out = PathBuf::from(STAGING_PREFIX);
    if relative != Path::new(".") {
        out.push(relative);
    }
    out
}

/// Forward-slash form of an archive path, as stored in the zip.
pub fn entry_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
