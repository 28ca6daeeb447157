//! Run pipeline
//!
//! One fresh resolve-build-package cycle per invocation: invoke the build
//! step for the selected mode, merge its output with the options, then
//! render the engine command, the layout report and the archive from the
//! merged context. Any error aborts the run before an archive exists.

use std::path::PathBuf;

use crate::builder::Invoker;
use crate::cli::RunOptions;
use crate::command;
use crate::context::{self, ResolvedContext};
use crate::error::ProvepackResult;
use crate::layout::{self, ConfigurationLayout};
use crate::metadata::{DebugLog, RunMetadata};
use crate::package::{self, RenderedFiles};
use crate::paths::PathAnchor;

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunOutput {
    pub context: ResolvedContext,
    pub engine_command: Vec<String>,
    pub layout: ConfigurationLayout,
    pub archive_path: PathBuf,
    pub run_dir: PathBuf,
    /// Sorted archive entry names
    pub entry_names: Vec<String>,
}

/// Resolve, build, merge and package one job.
pub fn run_job(
    options: &RunOptions,
    raw_args: &[String],
    anchor: &PathAnchor,
    invoker: &Invoker,
) -> ProvepackResult<RunOutput> {
    let mut log = DebugLog::default();
    log.record(format!("anchor: {}", anchor.original().display()));

    let mode = options.conf.build_mode();
    log.record(format!("build mode: {mode:?}"));
    let build = invoker.run(&mode, anchor)?;
    if build.is_some() {
        log.record("build step complete");
    }

    let resolved = context::merge(options, build.as_ref(), anchor)?;
    log.record(format!(
        "merged context: {} artifact(s), {} source(s)",
        resolved.files.len(),
        resolved.sources.len()
    ));

    let engine_command = command::engine_command(&resolved);
    let layout = layout::build_layout(&resolved, options);
    let metadata = RunMetadata::collect(options, raw_args, anchor)?;

    log.record("packaging");
    let rendered = RenderedFiles {
        run_conf: serde_json::to_string_pretty(&options.conf)?,
        metadata: serde_json::to_string_pretty(&metadata)?,
        layout: serde_json::to_string_pretty(&layout)?,
        debug_log: log.render(),
    };
    let packaged = package::package(&resolved, anchor, &rendered)?;

    Ok(RunOutput {
        context: resolved,
        engine_command,
        layout,
        archive_path: packaged.archive_path,
        run_dir: packaged.run_dir,
        entry_names: packaged.entry_names,
    })
}
