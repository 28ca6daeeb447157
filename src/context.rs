//! Merged run context
//!
//! Combines the conf/CLI options with the build step's output into the
//! single configuration object the packager, command builder and report
//! builder all consume. Every stored path is expressed relative to the
//! anchor, so the same job resolves to the same context no matter which
//! subdirectory it executed from.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::builder::{BuildMode, BuildScriptOutput};
use crate::cli::RunOptions;
use crate::error::{ProvepackError, ProvepackResult};
use crate::paths::PathAnchor;

/// The resolved configuration of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    /// Artifact paths; exactly one for a single-program job
    pub files: Vec<PathBuf>,
    /// Anchored to the original working directory, like every other path
    pub project_directory: PathBuf,
    /// Source files to package
    pub sources: BTreeSet<PathBuf>,
    /// Inlining list files, CLI entries before build-output entries
    pub inlining: Vec<PathBuf>,
    /// Summaries list files, same ordering rule
    pub summaries: Vec<PathBuf>,
    pub build_mode: BuildMode,
}

/// Merge conf/CLI options with the optional build output.
///
/// Precedence, most specific wins:
/// - project directory: the build output's value when a build step ran,
///   resolved against the directory it was invoked from; otherwise the
///   anchor itself
/// - files: build-output executables when a build step ran, otherwise the
///   conf artifact paths (which must already exist)
/// - inlining/summaries: conf entries first, then build-output entries,
///   deduplicated by first occurrence
pub fn merge(
    options: &RunOptions,
    build: Option<&BuildScriptOutput>,
    anchor: &PathAnchor,
) -> ProvepackResult<ResolvedContext> {
    let build_mode = options.conf.build_mode();

    // Build steps are invoked from the anchor directory, so their
    // project_directory resolves against it.
    let project_abs = match build {
        Some(output) => anchor.absolute(&output.project_directory),
        None => anchor.original().to_path_buf(),
    };
    if !project_abs.is_dir() {
        return Err(ProvepackError::PathNotFound { path: project_abs });
    }

    let files = match build {
        Some(output) => {
            let executables = output.executables.clone().into_vec();
            if executables.len() != 1 {
                return Err(ProvepackError::BuildOutputInvalid {
                    message: format!(
                        "expected exactly one executable, got {}",
                        executables.len()
                    ),
                });
            }
            resolve_all(&executables, &project_abs, anchor)?
        }
        None => {
            if options.conf.files.len() != 1 {
                return Err(ProvepackError::ArgumentRejected {
                    message: format!(
                        "exactly one artifact file is required, got {}",
                        options.conf.files.len()
                    ),
                });
            }
            let paths: Vec<PathBuf> =
                options.conf.files.iter().map(PathBuf::from).collect();
            resolve_all(&paths, anchor.original(), anchor)?
        }
    };

    let mut sources: BTreeSet<PathBuf> = BTreeSet::new();
    if let Some(output) = build {
        for source in resolve_all(&output.sources, &project_abs, anchor)? {
            sources.insert(source);
        }
    }
    if let Some(conf_file) = &options.conf_file {
        sources.insert(anchor.resolve(conf_file, anchor.original())?);
    }
    if let BuildMode::CustomScript(script) = &build_mode {
        sources.insert(anchor.resolve(script, anchor.original())?);
    }

    let inlining = merge_path_lists(
        &resolve_all(&as_paths(&options.conf.solana_inlining), anchor.original(), anchor)?,
        &resolve_build_list(build.and_then(|o| o.solana_inlining.clone()), &project_abs, anchor)?,
    );
    let summaries = merge_path_lists(
        &resolve_all(&as_paths(&options.conf.solana_summaries), anchor.original(), anchor)?,
        &resolve_build_list(build.and_then(|o| o.solana_summaries.clone()), &project_abs, anchor)?,
    );

    Ok(ResolvedContext {
        files,
        project_directory: anchor.relativize(&project_abs),
        sources,
        inlining,
        summaries,
        build_mode,
    })
}

/// Concatenate two resolved lists, keeping the first occurrence of each
/// entry. `first` always precedes `second` in the result.
pub fn merge_path_lists(first: &[PathBuf], second: &[PathBuf]) -> Vec<PathBuf> {
    let mut merged: Vec<PathBuf> = Vec::with_capacity(first.len() + second.len());
    for path in first.iter().chain(second) {
        if !merged.contains(path) {
            merged.push(path.clone());
        }
    }
    merged
}

fn as_paths(raw: &[String]) -> Vec<PathBuf> {
    raw.iter().map(PathBuf::from).collect()
}

fn resolve_all(
    paths: &[PathBuf],
    base: &Path,
    anchor: &PathAnchor,
) -> ProvepackResult<Vec<PathBuf>> {
    paths.iter().map(|p| anchor.resolve(p, base)).collect()
}

fn resolve_build_list(
    list: Option<crate::builder::OneOrMany>,
    project_abs: &Path,
    anchor: &PathAnchor,
) -> ProvepackResult<Vec<PathBuf>> {
    match list {
        Some(entries) => resolve_all(&entries.into_vec(), project_abs, anchor),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::OneOrMany;
    use crate::cli::RunOptions;
    use crate::conf::RunConf;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn build_output(project: &str, executable: &str) -> BuildScriptOutput {
        crate::builder::parse_build_output(&format!(
            r#"{{
                "success": true,
                "project_directory": "{project}",
                "sources": [],
                "executables": "{executable}"
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn no_build_uses_conf_files() {
        let dir = tempdir().unwrap();
        let root = crate::paths::normalize(dir.path());
        touch(&root.join("empty.so"));

        let anchor = PathAnchor::at(&root);
        let options = RunOptions::from_conf(RunConf {
            files: vec!["empty.so".to_string()],
            ..RunConf::default()
        });

        let context = merge(&options, None, &anchor).unwrap();
        assert_eq!(context.files, vec![PathBuf::from("empty.so")]);
        assert_eq!(context.project_directory, PathBuf::from("."));
        assert!(context.sources.is_empty());
        assert_eq!(context.build_mode, BuildMode::NoBuild);
    }

    #[test]
    fn build_output_wins_project_directory_and_files() {
        let dir = tempdir().unwrap();
        let root = crate::paths::normalize(dir.path());
        touch(&root.join("project/target/vault.so"));

        let anchor = PathAnchor::at(root.join("project/confs"));
        let options = RunOptions::from_conf(RunConf {
            cargo_build: true,
            ..RunConf::default()
        });
        let output = build_output("..", "target/vault.so");

        let context = merge(&options, Some(&output), &anchor).unwrap();
        assert_eq!(context.project_directory, PathBuf::from(".."));
        assert_eq!(context.files, vec![PathBuf::from("../target/vault.so")]);
    }

    #[test]
    fn build_lists_resolve_against_project_directory() {
        let dir = tempdir().unwrap();
        let root = crate::paths::normalize(dir.path());
        touch(&root.join("sub/inline.txt"));
        touch(&root.join("sub/a.so"));
        fs::create_dir_all(root.join("sub")).unwrap();

        let anchor = PathAnchor::at(&root);
        let options = RunOptions::from_conf(RunConf {
            cargo_build: true,
            ..RunConf::default()
        });
        let mut output = build_output("sub", "a.so");
        output.solana_inlining = Some(OneOrMany::One(PathBuf::from("inline.txt")));

        let context = merge(&options, Some(&output), &anchor).unwrap();
        assert_eq!(context.inlining, vec![PathBuf::from("sub/inline.txt")]);
    }

    #[test]
    fn conf_entries_precede_build_entries_deduplicated() {
        let dir = tempdir().unwrap();
        let root = crate::paths::normalize(dir.path());
        touch(&root.join("cli.txt"));
        touch(&root.join("shared.txt"));
        touch(&root.join("build.txt"));
        touch(&root.join("a.so"));

        let anchor = PathAnchor::at(&root);
        let options = RunOptions::from_conf(RunConf {
            cargo_build: true,
            solana_inlining: vec!["cli.txt".to_string(), "shared.txt".to_string()],
            ..RunConf::default()
        });
        let mut output = build_output(".", "a.so");
        output.solana_inlining = Some(OneOrMany::Many(vec![
            PathBuf::from("shared.txt"),
            PathBuf::from("build.txt"),
        ]));

        let context = merge(&options, Some(&output), &anchor).unwrap();
        assert_eq!(
            context.inlining,
            vec![
                PathBuf::from("cli.txt"),
                PathBuf::from("shared.txt"),
                PathBuf::from("build.txt"),
            ]
        );
    }

    #[test]
    fn missing_artifact_is_path_not_found() {
        let dir = tempdir().unwrap();
        let anchor = PathAnchor::at(dir.path());
        let options = RunOptions::from_conf(RunConf {
            files: vec!["missing.so".to_string()],
            ..RunConf::default()
        });

        let err = merge(&options, None, &anchor).unwrap_err();
        assert!(matches!(err, ProvepackError::PathNotFound { .. }));
    }

    #[test]
    fn more_than_one_executable_is_rejected() {
        let dir = tempdir().unwrap();
        let root = crate::paths::normalize(dir.path());
        touch(&root.join("a.so"));
        touch(&root.join("b.so"));

        let anchor = PathAnchor::at(&root);
        let options = RunOptions::from_conf(RunConf {
            cargo_build: true,
            ..RunConf::default()
        });
        let mut output = build_output(".", "a.so");
        output.executables =
            OneOrMany::Many(vec![PathBuf::from("a.so"), PathBuf::from("b.so")]);

        let err = merge(&options, Some(&output), &anchor).unwrap_err();
        assert!(matches!(err, ProvepackError::BuildOutputInvalid { .. }));
    }

    #[test]
    fn merge_path_lists_keeps_first_occurrence() {
        let merged = merge_path_lists(
            &[PathBuf::from("a"), PathBuf::from("b")],
            &[PathBuf::from("b"), PathBuf::from("c"), PathBuf::from("a")],
        );
        assert_eq!(
            merged,
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
    }
}
