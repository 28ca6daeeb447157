//! Build step invocation
//!
//! Runs the build mode selected by the conf as a subprocess and parses the
//! JSON it must emit on stdout. Build tools and scripts are opaque beyond
//! that contract: `success`, `project_directory`, `sources` and
//! `executables` are required, inlining/summaries lists optional.
//! A failure reported by the step is surfaced verbatim and never retried.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{ProvepackError, ProvepackResult};
use crate::paths::PathAnchor;

/// Environment variable overriding the dependency-manager program.
pub const CARGO_PROGRAM_ENV: &str = "PROVEPACK_CARGO";

/// Subcommand making the dependency manager emit the build contract.
pub const CARGO_BUILD_ARGS: &[&str] = &["prover-build", "--json"];

/// Argument passed to custom build scripts to select contract output.
pub const SCRIPT_OUTPUT_ARG: &str = "json";

/// How the artifact under verification is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    /// Dependency-manager build (`cargo prover-build --json`)
    CargoBuild,
    /// User-supplied build script honoring the stdout contract
    CustomScript(PathBuf),
    /// Artifact is pre-built; no build step runs
    NoBuild,
}

impl BuildMode {
    /// Whether a build step runs for this mode
    pub fn runs_build(&self) -> bool {
        !matches!(self, BuildMode::NoBuild)
    }
}

/// A path field that external producers write as a string or an array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<PathBuf> {
        match self {
            OneOrMany::One(path) => vec![path],
            OneOrMany::Many(paths) => paths,
        }
    }
}

/// Parsed build-step stdout
///
/// `project_directory` is relative to the directory the step was invoked
/// from; every other path is relative to the resolved project directory.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildScriptOutput {
    pub success: bool,
    pub project_directory: PathBuf,
    pub sources: Vec<PathBuf>,
    pub executables: OneOrMany,
    #[serde(default)]
    pub solana_inlining: Option<OneOrMany>,
    #[serde(default)]
    pub solana_summaries: Option<OneOrMany>,
}

/// Runs build steps as subprocesses from the anchor directory
#[derive(Debug, Clone)]
pub struct Invoker {
    cargo_program: OsString,
}

impl Default for Invoker {
    fn default() -> Self {
        Self {
            cargo_program: OsString::from("cargo"),
        }
    }
}

impl Invoker {
    /// Invoker honoring the `PROVEPACK_CARGO` toolchain override
    pub fn from_env() -> Self {
        match env::var_os(CARGO_PROGRAM_ENV) {
            Some(program) => Self {
                cargo_program: program,
            },
            None => Self::default(),
        }
    }

    /// Invoker with an explicit dependency-manager program
    pub fn with_cargo_program(program: impl Into<OsString>) -> Self {
        Self {
            cargo_program: program.into(),
        }
    }

    /// Run the build step for `mode`, if the mode has one.
    pub fn run(
        &self,
        mode: &BuildMode,
        anchor: &PathAnchor,
    ) -> ProvepackResult<Option<BuildScriptOutput>> {
        match mode {
            BuildMode::NoBuild => Ok(None),
            BuildMode::CargoBuild => {
                let mut cmd = Command::new(&self.cargo_program);
                cmd.args(CARGO_BUILD_ARGS);
                self.invoke(cmd, anchor).map(Some)
            }
            BuildMode::CustomScript(script) => {
                let absolute = anchor.absolute(script);
                if !absolute.is_file() {
                    return Err(ProvepackError::PathNotFound { path: absolute });
                }
                let mut cmd = script_command(&absolute);
                cmd.arg(SCRIPT_OUTPUT_ARG);
                self.invoke(cmd, anchor).map(Some)
            }
        }
    }

    fn invoke(
        &self,
        mut cmd: Command,
        anchor: &PathAnchor,
    ) -> ProvepackResult<BuildScriptOutput> {
        cmd.current_dir(anchor.original())
            .stdin(Stdio::null())
            .stderr(Stdio::inherit());

        let output = cmd.output().map_err(|e| ProvepackError::BuildFailed {
            payload: format!("failed to start build step: {e}"),
        })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let payload = if stdout.trim().is_empty() {
                format!("build step exited with status {}", output.status)
            } else {
                stdout.trim().to_string()
            };
            return Err(ProvepackError::BuildFailed { payload });
        }

        parse_build_output(&stdout)
    }
}

/// Scripts run directly; `.py` scripts run through the interpreter so the
/// exec bit is not required.
fn script_command(script: &Path) -> Command {
    if script.extension().is_some_and(|ext| ext == "py") {
        let mut cmd = Command::new("python3");
        cmd.arg(script);
        cmd
    } else {
        Command::new(script)
    }
}

/// Parse build-step stdout against the contract.
///
/// `success: false` fails with the payload verbatim; a missing or
/// ill-typed required field fails with `BuildOutputInvalid`.
pub fn parse_build_output(stdout: &str) -> ProvepackResult<BuildScriptOutput> {
    let trimmed = stdout.trim();
    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| ProvepackError::BuildOutputInvalid {
            message: format!("build step stdout is not valid JSON: {e}"),
        })?;

    match value.get("success") {
        Some(serde_json::Value::Bool(true)) => {}
        Some(serde_json::Value::Bool(false)) => {
            return Err(ProvepackError::BuildFailed {
                payload: trimmed.to_string(),
            })
        }
        _ => {
            return Err(ProvepackError::BuildOutputInvalid {
                message: "missing required field `success`".to_string(),
            })
        }
    }

    serde_json::from_value(value).map_err(|e| ProvepackError::BuildOutputInvalid {
        message: e.to_string(),
    })
}
