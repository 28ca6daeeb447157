//! Run configuration
//!
//! A job is described by a JSON conf file, CLI flags, or both; CLI flags
//! take precedence over conf values. Unknown conf keys are rejected the
//! same way unknown CLI flags are - a job must never run with an option
//! silently dropped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::BuildMode;
use crate::error::{ProvepackError, ProvepackResult};

/// Verification server a job is submitted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    /// Run the engine on this machine
    #[default]
    Local,
    Staging,
    Production,
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Server::Local => "local",
            Server::Staging => "staging",
            Server::Production => "production",
        };
        f.write_str(name)
    }
}

/// The options of a run, as read from a conf file and overlaid with CLI
/// flags. Serialized verbatim into the archive as `run.conf`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConf {
    /// Artifact path(s); exactly one is required for a no-build job
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Custom build script emitting the build-output contract on stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_script: Option<String>,

    /// Build through the dependency manager instead of a script
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cargo_build: bool,

    /// Inlining list files passed through to the engine
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solana_inlining: Vec<String>,

    /// Summaries list files passed through to the engine
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solana_summaries: Vec<String>,

    /// Rule to verify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,

    /// Engine version for remote runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prover_version: Option<String>,
}

impl RunConf {
    /// Which build mode these options select
    pub fn build_mode(&self) -> BuildMode {
        if let Some(script) = &self.build_script {
            BuildMode::CustomScript(PathBuf::from(script))
        } else if self.cargo_build {
            BuildMode::CargoBuild
        } else {
            BuildMode::NoBuild
        }
    }

    /// Effective server, defaulting to a local run
    pub fn effective_server(&self) -> Server {
        self.server.unwrap_or_default()
    }
}

/// Load a conf file, rejecting unknown keys.
pub fn load_conf(path: &Path) -> ProvepackResult<RunConf> {
    let text = fs::read_to_string(path).map_err(|_| ProvepackError::PathNotFound {
        path: path.to_path_buf(),
    })?;

    let mut unknown: Vec<String> = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(&text);
    let conf: RunConf = serde_ignored::deserialize(&mut deserializer, |key| {
        unknown.push(key.to_string());
    })
    .map_err(|e| ProvepackError::ConfInvalid {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !unknown.is_empty() {
        return Err(ProvepackError::unrecognized_arguments(&unknown.join(", ")));
    }
    Ok(conf)
}
