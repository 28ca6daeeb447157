//! CLI surface for the prover front end
//!
//! Thin by design: flags map onto `RunConf` fields and CLI values win over
//! conf-file values. Validation of mode-incompatible flags happens here,
//! before anything touches the disk, so a rejected invocation has no side
//! effects.

use std::path::PathBuf;

use clap::Parser;

use crate::conf::{self, RunConf, Server};
use crate::error::{ProvepackError, ProvepackResult};
use crate::paths::PathAnchor;

/// provepack - resolve, build and package a verification job
#[derive(Parser, Debug)]
#[command(name = "provepack")]
#[command(author, version, about, long_about = None)]
pub struct ProverCli {
    /// Run conf file (.conf) or pre-built artifact to verify
    pub input: PathBuf,

    /// Verification server to submit to
    #[arg(long, value_enum)]
    pub server: Option<Server>,

    /// Rule to verify
    #[arg(long)]
    pub rule: Option<String>,

    /// Engine version used by remote servers
    #[arg(long)]
    pub prover_version: Option<String>,

    /// Custom build script emitting the build-output contract on stdout
    #[arg(long, value_name = "SCRIPT")]
    pub build_script: Option<PathBuf>,

    /// Build through the dependency manager
    #[arg(long)]
    pub cargo: bool,

    /// Inlining list file passed to the engine (repeatable)
    #[arg(long, value_name = "FILE")]
    pub solana_inlining: Vec<String>,

    /// Summaries list file passed to the engine (repeatable)
    #[arg(long, value_name = "FILE")]
    pub solana_summaries: Vec<String>,

    /// Stop after packaging and print the engine command
    #[arg(long)]
    pub build_only: bool,

    /// EVM compiler selection; recognized so it can be rejected clearly
    #[arg(long, hide = true, value_name = "VERSION")]
    pub solc: Option<String>,
}

/// Options of a run after conf loading and CLI overlay
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Conf file as supplied, when the input was a conf file
    pub conf_file: Option<PathBuf>,
    /// Effective options
    pub conf: RunConf,
    pub build_only: bool,
}

impl RunOptions {
    /// Options built directly from a conf, bypassing the CLI layer
    pub fn from_conf(conf: RunConf) -> Self {
        Self {
            conf_file: None,
            conf,
            build_only: false,
        }
    }
}

impl ProverCli {
    /// Validate the flag set and fold the CLI over the conf file.
    pub fn into_options(self, anchor: &PathAnchor) -> ProvepackResult<RunOptions> {
        if self.solc.is_some() {
            return Err(ProvepackError::unrecognized_arguments("--solc"));
        }

        let is_conf = self.input.extension().is_some_and(|ext| ext == "conf");

        let (conf_file, mut conf) = if is_conf {
            let loaded = conf::load_conf(&anchor.absolute(&self.input))?;
            (Some(self.input), loaded)
        } else {
            let conf = RunConf {
                files: vec![self.input.display().to_string()],
                ..RunConf::default()
            };
            (None, conf)
        };

        if let Some(server) = self.server {
            conf.server = Some(server);
        }
        if let Some(rule) = self.rule {
            conf.rule = Some(rule);
        }
        if let Some(version) = self.prover_version {
            conf.prover_version = Some(version);
        }
        if let Some(script) = self.build_script {
            conf.build_script = Some(script.display().to_string());
        }
        if self.cargo {
            conf.cargo_build = true;
        }
        if !self.solana_inlining.is_empty() {
            conf.solana_inlining = self.solana_inlining;
        }
        if !self.solana_summaries.is_empty() {
            conf.solana_summaries = self.solana_summaries;
        }
        if conf.server.is_none() {
            conf.server = Some(Server::Local);
        }

        Ok(RunOptions {
            conf_file,
            conf,
            build_only: self.build_only,
        })
    }
}
