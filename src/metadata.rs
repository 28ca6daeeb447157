//! Run metadata and debug log
//!
//! Every archive carries a metadata descriptor identifying the tool
//! version, the raw invocation and the conf file it ran from, plus a
//! debug log of the pipeline's steps. Both live at fixed top-level
//! archive names.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::cli::RunOptions;
use crate::error::ProvepackResult;
use crate::paths::PathAnchor;

/// Archive metadata descriptor (`.provepack_metadata.json`)
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub tool: String,
    pub version: String,
    pub timestamp: String,
    pub raw_args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf_hash: Option<String>,
    pub server: String,
}

impl RunMetadata {
    /// Collect the descriptor for a run.
    pub fn collect(
        options: &RunOptions,
        raw_args: &[String],
        anchor: &PathAnchor,
    ) -> ProvepackResult<Self> {
        let conf_hash = match &options.conf_file {
            Some(conf_file) => {
                let bytes = std::fs::read(anchor.absolute(conf_file))?;
                Some(hash_content(&bytes))
            }
            None => None,
        };

        Ok(Self {
            tool: "provepack".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            raw_args: raw_args.to_vec(),
            conf_file: options.conf_file.clone(),
            conf_hash,
            server: options.conf.effective_server().to_string(),
        })
    }
}

/// Compute the SHA-256 hash of content, in `sha256:<hex>` form.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

/// Collected log of the pipeline's steps, archived as
/// `provepack_debug_log.txt`.
#[derive(Debug, Default)]
pub struct DebugLog {
    lines: Vec<String>,
}

impl DebugLog {
    pub fn record(&mut self, message: impl AsRef<str>) {
        self.lines.push(format!(
            "{} {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            message.as_ref()
        ));
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
