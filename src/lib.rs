//! provepack - build-context resolution and source packaging for
//! verification jobs
//!
//! provepack turns a job description (conf file and/or CLI flags) into a
//! resolved run context, invokes the selected build step, and packages
//! the resolved sources and artifacts into a reproducible archive for a
//! local or remote verification engine.

pub mod builder;
pub mod cli;
pub mod command;
pub mod conf;
pub mod context;
pub mod docs;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod package;
pub mod paths;
pub mod pipeline;

// Re-exports for convenience
pub use builder::{BuildMode, BuildScriptOutput, Invoker, OneOrMany};
pub use cli::{ProverCli, RunOptions};
pub use command::{engine_command, render_engine_command};
pub use conf::{load_conf, RunConf, Server};
pub use context::{merge, ResolvedContext};
pub use error::{ProvepackError, ProvepackResult};
pub use layout::{build_layout, ConfigurationLayout};
pub use paths::{PathAnchor, ScopedDir};
pub use pipeline::{run_job, RunOutput};
