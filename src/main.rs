//! provepack CLI - resolve, build and package a verification job
//!
//! Usage: provepack <INPUT> [OPTIONS]
//!
//! INPUT is a run conf file (.conf) or a pre-built artifact. The selected
//! build mode produces the artifact, the resolved sources are packaged
//! into an archive, and the engine is invoked (or the job is handed to a
//! remote server) unless --build-only stops after packaging.

use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;

use provepack::builder::Invoker;
use provepack::cli::ProverCli;
use provepack::conf::Server;
use provepack::paths::PathAnchor;

fn main() -> Result<()> {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let cli = ProverCli::parse();

    // Captured before anything can change directory.
    let anchor = PathAnchor::capture()?;
    let options = cli.into_options(&anchor)?;

    println!("📦 provepack");
    match &options.conf_file {
        Some(conf) => println!("Conf: {}", conf.display()),
        None => println!("Artifact: {}", options.conf.files.join(", ")),
    }
    println!("Mode: {:?}", options.conf.build_mode());

    let invoker = Invoker::from_env();
    let output = provepack::pipeline::run_job(&options, &raw_args, &anchor, &invoker)?;

    println!(
        "\n✓ Resolved context: {} artifact, {} sources",
        output.context.files.len(),
        output.context.sources.len()
    );
    println!("✓ Archive: {}", output.archive_path.display());
    println!("Engine command: {}", output.engine_command.join(" "));

    if options.build_only {
        return Ok(());
    }

    match options.conf.effective_server() {
        Server::Local => run_engine(&output.engine_command),
        server => {
            println!("\nPrepared archive for {server} submission.");
            Ok(())
        }
    }
}

/// Launch the verification engine locally and forward its exit status.
fn run_engine(engine_command: &[String]) -> Result<()> {
    let status = Command::new("java")
        .arg("-jar")
        .args(engine_command)
        .status()
        .context("failed to launch verification engine")?;

    if !status.success() {
        anyhow::bail!("verification engine exited with {status}");
    }
    Ok(())
}
