//! Common test utilities for provepack integration tests.
//!
//! Provides `TestProject` - an isolated on-disk project fixture with the
//! vault-style layout the suites exercise - plus helpers to run the
//! provepack binary and to read archive entry names.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running the provepack binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated on-disk project for a test
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp project"),
        }
    }

    /// Project root (normalized)
    pub fn root(&self) -> PathBuf {
        provepack::paths::normalize(self.dir.path())
    }

    /// Path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write an executable script
    pub fn write_script(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.write(relative, contents);
        make_executable(&path);
        path
    }

    /// Write a shell script that prints `payload` on stdout
    pub fn write_echo_script(&self, relative: &str, payload: &str) -> PathBuf {
        self.write_script(relative, &echo_script(payload))
    }

    /// Run the provepack binary from a directory relative to the root
    pub fn run_from(&self, cwd_relative: &str, args: &[&str]) -> TestResult {
        self.run_from_with_env(cwd_relative, args, &[])
    }

    /// Run the provepack binary with extra environment variables
    pub fn run_from_with_env(
        &self,
        cwd_relative: &str,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let bin = env!("CARGO_BIN_EXE_provepack");
        let mut cmd = Command::new(bin);
        cmd.current_dir(self.path(cwd_relative)).args(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute provepack");
        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Directory the vault fixture's confs live in, relative to the root
pub const VAULT_CONF_DIR: &str = "programs/vault/src/certora/confs";

/// Artifact path of the vault fixture, relative to the root
pub const VAULT_ARTIFACT: &str = "target/sbf-solana-solana/release/certora_vault.so";

/// Vault fixture source files, relative to the root
pub const VAULT_SOURCES: &[&str] = &[
    "programs/vault/src/lib.rs",
    "programs/vault/src/processor.rs",
    "programs/vault/src/state.rs",
];

/// Build a vault-style project fixture: sources, envs, confs for all
/// three build modes, a build script, a fake dependency manager and the
/// pre-built artifact.
pub fn vault_project() -> TestProject {
    let project = TestProject::new();

    for source in VAULT_SOURCES {
        project.write(source, "// vault source\n");
    }
    project.write(
        "programs/vault/src/certora/envs/cvlr_inlining.txt",
        "inline cvlr_*\n",
    );
    project.write(
        "programs/vault/src/certora/envs/cvlr_summaries.txt",
        "summarize cvlr_*\n",
    );
    project.write(VAULT_ARTIFACT, "\x7fELF fake artifact\n");

    let build_json = vault_build_json();
    project.write_echo_script("fake-bin/cargo", &build_json);
    project.write_echo_script("programs/vault/prover_build.sh", &build_json);

    let lists = r#""solana_inlining": ["../envs/cvlr_inlining.txt"],
        "solana_summaries": ["../envs/cvlr_summaries.txt"]"#;
    project.write(
        &format!("{VAULT_CONF_DIR}/conf_cargo.conf"),
        &format!("{{\n        \"cargo_build\": true,\n        {lists}\n}}\n"),
    );
    project.write(
        &format!("{VAULT_CONF_DIR}/conf_script.conf"),
        &format!(
            "{{\n        \"build_script\": \"../../../prover_build.sh\",\n        {lists}\n}}\n"
        ),
    );
    project.write(
        &format!("{VAULT_CONF_DIR}/conf_no_build.conf"),
        &format!(
            "{{\n        \"files\": [\"../../../../../{VAULT_ARTIFACT}\"],\n        {lists}\n}}\n"
        ),
    );

    project
}

/// The build-output payload both the fake dependency manager and the
/// vault build script emit. Paths follow the contract: the project
/// directory is relative to the invocation directory (the confs dir),
/// everything else to the project directory.
pub fn vault_build_json() -> String {
    format!(
        r#"{{
    "success": true,
    "project_directory": "../../../../..",
    "sources": ["{}", "{}", "{}"],
    "executables": "{VAULT_ARTIFACT}"
}}"#,
        VAULT_SOURCES[0], VAULT_SOURCES[1], VAULT_SOURCES[2]
    )
}

/// Shell script printing `payload` verbatim on stdout
pub fn echo_script(payload: &str) -> String {
    format!("#!/bin/sh\ncat <<'PROVEPACK_EOF'\n{payload}\nPROVEPACK_EOF\n")
}

/// Parse provepack CLI args and resolve options against an anchor.
pub fn resolve_options(
    anchor: &provepack::PathAnchor,
    args: &[&str],
) -> provepack::ProvepackResult<provepack::RunOptions> {
    use clap::Parser;
    let mut full = vec!["provepack"];
    full.extend_from_slice(args);
    provepack::ProverCli::try_parse_from(full)
        .expect("CLI args should parse")
        .into_options(anchor)
}

/// Entry names of a zip archive
pub fn zip_entry_names(path: &Path) -> BTreeSet<String> {
    let file = File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("read archive");
    let mut names = BTreeSet::new();
    for index in 0..archive.len() {
        names.insert(archive.by_index(index).unwrap().name().to_string());
    }
    names
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
