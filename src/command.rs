//! Engine command rendering
//!
//! Pure function of the resolved context: same context, same command,
//! regardless of filesystem state at render time. Downstream consumers
//! string-match on substrings of the rendered command, so argument order
//! is part of the contract: artifact first, inlining flags, then
//! summaries flags.

use crate::context::ResolvedContext;

/// Engine entry point
pub const ENGINE_JAR: &str = "emv.jar";

/// Flag taking one inlining list file per occurrence
pub const INLINING_FLAG: &str = "-solanaInlining";

/// Flag taking one summaries list file per occurrence
pub const SUMMARIES_FLAG: &str = "-solanaSummaries";

/// The ordered argument list used to invoke the verification engine.
pub fn engine_command(context: &ResolvedContext) -> Vec<String> {
    let mut command = vec![ENGINE_JAR.to_string()];
    for file in &context.files {
        command.push(file.display().to_string());
    }
    for path in &context.inlining {
        command.push(INLINING_FLAG.to_string());
        command.push(path.display().to_string());
    }
    for path in &context.summaries {
        command.push(SUMMARIES_FLAG.to_string());
        command.push(path.display().to_string());
    }
    command
}

/// The command as a single displayable line.
pub fn render_engine_command(context: &ResolvedContext) -> String {
    engine_command(context).join(" ")
}
