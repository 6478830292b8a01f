//! GitHub Actions runner conventions: action inputs and workflow commands.

use std::env;
use std::io::{self, Write};

const INPUT_PREFIX: &str = "INPUT_";

/// Environment variable the runner exports for the action input `name`.
///
/// The runner upper-cases the name and replaces spaces with underscores;
/// hyphens are kept, so `jira-login` becomes `INPUT_JIRA-LOGIN`.
#[must_use]
pub fn input_env_name(name: &str) -> String {
    format!("{INPUT_PREFIX}{}", name.replace(' ', "_").to_uppercase())
}

/// Value of the action input `name`, trimmed; blank counts as absent.
#[must_use]
pub fn action_input(name: &str) -> Option<String> {
    non_blank_env(&input_env_name(name))
}

/// Value of the environment variable `name`, trimmed; blank counts as absent.
#[must_use]
pub fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Escapes a workflow command message the way the runner decodes it.
#[must_use]
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Writes an `::error::` workflow command that fails the step annotation.
///
/// # Errors
///
/// Returns any error raised while writing to `out`.
pub fn write_error_command(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "::error::{}", escape_data(message))
}
