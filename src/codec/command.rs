//! Splitting a command string into sub-commands and joining them back

use super::envelope::decode_envelope;

/// Tokens of one `|`-separated sub-command; the first token is its name
pub type SubCommand = Vec<String>;

/// Split a command body into sub-commands and their `/`-separated tokens.
///
/// One trailing `/` is dropped first. An empty body yields no sub-commands.
pub fn split(commands: &str) -> Vec<SubCommand> {
    let trimmed = commands.strip_suffix('/').unwrap_or(commands);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('|')
        .map(|segment| segment.split('/').map(str::to_string).collect())
        .collect()
}

/// Inverse of [`split`]
pub fn join(sub_commands: &[SubCommand]) -> String {
    sub_commands
        .iter()
        .map(|tokens| tokens.join("/"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Names of every sub-command, ignoring the source-format envelope
pub fn command_names(commands: &str) -> Vec<String> {
    let (_, body) = decode_envelope(commands);
    split(&body)
        .into_iter()
        .filter_map(|tokens| tokens.into_iter().next())
        .collect()
}
