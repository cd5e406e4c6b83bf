//! Style name, suffix and file key helpers

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::codec::command::command_names;
use crate::domain::errors::{CommandError, CommandResult};
use crate::domain::model::Style;

/// Commands whose results are always cached server side
pub const FORCE_PERSISTENCE_COMMANDS: &[&str] = &["avthumb", "vframe", "avhls"];

pub const DEFAULT_SEPARATOR: &str = "-";

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[0-9A-Za-z.]{1,60}$").expect("style name regex should compile")
    })
}

/// A style name split into its base and optional format suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleName {
    pub base: String,
    pub suffix: Option<String>,
}

/// Split `name` on its last `.`.
///
/// A bare trailing `.` or a suffix outside `allowed_suffixes` leaves the
/// whole name as the base.
pub fn parse_style_name(name: &str, allowed_suffixes: Option<&[String]>) -> StyleName {
    let whole = || StyleName {
        base: name.to_string(),
        suffix: None,
    };
    let Some((base, suffix)) = name.rsplit_once('.') else {
        return whole();
    };
    if suffix.is_empty() {
        return whole();
    }
    if let Some(allowed) = allowed_suffixes {
        if !allowed.iter().any(|s| s == suffix) {
            return whole();
        }
    }
    StyleName {
        base: base.to_string(),
        suffix: Some(suffix.to_string()),
    }
}

/// Check the name charset and that its suffix names `output_format`.
///
/// A suffix outside `allowed_suffixes` is not a suffix, so it never
/// conflicts with the output format.
pub fn validate_style_name(
    name: &str,
    output_format: Option<&str>,
    allowed_suffixes: Option<&[String]>,
) -> CommandResult<StyleName> {
    if !name_regex().is_match(name) {
        return Err(CommandError::name_format(format!(
            "'{}' must be 1-60 characters of 0-9, A-Z, a-z or '.'",
            name
        )));
    }
    let parsed = parse_style_name(name, allowed_suffixes);
    if let (Some(suffix), Some(format)) = (parsed.suffix.as_deref(), output_format) {
        if suffix != format {
            return Err(CommandError::name_format(format!(
                "suffix '.{}' of '{}' does not match output format '{}'",
                suffix, name, format
            )));
        }
    }
    Ok(parsed)
}

/// Whether any command in `commands` is an expensive operation
pub fn is_force_persistence(commands: &str) -> bool {
    command_names(commands)
        .iter()
        .any(|name| FORCE_PERSISTENCE_COMMANDS.contains(&name.as_str()))
}

/// File key the styled variant of `raw_name` is served under.
///
/// A source-format scoped style replaces the extension of `raw_name`;
/// otherwise the style name is appended to the whole key.
pub fn get_styled_file_key(raw_name: &str, style: &Style, separator: &str) -> String {
    let stem = match (style.source_format(), raw_name.rsplit_once('.')) {
        (Some(_), Some((stem, ext))) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => raw_name,
    };
    format!("{}{}{}", stem, separator, style.name)
}
