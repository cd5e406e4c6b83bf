//! `$0.<format>?` source-format envelope

use std::sync::OnceLock;

use regex::Regex;

fn envelope_regex() -> &'static Regex {
    static ENVELOPE_RE: OnceLock<Regex> = OnceLock::new();
    ENVELOPE_RE.get_or_init(|| {
        Regex::new(r"^\$0\.([^?/]+)\?").expect("envelope regex should compile")
    })
}

/// Split a command string into its scoped source format and the remaining body.
///
/// Anything that is not a well-formed leading envelope is treated as having
/// no envelope at all; this never fails.
pub fn decode_envelope(commands: &str) -> (Option<String>, String) {
    match envelope_regex().captures(commands) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let format = caps.get(1).map(|m| m.as_str().to_string());
            (format, commands[whole..].to_string())
        }
        None => (None, commands.to_string()),
    }
}

/// Prefix `body` with the envelope for `source_format`; empty formats are dropped
pub fn encode_envelope(source_format: Option<&str>, body: &str) -> String {
    match source_format {
        Some(format) if !format.is_empty() => format!("$0.{}?{}", format, body),
        _ => body.to_string(),
    }
}

/// True when both strings have identical bodies and agree on envelope presence
pub fn is_source_format_scoped_equal(a: &str, b: &str) -> bool {
    let (a_format, a_body) = decode_envelope(a);
    let (b_format, b_body) = decode_envelope(b);
    a_body == b_body && a_format.is_some() == b_format.is_some()
}
