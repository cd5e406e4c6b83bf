// Domain errors - Failure taxonomy for the style command grammar

use thiserror::Error;

/// Broad category of a [`CommandError`], for callers that only need to branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Range,
    UnsupportedCommand,
    UnsupportedParameter,
    Structural,
    NameFormat,
}

/// Errors raised while parsing or validating a style
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Token does not have the expected lexical shape
    #[error("Syntax error: '{token}' is not a valid {expected}")]
    Syntax { token: String, expected: String },

    /// Numeric value outside the allowed bounds
    #[error("Range error: {0}")]
    Range(String),

    /// Command name not in the vocabulary of the current codec
    #[error("Unsupported command: {name}")]
    UnsupportedCommand { name: String },

    /// Parameter key unknown, or carrying a value the editor cannot represent
    #[error("Unsupported parameter '{key}' in {command}")]
    UnsupportedParameter { command: String, key: String },

    /// Duplicate or misordered commands, missing companion keys, empty input
    #[error("Structural error: {0}")]
    Structural(String),

    /// Style name rule violated or suffix mismatching the output format
    #[error("Invalid style name: {0}")]
    NameFormat(String),
}

impl CommandError {
    pub fn syntax(token: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Syntax {
            token: token.into(),
            expected: expected.into(),
        }
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub fn unsupported_command(name: impl Into<String>) -> Self {
        Self::UnsupportedCommand { name: name.into() }
    }

    pub fn unsupported_parameter(command: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnsupportedParameter {
            command: command.into(),
            key: key.into(),
        }
    }

    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    pub fn name_format(msg: impl Into<String>) -> Self {
        Self::NameFormat(msg.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Syntax { .. } => ErrorKind::Syntax,
            CommandError::Range(_) => ErrorKind::Range,
            CommandError::UnsupportedCommand { .. } => ErrorKind::UnsupportedCommand,
            CommandError::UnsupportedParameter { .. } => ErrorKind::UnsupportedParameter,
            CommandError::Structural(_) => ErrorKind::Structural,
            CommandError::NameFormat(_) => ErrorKind::NameFormat,
        }
    }
}

/// Result type alias for grammar operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(CommandError::syntax("x", "number").kind(), ErrorKind::Syntax);
        assert_eq!(CommandError::range("x").kind(), ErrorKind::Range);
        assert_eq!(
            CommandError::unsupported_command("x").kind(),
            ErrorKind::UnsupportedCommand
        );
        assert_eq!(
            CommandError::unsupported_parameter("imageView2", "x").kind(),
            ErrorKind::UnsupportedParameter
        );
        assert_eq!(CommandError::structural("x").kind(), ErrorKind::Structural);
        assert_eq!(CommandError::name_format("x").kind(), ErrorKind::NameFormat);
    }

    #[test]
    fn test_display_messages() {
        let err = CommandError::syntax("abc", "integer");
        assert_eq!(err.to_string(), "Syntax error: 'abc' is not a valid integer");

        let err = CommandError::unsupported_parameter("imageView2", "colors");
        assert_eq!(err.to_string(), "Unsupported parameter 'colors' in imageView2");
    }
}
