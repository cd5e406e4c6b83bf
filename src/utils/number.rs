//! Numeric token parsing and formatting utilities

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::errors::{CommandError, CommandResult};

/// Largest side length that may appear on both axes at once
pub const ULTRA_DIMENSION_THRESHOLD: u32 = 2160;

/// Which leading sign characters a numeric token may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignRule {
    /// No sign character allowed
    #[default]
    None,
    /// Optional `+` or `-`
    Any,
    /// Optional `+`
    Plus,
    /// Optional `-`
    Minus,
}

/// Lexical and range constraints for one numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSpec {
    pub max_decimals: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sign: SignRule,
}

impl NumberSpec {
    /// Unsigned integer within `[min, max]`
    pub fn integer(min: f64, max: f64) -> Self {
        Self {
            max_decimals: 0,
            min: Some(min),
            max: Some(max),
            sign: SignRule::None,
        }
    }

    /// Unsigned decimal within `[min, max]` with at most `max_decimals` fraction digits
    pub fn decimal(max_decimals: usize, min: f64, max: f64) -> Self {
        Self {
            max_decimals,
            min: Some(min),
            max: Some(max),
            sign: SignRule::None,
        }
    }

    pub fn with_sign(mut self, sign: SignRule) -> Self {
        self.sign = sign;
        self
    }

    pub fn without_max(mut self) -> Self {
        self.max = None;
        self
    }

    /// Parse `input` against this spec
    pub fn parse(&self, input: &str) -> CommandResult<f64> {
        parse_number(input, self)
    }
}

fn sign_regex(sign: SignRule) -> &'static Regex {
    static UNSIGNED_RE: OnceLock<Regex> = OnceLock::new();
    static ANY_SIGN_RE: OnceLock<Regex> = OnceLock::new();
    static PLUS_RE: OnceLock<Regex> = OnceLock::new();
    static MINUS_RE: OnceLock<Regex> = OnceLock::new();

    match sign {
        SignRule::None => UNSIGNED_RE.get_or_init(|| {
            Regex::new(r"^\d+(?:\.\d+)?$").expect("unsigned number regex should compile")
        }),
        SignRule::Any => ANY_SIGN_RE.get_or_init(|| {
            Regex::new(r"^[+-]?\d+(?:\.\d+)?$").expect("signed number regex should compile")
        }),
        SignRule::Plus => PLUS_RE.get_or_init(|| {
            Regex::new(r"^\+?\d+(?:\.\d+)?$").expect("plus number regex should compile")
        }),
        SignRule::Minus => MINUS_RE.get_or_init(|| {
            Regex::new(r"^-?\d+(?:\.\d+)?$").expect("minus number regex should compile")
        }),
    }
}

/// Parse a numeric token, enforcing sign, decimal places and inclusive bounds.
///
/// Lexical failures are reported as syntax errors; decimal overflow and
/// bound violations as range errors.
pub fn parse_number(input: &str, spec: &NumberSpec) -> CommandResult<f64> {
    let expected = if spec.max_decimals == 0 { "integer" } else { "number" };
    if !sign_regex(spec.sign).is_match(input) {
        return Err(CommandError::syntax(input, expected));
    }

    if let Some((_, fraction)) = input.split_once('.') {
        if fraction.len() > spec.max_decimals {
            return Err(CommandError::range(format!(
                "{} has more than {} decimal place(s)",
                input, spec.max_decimals
            )));
        }
    }

    let value: f64 = input
        .parse()
        .map_err(|_| CommandError::syntax(input, expected))?;
    if !value.is_finite() {
        return Err(CommandError::syntax(input, expected));
    }

    if let Some(min) = spec.min {
        if value < min {
            return Err(CommandError::range(format!(
                "{} is less than {}",
                input,
                format_number(min)
            )));
        }
    }
    if let Some(max) = spec.max {
        if value > max {
            return Err(CommandError::range(format!(
                "{} is greater than {}",
                input,
                format_number(max)
            )));
        }
    }

    Ok(value)
}

/// Parse an integer token within `[min, max]`
pub fn parse_integer(input: &str, min: i64, max: i64) -> CommandResult<i64> {
    parse_number(input, &NumberSpec::integer(min as f64, max as f64)).map(|v| v as i64)
}

/// Parse an unsigned integer token within `[min, max]`
pub fn parse_u32(input: &str, min: u32, max: u32) -> CommandResult<u32> {
    parse_number(input, &NumberSpec::integer(min as f64, max as f64)).map(|v| v as u32)
}

/// Reject a resolution whose sides both exceed [`ULTRA_DIMENSION_THRESHOLD`]
pub fn ensure_width_height_valid(width: Option<u32>, height: Option<u32>) -> CommandResult<()> {
    if let (Some(w), Some(h)) = (width, height) {
        if w > ULTRA_DIMENSION_THRESHOLD && h > ULTRA_DIMENSION_THRESHOLD {
            return Err(CommandError::range(format!(
                "{}x{}: only one side may exceed {}",
                w, h, ULTRA_DIMENSION_THRESHOLD
            )));
        }
    }
    Ok(())
}

/// Canonical textual form of a parsed number (`5`, `0.1`, `-2.5`)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn test_parse_integer_bounds_are_inclusive() {
        let spec = NumberSpec::integer(1.0, 100.0);
        assert_eq!(spec.parse("1").unwrap(), 1.0);
        assert_eq!(spec.parse("100").unwrap(), 100.0);
        assert_eq!(spec.parse("0").unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(spec.parse("101").unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_syntax_error_precedes_range_check() {
        let spec = NumberSpec::integer(1.0, 100.0);
        assert_eq!(spec.parse("abc").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(spec.parse("").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(spec.parse("1.").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(spec.parse(".5").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(spec.parse("1e3").unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_decimal_places_overflow_is_range_error() {
        let spec = NumberSpec::decimal(2, 0.0, 10.0);
        assert_eq!(spec.parse("1.25").unwrap(), 1.25);
        assert_eq!(spec.parse("1.255").unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(
            NumberSpec::integer(0.0, 10.0).parse("1.5").unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn test_sign_rules() {
        let none = NumberSpec::integer(-10.0, 10.0);
        assert_eq!(none.parse("-1").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(none.parse("+1").unwrap_err().kind(), ErrorKind::Syntax);

        let any = none.with_sign(SignRule::Any);
        assert_eq!(any.parse("-1").unwrap(), -1.0);
        assert_eq!(any.parse("+1").unwrap(), 1.0);

        let plus = none.with_sign(SignRule::Plus);
        assert_eq!(plus.parse("+3").unwrap(), 3.0);
        assert!(plus.parse("-3").is_err());

        let minus = none.with_sign(SignRule::Minus);
        assert_eq!(minus.parse("-3").unwrap(), -3.0);
        assert!(minus.parse("+3").is_err());
    }

    #[test]
    fn test_without_max() {
        let spec = NumberSpec::decimal(3, 0.0, 0.0).without_max();
        assert_eq!(spec.parse("86400.125").unwrap(), 86400.125);
    }

    #[test]
    fn test_ultra_dimension_rule() {
        assert!(ensure_width_height_valid(Some(2160), Some(2160)).is_ok());
        assert!(ensure_width_height_valid(Some(3840), Some(2160)).is_ok());
        assert!(ensure_width_height_valid(Some(2160), Some(3840)).is_ok());
        assert!(ensure_width_height_valid(Some(9999), None).is_ok());
        assert!(ensure_width_height_valid(None, None).is_ok());
        let err = ensure_width_height_valid(Some(2161), Some(2161)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_ultra_dimension_rule_exhaustive_band() {
        let samples = [1u32, 100, 2159, 2160, 2161, 3000, 3840, 9999];
        for &w in &samples {
            for &h in &samples {
                let rejected = w.min(h) > 2160 && w.max(h) > 2160;
                assert_eq!(
                    ensure_width_height_valid(Some(w), Some(h)).is_err(),
                    rejected,
                    "{}x{}",
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(180000.0), "180000");
    }
}
