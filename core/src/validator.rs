//! Value validators for declared options.
//!
//! Each [`OptionRule`](crate::OptionRule) carries one [`Validator`]. The
//! parser hands it the raw value (or `None` when the option appeared without
//! one) and stores whatever the validator returns.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::value::{OptionValue, Scalar};

/// Options for [`Validator::Integer`].
///
/// `allow_hex` accepts a `0x` prefix, `allow_octal` accepts `0o` or a bare
/// leading zero. Without `allow_octal`, decimal values with leading zeros
/// are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerRule {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub allow_hex: bool,
    pub allow_octal: bool,
}

/// Options for [`Validator::Float`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Strip `,` separators before parsing (`1,000.5`).
    pub allow_thousands: bool,
}

/// A regular expression for [`Validator::Pattern`], compiled anchored at
/// both ends so alternations are tried against the whole value.
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: String,
    regex: Regex,
}

impl PatternRule {
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&format!("^(?:{pattern})$"))?,
        })
    }

    /// The pattern as written, without the anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

type CheckFn = dyn Fn(&str) -> Option<Scalar> + Send + Sync;

/// A caller-supplied predicate that coerces a value or rejects it with `None`.
#[derive(Clone)]
pub struct CustomValidator {
    name: String,
    check: Arc<CheckFn>,
}

impl CustomValidator {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> Option<Scalar> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Why a validator rejected a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("a value is required")]
    MissingValue,
    #[error("not an integer: {0}")]
    NotInteger(String),
    #[error("not a number: {0}")]
    NotNumber(String),
    #[error("not a boolean: {0}")]
    NotBoolean(String),
    #[error("{value} is out of range")]
    OutOfRange { value: String },
    #[error("{value} does not match {pattern}")]
    PatternMismatch { value: String, pattern: String },
    #[error("{value} rejected by {validator}")]
    Rejected { value: String, validator: String },
}

/// The closed set of value validators.
///
/// # Examples
///
/// ```
/// use cliparse_core::{IntegerRule, OptionValue, Validator};
///
/// let port = Validator::Integer(IntegerRule {
///     min: Some(1),
///     max: Some(65535),
///     ..Default::default()
/// });
/// assert_eq!(port.validate(Some("8080")).unwrap().as_i64(), Some(8080));
/// assert!(port.validate(Some("0")).is_err());
/// assert!(port.validate(None).is_err());
///
/// assert_eq!(Validator::AcceptAny.validate(None).unwrap(), OptionValue::Present);
/// ```
#[derive(Debug, Clone, Default)]
pub enum Validator {
    /// Store the value verbatim, or `Present` when there is none.
    #[default]
    AcceptAny,
    Integer(IntegerRule),
    Float(FloatRule),
    /// `1/true/on/yes` and `0/false/off/no/""`, case-insensitive.
    /// No value reads as `true`.
    Boolean,
    /// The whole value must match.
    Pattern(PatternRule),
    Custom(CustomValidator),
}

impl Validator {
    /// Integer validator without range limits.
    pub fn integer() -> Self {
        Self::Integer(IntegerRule::default())
    }

    /// Float validator without range limits.
    pub fn float() -> Self {
        Self::Float(FloatRule::default())
    }

    /// Compiles `pattern` anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        PatternRule::new(pattern).map(Self::Pattern)
    }

    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> Option<Scalar> + Send + Sync + 'static,
    {
        Self::Custom(CustomValidator::new(name, check))
    }

    /// Short name of the validator kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AcceptAny => "any",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean => "boolean",
            Self::Pattern(_) => "pattern",
            Self::Custom(_) => "custom",
        }
    }

    /// Validates `value`, returning the value to store.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidatorError`] describing the rejection.
    pub fn validate(&self, value: Option<&str>) -> Result<OptionValue, ValidatorError> {
        let Some(raw) = value else {
            return match self {
                Self::AcceptAny | Self::Boolean => Ok(OptionValue::Present),
                _ => Err(ValidatorError::MissingValue),
            };
        };

        let scalar = match self {
            Self::AcceptAny => Scalar::Text(raw.to_string()),
            Self::Integer(rule) => Scalar::Integer(validate_integer(raw, rule)?),
            Self::Float(rule) => Scalar::Float(validate_float(raw, rule)?),
            Self::Boolean => Scalar::Bool(
                parse_bool(raw).ok_or_else(|| ValidatorError::NotBoolean(raw.to_string()))?,
            ),
            Self::Pattern(rule) => {
                if !rule.is_match(raw) {
                    return Err(ValidatorError::PatternMismatch {
                        value: raw.to_string(),
                        pattern: rule.as_str().to_string(),
                    });
                }
                Scalar::Text(raw.to_string())
            }
            Self::Custom(custom) => {
                (custom.check)(raw).ok_or_else(|| ValidatorError::Rejected {
                    value: raw.to_string(),
                    validator: custom.name.clone(),
                })?
            }
        };

        Ok(OptionValue::Value(scalar))
    }
}

fn validate_integer(raw: &str, rule: &IntegerRule) -> Result<i64, ValidatorError> {
    let parsed =
        parse_integer(raw, rule).ok_or_else(|| ValidatorError::NotInteger(raw.to_string()))?;
    let below = rule.min.is_some_and(|min| parsed < min);
    let above = rule.max.is_some_and(|max| parsed > max);
    if below || above {
        return Err(ValidatorError::OutOfRange {
            value: raw.to_string(),
        });
    }
    Ok(parsed)
}

fn parse_integer(raw: &str, rule: &IntegerRule) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .filter(|_| rule.allow_hex);
    let octal = digits
        .strip_prefix("0o")
        .or_else(|| digits.strip_prefix("0O"))
        .filter(|_| rule.allow_octal);

    let (radix, body) = match (hex, octal) {
        (Some(hex), _) => (16, hex),
        (None, Some(octal)) => (8, octal),
        (None, None) if digits.len() > 1 && digits.starts_with('0') => {
            if !rule.allow_octal {
                return None;
            }
            (8, &digits[1..])
        }
        (None, None) => (10, digits),
    };

    if body.is_empty() || !body.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    let magnitude = i128::from_str_radix(body, radix).ok()?;
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn validate_float(raw: &str, rule: &FloatRule) -> Result<f64, ValidatorError> {
    let trimmed = raw.trim();
    let cleaned = if rule.allow_thousands {
        trimmed.replace(',', "")
    } else {
        trimmed.to_string()
    };
    let parsed = cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidatorError::NotNumber(raw.to_string()))?;

    let below = rule.min.is_some_and(|min| parsed < min);
    let above = rule.max.is_some_and(|max| parsed > max);
    if below || above {
        return Err(ValidatorError::OutOfRange {
            value: raw.to_string(),
        });
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_any_keeps_text_verbatim() {
        let value = Validator::AcceptAny.validate(Some(" spaced value ")).unwrap();
        assert_eq!(value.as_str(), Some(" spaced value "));
    }

    #[test]
    fn test_integer_accepts_signed_decimal() {
        let v = Validator::integer();
        assert_eq!(v.validate(Some("123")).unwrap().as_i64(), Some(123));
        assert_eq!(v.validate(Some("-7")).unwrap().as_i64(), Some(-7));
        assert_eq!(v.validate(Some("+7")).unwrap().as_i64(), Some(7));
        assert_eq!(v.validate(Some("0")).unwrap().as_i64(), Some(0));
    }

    #[test]
    fn test_integer_rejects_garbage_and_missing_value() {
        let v = Validator::integer();
        assert_eq!(
            v.validate(Some("abc")),
            Err(ValidatorError::NotInteger("abc".to_string()))
        );
        assert!(v.validate(Some("12.5")).is_err());
        assert!(v.validate(Some("")).is_err());
        assert_eq!(v.validate(None), Err(ValidatorError::MissingValue));
    }

    #[test]
    fn test_integer_leading_zero_requires_octal_flag() {
        assert!(Validator::integer().validate(Some("017")).is_err());

        let octal = Validator::Integer(IntegerRule {
            allow_octal: true,
            ..Default::default()
        });
        assert_eq!(octal.validate(Some("017")).unwrap().as_i64(), Some(15));
        assert_eq!(octal.validate(Some("0o17")).unwrap().as_i64(), Some(15));
    }

    #[test]
    fn test_integer_hex_flag() {
        assert!(Validator::integer().validate(Some("0xff")).is_err());

        let hex = Validator::Integer(IntegerRule {
            allow_hex: true,
            ..Default::default()
        });
        assert_eq!(hex.validate(Some("0xff")).unwrap().as_i64(), Some(255));
        assert_eq!(hex.validate(Some("-0X10")).unwrap().as_i64(), Some(-16));
    }

    #[test]
    fn test_integer_range_and_overflow() {
        let ranged = Validator::Integer(IntegerRule {
            min: Some(1),
            max: Some(10),
            ..Default::default()
        });
        assert!(ranged.validate(Some("10")).is_ok());
        assert_eq!(
            ranged.validate(Some("11")),
            Err(ValidatorError::OutOfRange {
                value: "11".to_string()
            })
        );
        assert!(
            Validator::integer()
                .validate(Some("99999999999999999999"))
                .is_err()
        );
        assert_eq!(
            Validator::integer()
                .validate(Some("-9223372036854775808"))
                .unwrap()
                .as_i64(),
            Some(i64::MIN)
        );
    }

    #[test]
    fn test_float_parses_and_checks_range() {
        let v = Validator::Float(FloatRule {
            min: Some(0.0),
            max: Some(1.0),
            allow_thousands: false,
        });
        assert_eq!(v.validate(Some("0.25")).unwrap().as_f64(), Some(0.25));
        assert!(v.validate(Some("1.5")).is_err());
        assert!(v.validate(Some("inf")).is_err());
        assert!(v.validate(Some("NaN")).is_err());
    }

    #[test]
    fn test_float_thousands_separator() {
        assert!(Validator::float().validate(Some("1,000.5")).is_err());
        let v = Validator::Float(FloatRule {
            allow_thousands: true,
            ..Default::default()
        });
        assert_eq!(v.validate(Some("1,000.5")).unwrap().as_f64(), Some(1000.5));
    }

    #[test]
    fn test_boolean_forms() {
        let v = Validator::Boolean;
        assert_eq!(v.validate(Some("YES")).unwrap().as_bool(), Some(true));
        assert_eq!(v.validate(Some("off")).unwrap().as_bool(), Some(false));
        assert_eq!(v.validate(None).unwrap(), OptionValue::Present);
        assert_eq!(
            v.validate(Some("maybe")),
            Err(ValidatorError::NotBoolean("maybe".to_string()))
        );
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        let v = Validator::pattern("a|ab").unwrap();
        assert_eq!(v.validate(Some("ab")).unwrap().as_str(), Some("ab"));
        assert!(v.validate(Some("abc")).is_err());
        assert!(v.validate(None).is_err());
        assert!(Validator::pattern("(").is_err());
    }

    #[test]
    fn test_pattern_rule_requires_full_match() {
        let v = Validator::Pattern(PatternRule::new("[0-9]+").unwrap());
        assert!(v.validate(Some("123")).is_ok());
        assert!(v.validate(Some("x123")).is_err());
    }

    #[test]
    fn test_pattern_rule_tries_longer_alternative() {
        let v = Validator::Pattern(PatternRule::new("a|ab").unwrap());
        assert_eq!(v.validate(Some("ab")).unwrap().as_str(), Some("ab"));
        assert!(matches!(
            v.validate(Some("abc")),
            Err(ValidatorError::PatternMismatch { pattern, .. }) if pattern == "a|ab"
        ));
    }

    #[test]
    fn test_custom_validator_coerces() {
        let v = Validator::custom("even", |raw| {
            raw.parse::<i64>()
                .ok()
                .filter(|n| n % 2 == 0)
                .map(Scalar::Integer)
        });
        assert_eq!(v.validate(Some("4")).unwrap().as_i64(), Some(4));
        assert_eq!(
            v.validate(Some("3")),
            Err(ValidatorError::Rejected {
                value: "3".to_string(),
                validator: "even".to_string()
            })
        );
        assert_eq!(v.kind(), "custom");
    }
}
