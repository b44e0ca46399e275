//! Values stored in the parsed options map.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A validated scalar value.
///
/// Validators coerce raw token text into one of these variants. Untagged
/// serde representation, so `3`, `"3"`, `3.5` and `true` all round-trip as
/// their natural JSON/YAML forms.
///
/// # Examples
///
/// ```
/// use cliparse_core::Scalar;
///
/// assert_eq!(Scalar::Integer(42).to_string(), "42");
/// assert_eq!(Scalar::from("abc"), Scalar::Text("abc".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// The stored result for one option or flag.
///
/// `Present` means the option appeared without a value. It serializes as
/// `true`.
///
/// # Examples
///
/// ```
/// use cliparse_core::{OptionValue, Scalar};
///
/// let present = OptionValue::Present;
/// assert!(present.is_present());
/// assert_eq!(present.as_bool(), Some(true));
///
/// let value = OptionValue::text("val1");
/// assert_eq!(value.as_str(), Some("val1"));
/// assert_eq!(value, OptionValue::Value(Scalar::Text("val1".into())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Present,
    Value(Scalar),
}

impl OptionValue {
    /// Wraps raw text as a value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Value(Scalar::Text(value.into()))
    }

    /// `Present` when `value` is `None`, otherwise a text value.
    pub fn from_raw(value: Option<&str>) -> Self {
        value.map_or(Self::Present, Self::text)
    }

    /// Returns `true` if the option appeared without a value.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    /// Returns the scalar, if any.
    pub fn scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Present => None,
            Self::Value(scalar) => Some(scalar),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(Scalar::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Value(Scalar::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Value(Scalar::Float(value)) => Some(*value),
            Self::Value(Scalar::Integer(value)) => Some(*value as f64),
            _ => None,
        }
    }

    /// `Present` reads as `true`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Value(Scalar::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("true"),
            Self::Value(scalar) => scalar.fmt(f),
        }
    }
}

impl From<Scalar> for OptionValue {
    fn from(scalar: Scalar) -> Self {
        Self::Value(scalar)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present => serializer.serialize_bool(true),
            Self::Value(scalar) => scalar.serialize(serializer),
        }
    }
}
