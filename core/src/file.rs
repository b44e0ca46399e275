//! Schema files.
//!
//! Declares options, flags and strict mode in YAML or JSON so a schema can
//! live next to the program instead of in code.
//!
//! # Example YAML
//!
//! ```yaml
//! usage: "deploy [options] <target>"
//! strict: false
//! options:
//!   verbose: {}
//!   level:
//!     validator: { kind: integer, min: 0, max: 5 }
//!     default: 3
//!     value_label: n
//!     description: Log level
//! flags:
//!   v: verbose
//!   l: level
//! ```
//!
//! `options` may also be a plain list of names.

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::schema::{OptionRule, Schema, SchemaBuilder};
use crate::validator::{FloatRule, IntegerRule, Validator};
use crate::value::Scalar;

/// Serializable validator declaration, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValidatorSpec {
    Any,
    Integer {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
        #[serde(default)]
        allow_hex: bool,
        #[serde(default)]
        allow_octal: bool,
    },
    Float {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        allow_thousands: bool,
    },
    Boolean,
    Pattern {
        pattern: String,
    },
}

impl ValidatorSpec {
    /// Compiles the declaration into a [`Validator`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPattern`](SchemaError::InvalidPattern) if a pattern
    /// does not compile.
    pub fn to_validator(&self) -> Result<Validator> {
        let validator = match self {
            Self::Any => Validator::AcceptAny,
            Self::Integer {
                min,
                max,
                allow_hex,
                allow_octal,
            } => Validator::Integer(IntegerRule {
                min: *min,
                max: *max,
                allow_hex: *allow_hex,
                allow_octal: *allow_octal,
            }),
            Self::Float {
                min,
                max,
                allow_thousands,
            } => Validator::Float(FloatRule {
                min: *min,
                max: *max,
                allow_thousands: *allow_thousands,
            }),
            Self::Boolean => Validator::Boolean,
            Self::Pattern { pattern } => Validator::pattern(pattern)?,
        };
        Ok(validator)
    }
}

/// One option entry in a schema file. An empty entry (`{}`) accepts any value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<ValidatorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleSpec {
    pub fn to_rule(&self) -> Result<OptionRule> {
        let validator = match &self.validator {
            Some(spec) => spec.to_validator()?,
            None => Validator::AcceptAny,
        };
        Ok(OptionRule {
            validator,
            default: self.default.as_ref().map(Scalar::to_string),
            value_label: self.value_label.clone(),
            description: self.description.clone(),
        })
    }
}

/// The `options` section: a list of names or a map of rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionsSpec {
    Names(Vec<String>),
    Rules(BTreeMap<String, Option<RuleSpec>>),
}

/// Top-level schema file.
///
/// # Examples
///
/// ```
/// use cliparse_core::SchemaFile;
///
/// let file = SchemaFile::from_yaml_str(
///     "options:\n  port:\n    validator: { kind: integer }\nflags:\n  p: port\n",
/// )
/// .unwrap();
/// let schema = file.to_schema().unwrap();
/// assert_eq!(schema.flags_for("port"), vec!['p']);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Usage line shown above the option listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<BTreeMap<String, String>>,
}

impl SchemaFile {
    /// Loads a schema file, choosing JSON for `.json` paths and YAML otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SchemaError::IoError) if the file cannot be read,
    /// or [`JsonError`](SchemaError::JsonError) /
    /// [`YamlError`](SchemaError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(file)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds the [`Schema`] snapshot this file declares.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFlagName`](SchemaError::InvalidFlagName) for flag
    /// keys that are not a single character other than `=`, and
    /// [`InvalidPattern`](SchemaError::InvalidPattern) for bad regexes.
    pub fn to_schema(&self) -> Result<Schema> {
        let mut builder = SchemaBuilder::default().strict(self.strict);

        builder = match &self.options {
            None => builder,
            Some(OptionsSpec::Names(names)) => builder.option_names(names.iter().cloned()),
            Some(OptionsSpec::Rules(rules)) => {
                let mut compiled = Vec::with_capacity(rules.len());
                for (name, spec) in rules {
                    let rule = match spec {
                        Some(spec) => spec.to_rule()?,
                        None => OptionRule::default(),
                    };
                    compiled.push((name.clone(), rule));
                }
                builder.options(compiled)
            }
        };

        if let Some(flags) = &self.flags {
            let mut aliases = Vec::with_capacity(flags.len());
            for (key, option) in flags {
                aliases.push((flag_char(key)?, option.clone()));
            }
            builder = builder.flags(aliases);
        }

        Ok(builder.build())
    }
}

fn flag_char(key: &str) -> Result<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(flag), None) if flag != '=' && flag != '-' => Ok(flag),
        _ => Err(SchemaError::InvalidFlagName(key.to_string())),
    }
}
