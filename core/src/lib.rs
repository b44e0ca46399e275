//! Schema-checked command-line token classification.
//!
//! This crate splits a raw argument list into four buckets:
//!
//! - **options**: `--name`, `--name=value`, or `--name value...`;
//! - **flags**: `-x`, bundled `-xyz`, `-xyz=value`; stored under the flag
//!   character, or under an option name when aliased;
//! - **commands**: bare tokens before the end-of-options marker `--`;
//! - **arguments**: every token after `--`.
//!
//! Options can be checked against a [`Schema`]: a set of allowed names, or
//! per-option [`OptionRule`]s with a [`Validator`], a default, and usage
//! metadata. Rejected tokens are recorded as [`ParseError`]s; in strict mode
//! the first rejection aborts the parse and discards the results.
//!
//! # Example
//!
//! ```
//! use cliparse_core::*;
//!
//! let mut parser = Parser::new([
//!     "prog", "cmd1", "--opt1=val1", "-abc", "-ghi", "val4", "val5", "--", "arg1",
//! ]);
//! assert!(parser.parse());
//!
//! assert_eq!(parser.commands(), ["cmd1"]);
//! assert_eq!(parser.arguments(), ["arg1"]);
//! assert_eq!(parser.option("opt1").and_then(OptionValue::as_str), Some("val1"));
//! assert_eq!(parser.option("a"), Some(&OptionValue::Present));
//! assert_eq!(parser.option("i").and_then(OptionValue::as_str), Some("val4 val5"));
//!
//! // Strict mode with a validating schema
//! let mut parser = Parser::new(["prog", "--port=http"]).with_schema(
//!     Schema::builder()
//!         .option("port", OptionRule::new(Validator::integer()))
//!         .strict(true)
//!         .build(),
//! );
//! assert!(!parser.parse());
//! assert!(parser.options().is_empty());
//! assert_eq!(
//!     parser.error_messages(),
//!     [r#"Invalid value for option "port": "http""#]
//! );
//! ```

mod error;
mod file;
mod parser;
mod schema;
mod usage;
mod validator;
mod value;

pub use error::{ParseError, Result, SchemaError};
pub use file::{OptionsSpec, RuleSpec, SchemaFile, ValidatorSpec};
pub use parser::{ParseOutcome, Parser};
pub use schema::{OptionRule, OptionSchema, Schema, SchemaBuilder};
pub use usage::render_usage;
pub use validator::{
    CustomValidator, FloatRule, IntegerRule, PatternRule, Validator, ValidatorError,
};
pub use value::{OptionValue, Scalar};
