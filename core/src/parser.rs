//! Token classification and value attachment.
//!
//! Tokens are walked left to right with an index cursor over the immutable
//! token slice:
//!
//! | Token | Meaning |
//! |---|---|
//! | `--name` | option; takes the following non-hyphen tokens as its value |
//! | `--name=value` | option with inline value |
//! | `--` | end of options; every later token is an argument |
//! | `-xyz` | flags `x`, `y`, `z`; only the last one may take a value |
//! | `-xyz=value` | flags `x`, `y`; flag `z` gets `value` |
//! | anything else | command (before `--`) or argument (after `--`) |
//!
//! A greedy value is every following token up to the next one that is empty
//! or starts with `-`, joined with single spaces. Any `--` token of at most
//! three characters (so `--x` as well as `--`) marks the end of options.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::schema::{OptionLookup, OptionRule, Schema};
use crate::usage::render_usage;
use crate::value::OptionValue;

/// Serializable snapshot of a parser's results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    /// `None` until [`Parser::parse`] has run.
    pub success: Option<bool>,
    pub options: BTreeMap<String, OptionValue>,
    pub commands: Vec<String>,
    pub arguments: Vec<String>,
    pub errors: Vec<String>,
}

/// Command-line parser.
///
/// Construct it with the raw tokens, adjust the schema, call [`parse`], then
/// read the results. `parse` may run any number of times; each run starts
/// from scratch against the current schema and the unchanged token list.
///
/// [`parse`]: Parser::parse
///
/// # Examples
///
/// ```
/// use cliparse_core::{OptionRule, OptionValue, Parser, Validator};
///
/// let mut parser = Parser::new(["prog", "build", "--jobs", "4", "-v", "--", "-x"]);
/// parser.set_allowed_options([
///     ("jobs", OptionRule::new(Validator::integer())),
///     ("verbose", OptionRule::default()),
/// ]);
/// parser.set_allowed_flags([('v', "verbose")]);
///
/// assert!(parser.parse());
/// assert_eq!(parser.option("jobs").and_then(OptionValue::as_i64), Some(4));
/// assert_eq!(parser.option("verbose"), Some(&OptionValue::Present));
/// assert_eq!(parser.commands(), ["build"]);
/// assert_eq!(parser.arguments(), ["-x"]);
/// assert!(parser.errors().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    tokens: Vec<String>,
    usage: Option<String>,
    schema: Schema,
    options: BTreeMap<String, OptionValue>,
    commands: Vec<String>,
    arguments: Vec<String>,
    errors: Vec<ParseError>,
    success: Option<bool>,
}

impl Parser {
    /// Creates a parser from a full argv; the first element (the program
    /// name) is skipped.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_tokens(argv.into_iter().skip(1))
    }

    /// Creates a parser from tokens that do not include the program name.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Creates a parser from the current process arguments. Non-UTF-8
    /// arguments are converted lossily.
    pub fn from_env() -> Self {
        Self::new(
            std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()),
        )
    }

    /// Attaches a usage line for [`render_usage`](Parser::render_usage).
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Replaces the whole schema snapshot.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Allows exactly these option names, with no value validation.
    pub fn set_allowed_option_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.set_option_names(names);
    }

    /// Declares validated options. Repeated calls merge into the same map.
    pub fn set_allowed_options<I, S>(&mut self, rules: I)
    where
        I: IntoIterator<Item = (S, OptionRule)>,
        S: Into<String>,
    {
        self.schema.extend_rules(rules);
    }

    /// Maps flag characters to the option names they stand for, replacing
    /// any previous mapping.
    pub fn set_allowed_flags<I, S>(&mut self, flags: I)
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        self.schema.set_flags(flags);
    }

    /// In strict mode the first rejected option or flag aborts the parse.
    pub fn set_strict_mode(&mut self, strict: bool) {
        self.schema.set_strict(strict);
    }

    /// Classifies the tokens against the current schema.
    ///
    /// Returns `false` only when strict mode rejected an option or flag; in
    /// that case options, commands and arguments are left empty and
    /// [`errors`](Parser::errors) holds the rejection.
    pub fn parse(&mut self) -> bool {
        let mut run = Run::new(&self.schema, &self.tokens);
        let success = run.walk();

        self.options = run.options;
        self.commands = run.commands;
        self.arguments = run.arguments;
        self.errors = run.errors;
        self.success = Some(success);
        success
    }

    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Errors rendered as diagnostic strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Result of the most recent [`parse`](Parser::parse), if any.
    pub fn succeeded(&self) -> Option<bool> {
        self.success
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Formats the option listing for the current schema.
    pub fn render_usage(&self) -> String {
        render_usage(&self.schema, self.usage.as_deref())
    }

    pub fn outcome(&self) -> ParseOutcome {
        ParseOutcome {
            success: self.success,
            options: self.options.clone(),
            commands: self.commands.clone(),
            arguments: self.arguments.clone(),
            errors: self.error_messages(),
        }
    }
}

/// Index cursor over the token slice.
struct Cursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    /// Consumes the run of value tokens at the cursor, joined by spaces.
    fn take_value(&mut self) -> Option<String> {
        let start = self.pos;
        while self.tokens.get(self.pos).is_some_and(|t| is_value_token(t)) {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.tokens[start..self.pos].join(" "))
    }
}

fn is_value_token(token: &str) -> bool {
    !token.is_empty() && !token.starts_with('-')
}

/// State of a single parse run.
struct Run<'a> {
    schema: &'a Schema,
    cursor: Cursor<'a>,
    options: BTreeMap<String, OptionValue>,
    commands: Vec<String>,
    arguments: Vec<String>,
    errors: Vec<ParseError>,
}

impl<'a> Run<'a> {
    fn new(schema: &'a Schema, tokens: &'a [String]) -> Self {
        let options = schema
            .defaults()
            .map(|(name, default)| (name.to_string(), OptionValue::text(default)))
            .collect();
        Self {
            schema,
            cursor: Cursor { tokens, pos: 0 },
            options,
            commands: Vec::new(),
            arguments: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn walk(&mut self) -> bool {
        let mut end_of_options = false;

        while let Some(token) = self.cursor.next() {
            if end_of_options {
                self.arguments.push(token.to_string());
                continue;
            }

            let accepted = if let Some(spec) = token.strip_prefix("--") {
                if token.chars().count() <= 3 {
                    debug!(token, "end of options");
                    end_of_options = true;
                    true
                } else {
                    self.long_option(spec)
                }
            } else if let Some(cluster) = token.strip_prefix('-').filter(|rest| !rest.is_empty()) {
                self.flag_cluster(cluster)
            } else {
                debug!(token, "command");
                self.commands.push(token.to_string());
                true
            };

            if !accepted && self.schema.is_strict() {
                warn!(
                    token,
                    error = %self.errors.last().map(ToString::to_string).unwrap_or_default(),
                    "strict mode rejected token; discarding results"
                );
                self.options.clear();
                self.commands.clear();
                self.arguments.clear();
                return false;
            }
        }

        true
    }

    fn long_option(&mut self, spec: &str) -> bool {
        let (name, value) = match spec.split_once('=') {
            Some((name, inline)) => (name, Some(inline.to_string())),
            None => (spec, self.cursor.take_value()),
        };
        let value = value.filter(|v| !v.is_empty());
        debug!(option = name, value = ?value, "option");
        self.accept_option(name, value.as_deref())
    }

    /// Handles `-xyz` and `-xyz=value`. Every flag is first accepted without
    /// a value; the last one is then accepted again with the inline or
    /// greedy value, which replaces its value-less entry.
    fn flag_cluster(&mut self, cluster: &str) -> bool {
        let (flags, inline) = match cluster.split_once('=') {
            Some((flags, value)) => (flags, Some(value)),
            None => (cluster, None),
        };

        let Some(last) = flags.chars().next_back() else {
            debug!(cluster, "flag cluster without flags ignored");
            return true;
        };

        for flag in flags.chars() {
            debug!(%flag, "flag");
            if !self.accept_flag(flag, None) && self.schema.is_strict() {
                return false;
            }
        }

        let value = match inline {
            Some(value) => Some(value.to_string()),
            None => self.cursor.take_value(),
        };
        debug!(flag = %last, value = ?value, "flag");
        self.accept_flag(last, value.as_deref())
    }

    fn accept_option(&mut self, name: &str, value: Option<&str>) -> bool {
        match self.schema.lookup(name) {
            OptionLookup::Unchecked => {
                self.options
                    .insert(name.to_string(), OptionValue::from_raw(value));
                true
            }
            OptionLookup::Rule(rule) => match rule.validator.validate(value) {
                Ok(stored) => {
                    self.options.insert(name.to_string(), stored);
                    true
                }
                Err(err) => {
                    debug!(option = name, reason = %err, "invalid option value");
                    self.errors.push(ParseError::InvalidOptionValue {
                        name: name.to_string(),
                        value: value.map(str::to_string),
                    });
                    false
                }
            },
            OptionLookup::Unknown => {
                self.errors.push(ParseError::UnknownOption(name.to_string()));
                false
            }
        }
    }

    fn accept_flag(&mut self, flag: char, value: Option<&str>) -> bool {
        let schema = self.schema;
        let Some(aliases) = schema.flags() else {
            self.options
                .insert(flag.to_string(), OptionValue::from_raw(value));
            return true;
        };

        match aliases.get(&flag) {
            Some(target) if schema.options().is_some() => self.accept_option(target, value),
            _ => {
                self.errors.push(ParseError::UnknownFlag(flag));
                false
            }
        }
    }
}
