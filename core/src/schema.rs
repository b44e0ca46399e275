//! Option and flag schema definitions.
//!
//! A [`Schema`] is the immutable snapshot the parser validates against. It
//! holds three independent pieces:
//!
//! - an optional [`OptionSchema`]: either a bare set of allowed names, or a
//!   map from name to [`OptionRule`];
//! - optional flag aliases mapping a single character to an option name;
//! - the strict-mode switch.
//!
//! `None` for either schema piece means "accept anything" for that kind of
//! token. Build one with [`SchemaBuilder`], or mutate the parser's copy
//! through the `Parser::set_*` methods.

use std::collections::{BTreeMap, BTreeSet};

use crate::validator::Validator;

/// Validation and display metadata for one declared option.
///
/// `OptionRule::default()` accepts any value verbatim.
///
/// # Examples
///
/// ```
/// use cliparse_core::{OptionRule, Validator};
///
/// let rule = OptionRule::new(Validator::integer())
///     .with_default("3")
///     .with_value_label("n")
///     .with_description("Log level");
/// assert_eq!(rule.default.as_deref(), Some("3"));
/// assert_eq!(rule.validator.kind(), "integer");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionRule {
    pub validator: Validator,
    /// Seeded into the results before each parse, as text.
    pub default: Option<String>,
    /// Placeholder shown in usage output (`--level=<n>`).
    pub value_label: Option<String>,
    pub description: Option<String>,
}

impl OptionRule {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            ..Default::default()
        }
    }

    pub fn with_default(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_value_label(mut self, label: &str) -> Self {
        self.value_label = Some(label.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// The set of allowed `--options`.
#[derive(Debug, Clone)]
pub enum OptionSchema {
    /// Names only; values are stored verbatim.
    Names(BTreeSet<String>),
    /// Per-name validation rules.
    Rules(BTreeMap<String, OptionRule>),
}

impl OptionSchema {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Names(names) => names.contains(name),
            Self::Rules(rules) => rules.contains_key(name),
        }
    }

    /// Declared names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Names(names) => names.iter().map(String::as_str).collect(),
            Self::Rules(rules) => rules.keys().map(String::as_str).collect(),
        }
    }

    pub fn rule(&self, name: &str) -> Option<&OptionRule> {
        match self {
            Self::Names(_) => None,
            Self::Rules(rules) => rules.get(name),
        }
    }
}

/// How the schema treats a given option name.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OptionLookup<'a> {
    /// No validation applies; store verbatim.
    Unchecked,
    Rule(&'a OptionRule),
    Unknown,
}

/// Immutable schema snapshot consumed by [`Parser::parse`](crate::Parser::parse).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    options: Option<OptionSchema>,
    flags: Option<BTreeMap<char, String>>,
    strict: bool,
}

impl Schema {
    /// Starts an empty [`SchemaBuilder`].
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn options(&self) -> Option<&OptionSchema> {
        self.options.as_ref()
    }

    pub fn flags(&self) -> Option<&BTreeMap<char, String>> {
        self.flags.as_ref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns every flag character that aliases `option`, sorted.
    pub fn flags_for(&self, option: &str) -> Vec<char> {
        self.flags
            .iter()
            .flatten()
            .filter(|(_, target)| target.as_str() == option)
            .map(|(flag, _)| *flag)
            .collect()
    }

    /// Declared defaults as `(name, value)` pairs.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        let rules = match &self.options {
            Some(OptionSchema::Rules(rules)) => Some(rules),
            _ => None,
        };
        rules.into_iter().flatten().filter_map(|(name, rule)| {
            rule.default
                .as_deref()
                .map(|default| (name.as_str(), default))
        })
    }

    pub(crate) fn lookup(&self, name: &str) -> OptionLookup<'_> {
        match &self.options {
            None => OptionLookup::Unchecked,
            Some(OptionSchema::Names(names)) if names.contains(name) => OptionLookup::Unchecked,
            Some(OptionSchema::Names(_)) => OptionLookup::Unknown,
            Some(OptionSchema::Rules(rules)) => {
                rules.get(name).map_or(OptionLookup::Unknown, OptionLookup::Rule)
            }
        }
    }

    /// Replaces any option schema with a bare name set.
    pub(crate) fn set_option_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(OptionSchema::Names(
            names.into_iter().map(Into::into).collect(),
        ));
    }

    /// Merges rules into an existing rule map, or replaces a name set.
    pub(crate) fn extend_rules<I, S>(&mut self, rules: I)
    where
        I: IntoIterator<Item = (S, OptionRule)>,
        S: Into<String>,
    {
        if !matches!(self.options, Some(OptionSchema::Rules(_))) {
            self.options = Some(OptionSchema::Rules(BTreeMap::new()));
        }
        if let Some(OptionSchema::Rules(map)) = &mut self.options {
            map.extend(rules.into_iter().map(|(name, rule)| (name.into(), rule)));
        }
    }

    pub(crate) fn set_flags<I, S>(&mut self, flags: I)
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        self.flags = Some(
            flags
                .into_iter()
                .map(|(flag, option)| (flag, option.into()))
                .collect(),
        );
    }

    pub(crate) fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }
}

/// Builds a [`Schema`] snapshot.
///
/// # Examples
///
/// ```
/// use cliparse_core::{OptionRule, Schema, Validator};
///
/// let schema = Schema::builder()
///     .option("verbose", OptionRule::default())
///     .option("level", OptionRule::new(Validator::integer()).with_default(3))
///     .flag('v', "verbose")
///     .flag('l', "level")
///     .strict(true)
///     .build();
///
/// assert!(schema.is_strict());
/// assert_eq!(schema.flags_for("level"), vec!['l']);
/// assert_eq!(schema.defaults().collect::<Vec<_>>(), vec![("level", "3")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Uses the bare-name form, replacing any rules added so far.
    pub fn option_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.set_option_names(names);
        self
    }

    /// Adds one validated option, switching to the rules form if needed.
    pub fn option(mut self, name: impl Into<String>, rule: OptionRule) -> Self {
        self.schema.extend_rules([(name.into(), rule)]);
        self
    }

    pub fn options<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (S, OptionRule)>,
        S: Into<String>,
    {
        self.schema.extend_rules(rules);
        self
    }

    /// Adds one flag alias.
    pub fn flag(mut self, flag: char, option: impl Into<String>) -> Self {
        self.schema
            .flags
            .get_or_insert_with(BTreeMap::new)
            .insert(flag, option.into());
        self
    }

    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        let map = self.schema.flags.get_or_insert_with(BTreeMap::new);
        map.extend(flags.into_iter().map(|(flag, option)| (flag, option.into())));
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.schema.set_strict(strict);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schema_accepts_everything() {
        let schema = Schema::default();
        assert!(matches!(schema.lookup("anything"), OptionLookup::Unchecked));
        assert!(schema.flags().is_none());
        assert!(!schema.is_strict());
    }

    #[test]
    fn test_name_set_lookup() {
        let schema = Schema::builder().option_names(["opt1", "opt2"]).build();
        assert!(matches!(schema.lookup("opt1"), OptionLookup::Unchecked));
        assert!(matches!(schema.lookup("opt9"), OptionLookup::Unknown));
    }

    #[test]
    fn test_rules_lookup() {
        let schema = Schema::builder()
            .option("port", OptionRule::new(Validator::integer()))
            .build();
        assert!(matches!(schema.lookup("port"), OptionLookup::Rule(_)));
        assert!(matches!(schema.lookup("host"), OptionLookup::Unknown));
    }

    #[test]
    fn test_rules_merge_and_later_wins() {
        let mut schema = Schema::default();
        schema.extend_rules([("a", OptionRule::default())]);
        schema.extend_rules([
            ("b", OptionRule::default()),
            ("a", OptionRule::new(Validator::Boolean)),
        ]);
        let options = schema.options().unwrap();
        assert_eq!(options.names(), vec!["a", "b"]);
        assert_eq!(options.rule("a").unwrap().validator.kind(), "boolean");
    }

    #[test]
    fn test_rules_replace_name_set() {
        let schema = Schema::builder()
            .option_names(["old"])
            .option("new", OptionRule::default())
            .build();
        assert_eq!(schema.options().unwrap().names(), vec!["new"]);
    }

    #[test]
    fn test_name_set_replaces_rules() {
        let schema = Schema::builder()
            .option("new", OptionRule::default())
            .option_names(["plain"])
            .build();
        let options = schema.options().unwrap();
        assert!(matches!(options, OptionSchema::Names(_)));
        assert!(options.contains("plain"));
        assert!(!options.contains("new"));
    }

    #[test]
    fn test_set_flags_replaces_previous_map() {
        let mut schema = Schema::builder().flag('a', "all").build();
        schema.set_flags([('b', "brief")]);
        let flags = schema.flags().unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.get(&'b').map(String::as_str), Some("brief"));
    }

    #[test]
    fn test_flags_for_lists_all_aliases() {
        let schema = Schema::builder()
            .flags([('v', "verbose"), ('V', "verbose"), ('q', "quiet")])
            .build();
        assert_eq!(schema.flags_for("verbose"), vec!['V', 'v']);
        assert!(schema.flags_for("missing").is_empty());
    }

    #[test]
    fn test_defaults_only_from_rules() {
        let schema = Schema::builder()
            .option("level", OptionRule::default().with_default(2))
            .option("name", OptionRule::default())
            .build();
        assert_eq!(schema.defaults().collect::<Vec<_>>(), vec![("level", "2")]);

        let names = Schema::builder().option_names(["level"]).build();
        assert_eq!(names.defaults().count(), 0);
    }
}
