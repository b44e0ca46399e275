//! Usage banner rendering.
//!
//! Reads only the schema; never touches parse results.

use crate::schema::{OptionSchema, Schema};

/// One listing row: the `-x, --name=<label>` cell and its description.
struct UsageRow {
    left: String,
    right: String,
}

/// Renders the usage line and an aligned option listing.
///
/// Options are listed by name. Each row shows the aliasing flags, the
/// long form with its value label, the description and the default.
///
/// # Examples
///
/// ```
/// use cliparse_core::{OptionRule, Schema, Validator, render_usage};
///
/// let schema = Schema::builder()
///     .option("verbose", OptionRule::default().with_description("Be verbose"))
///     .option(
///         "level",
///         OptionRule::new(Validator::integer())
///             .with_value_label("n")
///             .with_description("Log level")
///             .with_default(3),
///     )
///     .flag('v', "verbose")
///     .build();
///
/// let text = render_usage(&schema, Some("app [options]"));
/// assert_eq!(
///     text,
///     "Usage: app [options]\n\
///      \n\
///      Options:\n\
///      \x20     --level=<n>  Log level (default: 3)\n\
///      \x20 -v, --verbose    Be verbose\n"
/// );
/// ```
pub fn render_usage(schema: &Schema, usage: Option<&str>) -> String {
    let rows = collect_rows(schema);
    let mut out = String::new();

    if let Some(usage) = usage {
        out.push_str(&format!("Usage: {usage}\n"));
    }

    if rows.is_empty() {
        return out;
    }

    if usage.is_some() {
        out.push('\n');
    }
    out.push_str("Options:\n");

    let width = rows
        .iter()
        .map(|row| row.left.chars().count())
        .max()
        .unwrap_or(0);
    for row in &rows {
        if row.right.is_empty() {
            out.push_str(&format!("  {}\n", row.left));
        } else {
            out.push_str(&format!("  {:<width$}  {}\n", row.left, row.right));
        }
    }

    out
}

fn collect_rows(schema: &Schema) -> Vec<UsageRow> {
    let mut rows = Vec::new();

    match schema.options() {
        Some(OptionSchema::Rules(rules)) => {
            for (name, rule) in rules {
                let mut right = rule.description.clone().unwrap_or_default();
                if let Some(default) = &rule.default {
                    if !right.is_empty() {
                        right.push(' ');
                    }
                    right.push_str(&format!("(default: {default})"));
                }
                rows.push(UsageRow {
                    left: left_cell(&schema.flags_for(name), name, rule.value_label.as_deref()),
                    right,
                });
            }
        }
        Some(OptionSchema::Names(names)) => {
            for name in names {
                rows.push(UsageRow {
                    left: left_cell(&schema.flags_for(name), name, None),
                    right: String::new(),
                });
            }
        }
        None => {}
    }

    // Flags whose target is not a declared option still get a row.
    let declared = schema.options();
    for (flag, target) in schema.flags().into_iter().flatten() {
        if declared.is_some_and(|options| options.contains(target)) {
            continue;
        }
        rows.push(UsageRow {
            left: left_cell(&[*flag], target, None),
            right: String::new(),
        });
    }

    rows
}

fn left_cell(flags: &[char], name: &str, value_label: Option<&str>) -> String {
    let mut cell = if flags.is_empty() {
        "    ".to_string()
    } else {
        flags
            .iter()
            .map(|flag| format!("-{flag}, "))
            .collect::<String>()
    };
    cell.push_str("--");
    cell.push_str(name);
    if let Some(label) = value_label {
        cell.push_str(&format!("=<{label}>"));
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionRule;

    #[test]
    fn test_empty_schema_renders_only_usage_line() {
        assert_eq!(render_usage(&Schema::default(), None), "");
        assert_eq!(
            render_usage(&Schema::default(), Some("app")),
            "Usage: app\n"
        );
    }

    #[test]
    fn test_names_form_lists_sorted_names() {
        let schema = Schema::builder()
            .option_names(["zeta", "alpha"])
            .flag('z', "zeta")
            .build();
        assert_eq!(
            render_usage(&schema, None),
            "Options:\n      --alpha\n  -z, --zeta\n"
        );
    }

    #[test]
    fn test_default_without_description() {
        let schema = Schema::builder()
            .option("mode", OptionRule::default().with_default("fast"))
            .build();
        assert_eq!(
            render_usage(&schema, None),
            "Options:\n      --mode  (default: fast)\n"
        );
    }

    #[test]
    fn test_descriptions_share_a_column() {
        let schema = Schema::builder()
            .option("a", OptionRule::default().with_description("first"))
            .option(
                "longer-name",
                OptionRule::default()
                    .with_value_label("path")
                    .with_description("second"),
            )
            .build();
        let text = render_usage(&schema, None);
        let columns: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|line| line.find("first").or_else(|| line.find("second")).unwrap())
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn test_multiple_flags_for_one_option() {
        let schema = Schema::builder()
            .option("help", OptionRule::default())
            .flags([('h', "help"), ('?', "help")])
            .build();
        assert_eq!(
            render_usage(&schema, None),
            "Options:\n  -?, -h, --help\n"
        );
    }

    #[test]
    fn test_flags_without_declared_target_are_listed() {
        let schema = Schema::builder()
            .option_names(["known"])
            .flag('k', "known")
            .flag('u', "undeclared")
            .build();
        assert_eq!(
            render_usage(&schema, None),
            "Options:\n  -k, --known\n  -u, --undeclared\n"
        );

        let flags_only = Schema::builder().flag('q', "quiet").build();
        assert_eq!(render_usage(&flags_only, None), "Options:\n  -q, --quiet\n");
    }
}
