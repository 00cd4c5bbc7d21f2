//! Builds the clap command from a loaded schema and parses argv against it.

use clap::{Arg, ArgAction, Command};
use std::ffi::OsString;

use crate::schema::{ArgSpec, ArgValue, CliSchema, ParsedArgs};

/// Build a clap command with one `--<name>` option per schema argument.
pub fn build_command(schema: &CliSchema) -> Command {
    let mut command = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(schema.description.clone())
        .args_override_self(true);

    for spec in &schema.arguments {
        command = command.arg(build_arg(spec));
    }
    command
}

fn build_arg(spec: &ArgSpec) -> Arg {
    let parser_spec = spec.clone();
    let mut arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .value_name(spec.arg_type.value_name())
        .action(ArgAction::Set)
        .required(spec.required)
        .value_parser(move |raw: &str| coerce_cli_value(&parser_spec, raw));

    if let Some(help) = help_text(spec) {
        arg = arg.help(help);
    }
    arg
}

/// Coerce to the declared type, then check membership in `choices`.
fn coerce_cli_value(spec: &ArgSpec, raw: &str) -> Result<ArgValue, String> {
    let value = spec.arg_type.coerce(raw)?;
    if let Some(choices) = &spec.choices {
        if !choices.contains(&value) {
            return Err(format!("invalid choice: '{raw}' (choose from {})", join_values(choices)));
        }
    }
    Ok(value)
}

fn help_text(spec: &ArgSpec) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(help) = spec.help.as_deref().filter(|h| !h.trim().is_empty()) {
        parts.push(help.trim().to_string());
    }
    if let Some(choices) = &spec.choices {
        parts.push(format!("[choices: {}]", join_values(choices)));
    }
    if let Some(default) = &spec.default {
        parts.push(format!("[default: {default}]"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn join_values(values: &[ArgValue]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Parse `argv` (program name first) against the schema.
///
/// Every schema argument appears in the result: the given value, else the
/// schema default, else `ArgValue::Null`.
pub fn parse_args_from<I, T>(schema: &CliSchema, argv: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(schema).try_get_matches_from(argv)?;

    let mut parsed = ParsedArgs::default();
    for spec in &schema.arguments {
        let value = matches
            .get_one::<ArgValue>(spec.name.as_str())
            .cloned()
            .or_else(|| spec.default.clone())
            .unwrap_or(ArgValue::Null);
        debug_assert!(value.matches_type(spec.arg_type), "{} parsed as {}", spec.name, value);
        parsed.insert(spec.name.clone(), value);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{parse_schema_str, SchemaFormat};
    use clap::error::ErrorKind;

    const SCHEMA: &str = r#"
description = "Dynamic parser test"

[arguments]
name = { required = true, help = "who to greet" }
count = { type = "int", default = 1 }
scale = { type = "float", choices = [0.5, 1.0, 2] }
mode = { choices = ["fast", "slow"], default = "fast" }
verbose = { type = "bool" }
"#;

    fn schema() -> CliSchema {
        parse_schema_str(SCHEMA, SchemaFormat::Toml, "test").expect("schema")
    }

    #[test]
    fn test_build_command_declares_every_argument() {
        let command = build_command(&schema());
        let longs: Vec<&str> = command.get_arguments().filter_map(|a| a.get_long()).collect();
        for name in ["name", "count", "scale", "mode", "verbose"] {
            assert!(longs.contains(&name), "missing --{name}");
        }
        command.debug_assert();
    }

    #[test]
    fn test_defaults_and_nulls_fill_omitted_options() {
        let parsed = parse_args_from(&schema(), ["tool", "--name", "ada"]).expect("parse");
        assert_eq!(parsed.get_str("name"), Some("ada"));
        assert_eq!(parsed.get_int("count"), Some(1));
        assert_eq!(parsed.get_str("mode"), Some("fast"));
        assert_eq!(parsed.get("scale"), Some(&ArgValue::Null));
        assert_eq!(parsed.get("verbose"), Some(&ArgValue::Null));
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn test_values_are_typed() {
        let parsed = parse_args_from(
            &schema(),
            ["tool", "--name", "ada", "--count", "7", "--scale", "2", "--verbose", "no"],
        )
        .expect("parse");
        assert_eq!(parsed.get("count"), Some(&ArgValue::Int(7)));
        assert_eq!(parsed.get("scale"), Some(&ArgValue::Float(2.0)));
        assert_eq!(parsed.get_bool("verbose"), Some(false));
    }

    #[test]
    fn test_equals_syntax_is_accepted() {
        let parsed =
            parse_args_from(&schema(), ["tool", "--name=grace", "--mode=slow"]).expect("parse");
        assert_eq!(parsed.get_str("name"), Some("grace"));
        assert_eq!(parsed.get_str("mode"), Some("slow"));
    }

    #[test]
    fn test_missing_required_option_fails() {
        let err = parse_args_from(&schema(), ["tool"]).expect_err("name is required");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_invalid_type_is_rejected() {
        let err = parse_args_from(&schema(), ["tool", "--name", "a", "--count", "many"])
            .expect_err("count must be int");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_choices_are_checked_after_conversion() {
        let parsed =
            parse_args_from(&schema(), ["tool", "--name", "a", "--scale", "0.50"]).expect("parse");
        assert_eq!(parsed.get_float("scale"), Some(0.5));

        let err = parse_args_from(&schema(), ["tool", "--name", "a", "--mode", "medium"])
            .expect_err("medium is not a choice");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("invalid choice"));
    }

    #[test]
    fn test_repeated_option_keeps_last_value() {
        let parsed =
            parse_args_from(&schema(), ["tool", "--name", "a", "--name", "b"]).expect("parse");
        assert_eq!(parsed.get_str("name"), Some("b"));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = parse_args_from(&schema(), ["tool", "--name", "a", "--bogus", "1"])
            .expect_err("unknown option");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_lists_choices_and_defaults() {
        let mut command = build_command(&schema());
        let help = command.render_help().to_string();
        assert!(help.contains("Dynamic parser test"));
        assert!(help.contains("who to greet"));
        assert!(help.contains("[choices: fast, slow]"));
        assert!(help.contains("[default: 1]"));
    }
}
