//! Schema file loading

use super::types::{ArgSpec, ArgType, ArgValue, CliSchema, SchemaError, DEFAULT_DESCRIPTION};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::read_text;

/// Environment variable naming an explicit schema file.
pub const SCHEMA_ENV_VAR: &str = "VENN_CLI_CONFIG";

/// Schema bundled with the binary, used when no file is found.
pub const BUILTIN_SCHEMA: &str = include_str!("../../cli_config.toml");

const SCHEMA_CANDIDATES: [&str; 3] = ["cli_config.toml", "cli_config.yaml", "cli_config.yml"];

const RESERVED_NAMES: [&str; 2] = ["help", "version"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Toml,
    Yaml,
}

impl SchemaFormat {
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SchemaError::UnsupportedFormat { path: path.to_path_buf(), extension: ext }),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }
}

/// Where the schema for this run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Builtin,
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Builtin => f.write_str("<builtin>"),
        }
    }
}

/// Pick the schema: an explicit path must exist, otherwise the first
/// `cli_config.*` in `search_dir`, otherwise the bundled schema.
pub fn resolve_schema_source(
    explicit: Option<&Path>,
    search_dir: &Path,
) -> Result<SchemaSource, SchemaError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(SchemaError::NotFound { path: path.to_path_buf() });
        }
        return Ok(SchemaSource::File(path.to_path_buf()));
    }

    for candidate in SCHEMA_CANDIDATES {
        let path = search_dir.join(candidate);
        if path.is_file() {
            return Ok(SchemaSource::File(path));
        }
    }

    Ok(SchemaSource::Builtin)
}

pub fn load_schema_from(source: &SchemaSource) -> Result<CliSchema, SchemaError> {
    match source {
        SchemaSource::File(path) => load_schema(path),
        SchemaSource::Builtin => parse_schema_str(BUILTIN_SCHEMA, SchemaFormat::Toml, "<builtin>"),
    }
}

pub fn load_schema(path: &Path) -> Result<CliSchema, SchemaError> {
    let format = SchemaFormat::from_path(path)?;
    let decoded = read_text(path)
        .map_err(|source| SchemaError::Read { path: path.to_path_buf(), source })?;
    parse_schema_str(&decoded.content, format, &path.display().to_string())
}

/// Parse schema text. `origin` only appears in error messages.
pub fn parse_schema_str(
    content: &str,
    format: SchemaFormat,
    origin: &str,
) -> Result<CliSchema, SchemaError> {
    let syntax_error = |detail: String| SchemaError::Syntax {
        format: format.as_str(),
        origin: origin.to_string(),
        detail,
    };

    let raw: RawSchema = match format {
        SchemaFormat::Toml => toml::from_str(content).map_err(|e| syntax_error(e.to_string()))?,
        SchemaFormat::Yaml => {
            // An empty YAML document deserializes to unit; treat it as an empty schema.
            if content.trim().is_empty() {
                RawSchema::default()
            } else {
                serde_yaml::from_str(content).map_err(|e| syntax_error(e.to_string()))?
            }
        }
    };

    build_schema(raw)
}

fn build_schema(raw: RawSchema) -> Result<CliSchema, SchemaError> {
    let mut seen = HashSet::new();
    let mut arguments = Vec::with_capacity(raw.arguments.0.len());

    for (name, raw_spec) in raw.arguments.0 {
        validate_name(&name)?;
        if !seen.insert(name.clone()) {
            return Err(SchemaError::DuplicateArgument { argument: name });
        }
        arguments.push(build_spec(name, raw_spec)?);
    }

    Ok(CliSchema {
        description: raw.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        arguments,
    })
}

fn validate_name(name: &str) -> Result<(), SchemaError> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(SchemaError::InvalidName { argument: name.to_string() });
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(SchemaError::ReservedName { argument: name.to_string() });
    }
    Ok(())
}

fn build_spec(name: String, raw: RawArgSpec) -> Result<ArgSpec, SchemaError> {
    let arg_type = match raw.type_name.as_deref() {
        None => ArgType::Str,
        Some(type_name) => ArgType::from_name(type_name).ok_or_else(|| SchemaError::UnknownType {
            argument: name.clone(),
            type_name: type_name.to_string(),
        })?,
    };

    let choices = raw
        .choices
        .map(|values| {
            values
                .into_iter()
                .map(|value| coerce_scalar(&name, "choice", arg_type, value))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let default = raw
        .default
        .map(|value| coerce_scalar(&name, "default", arg_type, value))
        .transpose()?;

    if let (Some(default), Some(choices)) = (&default, &choices) {
        if !choices.contains(default) {
            return Err(SchemaError::DefaultNotInChoices {
                argument: name,
                default: default.to_string(),
            });
        }
    }

    Ok(ArgSpec { name, required: raw.required, choices, default, help: raw.help, arg_type })
}

/// Convert a scalar read from the schema file into the argument's declared type.
///
/// Strings go through the same coercion as command-line text; numbers and
/// booleans are stringified for `str` arguments and integers widen to `float`.
fn coerce_scalar(
    argument: &str,
    field: &'static str,
    arg_type: ArgType,
    value: ConfigScalar,
) -> Result<ArgValue, SchemaError> {
    let invalid = |detail: String| SchemaError::InvalidValue {
        argument: argument.to_string(),
        field,
        detail,
    };

    match (arg_type, value) {
        (_, ConfigScalar::Str(s)) => arg_type.coerce(&s).map_err(invalid),
        (ArgType::Str, ConfigScalar::Bool(b)) => Ok(ArgValue::Str(b.to_string())),
        (ArgType::Str, ConfigScalar::Int(i)) => Ok(ArgValue::Str(i.to_string())),
        (ArgType::Str, ConfigScalar::Float(x)) => Ok(ArgValue::Str(x.to_string())),
        (ArgType::Int, ConfigScalar::Int(i)) => Ok(ArgValue::Int(i)),
        (ArgType::Float, ConfigScalar::Float(x)) => Ok(ArgValue::Float(x)),
        (ArgType::Float, ConfigScalar::Int(i)) => Ok(ArgValue::Float(i as f64)),
        (ArgType::Bool, ConfigScalar::Bool(b)) => Ok(ArgValue::Bool(b)),
        (expected, other) => {
            Err(invalid(format!("expected {expected}, found {} '{}'", other.kind(), other)))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSchema {
    description: Option<String>,
    #[serde(default)]
    arguments: OrderedArguments,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArgSpec {
    #[serde(default)]
    required: bool,
    choices: Option<Vec<ConfigScalar>>,
    default: Option<ConfigScalar>,
    help: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ConfigScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ConfigScalar {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
        }
    }
}

impl fmt::Display for ConfigScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// `[arguments]` table kept in document order.
#[derive(Debug, Default)]
struct OrderedArguments(Vec<(String, RawArgSpec)>);

impl<'de> Deserialize<'de> for OrderedArguments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ArgumentsVisitor;

        impl<'de> Visitor<'de> for ArgumentsVisitor {
            type Value = OrderedArguments;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of argument definitions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, spec)) = map.next_entry::<String, RawArgSpec>()? {
                    entries.push((name, spec));
                }
                Ok(OrderedArguments(entries))
            }
        }

        deserializer.deserialize_map(ArgumentsVisitor)
    }
}
