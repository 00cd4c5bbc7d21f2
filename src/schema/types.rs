//! Argument schema types and typed argument values

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Description used when the schema does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "CLI Tool";

/// Value type declared for a schema argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgType {
    #[default]
    Str,
    Int,
    Float,
    Bool,
}

impl ArgType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "str" | "string" => Some(Self::Str),
            "int" | "integer" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" | "boolean" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }

    /// Placeholder shown in `--help` after the option name.
    pub fn value_name(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Bool => "BOOL",
        }
    }

    /// Convert command-line text into a value of this type.
    pub fn coerce(self, raw: &str) -> Result<ArgValue, String> {
        match self {
            Self::Str => Ok(ArgValue::Str(raw.to_string())),
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|e| format!("invalid int value '{raw}': {e}")),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|e| format!("invalid float value '{raw}': {e}")),
            Self::Bool => parse_bool(raw).map(ArgValue::Bool).ok_or_else(|| {
                format!("invalid bool value '{raw}' (expected true/false, yes/no, on/off or 1/0)")
            }),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// A typed argument value. `Null` stands for an omitted option without default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ArgValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the value's type, as used in schema files.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => ArgType::Bool.as_str(),
            Self::Int(_) => ArgType::Int.as_str(),
            Self::Float(_) => ArgType::Float.as_str(),
            Self::Str(_) => ArgType::Str.as_str(),
        }
    }

    pub fn matches_type(&self, arg_type: ArgType) -> bool {
        matches!(
            (self, arg_type),
            (Self::Null, _)
                | (Self::Bool(_), ArgType::Bool)
                | (Self::Int(_), ArgType::Int)
                | (Self::Float(_), ArgType::Float)
                | (Self::Str(_), ArgType::Str)
        )
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One `--<name>` option declared by the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub required: bool,
    pub choices: Option<Vec<ArgValue>>,
    pub default: Option<ArgValue>,
    pub help: Option<String>,
    pub arg_type: ArgType,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self {
            name: name.into(),
            required: false,
            choices: None,
            default: None,
            help: None,
            arg_type,
        }
    }
}

/// A parsed argument schema, arguments kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CliSchema {
    pub description: String,
    pub arguments: Vec<ArgSpec>,
}

impl Default for CliSchema {
    fn default() -> Self {
        Self { description: DEFAULT_DESCRIPTION.to_string(), arguments: Vec::new() }
    }
}

impl CliSchema {
    pub fn argument(&self, name: &str) -> Option<&ArgSpec> {
        self.arguments.iter().find(|spec| spec.name == name)
    }
}

/// Parsed command-line values keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedArgs {
    values: BTreeMap<String, ArgValue>,
}

impl ParsedArgs {
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Float value; integers are widened.
    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Float(x)) => Some(*x),
            Some(ArgValue::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ParsedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (name, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            match value {
                ArgValue::Str(s) => write!(f, "{name}: {s:?}")?,
                other => write!(f, "{name}: {other}")?,
            }
        }
        f.write_str("}")
    }
}

/// Errors raised while loading or validating a schema file.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed reading schema file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported schema extension '.{extension}' for file {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("invalid {format} schema in {origin}: {detail}")]
    Syntax { format: &'static str, origin: String, detail: String },

    #[error(
        "argument '{argument}' declares unknown type '{type_name}' \
         (expected str, int, float or bool)"
    )]
    UnknownType { argument: String, type_name: String },

    #[error("argument '{argument}' has an invalid {field}: {detail}")]
    InvalidValue { argument: String, field: &'static str, detail: String },

    #[error("argument '{argument}' default '{default}' is not one of its choices")]
    DefaultNotInChoices { argument: String, default: String },

    #[error("invalid argument name '{argument}' (use ASCII letters, digits, '_' or '-')")]
    InvalidName { argument: String },

    #[error("argument name '{argument}' is reserved")]
    ReservedName { argument: String },

    #[error("argument '{argument}' is declared more than once")]
    DuplicateArgument { argument: String },
}
