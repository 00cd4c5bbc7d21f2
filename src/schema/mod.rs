//! Argument schema loading
//!
//! A schema declares every `--<name>` option of the command line: whether it is
//! required, its value type, allowed choices, default and help text. Schemas are
//! read from TOML (or YAML) files, with a bundled fallback.

pub mod loader;
pub mod types;

pub use loader::{
    load_schema, load_schema_from, parse_schema_str, resolve_schema_source, SchemaFormat,
    SchemaSource, SCHEMA_ENV_VAR,
};
pub use types::{ArgSpec, ArgType, ArgValue, CliSchema, ParsedArgs, SchemaError};
