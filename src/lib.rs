//! venn-intersect: compare line-delimited sets from a schema-driven CLI
//!
//! The command line is built at runtime from a declarative argument schema.
//! Two or three input files are loaded as sets of lines, their intersection is
//! written to a text file and a Venn diagram is rendered as SVG, PNG or JPEG.

pub mod cli;
pub mod render;
pub mod schema;
pub mod utils;
pub mod venn;
