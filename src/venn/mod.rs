//! Venn workflow: options from parsed arguments, set loading, intersection
//! output and diagram rendering.

pub mod compute;
pub mod sets;

pub use compute::{intersection, region_id, VennCounts};
pub use sets::read_set;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::{render_svg, save_image, ImageFormat, RenderError, VennDiagram};
use crate::schema::{ArgValue, ParsedArgs};
use crate::utils::{ensure_dir, parse_csv, sha256_file, with_extension_in};

const MIN_SETS: usize = 2;
const MAX_SETS: usize = 3;

#[derive(Debug, Error)]
pub enum VennError {
    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("argument '{name}' must be {expected}, got {found}")]
    WrongType { name: String, expected: &'static str, found: &'static str },

    #[error(
        "labels and input_files must have the same length \
         (got {labels} labels for {inputs} input files)"
    )]
    LabelCount { labels: usize, inputs: usize },

    #[error("This tool supports only 2 or 3 sets for Venn diagrams, got {0}")]
    UnsupportedSetCount(usize),

    #[error("unsupported image format '{0}' (expected svg, png, jpg or all)")]
    UnsupportedFormat(String),

    #[error("failed reading input file {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Everything a Venn run needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct VennOptions {
    pub labels: Vec<String>,
    pub inputs: Vec<PathBuf>,
    pub output_name: String,
    pub img_name: String,
    pub formats: Vec<ImageFormat>,
    pub case_sensitive: bool,
    pub save_dir: PathBuf,
    pub title: Option<String>,
}

impl VennOptions {
    pub fn from_args(args: &ParsedArgs) -> Result<Self, VennError> {
        let labels = parse_csv(required_str(args, "labels")?);

        let mut inputs = vec![
            PathBuf::from(required_str(args, "input_file1")?),
            PathBuf::from(required_str(args, "input_file2")?),
        ];
        if let Some(third) = optional_str(args, "input_file3")? {
            inputs.push(PathBuf::from(third));
        }

        let format = required_str(args, "format")?;
        let formats = ImageFormat::parse_selection(format)
            .ok_or_else(|| VennError::UnsupportedFormat(format.to_string()))?;

        let case_sensitive = match args.get("case_sensitive") {
            Some(ArgValue::Str(s)) => s.trim().eq_ignore_ascii_case("yes"),
            Some(ArgValue::Bool(b)) => *b,
            Some(ArgValue::Null) | None => {
                return Err(VennError::MissingArgument("case_sensitive".to_string()))
            }
            Some(other) => {
                return Err(VennError::WrongType {
                    name: "case_sensitive".to_string(),
                    expected: "str or bool",
                    found: other.type_name(),
                })
            }
        };

        let options = Self {
            labels,
            inputs,
            output_name: required_str(args, "output_name")?.to_string(),
            img_name: required_str(args, "img_name")?.to_string(),
            formats,
            case_sensitive,
            save_dir: PathBuf::from(required_str(args, "save_dir")?),
            title: optional_str(args, "title")?.map(str::to_string),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), VennError> {
        if self.labels.len() != self.inputs.len() {
            return Err(VennError::LabelCount {
                labels: self.labels.len(),
                inputs: self.inputs.len(),
            });
        }
        if !(MIN_SETS..=MAX_SETS).contains(&self.inputs.len()) {
            return Err(VennError::UnsupportedSetCount(self.inputs.len()));
        }
        Ok(())
    }
}

fn required_str<'a>(args: &'a ParsedArgs, name: &str) -> Result<&'a str, VennError> {
    optional_str(args, name)?.ok_or_else(|| VennError::MissingArgument(name.to_string()))
}

/// `None` for absent, null or blank values.
fn optional_str<'a>(args: &'a ParsedArgs, name: &str) -> Result<Option<&'a str>, VennError> {
    match args.get(name) {
        Some(ArgValue::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(ArgValue::Str(s)) => Ok(Some(s.as_str())),
        Some(ArgValue::Null) | None => Ok(None),
        Some(other) => Err(VennError::WrongType {
            name: name.to_string(),
            expected: "str",
            found: other.type_name(),
        }),
    }
}

/// Files produced by a run, plus the computed counts.
#[derive(Debug, Clone)]
pub struct VennReport {
    pub intersection_path: PathBuf,
    pub intersection_len: usize,
    pub image_paths: Vec<PathBuf>,
    pub counts: VennCounts,
}

impl VennReport {
    pub fn image_summary(&self) -> String {
        let paths: Vec<String> = self.image_paths.iter().map(|p| p.display().to_string()).collect();
        paths.join(" and ")
    }
}

/// Load the sets, write the intersection, then the diagram images.
///
/// `on_intersection` runs as soon as the intersection file is on disk, so a
/// caller can report it even if rendering fails afterwards.
pub fn run_venn<F>(options: &VennOptions, on_intersection: F) -> Result<VennReport, VennError>
where
    F: FnOnce(&Path),
{
    options.validate()?;

    let sets = options
        .inputs
        .iter()
        .map(|path| read_set(path, options.case_sensitive))
        .collect::<Result<Vec<_>, _>>()?;

    let counts = VennCounts::from_sets(&sets);
    let shared = intersection(&sets);
    for (mask, count) in counts.regions() {
        tracing::debug!(region = %region_id(mask, counts.set_count()), count, "venn region");
    }

    ensure_dir(&options.save_dir)
        .map_err(|source| VennError::Write { path: options.save_dir.clone(), source })?;

    let intersection_path = options.save_dir.join(&options.output_name);
    write_intersection(&intersection_path, &shared)?;
    tracing::info!(
        items = shared.len(),
        path = %intersection_path.display(),
        "intersection written"
    );
    match sha256_file(&intersection_path) {
        Ok(digest) => tracing::debug!(sha256 = %digest, "intersection digest"),
        Err(e) => tracing::warn!("Could not hash {}: {}", intersection_path.display(), e),
    }
    on_intersection(&intersection_path);

    let diagram = VennDiagram::new(options.labels.clone(), counts.clone(), options.title.clone());
    let svg = render_svg(&diagram);

    let mut image_paths = Vec::with_capacity(options.formats.len());
    for format in &options.formats {
        let path = with_extension_in(&options.save_dir, &options.img_name, format.extension());
        save_image(&svg, *format, &path)?;
        tracing::info!(format = format.extension(), path = %path.display(), "diagram written");
        image_paths.push(path);
    }

    Ok(VennReport { intersection_path, intersection_len: shared.len(), image_paths, counts })
}

/// One item per line, sorted.
fn write_intersection(path: &Path, items: &BTreeSet<String>) -> Result<(), VennError> {
    let mut body = String::with_capacity(items.iter().map(|item| item.len() + 1).sum());
    for item in items {
        body.push_str(item);
        body.push('\n');
    }
    std::fs::write(path, body)
        .map_err(|source| VennError::Write { path: path.to_path_buf(), source })
}
