//! Diagram rendering (SVG document, PNG/JPEG rasterisation)

pub mod raster;
pub mod svg;

pub use raster::{rasterize, save_image};
pub use svg::{render_svg, VennDiagram};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
    Jpg,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Svg, ImageFormat::Png, ImageFormat::Jpg];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    /// Formats selected by a `format` argument; `"all"` selects every format.
    pub fn parse_selection(value: &str) -> Option<Vec<Self>> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(vec![Self::Svg]),
            "png" => Some(vec![Self::Png]),
            "jpg" | "jpeg" => Some(vec![Self::Jpg]),
            "all" => Some(Self::ALL.to_vec()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("generated SVG failed validation")]
    InvalidSvg,
    #[error("failed parsing SVG: {0}")]
    Parse(#[from] resvg::usvg::Error),
    #[error("diagram canvas has zero size")]
    EmptyCanvas,
    #[error("failed encoding image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::ImageFormat;

    #[test]
    fn parse_selection_expands_all() {
        assert_eq!(
            ImageFormat::parse_selection("all"),
            Some(vec![ImageFormat::Svg, ImageFormat::Png, ImageFormat::Jpg])
        );
        assert_eq!(ImageFormat::parse_selection("JPEG"), Some(vec![ImageFormat::Jpg]));
        assert_eq!(ImageFormat::parse_selection("gif"), None);
    }
}
