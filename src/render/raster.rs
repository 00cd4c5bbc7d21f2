//! Writing the diagram to disk: SVG as-is, PNG/JPEG through resvg.

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;
use std::path::Path;

use super::svg::looks_like_svg;
use super::{ImageFormat, RenderError};

/// Rasterise an SVG document onto an opaque white canvas.
pub fn rasterize(svg: &str) -> Result<Pixmap, RenderError> {
    if !looks_like_svg(svg) {
        return Err(RenderError::InvalidSvg);
    }

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height()).ok_or(RenderError::EmptyCanvas)?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

pub fn save_image(svg: &str, format: ImageFormat, path: &Path) -> Result<(), RenderError> {
    match format {
        ImageFormat::Svg => std::fs::write(path, svg)
            .map_err(|source| RenderError::Write { path: path.to_path_buf(), source }),
        ImageFormat::Png | ImageFormat::Jpg => {
            let pixmap = rasterize(svg)?;
            // The canvas is opaque, so premultiplied and straight alpha coincide.
            let rgba = image::RgbaImage::from_raw(
                pixmap.width(),
                pixmap.height(),
                pixmap.data().to_vec(),
            )
            .ok_or(RenderError::EmptyCanvas)?;

            if format == ImageFormat::Png {
                rgba.save_with_format(path, image::ImageFormat::Png)?;
            } else {
                image::DynamicImage::ImageRgba8(rgba)
                    .to_rgb8()
                    .save_with_format(path, image::ImageFormat::Jpeg)?;
            }
            Ok(())
        }
    }
}
