//! SVG rasterization for vector master sources.

use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::canvas::{Canvas, unpremultiply};
use crate::error::{IconError, Result};

/// Renders SVG markup onto a transparent `size x size` canvas.
///
/// The drawing is scaled to fit (the larger SVG dimension becomes `size`)
/// and centred on the other axis.
pub fn render_svg(svg_data: &str, size: u32) -> Result<Canvas> {
    let tree = Tree::from_str(svg_data, &Options::default())
        .map_err(|err| IconError::Svg(err.to_string()))?;

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    let dx = (size as f32 - svg_size.width() * scale) / 2.0;
    let dy = (size as f32 - svg_size.height() * scale) / 2.0;

    let mut pixmap =
        Pixmap::new(size, size).ok_or_else(|| IconError::Svg(format!("cannot allocate {size}x{size} pixmap")))?;
    let transform = Transform::from_scale(scale, scale).post_translate(dx, dy);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Canvas::from_image(pixmap_to_rgba_image(&pixmap))
}

/// Converts a premultiplied tiny_skia Pixmap to a straight-alpha RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        dst.0 = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
    }
    img
}
