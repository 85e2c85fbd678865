//! The mutable square RGBA raster every stage draws into.
//!
//! A [`Canvas`] wraps an [`RgbaImage`] and rasterizes [`Shape`]s through
//! `tiny_skia` coverage masks. How a shape's color lands on the pixels it
//! covers is decided by the canvas [`BlendMode`]:
//!
//! - [`BlendMode::Source`] replaces what is underneath, so within one layer
//!   the last shape drawn wins. Motif layers use this: the draw order of the
//!   faces *is* the shading.
//! - [`BlendMode::SourceOver`] blends with standard alpha-over. Effect layers
//!   (shadow, glow) use this so stacked translucent copies accumulate.
//!
//! Whole canvases are combined with [`Canvas::paste_over`], which is always
//! alpha-over and can be gated by a single-channel mask.

use image::{GrayImage, Rgba, RgbaImage};
use palette::Srgba;
use rayon::prelude::*;
use resvg::tiny_skia::{self, FillRule, LineCap, LineJoin, Mask, Stroke, Transform};

use crate::error::{IconError, Result};
use crate::shape::{segment_path, DrawCommand, DrawList, Outline, Point, Rect, Shape};

/// Non-premultiplied 8-bit RGBA color.
pub type Color = Srgba<u8>;

/// Shorthand for building a [`Color`].
pub fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
    Srgba::new(red, green, blue, alpha)
}

/// White at the given opacity.
pub fn white(alpha: u8) -> Color {
    rgba(255, 255, 255, alpha)
}

fn to_pixel(color: Color) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, color.alpha])
}

// ============================================================================
// BlendMode
// ============================================================================

/// How shape primitives combine with the pixels they cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// The shape's RGBA replaces the destination (partial coverage at
    /// anti-aliased edges interpolates in premultiplied space).
    Source,
    /// Standard alpha-over blending.
    #[default]
    SourceOver,
}

impl BlendMode {
    fn composite(self, src: Rgba<u8>, dst: Rgba<u8>, coverage: u8) -> Rgba<u8> {
        match self {
            BlendMode::Source if coverage == 255 => src,
            BlendMode::Source => lerp_premultiplied(src, dst, coverage as f32 / 255.0),
            BlendMode::SourceOver => {
                let mut src = src;
                src[3] = scale_alpha(src[3], coverage);
                alpha_blend(src, dst)
            }
        }
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// A square RGBA raster with shape-level drawing primitives.
///
/// Coordinates outside `[0, size)` are clipped silently; geometric offset
/// math that lands a vertex slightly off-canvas is not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixels: RgbaImage,
    blend: BlendMode,
}

impl Canvas {
    /// Creates a fully transparent `size x size` canvas.
    pub fn new(size: u32) -> Self {
        Self {
            pixels: RgbaImage::new(size, size),
            blend: BlendMode::default(),
        }
    }

    /// Wraps an existing image. The image must be square.
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() != image.height() {
            return Err(IconError::NonSquareSource {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self {
            pixels: image,
            blend: BlendMode::default(),
        })
    }

    /// Returns this canvas with a different blend mode.
    pub fn with_blend_mode(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| rgba(p[0], p[1], p[2], p[3]))
    }

    /// Writes one pixel verbatim, ignoring the blend mode. Out-of-range
    /// coordinates are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        let size = self.size() as i64;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            self.pixels.put_pixel(x as u32, y as u32, to_pixel(color));
        }
    }

    // ---- Shape primitives ----

    /// Fills a polygon and optionally strokes its outline.
    pub fn draw_polygon(&mut self, points: &[Point], fill: Color, outline: Option<Outline>) -> Result<()> {
        self.fill_shape(&Shape::polygon(points.to_vec()), fill, outline)
    }

    /// Fills the ellipse inscribed in `bounds`.
    pub fn draw_ellipse(&mut self, bounds: Rect, fill: Color, outline: Option<Outline>) -> Result<()> {
        self.fill_shape(&Shape::ellipse(bounds), fill, outline)
    }

    pub fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        fill: Color,
        outline: Option<Outline>,
    ) -> Result<()> {
        self.fill_shape(&Shape::rounded_rect(rect, radius), fill, outline)
    }

    /// Fills any [`Shape`], then strokes the outline on top of the fill.
    pub fn fill_shape(&mut self, shape: &Shape, fill: Color, outline: Option<Outline>) -> Result<()> {
        let path = shape.to_path()?;
        self.paint_path(&path, fill);
        if let Some(outline) = outline {
            self.stroke_path(&path, outline.color, outline.width);
        }
        Ok(())
    }

    /// Strokes a straight segment. Never fails; zero-length, zero-width, or
    /// non-finite segments draw nothing.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        if from == to || !from.is_finite() || !to.is_finite() {
            return;
        }
        if let Some(path) = segment_path(from, to) {
            self.stroke_path(&path, color, width);
        }
    }

    /// Executes a single draw command.
    pub fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        match command {
            DrawCommand::Fill {
                shape,
                fill,
                outline,
            } => self.fill_shape(shape, *fill, *outline),
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => {
                self.draw_line(*from, *to, *color, *width);
                Ok(())
            }
        }
    }

    /// Executes every command of `list` in order.
    pub fn draw_list(&mut self, list: &DrawList) -> Result<()> {
        list.iter().try_for_each(|command| self.draw(command))
    }

    // ---- Compositing ----

    /// Composites `other` over this canvas with alpha-over blending.
    ///
    /// When `mask` is given, each source pixel's alpha is multiplied by the
    /// mask value (`255` keeps it, `0` drops it) before blending.
    pub fn paste_over(&mut self, other: &Canvas, mask: Option<&GrayImage>) -> Result<()> {
        let size = self.size();
        if other.size() != size {
            return Err(IconError::SizeMismatch {
                expected: size,
                actual: other.size(),
            });
        }
        if let Some(mask) = mask {
            if mask.width() != size || mask.height() != size {
                return Err(IconError::SizeMismatch {
                    expected: size,
                    actual: mask.width(),
                });
            }
        }

        if size == 0 {
            return Ok(());
        }

        let width = size as usize;
        let stride = width * 4;
        let src = other.pixels.as_raw();
        let mask = mask.map(|m| m.as_raw().as_slice());

        let dst: &mut [u8] = &mut self.pixels;
        dst.par_chunks_exact_mut(stride)
            .zip(src.par_chunks_exact(stride))
            .enumerate()
            .for_each(|(y, (row, src_row))| {
                for x in 0..width {
                    let i = x * 4;
                    let mut s = Rgba([src_row[i], src_row[i + 1], src_row[i + 2], src_row[i + 3]]);
                    if let Some(mask) = mask {
                        s[3] = scale_alpha(s[3], mask[y * width + x]);
                    }
                    let d = Rgba([row[i], row[i + 1], row[i + 2], row[i + 3]]);
                    row[i..i + 4].copy_from_slice(&alpha_blend(s, d).0);
                }
            });
        Ok(())
    }

    // ---- Rasterization ----

    fn stroke_path(&mut self, path: &tiny_skia::Path, color: Color, width: f32) {
        if !(width > 0.0) {
            return;
        }
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        if let Some(outline) = path.stroke(&stroke, 1.0) {
            self.paint_path(&outline, color);
        }
    }

    /// Fills `path` with anti-aliased coverage, restricted to its bounds.
    fn paint_path(&mut self, path: &tiny_skia::Path, color: Color) {
        let size = self.size();
        let Some(mut mask) = Mask::new(size, size) else {
            return;
        };
        mask.fill_path(path, FillRule::Winding, true, Transform::identity());

        let bounds = path.bounds();
        let clamp = |v: f32| (v.max(0.0) as u32).min(size);
        let (x0, x1) = (clamp(bounds.left().floor()), clamp(bounds.right().ceil() + 1.0));
        let (y0, y1) = (clamp(bounds.top().floor()), clamp(bounds.bottom().ceil() + 1.0));

        let coverage = mask.data();
        let src = to_pixel(color);
        for y in y0..y1 {
            for x in x0..x1 {
                let c = coverage[(y * size + x) as usize];
                if c == 0 {
                    continue;
                }
                let dst = *self.pixels.get_pixel(x, y);
                self.pixels.put_pixel(x, y, self.blend.composite(src, dst, c));
            }
        }
    }
}

// ============================================================================
// Pixel math
// ============================================================================

/// Multiplies an alpha value by an 8-bit factor, rounding to nearest.
pub(crate) fn scale_alpha(alpha: u8, factor: u8) -> u8 {
    ((alpha as u32 * factor as u32 + 127) / 255) as u8
}

/// Alpha blends two RGBA pixels (source over destination).
pub(crate) fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match (src[3], dst[3]) {
        (0, _) => return dst,
        (255, _) | (_, 0) => return src,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Interpolates from `dst` towards `src` by `t` in premultiplied space.
fn lerp_premultiplied(src: Rgba<u8>, dst: Rgba<u8>, t: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let a = da + (sa - da) * t;
    if a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let sp = s as f32 * sa;
        let dp = d as f32 * da;
        ((dp + (sp - dp) * t) / a).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (a * 255.0).round() as u8,
    ])
}

/// Unpremultiplies a premultiplied alpha pixel.
pub(crate) fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        [0, 0, 0, 0]
    } else {
        let a_f = a as f32 / 255.0;
        [
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        ]
    }
}

/// Premultiplies a straight alpha pixel.
pub(crate) fn premultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    [scale_alpha(r, a), scale_alpha(g, a), scale_alpha(b, a), a]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(30.0, 50.0),
        ]
    }

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = Canvas::new(8);
        assert_eq!(canvas.size(), 8);
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn from_image_rejects_non_square() {
        let err = Canvas::from_image(RgbaImage::new(4, 8)).unwrap_err();
        assert!(matches!(err, IconError::NonSquareSource { width: 4, height: 8 }));
    }

    #[test]
    fn set_pixel_clips_out_of_range() {
        let mut canvas = Canvas::new(4);
        canvas.set_pixel(-1, 0, white(255));
        canvas.set_pixel(0, 4, white(255));
        canvas.set_pixel(2, 3, rgba(1, 2, 3, 4));
        assert_eq!(canvas.pixel(2, 3), Some(rgba(1, 2, 3, 4)));
        assert_eq!(canvas.image().pixels().filter(|p| p[3] != 0).count(), 1);
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn polygon_fills_interior_only() {
        let mut canvas = Canvas::new(64);
        canvas.draw_polygon(&triangle(), rgba(255, 0, 0, 255), None).unwrap();
        assert_eq!(canvas.pixel(30, 20), Some(rgba(255, 0, 0, 255)));
        assert_eq!(canvas.pixel(5, 5).unwrap().alpha, 0);
        assert_eq!(canvas.pixel(60, 60).unwrap().alpha, 0);
    }

    #[test]
    fn polygon_with_two_points_is_invalid_geometry() {
        let mut canvas = Canvas::new(16);
        let err = canvas
            .draw_polygon(&[Point::new(0.0, 0.0), Point::new(4.0, 4.0)], white(255), None)
            .unwrap_err();
        assert!(matches!(err, IconError::InvalidGeometry { .. }));
    }

    #[test]
    fn shapes_partially_off_canvas_are_clipped() {
        let mut canvas = Canvas::new(32);
        let bounds = Rect::new(-20.0, -20.0, 40.0, 40.0);
        canvas.draw_ellipse(bounds, white(255), None).unwrap();
        assert_eq!(canvas.pixel(0, 0).unwrap().alpha, 255);
        canvas.draw_line(Point::new(-50.0, 16.0), Point::new(80.0, 16.0), white(255), 4.0);
        assert_eq!(canvas.pixel(31, 16).unwrap().alpha, 255);
    }

    #[test]
    fn source_mode_replaces_pixels() {
        let mut canvas = Canvas::new(64).with_blend_mode(BlendMode::Source);
        canvas.draw_polygon(&triangle(), white(200), None).unwrap();
        canvas.draw_polygon(&triangle(), white(100), None).unwrap();
        assert_eq!(canvas.pixel(30, 20), Some(white(100)));
    }

    #[test]
    fn source_over_mode_accumulates() {
        let mut canvas = Canvas::new(64);
        canvas.draw_polygon(&triangle(), white(100), None).unwrap();
        canvas.draw_polygon(&triangle(), white(100), None).unwrap();
        let alpha = canvas.pixel(30, 20).unwrap().alpha;
        // 100 + 100 * (1 - 100/255) = 160.8
        assert!((160..=162).contains(&alpha), "alpha was {alpha}");
    }

    #[test]
    fn outline_drawn_over_fill() {
        let mut canvas = Canvas::new(64).with_blend_mode(BlendMode::Source);
        let outline = Outline::new(rgba(0, 0, 255, 255), 4.0);
        canvas
            .draw_rounded_rect(Rect::new(8.0, 8.0, 48.0, 48.0), 8.0, white(200), Some(outline))
            .unwrap();
        assert_eq!(canvas.pixel(32, 8), Some(rgba(0, 0, 255, 255)));
        assert_eq!(canvas.pixel(32, 32), Some(white(200)));
    }

    #[test]
    fn zero_length_line_draws_nothing() {
        let mut canvas = Canvas::new(16);
        canvas.draw_line(Point::new(5.0, 5.0), Point::new(5.0, 5.0), white(255), 3.0);
        canvas.draw_line(Point::new(1.0, 1.0), Point::new(9.0, 9.0), white(255), 0.0);
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn paste_over_blends_and_respects_mask() {
        let mut base = Canvas::new(4);
        for y in 0..4 {
            for x in 0..4 {
                base.set_pixel(x, y, rgba(255, 0, 0, 255));
            }
        }
        let mut top = Canvas::new(4);
        top.set_pixel(0, 0, rgba(0, 0, 255, 255));
        top.set_pixel(1, 0, rgba(0, 0, 255, 255));

        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(0, 0, image::Luma([255]));

        base.paste_over(&top, Some(&mask)).unwrap();
        assert_eq!(base.pixel(0, 0), Some(rgba(0, 0, 255, 255)));
        // Masked out: background untouched.
        assert_eq!(base.pixel(1, 0), Some(rgba(255, 0, 0, 255)));
    }

    #[test]
    fn paste_over_rejects_size_mismatch() {
        let mut base = Canvas::new(4);
        let err = base.paste_over(&Canvas::new(8), None).unwrap_err();
        assert!(matches!(err, IconError::SizeMismatch { expected: 4, actual: 8 }));
    }

    #[test]
    fn alpha_blend_fast_paths() {
        let red = Rgba([255, 0, 0, 255]);
        let clear = Rgba([0, 0, 0, 0]);
        assert_eq!(alpha_blend(clear, red), red);
        assert_eq!(alpha_blend(red, clear), red);

        let half_blue = Rgba([0, 0, 255, 128]);
        assert_eq!(alpha_blend(half_blue, clear), half_blue);
        let mixed = alpha_blend(half_blue, red);
        assert!(mixed[0] > 0 && mixed[2] > 0);
        assert_eq!(mixed[3], 255);
    }

    #[test]
    fn premultiply_roundtrip_opaque() {
        assert_eq!(premultiply(10, 20, 30, 255), [10, 20, 30, 255]);
        assert_eq!(unpremultiply(10, 20, 30, 255), [10, 20, 30, 255]);
        assert_eq!(unpremultiply(10, 20, 30, 0), [0, 0, 0, 0]);
    }
}
