//! Rounded-corner clipping of the finished master.
//!
//! The mask is binary (every pixel is 0 or 255), which makes
//! [`apply_mask`] idempotent: masking an already masked image changes
//! nothing.

use image::GrayImage;
use resvg::tiny_skia::{FillRule, Mask, Transform};

use super::{LayerEffect, RenderContext};
use crate::canvas::Canvas;
use crate::error::Result;
use crate::shape::{Rect, Shape};

/// Corner radius of an iOS app icon as a fraction of its edge length.
pub const IOS_CORNER_RADIUS_RATIO: f32 = 0.2237;

/// Corner radius in whole pixels: `floor(ratio * size)`, ratio clamped to
/// `[0, 0.5]`.
pub fn corner_radius(size: u32, radius_ratio: f32) -> u32 {
    let ratio = if radius_ratio.is_finite() {
        radius_ratio.clamp(0.0, 0.5)
    } else {
        0.0
    };
    (ratio * size as f32).floor() as u32
}

/// Builds a `size x size` mask that is 255 inside a full-canvas rounded
/// rectangle and 0 outside it.
pub fn rounded_mask(size: u32, radius_ratio: f32) -> GrayImage {
    let mut gray = GrayImage::new(size, size);
    let Some(mut mask) = Mask::new(size, size) else {
        return gray;
    };
    let rect = Rect::new(0.0, 0.0, size as f32, size as f32);
    let radius = corner_radius(size, radius_ratio) as f32;
    let Ok(path) = Shape::rounded_rect(rect, radius).to_path() else {
        return gray;
    };
    mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
    gray.copy_from_slice(mask.data());
    gray
}

/// Pastes `image` through `mask` onto a fresh transparent canvas.
pub fn apply_mask(image: &Canvas, mask: &GrayImage) -> Result<Canvas> {
    let mut output = Canvas::new(image.size()).with_blend_mode(image.blend_mode());
    output.paste_over(image, Some(mask))?;
    Ok(output)
}

/// Configuration for the corner mask layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskConfig {
    pub radius_ratio: f32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            radius_ratio: IOS_CORNER_RADIUS_RATIO,
        }
    }
}

impl MaskConfig {
    pub fn new(radius_ratio: f32) -> Self {
        Self { radius_ratio }
    }
}

/// Emitted by the mask layer: the corner radius applied, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerRadius(pub u32);

impl LayerEffect for MaskConfig {
    fn name(&self) -> &'static str {
        "mask"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let mask = rounded_mask(ctx.canvas.size(), self.radius_ratio);
        ctx.canvas = apply_mask(&ctx.canvas, &mask)?;
        Ok(())
    }

    fn emit(&self, ctx: &mut RenderContext) {
        ctx.set(CornerRadius(corner_radius(ctx.canvas.size(), self.radius_ratio)));
    }
}
