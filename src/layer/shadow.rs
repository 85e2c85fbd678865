//! Soft drop shadow beneath the motif.

use log::debug;

use super::{Footprint, LayerEffect, RenderContext};
use crate::canvas::{Canvas, Color, rgba};
use crate::effects::gaussian_blur;
use crate::error::Result;
use crate::shape::Shape;

/// Blur radius used when none is configured.
pub const DEFAULT_SHADOW_BLUR: f32 = 20.0;

/// Configuration for the shadow layer.
///
/// The shadow is the motif footprint filled with `color` and blurred with a
/// Gaussian whose sigma equals `blur_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    pub blur_radius: f32,
    pub color: Color,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_SHADOW_BLUR,
            color: rgba(0, 0, 0, 50),
        }
    }
}

impl ShadowConfig {
    pub fn new(blur_radius: f32) -> Self {
        Self {
            blur_radius,
            ..Self::default()
        }
    }

    /// Renders the shadow of `shape` on a transparent `size x size` layer.
    pub fn render(&self, size: u32, shape: &Shape) -> Result<Canvas> {
        let mut layer = Canvas::new(size);
        layer.fill_shape(shape, self.color, None)?;
        if self.blur_radius > 0.0 {
            layer = gaussian_blur(&layer, self.blur_radius);
        }
        Ok(layer)
    }
}

/// Renders a blurred black (alpha 50) shadow of `shape` on a new transparent
/// layer the size of `canvas`. `canvas` itself is not modified.
pub fn render_shadow(canvas: &Canvas, shape: &Shape, blur_radius: f32) -> Result<Canvas> {
    ShadowConfig::new(blur_radius).render(canvas.size(), shape)
}

impl LayerEffect for ShadowConfig {
    fn name(&self) -> &'static str {
        "shadow"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let Some(Footprint(shape)) = ctx.get::<Footprint>().cloned() else {
            debug!("no motif footprint; skipping shadow");
            return Ok(());
        };
        let layer = self.render(ctx.canvas.size(), &shape)?;
        ctx.canvas.paste_over(&layer, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;
    use crate::shape::{Point, Rect};

    fn ellipse() -> Shape {
        Shape::ellipse(Rect::from_center(Point::new(64.0, 80.0), 40.0, 10.0))
    }

    #[test]
    fn unblurred_shadow_is_black_alpha_50() {
        let canvas = Canvas::new(128);
        let layer = render_shadow(&canvas, &ellipse(), 0.0).unwrap();
        assert_eq!(layer.pixel(64, 80), Some(rgba(0, 0, 0, 50)));
        assert_eq!(layer.pixel(64, 40).unwrap().alpha, 0);
    }

    #[test]
    fn blur_softens_the_edge() {
        let canvas = Canvas::new(128);
        let layer = render_shadow(&canvas, &ellipse(), 6.0).unwrap();
        let center = layer.pixel(64, 80).unwrap().alpha;
        let above = layer.pixel(64, 66).unwrap().alpha;
        assert!(center > 0 && center < 50);
        assert!(above > 0 && above < center);
    }

    #[test]
    fn shadow_is_pure() {
        let canvas = Canvas::new(128);
        let a = render_shadow(&canvas, &ellipse(), 4.0).unwrap();
        let b = render_shadow(&canvas, &ellipse(), 4.0).unwrap();
        assert_eq!(a, b);
        assert!(canvas.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn degenerate_shape_is_rejected() {
        let canvas = Canvas::new(32);
        let shape = Shape::ellipse(Rect::new(4.0, 4.0, 0.0, 0.0));
        let err = render_shadow(&canvas, &shape, 2.0).unwrap_err();
        assert!(matches!(err, IconError::InvalidGeometry { .. }));
    }
}
