//! Soft halo around the motif footprint.

use log::debug;

use super::{Footprint, LayerEffect, RenderContext};
use crate::canvas::{Canvas, Color, white};
use crate::error::{IconError, Result};
use crate::shape::Shape;

/// Configuration for the glow layer.
///
/// Step `i` (0-based) is the footprint grown by `i * spacing` pixels and
/// filled at alpha `base_alpha - i * base_alpha / (steps + 1)`. Steps are
/// painted outermost first with alpha-over, so the halo is densest next to
/// the shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowConfig {
    pub steps: u32,
    pub spacing: f32,
    pub base_alpha: u8,
    pub color: Color,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            steps: 5,
            spacing: 5.0,
            base_alpha: 30,
            color: white(255),
        }
    }
}

impl GlowConfig {
    pub fn new(steps: u32) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Alpha of step `i`.
    pub fn step_alpha(&self, i: u32) -> u8 {
        let base = u64::from(self.base_alpha);
        let steps = u64::from(self.steps);
        (base - u64::from(i).min(steps) * base / (steps + 1)) as u8
    }

    /// Renders the glow around `shape` on a transparent `size x size` layer.
    pub fn render(&self, size: u32, shape: &Shape) -> Result<Canvas> {
        shape.validate()?;
        if matches!(shape, Shape::Polygon { .. }) {
            return Err(IconError::geometry(
                "glow",
                "only ellipses and rounded rectangles can glow",
                &shape.vertices(),
            ));
        }

        let mut layer = Canvas::new(size);
        for i in (0..self.steps).rev() {
            let Some(ring) = shape.outset(i as f32 * self.spacing) else {
                continue;
            };
            let mut color = self.color;
            color.alpha = self.step_alpha(i);
            layer.fill_shape(&ring, color, None)?;
        }
        Ok(layer)
    }
}

/// Renders `steps` concentric white copies of `shape` at decreasing alpha on
/// a new transparent layer the size of `canvas`.
pub fn render_glow(canvas: &Canvas, shape: &Shape, steps: u32) -> Result<Canvas> {
    GlowConfig::new(steps).render(canvas.size(), shape)
}

impl LayerEffect for GlowConfig {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let Some(Footprint(shape)) = ctx.get::<Footprint>().cloned() else {
            debug!("no motif footprint; skipping glow");
            return Ok(());
        };
        let layer = self.render(ctx.canvas.size(), &shape)?;
        ctx.canvas.paste_over(&layer, None)
    }
}
