//! Background gradient fields.
//!
//! A [`Gradient`] is a pure function from an integer pixel position to a
//! color. Filling a canvas evaluates it for every pixel, row chunks in
//! parallel; the result is identical to evaluating [`Gradient::color_at`]
//! pixel by pixel.

use rayon::prelude::*;

use super::{LayerEffect, RenderContext};
use crate::canvas::{Canvas, Color, rgba};
use crate::error::Result;

/// Direction of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Top to bottom; ratio `y / size`.
    #[default]
    Vertical,
    /// Left to right; ratio `x / size`.
    Horizontal,
    /// Top-left to bottom-right; ratio `(x + y) / (2 * size)`.
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    /// Distance from the canvas center, normalized by the center-to-corner
    /// distance.
    Radial,
    Linear(Axis),
}

/// A two-stop color field.
///
/// `from` is the color at ratio 0 (the center of a radial gradient, the top
/// or left of a linear one) and `to` the color at ratio 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub from: Color,
    pub to: Color,
}

impl Gradient {
    pub fn radial(center: Color, edge: Color) -> Self {
        Self {
            kind: GradientKind::Radial,
            from: center,
            to: edge,
        }
    }

    pub fn linear(start: Color, end: Color, axis: Axis) -> Self {
        Self {
            kind: GradientKind::Linear(axis),
            from: start,
            to: end,
        }
    }

    /// Interpolation ratio at `(x, y)` on a `size x size` canvas, clamped to
    /// `[0, 1]`.
    pub fn ratio(&self, x: u32, y: u32, size: u32) -> f32 {
        if size == 0 {
            return 0.0;
        }
        let t = match self.kind {
            GradientKind::Radial => {
                let center = (size / 2) as f32;
                let max_dist = (center * center * 2.0).sqrt();
                if max_dist == 0.0 {
                    0.0
                } else {
                    let dx = x as f32 - center;
                    let dy = y as f32 - center;
                    (dx * dx + dy * dy).sqrt() / max_dist
                }
            }
            GradientKind::Linear(Axis::Vertical) => y as f32 / size as f32,
            GradientKind::Linear(Axis::Horizontal) => x as f32 / size as f32,
            GradientKind::Linear(Axis::Diagonal) => (x + y) as f32 / (2 * size) as f32,
        };
        t.clamp(0.0, 1.0)
    }

    /// The color at `(x, y)` on a `size x size` canvas.
    pub fn color_at(&self, x: u32, y: u32, size: u32) -> Color {
        let t = self.ratio(x, y, size);
        let lerp = |a: u8, b: u8| -> u8 {
            let (a, b) = (a as f32, b as f32);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        rgba(
            lerp(self.from.red, self.to.red),
            lerp(self.from.green, self.to.green),
            lerp(self.from.blue, self.to.blue),
            lerp(self.from.alpha, self.to.alpha),
        )
    }

    /// Overwrites every pixel of `canvas` with the gradient.
    pub fn fill(&self, canvas: &mut Canvas) {
        let size = canvas.size();
        if size == 0 {
            return;
        }
        let stride = size as usize * 4;
        canvas
            .raw_mut()
            .par_chunks_exact_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let c = self.color_at(x as u32, y as u32, size);
                    px.copy_from_slice(&[c.red, c.green, c.blue, c.alpha]);
                }
            });
    }
}

/// Fills `canvas` with a radial gradient from `center` out to `edge`.
pub fn fill_radial(canvas: &mut Canvas, center: Color, edge: Color) {
    Gradient::radial(center, edge).fill(canvas);
}

/// Fills `canvas` with a linear gradient along `axis`.
pub fn fill_linear(canvas: &mut Canvas, top: Color, bottom: Color, axis: Axis) {
    Gradient::linear(top, bottom, axis).fill(canvas);
}

impl LayerEffect for Gradient {
    fn name(&self) -> &'static str {
        "background"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        self.fill(&mut ctx.canvas);
        Ok(())
    }
}
