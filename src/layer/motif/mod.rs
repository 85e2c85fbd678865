//! Foreground motifs.
//!
//! A motif is a fixed drawing recipe that turns a few parameters into an
//! ordered [`DrawList`]. Motifs are drawn on their own transparent layer in
//! [`BlendMode::Source`], so within a motif a later shape replaces an earlier
//! one instead of blending with it; the finished layer is then composited
//! over the background.

pub mod chat;
pub mod neural;
pub mod prism;

pub use chat::ChatBubbleMotif;
pub use neural::NeuralNetworkMotif;
pub use prism::{FaceAlphas, PrismMotif, PrismPart, PrismVariant, draw_prism_motif};

use log::debug;

use super::{LayerEffect, RenderContext};
use crate::canvas::{BlendMode, Canvas};
use crate::error::{IconError, Result};
use crate::shape::{DrawList, Shape};

/// A procedural foreground drawing.
pub trait Motif: Send + Sync {
    /// Name used in logs and geometry errors.
    fn name(&self) -> &'static str;

    /// The commands that draw this motif, in painting order.
    fn draw_list(&self) -> Result<DrawList>;

    /// The silhouette that shadow and glow effects are built from, if the
    /// motif has one.
    fn footprint(&self) -> Option<Shape> {
        None
    }
}

/// Executes a motif's draw list on `canvas`.
///
/// Geometry errors raised while rasterizing are re-labelled with the motif
/// name.
pub fn draw_motif(canvas: &mut Canvas, motif: &dyn Motif) -> Result<()> {
    let list = motif.draw_list()?;
    debug!("drawing {} motif ({} commands)", motif.name(), list.len());
    canvas.draw_list(&list).map_err(|err| match err {
        IconError::InvalidGeometry {
            reason, vertices, ..
        } => IconError::InvalidGeometry {
            motif: motif.name().to_string(),
            reason,
            vertices,
        },
        other => other,
    })
}

// ============================================================================
// MotifLayer
// ============================================================================

/// The motif drawn by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum MotifLayer {
    Prism(PrismMotif),
    ChatBubble(ChatBubbleMotif),
    NeuralNetwork(NeuralNetworkMotif),
}

impl MotifLayer {
    pub fn as_motif(&self) -> &dyn Motif {
        match self {
            Self::Prism(m) => m,
            Self::ChatBubble(m) => m,
            Self::NeuralNetwork(m) => m,
        }
    }
}

impl From<PrismMotif> for MotifLayer {
    fn from(motif: PrismMotif) -> Self {
        Self::Prism(motif)
    }
}

impl From<ChatBubbleMotif> for MotifLayer {
    fn from(motif: ChatBubbleMotif) -> Self {
        Self::ChatBubble(motif)
    }
}

impl From<NeuralNetworkMotif> for MotifLayer {
    fn from(motif: NeuralNetworkMotif) -> Self {
        Self::NeuralNetwork(motif)
    }
}

impl LayerEffect for MotifLayer {
    fn name(&self) -> &'static str {
        "motif"
    }

    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        let mut layer = Canvas::new(ctx.canvas.size()).with_blend_mode(BlendMode::Source);
        draw_motif(&mut layer, self.as_motif())?;
        ctx.canvas.paste_over(&layer, None)
    }

    fn emit(&self, ctx: &mut RenderContext) {
        ctx.set(MotifDrawn(self.as_motif().name()));
    }
}

/// Emitted once the motif layer has been composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotifDrawn(pub &'static str);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{rgba, white};
    use crate::shape::{Point, Rect};

    struct Broken;

    impl Motif for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn draw_list(&self) -> Result<DrawList> {
            let mut list = DrawList::new();
            list.fill(Shape::ellipse(Rect::new(0.0, 0.0, 0.0, 4.0)), white(255), None);
            Ok(list)
        }
    }

    struct Square;

    impl Motif for Square {
        fn name(&self) -> &'static str {
            "square"
        }

        fn draw_list(&self) -> Result<DrawList> {
            let mut list = DrawList::new();
            let points = vec![
                Point::new(2.0, 2.0),
                Point::new(14.0, 2.0),
                Point::new(14.0, 14.0),
                Point::new(2.0, 14.0),
            ];
            list.fill(Shape::polygon(points), rgba(10, 20, 30, 255), None);
            Ok(list)
        }
    }

    #[test]
    fn geometry_errors_carry_motif_name() {
        let mut canvas = Canvas::new(16);
        let err = draw_motif(&mut canvas, &Broken).unwrap_err();
        assert!(matches!(err, IconError::InvalidGeometry { ref motif, .. } if motif == "broken"));
    }

    #[test]
    fn draw_motif_executes_list() {
        let mut canvas = Canvas::new(16);
        draw_motif(&mut canvas, &Square).unwrap();
        assert_eq!(canvas.pixel(8, 8), Some(rgba(10, 20, 30, 255)));
        assert_eq!(canvas.pixel(0, 0).unwrap().alpha, 0);
    }

    #[test]
    fn motif_layer_dispatches() {
        let layer = MotifLayer::from(ChatBubbleMotif::new(256));
        assert_eq!(layer.as_motif().name(), "chat-bubble");
        assert!(layer.as_motif().footprint().is_some());

        let layer = MotifLayer::from(NeuralNetworkMotif::new(256));
        assert!(layer.as_motif().footprint().is_none());
    }
}
