//! The triangular prism motif.
//!
//! A prism is a front triangle plus a back triangle translated by a fixed
//! offset. The visible sides are painted as translucent white quads in a
//! fixed order, then the silhouette is traced with crisp edges. There is no
//! depth test: [`PrismPart::DRAW_ORDER`] alone decides which face covers
//! which.

use serde::{Deserialize, Serialize};

use super::Motif;
use crate::canvas::{Canvas, white};
use crate::error::{IconError, Result};
use crate::shape::{DrawList, Point, Rect, Shape};

// ============================================================================
// Parameters
// ============================================================================

/// Which proportions the prism is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrismVariant {
    /// Wide base with a shallow up-and-right depth offset.
    #[default]
    Classic,
    /// Taller, more upright prism with a deeper sideways offset and a crisp
    /// back triangle.
    Alternate,
}

/// Opacity of each painted part of the prism (all parts are white).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FaceAlphas {
    /// Faint back-triangle strokes drawn before any face. Zero skips them.
    pub back_edges: u8,
    pub right: u8,
    pub bottom: u8,
    pub left: u8,
    pub front: u8,
}

impl FaceAlphas {
    pub const CLASSIC: Self = Self {
        back_edges: 100,
        right: 180,
        bottom: 150,
        left: 120,
        front: 220,
    };

    pub const ALTERNATE: Self = Self {
        back_edges: 0,
        right: 200,
        bottom: 140,
        left: 100,
        front: 240,
    };
}

impl PrismVariant {
    fn default_alphas(self) -> FaceAlphas {
        match self {
            Self::Classic => FaceAlphas::CLASSIC,
            Self::Alternate => FaceAlphas::ALTERNATE,
        }
    }

    /// Depth offset as a fraction of the scale.
    fn default_offset(self) -> (f32, f32) {
        match self {
            Self::Classic => (0.15, -0.1),
            Self::Alternate => (0.25, 0.05),
        }
    }

    /// Front triangle as `(apex rise, half base, base drop)` fractions of the
    /// scale.
    fn proportions(self) -> (f32, f32, f32) {
        match self {
            Self::Classic => (0.8, 0.7, 0.4),
            Self::Alternate => (1.0, 0.6, 0.6),
        }
    }

    fn edge_widths(self) -> EdgeWidths {
        match self {
            Self::Classic => EdgeWidths {
                front: 4.0,
                connectors: 4.0,
                back: None,
            },
            Self::Alternate => EdgeWidths {
                front: 5.0,
                connectors: 3.0,
                back: Some(2.0),
            },
        }
    }
}

/// Stroke widths of the final full-opacity edges.
#[derive(Debug, Clone, Copy)]
struct EdgeWidths {
    front: f32,
    connectors: f32,
    /// Crisp back-triangle edges, if the variant traces them.
    back: Option<f32>,
}

/// Width of the faint back-edge strokes.
const BACK_EDGE_WIDTH: f32 = 3.0;

// ============================================================================
// Draw order
// ============================================================================

/// One painted part of the prism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrismPart {
    BackEdges,
    RightFace,
    BottomFace,
    LeftFace,
    FrontFace,
    Edges,
}

impl PrismPart {
    /// Painter's order: each part covers the ones before it.
    pub const DRAW_ORDER: [PrismPart; 6] = [
        PrismPart::BackEdges,
        PrismPart::RightFace,
        PrismPart::BottomFace,
        PrismPart::LeftFace,
        PrismPart::FrontFace,
        PrismPart::Edges,
    ];
}

// ============================================================================
// PrismMotif
// ============================================================================

/// A triangular prism centred on `center` with size `scale` (pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct PrismMotif {
    pub center: Point,
    pub scale: f32,
    /// Translation from the front triangle to the back triangle.
    pub offset: Point,
    pub face_alphas: FaceAlphas,
    pub variant: PrismVariant,
}

impl PrismMotif {
    /// A prism with the variant's default offset and face alphas.
    pub fn new(center: Point, scale: f32, variant: PrismVariant) -> Self {
        let (ox, oy) = variant.default_offset();
        Self {
            center,
            scale,
            offset: Point::new(ox * scale, oy * scale),
            face_alphas: variant.default_alphas(),
            variant,
        }
    }

    /// The classic prism for a `size x size` icon: centred, scale `0.35 * size`.
    pub fn classic(size: u32) -> Self {
        let size = size as f32;
        Self::new(
            Point::new(size * 0.5, size * 0.5),
            size * 0.35,
            PrismVariant::Classic,
        )
    }

    /// The alternate prism for a `size x size` icon: raised slightly above
    /// centre, scale `0.32 * size`.
    pub fn alternate(size: u32) -> Self {
        let size = size as f32;
        Self::new(
            Point::new(size * 0.5, size * 0.45),
            size * 0.32,
            PrismVariant::Alternate,
        )
    }

    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_face_alphas(mut self, face_alphas: FaceAlphas) -> Self {
        self.face_alphas = face_alphas;
        self
    }

    /// Front triangle as `[apex, base left, base right]`.
    pub fn front_vertices(&self) -> [Point; 3] {
        let (rise, half_base, drop) = self.variant.proportions();
        let Point { x: cx, y: cy } = self.center;
        let s = self.scale;
        [
            Point::new(cx, cy - s * rise),
            Point::new(cx - s * half_base, cy + s * drop),
            Point::new(cx + s * half_base, cy + s * drop),
        ]
    }

    /// Back triangle: the front triangle translated by `offset`.
    pub fn back_vertices(&self) -> [Point; 3] {
        self.front_vertices().map(|p| p.translate(self.offset))
    }

    fn validate(&self) -> Result<()> {
        let vertices: Vec<Point> = self
            .front_vertices()
            .into_iter()
            .chain(self.back_vertices())
            .collect();
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(IconError::geometry(
                self.name(),
                format!("scale must be positive and finite, got {}", self.scale),
                &vertices,
            ));
        }
        if vertices.iter().any(|p| !p.is_finite()) {
            return Err(IconError::geometry(self.name(), "non-finite vertex", &vertices));
        }
        Ok(())
    }

    /// Builds the draw list with parts painted in `order`.
    fn build(&self, order: &[PrismPart]) -> Result<DrawList> {
        self.validate()?;
        let [ft, fl, fr] = self.front_vertices();
        let [bt, bl, br] = self.back_vertices();
        let alphas = self.face_alphas;
        let widths = self.variant.edge_widths();

        let mut list = DrawList::new();
        for part in order {
            match part {
                PrismPart::BackEdges => {
                    if alphas.back_edges > 0 {
                        let color = white(alphas.back_edges);
                        for (a, b) in [(bt, bl), (bl, br), (br, bt)] {
                            list.line(a, b, color, BACK_EDGE_WIDTH);
                        }
                    }
                }
                PrismPart::RightFace => {
                    list.fill(Shape::polygon(vec![fr, br, bt, ft]), white(alphas.right), None)
                }
                PrismPart::BottomFace => {
                    list.fill(Shape::polygon(vec![fl, fr, br, bl]), white(alphas.bottom), None)
                }
                PrismPart::LeftFace => {
                    list.fill(Shape::polygon(vec![fl, bl, bt, ft]), white(alphas.left), None)
                }
                PrismPart::FrontFace => {
                    list.fill(Shape::polygon(vec![ft, fl, fr]), white(alphas.front), None)
                }
                PrismPart::Edges => {
                    let edge = white(255);
                    for (a, b) in [(ft, fl), (fl, fr), (fr, ft)] {
                        list.line(a, b, edge, widths.front);
                    }
                    for (a, b) in [(ft, bt), (fl, bl), (fr, br)] {
                        list.line(a, b, edge, widths.connectors);
                    }
                    if let Some(back) = widths.back {
                        for (a, b) in [(bt, bl), (bl, br), (br, bt)] {
                            list.line(a, b, edge, back);
                        }
                    }
                }
            }
        }
        Ok(list)
    }
}

impl Motif for PrismMotif {
    fn name(&self) -> &'static str {
        match self.variant {
            PrismVariant::Classic => "prism",
            PrismVariant::Alternate => "prism-alternate",
        }
    }

    fn draw_list(&self) -> Result<DrawList> {
        self.build(&PrismPart::DRAW_ORDER)
    }

    /// A flat ellipse just beneath the base of the prism.
    fn footprint(&self) -> Option<Shape> {
        let s = self.scale;
        let center = Point::new(self.center.x, self.center.y + s * 0.6);
        Some(Shape::ellipse(Rect::from_center(center, s * 0.8, s * 0.2)))
    }
}

/// Draws `prism` onto `canvas` in [`PrismPart::DRAW_ORDER`].
pub fn draw_prism_motif(canvas: &mut Canvas, prism: &PrismMotif) -> Result<()> {
    super::draw_motif(canvas, prism)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BlendMode;

    const SIZE: u32 = 1024;

    fn motif_canvas() -> Canvas {
        Canvas::new(SIZE).with_blend_mode(BlendMode::Source)
    }

    fn reference_prism() -> PrismMotif {
        PrismMotif::new(Point::new(512.0, 512.0), 358.0, PrismVariant::Classic)
    }

    #[test]
    fn classic_vertices() {
        let prism = PrismMotif::new(Point::new(100.0, 100.0), 10.0, PrismVariant::Classic);
        let [top, left, right] = prism.front_vertices();
        assert_eq!(top, Point::new(100.0, 92.0));
        assert_eq!(left, Point::new(93.0, 104.0));
        assert_eq!(right, Point::new(107.0, 104.0));

        let back = prism.back_vertices();
        assert!((back[0].x - 101.5).abs() < 1e-4);
        assert!((back[0].y - 91.0).abs() < 1e-4);
    }

    #[test]
    fn alternate_defaults() {
        let prism = PrismMotif::alternate(SIZE);
        assert_eq!(prism.face_alphas, FaceAlphas::ALTERNATE);
        assert!((prism.center.y - 460.8).abs() < 1e-3);
        let [top, ..] = prism.front_vertices();
        assert!((top.y - (460.8 - 327.68)).abs() < 1e-3);
    }

    #[test]
    fn draw_order_is_back_to_front() {
        assert_eq!(PrismPart::DRAW_ORDER.first(), Some(&PrismPart::BackEdges));
        assert_eq!(PrismPart::DRAW_ORDER.last(), Some(&PrismPart::Edges));
        // 3 back edges + 4 faces + 6 edges
        assert_eq!(PrismMotif::classic(SIZE).draw_list().unwrap().len(), 13);
        // 4 faces + 9 edges
        assert_eq!(PrismMotif::alternate(SIZE).draw_list().unwrap().len(), 13);
    }

    #[test]
    fn zero_scale_is_invalid_geometry() {
        let prism = PrismMotif::new(Point::new(512.0, 512.0), 0.0, PrismVariant::Classic);
        let err = prism.draw_list().unwrap_err();
        match err {
            IconError::InvalidGeometry { motif, vertices, .. } => {
                assert_eq!(motif, "prism");
                assert_eq!(vertices.len(), 6);
            }
            other => panic!("unexpected error: {other}"),
        }

        let prism = PrismMotif::new(Point::new(512.0, 512.0), f32::NAN, PrismVariant::Classic);
        assert!(prism.draw_list().is_err());
        let prism = PrismMotif::new(Point::new(512.0, 512.0), -5.0, PrismVariant::Alternate);
        assert!(draw_prism_motif(&mut motif_canvas(), &prism).is_err());
    }

    #[test]
    fn front_face_covers_left_face() {
        let mut canvas = motif_canvas();
        draw_prism_motif(&mut canvas, &reference_prism()).unwrap();
        // Inside both the front triangle and the left face, away from edges.
        assert_eq!(canvas.pixel(413, 422), Some(white(220)));
    }

    #[test]
    fn face_order_changes_overlap_pixels() {
        let prism = reference_prism();
        let swapped = [
            PrismPart::BackEdges,
            PrismPart::RightFace,
            PrismPart::BottomFace,
            PrismPart::FrontFace,
            PrismPart::LeftFace,
            PrismPart::Edges,
        ];
        let mut canvas = motif_canvas();
        canvas.draw_list(&prism.build(&swapped).unwrap()).unwrap();
        assert_eq!(canvas.pixel(413, 422), Some(white(120)));

        let mut canonical = motif_canvas();
        draw_prism_motif(&mut canonical, &prism).unwrap();
        assert_ne!(canvas, canonical);
    }

    #[test]
    fn edges_are_opaque() {
        let prism = reference_prism();
        let mut canvas = motif_canvas();
        draw_prism_motif(&mut canvas, &prism).unwrap();
        let [top, left, _] = prism.front_vertices();
        let mid = Point::new((top.x + left.x) / 2.0, (top.y + left.y) / 2.0);
        let px = canvas.pixel(mid.x.floor() as u32, mid.y.floor() as u32).unwrap();
        assert_eq!(px.alpha, 255);
    }

    #[test]
    fn footprint_sits_below_base() {
        let prism = reference_prism();
        let Some(Shape::Ellipse { bounds }) = prism.footprint() else {
            panic!("prism footprint should be an ellipse");
        };
        assert!((bounds.center().y - (512.0 + 358.0 * 0.6)).abs() < 1e-3);
        assert!((bounds.width - 358.0 * 1.6).abs() < 1e-3);
    }
}
