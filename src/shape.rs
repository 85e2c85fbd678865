//! Geometry and draw commands.
//!
//! Shapes are described in canvas pixel coordinates (origin top-left, `f32`)
//! and converted to `tiny_skia` paths only when they are rasterized. A
//! [`DrawList`] is the ordered sequence of commands that makes up one motif;
//! there is no depth buffer, so the order of the list is the only thing that
//! decides which face ends up on top.

use resvg::tiny_skia::{self, PathBuilder};
use serde::{Deserialize, Serialize};

use crate::canvas::Color;
use crate::error::{IconError, Result};

/// Cubic Bézier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

// ============================================================================
// Point / Rect
// ============================================================================

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `offset`.
    pub fn translate(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X offset from the left edge of the canvas
    pub x: f32,
    /// Y offset from the top edge of the canvas
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from its left, top, right and bottom edges.
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Creates a rectangle centered on `center` with the given half extents.
    pub fn from_center(center: Point, half_width: f32, half_height: f32) -> Self {
        Self::from_ltrb(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    fn corners(&self) -> [Point; 2] {
        [Point::new(self.x, self.y), Point::new(self.right(), self.bottom())]
    }

    fn to_skia(self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_ltrb(self.x, self.y, self.right(), self.bottom())
    }
}

// ============================================================================
// Shape
// ============================================================================

/// A fillable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Shape {
    /// A closed polygon; needs at least three points.
    Polygon { points: Vec<Point> },
    /// An ellipse inscribed in a bounding box.
    Ellipse { bounds: Rect },
    /// A rectangle with circular corners of the given radius.
    RoundedRect { rect: Rect, radius: f32 },
}

impl Shape {
    pub fn polygon(points: impl Into<Vec<Point>>) -> Self {
        Self::Polygon {
            points: points.into(),
        }
    }

    pub fn ellipse(bounds: Rect) -> Self {
        Self::Ellipse { bounds }
    }

    /// A circle of radius `radius` around `center`.
    pub fn circle(center: Point, radius: f32) -> Self {
        Self::Ellipse {
            bounds: Rect::from_center(center, radius, radius),
        }
    }

    pub fn rounded_rect(rect: Rect, radius: f32) -> Self {
        Self::RoundedRect { rect, radius }
    }

    /// Short name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Polygon { .. } => "polygon",
            Self::Ellipse { .. } => "ellipse",
            Self::RoundedRect { .. } => "rounded rect",
        }
    }

    /// The points that define this shape, for diagnostics.
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            Self::Polygon { points } => points.clone(),
            Self::Ellipse { bounds } => bounds.corners().to_vec(),
            Self::RoundedRect { rect, .. } => rect.corners().to_vec(),
        }
    }

    /// Checks that the shape can be rasterized.
    pub fn validate(&self) -> Result<()> {
        let vertices = self.vertices();
        if vertices.iter().any(|p| !p.is_finite()) {
            return Err(IconError::geometry(self.kind(), "non-finite coordinate", &vertices));
        }
        match self {
            Self::Polygon { points } if points.len() < 3 => Err(IconError::geometry(
                self.kind(),
                format!("needs at least 3 points, got {}", points.len()),
                &vertices,
            )),
            Self::Ellipse { bounds: rect } | Self::RoundedRect { rect, .. }
                if rect.width <= 0.0 || rect.height <= 0.0 =>
            {
                Err(IconError::geometry(self.kind(), "empty bounding box", &vertices))
            }
            _ => Ok(()),
        }
    }

    /// Returns a copy grown outward by `amount` pixels.
    ///
    /// Only rounded shapes have a well-defined outset; polygons return `None`.
    pub fn outset(&self, amount: f32) -> Option<Shape> {
        match self {
            Self::Ellipse { bounds } => Some(Self::ellipse(bounds.inflate(amount))),
            Self::RoundedRect { rect, radius } => {
                Some(Self::rounded_rect(rect.inflate(amount), radius + amount))
            }
            Self::Polygon { .. } => None,
        }
    }

    /// Builds the `tiny_skia` path for this shape.
    pub(crate) fn to_path(&self) -> Result<tiny_skia::Path> {
        self.validate()?;
        let path = match self {
            Self::Polygon { points } => {
                let mut pb = PathBuilder::new();
                pb.move_to(points[0].x, points[0].y);
                for p in &points[1..] {
                    pb.line_to(p.x, p.y);
                }
                pb.close();
                pb.finish()
            }
            Self::Ellipse { bounds } => bounds.to_skia().and_then(PathBuilder::from_oval),
            Self::RoundedRect { rect, radius } => rounded_rect_path(*rect, *radius),
        };
        path.ok_or_else(|| IconError::geometry(self.kind(), "degenerate path", &self.vertices()))
    }
}

/// Builds a rounded rectangle out of four cubic quarter-arcs.
fn rounded_rect_path(rect: Rect, radius: f32) -> Option<tiny_skia::Path> {
    let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
    if r == 0.0 {
        return Some(PathBuilder::from_rect(rect.to_skia()?));
    }

    let (l, t, rt, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = KAPPA * r;

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}

/// Builds an open two-point path.
pub(crate) fn segment_path(from: Point, to: Point) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    pb.finish()
}

// ============================================================================
// Draw commands
// ============================================================================

/// Stroke drawn along a filled shape's boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Color,
    pub width: f32,
}

impl Outline {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// A single drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill a shape, then stroke its outline if one is given.
    Fill {
        shape: Shape,
        fill: Color,
        outline: Option<Outline>,
    },
    /// Stroke a straight segment.
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
}

/// An ordered list of draw commands.
///
/// Commands run front to back: a later command always paints over an
/// earlier one where they overlap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Appends a filled shape.
    pub fn fill(&mut self, shape: Shape, fill: Color, outline: Option<Outline>) {
        self.push(DrawCommand::Fill {
            shape,
            fill,
            outline,
        });
    }

    /// Appends a line segment.
    pub fn line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }
}

impl Extend<DrawCommand> for DrawList {
    fn extend<I: IntoIterator<Item = DrawCommand>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

impl IntoIterator for DrawList {
    type Item = DrawCommand;
    type IntoIter = std::vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 220.0);
        assert_eq!(rect.center(), Point::new(60.0, 120.0));

        let grown = rect.inflate(5.0);
        assert_eq!(grown, Rect::new(5.0, 15.0, 110.0, 210.0));
    }

    #[test]
    fn polygon_needs_three_points() {
        let shape = Shape::polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        let err = shape.validate().unwrap_err();
        assert!(matches!(err, IconError::InvalidGeometry { ref vertices, .. } if vertices.len() == 2));
        assert!(shape.to_path().is_err());
    }

    #[test]
    fn non_finite_points_rejected() {
        let shape = Shape::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(f32::NAN, 1.0),
            Point::new(2.0, 0.0),
        ]);
        assert!(shape.validate().is_err());
    }

    #[test]
    fn empty_ellipse_rejected() {
        let shape = Shape::ellipse(Rect::new(5.0, 5.0, 0.0, 10.0));
        assert!(shape.validate().is_err());
    }

    #[test]
    fn rounded_rect_path_stays_in_bounds() {
        let shape = Shape::rounded_rect(Rect::new(10.0, 10.0, 80.0, 40.0), 100.0);
        let path = shape.to_path().unwrap();
        let bounds = path.bounds();
        assert!(bounds.left() >= 9.99 && bounds.right() <= 90.01);
        assert!(bounds.top() >= 9.99 && bounds.bottom() <= 50.01);
    }

    #[test]
    fn outset_grows_rounded_shapes_only() {
        let rr = Shape::rounded_rect(Rect::new(10.0, 10.0, 20.0, 20.0), 4.0);
        assert_eq!(
            rr.outset(5.0),
            Some(Shape::rounded_rect(Rect::new(5.0, 5.0, 30.0, 30.0), 9.0))
        );

        let tri = Shape::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert!(tri.outset(5.0).is_none());
    }

    #[test]
    fn draw_list_keeps_order() {
        let white = Color::new(255, 255, 255, 255);
        let mut list = DrawList::new();
        list.line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), white, 1.0);
        list.fill(Shape::circle(Point::new(5.0, 5.0), 2.0), white, None);
        assert_eq!(list.len(), 2);
        assert!(matches!(list.iter().next(), Some(DrawCommand::Line { .. })));
        assert!(matches!(list.iter().nth(1), Some(DrawCommand::Fill { .. })));
    }
}
