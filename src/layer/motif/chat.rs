//! Chat bubble with three "thinking" dots.

use super::Motif;
use crate::canvas::{Color, rgba, white};
use crate::error::Result;
use crate::shape::{DrawList, Outline, Point, Rect, Shape};

/// Dot colors, left to right: purple, pink, blue.
fn dot_colors() -> [Color; 3] {
    [
        rgba(147, 51, 234, 255),
        rgba(236, 72, 153, 255),
        rgba(59, 130, 246, 255),
    ]
}

/// A rounded speech bubble with a tail and three indicator dots.
///
/// All proportions derive from the icon size: the bubble is half the icon
/// wide, `0.7` of that tall, and sits at `(0.25, 0.3)` of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatBubbleMotif {
    /// Bubble body.
    pub bubble: Rect,
    pub corner_radius: f32,
    pub dot_radius: f32,
    /// The middle dot is drawn this much larger than its siblings.
    pub focal_scale: f32,
}

impl ChatBubbleMotif {
    pub fn new(size: u32) -> Self {
        let width = (size as f32 * 0.5).floor();
        let x = (size as f32 * 0.25).floor();
        let y = (size as f32 * 0.3).floor();
        Self {
            bubble: Rect::new(x, y, width, width * 0.7),
            corner_radius: (width * 0.2).floor(),
            dot_radius: (size as f32 * 0.04).floor(),
            focal_scale: 1.3,
        }
    }

    /// Tail triangle hanging from the lower left of the bubble.
    fn tail(&self) -> Vec<Point> {
        let Rect { x, y, width: w, .. } = self.bubble;
        vec![
            Point::new(x + w * 0.15, y + w * 0.65),
            Point::new(x + w * 0.05, y + w * 0.85),
            Point::new(x + w * 0.3, y + w * 0.7),
        ]
    }
}

impl Motif for ChatBubbleMotif {
    fn name(&self) -> &'static str {
        "chat-bubble"
    }

    fn draw_list(&self) -> Result<DrawList> {
        let mut list = DrawList::new();
        list.fill(
            Shape::rounded_rect(self.bubble, self.corner_radius),
            white(230),
            Some(Outline::new(white(255), 3.0)),
        );
        list.fill(Shape::polygon(self.tail()), white(230), None);

        let Rect { x, y, width: w, .. } = self.bubble;
        for (i, (dx, color)) in [0.3, 0.5, 0.7].into_iter().zip(dot_colors()).enumerate() {
            let radius = if i == 1 {
                self.dot_radius * self.focal_scale
            } else {
                self.dot_radius
            };
            let center = Point::new(x + w * dx, y + w * 0.4);
            list.fill(Shape::circle(center, radius), color, None);
        }
        Ok(list)
    }

    fn footprint(&self) -> Option<Shape> {
        Some(Shape::rounded_rect(self.bubble, self.corner_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BlendMode, Canvas};
    use crate::layer::motif::draw_motif;

    #[test]
    fn proportions_at_1024() {
        let chat = ChatBubbleMotif::new(1024);
        assert_eq!(chat.bubble, Rect::new(256.0, 307.0, 512.0, 358.4));
        assert_eq!(chat.corner_radius, 102.0);
        assert_eq!(chat.dot_radius, 40.0);
    }

    #[test]
    fn dots_painted_over_bubble() {
        let chat = ChatBubbleMotif::new(1024);
        let mut canvas = Canvas::new(1024).with_blend_mode(BlendMode::Source);
        draw_motif(&mut canvas, &chat).unwrap();

        let y = (307.0 + 512.0 * 0.4) as u32;
        assert_eq!(canvas.pixel(256 + 154, y), Some(rgba(147, 51, 234, 255)));
        assert_eq!(canvas.pixel(512, y), Some(rgba(236, 72, 153, 255)));
        assert_eq!(canvas.pixel(256 + 358, y), Some(rgba(59, 130, 246, 255)));
        // Bubble body between dots.
        assert_eq!(canvas.pixel(460, 350), Some(white(230)));
    }

    #[test]
    fn focal_dot_is_larger() {
        let chat = ChatBubbleMotif::new(1024);
        let list = chat.draw_list().unwrap();
        let radii: Vec<f32> = list
            .iter()
            .filter_map(|cmd| match cmd {
                crate::shape::DrawCommand::Fill {
                    shape: Shape::Ellipse { bounds },
                    ..
                } => Some(bounds.width / 2.0),
                _ => None,
            })
            .collect();
        assert_eq!(radii.len(), 3);
        assert!((radii[0] - 40.0).abs() < 1e-3);
        assert!((radii[1] - 52.0).abs() < 1e-3);
        assert!((radii[2] - 40.0).abs() < 1e-3);
    }
}
