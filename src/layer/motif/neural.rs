//! A small neural network: seven nodes in three rows plus corner sparkles.

use super::Motif;
use crate::canvas::{rgba, white};
use crate::error::Result;
use crate::shape::{DrawList, Outline, Point, Shape};

/// Node centres as fractions of the icon size.
const NODES: [(f32, f32); 7] = [
    (0.3, 0.3),
    (0.7, 0.3),
    (0.2, 0.5),
    (0.5, 0.5),
    (0.8, 0.5),
    (0.3, 0.7),
    (0.7, 0.7),
];

/// Edges between nodes, by index into [`NODES`].
const CONNECTIONS: [(usize, usize); 8] = [
    (0, 2),
    (0, 3),
    (1, 3),
    (1, 4),
    (2, 5),
    (3, 5),
    (3, 6),
    (4, 6),
];

/// The centre node, drawn larger with an accent core.
const FOCAL_NODE: usize = 3;

const SPARKLES: [(f32, f32); 4] = [(0.15, 0.15), (0.85, 0.15), (0.15, 0.85), (0.85, 0.85)];

/// Inner vertex distance of a sparkle star, relative to its tip distance.
const SPARKLE_WAIST: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetworkMotif {
    pub size: f32,
    pub node_radius: f32,
    pub focal_radius: f32,
    pub sparkle_size: f32,
}

impl NeuralNetworkMotif {
    pub fn new(size: u32) -> Self {
        let size = size as f32;
        Self {
            size,
            node_radius: (size * 0.06).floor(),
            focal_radius: (size * 0.12).floor(),
            sparkle_size: (size * 0.03).floor(),
        }
    }

    fn node(&self, index: usize) -> Point {
        let (x, y) = NODES[index];
        Point::new(x * self.size, y * self.size)
    }

    /// Four-pointed star with tips at `sparkle_size` from `center`.
    fn sparkle(&self, center: Point) -> Vec<Point> {
        let s = self.sparkle_size;
        let w = s * SPARKLE_WAIST;
        [
            (0.0, -s),
            (w, -w),
            (s, 0.0),
            (w, w),
            (0.0, s),
            (-w, w),
            (-s, 0.0),
            (-w, -w),
        ]
        .into_iter()
        .map(|(dx, dy)| Point::new(center.x + dx, center.y + dy))
        .collect()
    }
}

impl Motif for NeuralNetworkMotif {
    fn name(&self) -> &'static str {
        "neural-network"
    }

    fn draw_list(&self) -> Result<DrawList> {
        let mut list = DrawList::new();

        // Connections sit behind the nodes.
        for (from, to) in CONNECTIONS {
            list.line(self.node(from), self.node(to), white(100), 3.0);
        }

        for index in 0..NODES.len() {
            let center = self.node(index);
            if index == FOCAL_NODE {
                list.fill(
                    Shape::circle(center, self.focal_radius),
                    white(255),
                    Some(Outline::new(white(255), 3.0)),
                );
                list.fill(
                    Shape::circle(center, self.focal_radius * 0.7),
                    rgba(147, 51, 234, 200),
                    None,
                );
            } else {
                list.fill(
                    Shape::circle(center, self.node_radius),
                    white(200),
                    Some(Outline::new(white(255), 2.0)),
                );
            }
        }

        for (x, y) in SPARKLES {
            let center = Point::new(x * self.size, y * self.size);
            list.fill(Shape::polygon(self.sparkle(center)), white(180), None);
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BlendMode, Canvas};
    use crate::layer::motif::draw_motif;
    use crate::shape::DrawCommand;

    fn render(size: u32) -> Canvas {
        let mut canvas = Canvas::new(size).with_blend_mode(BlendMode::Source);
        draw_motif(&mut canvas, &NeuralNetworkMotif::new(size)).unwrap();
        canvas
    }

    #[test]
    fn connections_drawn_before_nodes() {
        let list = NeuralNetworkMotif::new(1024).draw_list().unwrap();
        // 8 connections, 6 regular nodes, focal node + accent, 4 sparkles
        assert_eq!(list.len(), 8 + 6 + 2 + 4);
        assert!(list.iter().take(8).all(|c| matches!(c, DrawCommand::Line { .. })));
        assert!(list.iter().skip(8).all(|c| matches!(c, DrawCommand::Fill { .. })));
    }

    #[test]
    fn focal_node_has_accent_core() {
        let canvas = render(1024);
        assert_eq!(canvas.pixel(512, 512), Some(rgba(147, 51, 234, 200)));
        // Between the accent and the rim: plain white.
        assert_eq!(canvas.pixel(512 + 105, 512), Some(white(255)));
    }

    #[test]
    fn nodes_cover_connections() {
        let canvas = render(1024);
        // Node 0 sits at (307.2, 307.2); its connections start at its centre.
        assert_eq!(canvas.pixel(307, 307), Some(white(200)));
    }

    #[test]
    fn sparkles_in_corners() {
        let canvas = render(1024);
        assert_eq!(canvas.pixel(153, 153), Some(white(180)));
        assert_eq!(canvas.pixel(870, 870), Some(white(180)));
        assert_eq!(canvas.pixel(20, 20).unwrap().alpha, 0);
    }
}
