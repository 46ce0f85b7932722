//! Initial viewport framing.
//!
//! When a graph is opened the canvas scrolls so that the
//! [`INITIAL_STEP`] node sits near the left border, vertically centred.

use waypoint_core::{
    geometry::Point,
    graph::{FlowGraph, INITIAL_STEP},
};

use crate::config::ViewportConfig;

/// Canvas translation and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    offset: Point,
    zoom: f32,
}

impl Viewport {
    pub fn new(offset: Point, zoom: f32) -> Self {
        Self { offset, zoom }
    }

    /// Translation applied to canvas coordinates.
    pub fn offset(self) -> Point {
        self.offset
    }

    pub fn zoom(self) -> f32 {
        self.zoom
    }
}

/// Returns the position of the [`INITIAL_STEP`] node, if it exists and is placed.
pub fn initial_node_position(graph: &FlowGraph) -> Option<Point> {
    graph.node(INITIAL_STEP).and_then(|node| node.position)
}

/// Computes the viewport that frames a start node at `position` in a
/// container `container_height` units tall, at zoom 1.
pub fn initial_viewport(position: Point, container_height: f32, config: &ViewportConfig) -> Viewport {
    let offset = position.negate().add_point(Point::new(
        config.padding(),
        container_height / 2.0 - config.node_height() / 2.0,
    ));

    Viewport::new(offset, 1.0)
}
