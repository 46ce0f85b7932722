//! Automatic layout of flow graphs.
//!
//! The layout places every node in a column determined by its breadth-first
//! distance from [`INITIAL_STEP`](waypoint_core::graph::INITIAL_STEP) and
//! centres each node vertically within the band reserved for its subtree.
//! See [`Engine`] for the algorithm and [`LayoutTrace`] for the intermediate
//! results it exposes.

mod engine;
mod trace;

pub use engine::{Engine, EngineBuilder, Layout};
pub use trace::{LayoutTrace, VerticalRange};

use waypoint_core::{
    geometry::Point,
    graph::{Edge, Node},
};

/// A node that can be positioned by the layout [`Engine`].
///
/// Only the identifier is read and only the position is written; any other
/// payload the node carries is left untouched.
pub trait LayoutNode {
    /// Unique identifier of the node.
    fn id(&self) -> &str;

    /// Stores the computed position on the node.
    fn set_position(&mut self, position: Point);
}

/// A directed edge between two [`LayoutNode`]s, referenced by identifier.
pub trait LayoutEdge {
    /// Identifier of the node the edge leaves.
    fn source(&self) -> &str;

    /// Identifier of the node the edge enters.
    fn target(&self) -> &str;
}

impl LayoutNode for Node {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_position(&mut self, position: Point) {
        self.position = Some(position);
    }
}

impl LayoutEdge for Edge {
    fn source(&self) -> &str {
        &self.from
    }

    fn target(&self) -> &str {
        &self.to
    }
}
