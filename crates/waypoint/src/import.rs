//! Import pipeline for flow graph documents.
//!
//! Documents coming from disk are checked with [`validate`] and, when at
//! least one node lacks a position, laid out with [`ensure_positions`].
//! Documents whose nodes are all positioned are left exactly as they are:
//! positions are user state once they exist.

use std::collections::HashSet;

use log::{debug, info};

use waypoint_core::graph::{FlowGraph, Node};

use crate::{
    WaypointError,
    config::LayoutConfig,
    layout::{Engine, EngineBuilder},
};

/// Estimated rendered width of the widest node.
///
/// Nodes display their identifier, so the width grows with the longest
/// identifier, measured in UTF-16 code units as the editor measures it.
/// An empty node list yields just the padding.
pub fn node_width(nodes: &[Node], config: &LayoutConfig) -> f32 {
    let max_id_length = nodes
        .iter()
        .map(|node| node.id.encode_utf16().count())
        .max()
        .unwrap_or_default();

    max_id_length as f32 * config.char_width() + config.node_padding()
}

/// Returns true if at least one node has no position.
pub fn needs_layout(graph: &FlowGraph) -> bool {
    !graph.is_fully_positioned()
}

/// Builds the layout engine used on import for a graph with the given node width.
pub fn engine_for(node_width: f32, config: &LayoutConfig) -> Engine {
    EngineBuilder::new()
        .with_horizontal_spacing(node_width + config.horizontal_gap())
        .with_vertical_spacing(config.vertical_gap())
        .with_node_height(config.node_height())
        .build()
}

/// Lays out the graph if any node is missing a position.
///
/// When layout runs, every node receives a fresh position and the edge list
/// is reduced to the tree edges that flow from one column to the next.
pub fn ensure_positions(graph: FlowGraph, config: &LayoutConfig) -> FlowGraph {
    if !needs_layout(&graph) {
        debug!(nodes_count = graph.nodes.len(); "All nodes positioned, skipping layout");
        return graph;
    }

    relayout(graph, config)
}

/// Lays out the graph unconditionally, replacing any existing positions.
pub fn relayout(graph: FlowGraph, config: &LayoutConfig) -> FlowGraph {
    let width = node_width(&graph.nodes, config);
    let engine = engine_for(width, config);
    info!(node_width = width; "Laying out flow graph");

    let FlowGraph {
        start_node,
        agents,
        nodes,
        edges,
    } = graph;

    let (nodes, edges, _) = engine.layout(nodes, edges).into_parts();

    FlowGraph {
        start_node,
        agents,
        nodes,
        edges,
    }
}

/// Checks the structural requirements the layout relies on.
///
/// # Errors
///
/// Returns [`WaypointError::Graph`] if a node has an empty identifier or if
/// two nodes share an identifier.
pub fn validate(graph: &FlowGraph) -> Result<(), WaypointError> {
    let mut seen = HashSet::with_capacity(graph.nodes.len());

    for (index, node) in graph.nodes.iter().enumerate() {
        if node.id.is_empty() {
            return Err(WaypointError::Graph(format!(
                "Node at index {index} has an empty id"
            )));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(WaypointError::Graph(format!(
                "Duplicate node id '{}'",
                node.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use waypoint_core::{
        geometry::Point,
        graph::{Edge, INITIAL_STEP, NodeKind},
    };

    use super::*;

    fn graph(nodes: Vec<Node>, edges: Vec<Edge>) -> FlowGraph {
        FlowGraph {
            start_node: INITIAL_STEP.to_string(),
            agents: vec![],
            nodes,
            edges,
        }
    }

    #[test]
    fn test_node_width() {
        let config = LayoutConfig::default();
        let nodes = vec![
            Node::new("A", NodeKind::Agent),
            Node::new(INITIAL_STEP, NodeKind::Agent),
        ];

        // 12 characters * 7.5 + 40
        assert_approx_eq!(f32, node_width(&nodes, &config), 130.0);
        assert_approx_eq!(f32, node_width(&[], &config), 40.0);
    }

    #[test]
    fn test_node_width_counts_utf16_units() {
        let config = LayoutConfig::default();

        // "é" is one unit, the emoji outside the BMP is a surrogate pair
        let nodes = vec![Node::new("caf\u{e9}\u{1F600}", NodeKind::Agent)];

        // 6 units * 7.5 + 40
        assert_approx_eq!(f32, node_width(&nodes, &config), 85.0);
    }

    #[test]
    fn test_positioned_graph_is_untouched() {
        let input = graph(
            vec![
                Node::new(INITIAL_STEP, NodeKind::Agent).with_position(Point::new(5.0, 5.0)),
                Node::new("A", NodeKind::Agent).with_position(Point::new(900.0, -20.0)),
            ],
            vec![Edge::new(INITIAL_STEP, "A"), Edge::new("A", INITIAL_STEP)],
        );

        let output = ensure_positions(input.clone(), &LayoutConfig::default());
        assert_eq!(output, input);
    }

    #[test]
    fn test_missing_position_triggers_layout() {
        let input = graph(
            vec![
                Node::new(INITIAL_STEP, NodeKind::Agent).with_position(Point::new(5.0, 5.0)),
                Node::new("A", NodeKind::AgentDecision),
            ],
            vec![Edge::new(INITIAL_STEP, "A"), Edge::new("A", INITIAL_STEP)],
        );

        let output = ensure_positions(input, &LayoutConfig::default());

        // Column spacing is node width (12 * 7.5 + 40) plus the 150 gap
        assert_eq!(output.nodes[0].position, Some(Point::new(0.0, 0.0)));
        assert_eq!(output.nodes[1].position, Some(Point::new(280.0, 0.0)));
        assert_eq!(output.edges, vec![Edge::new(INITIAL_STEP, "A")]);
        assert_eq!(output.start_node, INITIAL_STEP);
    }

    #[test]
    fn test_relayout_replaces_positions() {
        let input = graph(
            vec![Node::new("ONLY", NodeKind::Agent).with_position(Point::new(77.0, 77.0))],
            vec![],
        );

        let output = relayout(input, &LayoutConfig::default());
        assert_eq!(output.nodes[0].position, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_engine_for_uses_config() {
        let config = LayoutConfig::default()
            .with_horizontal_gap(10.0)
            .with_vertical_gap(20.0)
            .with_node_height(30.0);

        let engine = engine_for(100.0, &config);
        assert_approx_eq!(f32, engine.horizontal_spacing(), 110.0);
        assert_approx_eq!(f32, engine.vertical_spacing(), 20.0);
        assert_approx_eq!(f32, engine.node_height(), 30.0);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let input = graph(
            vec![
                Node::new("A", NodeKind::Agent),
                Node::new("B", NodeKind::Agent),
                Node::new("A", NodeKind::Agent),
            ],
            vec![],
        );

        let err = validate(&input).unwrap_err();
        assert_eq!(err.to_string(), "Graph error: Duplicate node id 'A'");
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let input = graph(vec![Node::new("", NodeKind::Agent)], vec![]);

        assert!(matches!(validate(&input), Err(WaypointError::Graph(_))));
    }

    #[test]
    fn test_validate_accepts_dangling_edges() {
        let input = graph(
            vec![Node::new(INITIAL_STEP, NodeKind::Agent)],
            vec![Edge::new(INITIAL_STEP, "GHOST")],
        );

        assert!(validate(&input).is_ok());
    }
}
