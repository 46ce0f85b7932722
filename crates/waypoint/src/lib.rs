//! Waypoint - automatic layout for conversational flow graphs.
//!
//! A flow graph is a set of agent steps connected by transitions gated by
//! preconditions. Waypoint reads flow graph documents, assigns canvas
//! positions to nodes that lack them and writes the documents back out.
//!
//! The layout [`Engine`](layout::Engine) can also be used on its own with
//! any node and edge types implementing [`LayoutNode`](layout::LayoutNode)
//! and [`LayoutEdge`](layout::LayoutEdge).

pub mod config;
pub mod import;
pub mod layout;
pub mod viewport;

mod error;

pub use waypoint_core::{geometry, graph};

pub use error::WaypointError;

use log::{debug, info, trace};

use config::AppConfig;
use graph::FlowGraph;

/// Builder for importing, laying out and exporting flow graph documents.
///
/// # Examples
///
/// ```rust
/// use waypoint::{FlowBuilder, config::AppConfig};
///
/// let source = r#"{
///     "startNode": "INITIAL_STEP",
///     "nodes": [{"id": "INITIAL_STEP"}, {"id": "GREET"}],
///     "edges": [{"from": "INITIAL_STEP", "to": "GREET"}]
/// }"#;
///
/// let builder = FlowBuilder::new(AppConfig::default());
///
/// let graph = builder.parse(source).expect("Failed to parse");
/// let graph = builder.layout(graph);
/// assert!(graph.is_fully_positioned());
///
/// let json = builder.render_json(&graph).expect("Failed to render");
/// assert!(json.contains("\"position\""));
/// ```
#[derive(Default)]
pub struct FlowBuilder {
    config: AppConfig,
}

impl FlowBuilder {
    /// Create a new flow builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON flow graph document.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::Parse`] for malformed JSON or documents that
    /// do not match the flow graph shape, and [`WaypointError::Graph`] for
    /// documents with empty or duplicate node identifiers.
    pub fn parse(&self, source: &str) -> Result<FlowGraph, WaypointError> {
        info!("Parsing flow graph");

        let graph: FlowGraph = serde_json::from_str(source)
            .map_err(|err| WaypointError::new_parse_error(err, source))?;
        import::validate(&graph)?;

        debug!(
            nodes_count = graph.nodes.len(),
            edges_count = graph.edges.len(),
            agents_count = graph.agents.len();
            "Flow graph parsed successfully"
        );
        trace!(graph:?; "Parsed flow graph");

        Ok(graph)
    }

    /// Assign positions if any node lacks one.
    ///
    /// See [`import::ensure_positions`].
    pub fn layout(&self, graph: FlowGraph) -> FlowGraph {
        import::ensure_positions(graph, self.config.layout())
    }

    /// Assign fresh positions to every node, discarding existing ones.
    pub fn relayout(&self, graph: FlowGraph) -> FlowGraph {
        import::relayout(graph, self.config.layout())
    }

    /// Serialize a flow graph to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WaypointError::Export`] if serialization fails.
    pub fn render_json(&self, graph: &FlowGraph) -> Result<String, WaypointError> {
        let json = serde_json::to_string_pretty(graph).map_err(WaypointError::Export)?;
        info!(bytes = json.len(); "Flow graph rendered");
        Ok(json)
    }
}
