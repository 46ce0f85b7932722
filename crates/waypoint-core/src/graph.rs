//! Flow graph document model.
//!
//! A [`FlowGraph`] is the serialized form of a conversational flow: a set of
//! [`Node`]s (agent steps and agent decisions), the [`Edge`]s between them
//! gated by [`Precondition`]s, and the [`Agent`]s that nodes refer to.
//!
//! Field names follow the JSON document format (camelCase). Fields that this
//! crate does not know about are preserved on nodes and edges, in their
//! original order, so that a document survives a read/write cycle intact.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Point;

/// Reserved identifier of the node every conversation starts from.
pub const INITIAL_STEP: &str = "INITIAL_STEP";

/// The kind of step a node represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The agent speaks or acts.
    #[default]
    Agent,
    /// The agent picks one of several outgoing transitions.
    AgentDecision,
}

/// A single step of a conversational flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub kind: NodeKind,

    #[serde(default)]
    pub description: String,

    /// Identifier of the [`Agent`] responsible for this step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node_is_user: Option<bool>,

    /// Absolute canvas position. Missing positions are filled in by layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Creates a node of the given kind with an empty payload and no position.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            kind,
            description: String::new(),
            agent: None,
            next_node_is_user: None,
            position: None,
            extra: Map::new(),
        }
    }

    /// Sets the node text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the responsible agent.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Sets an explicit position.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

/// The kind of condition that gates a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreconditionKind {
    UserSaid,
    AgentDecision,
    ToolCall,
}

/// A condition that must hold for an edge to be taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precondition {
    #[serde(rename = "type")]
    pub kind: PreconditionKind,

    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A transition between two nodes.
///
/// `from` and `to` are plain identifiers and may refer to nodes that are not
/// part of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: String,
    pub to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<Vec<Precondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_preconditions: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// Creates an unconditional edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            preconditions: None,
            context_preconditions: None,
            extra: Map::new(),
        }
    }

    /// Adds a precondition to the edge.
    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions
            .get_or_insert_with(Vec::new)
            .push(precondition);
        self
    }

    /// Returns true if the edge connects `from` to `to`.
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }

    /// Returns true if either endpoint is `id`.
    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }
}

/// An agent that nodes can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,

    #[serde(default)]
    pub description: String,
}

/// A complete flow graph document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraph {
    #[serde(default)]
    pub start_node: String,

    #[serde(default)]
    pub agents: Vec<Agent>,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl FlowGraph {
    /// Returns the node with the given identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns true if every node carries an explicit position.
    pub fn is_fully_positioned(&self) -> bool {
        self.nodes.iter().all(|node| node.position.is_some())
    }

    /// Removes a node together with every edge that starts or ends at it.
    ///
    /// Returns the removed node, or `None` if no node has this identifier.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|node| node.id == id)?;
        let node = self.nodes.remove(index);

        let edges_before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));

        debug!(
            node_id = id,
            removed_edges = edges_before - self.edges.len();
            "Removed node"
        );
        Some(node)
    }

    /// Removes every edge from `from` to `to`, returning how many were removed.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> usize {
        let edges_before = self.edges.len();
        self.edges.retain(|edge| !edge.connects(from, to));
        edges_before - self.edges.len()
    }

    /// Moves a node to a new position.
    ///
    /// Returns false if no node has this identifier.
    pub fn set_node_position(&mut self, id: &str, position: Point) -> bool {
        match self.nodes.iter_mut().find(|node| node.id == id) {
            Some(node) => {
                node.position = Some(position);
                true
            }
            None => false,
        }
    }

    /// Returns the nodes assigned to the given agent, in document order.
    pub fn nodes_using_agent<'a>(&'a self, agent_id: &'a str) -> impl Iterator<Item = &'a Node> {
        self.nodes
            .iter()
            .filter(move |node| node.agent.as_deref() == Some(agent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "startNode": "INITIAL_STEP",
        "agents": [{"id": "greeter", "description": "Says hello"}],
        "nodes": [
            {
                "id": "INITIAL_STEP",
                "text": "Hello!",
                "kind": "agent",
                "description": "Opening line",
                "agent": "greeter",
                "nextNodeIsUser": true,
                "position": {"x": 0, "y": 10}
            },
            {
                "id": "ASK_NAME",
                "text": "What is your name?",
                "kind": "agent_decision",
                "description": "",
                "customFlag": 7
            }
        ],
        "edges": [
            {
                "from": "INITIAL_STEP",
                "to": "ASK_NAME",
                "preconditions": [
                    {"type": "user_said", "value": "hi", "description": "Greeting"}
                ],
                "contextPreconditions": {"mode": "any"}
            }
        ]
    }"#;

    fn sample_graph() -> FlowGraph {
        FlowGraph {
            start_node: INITIAL_STEP.to_string(),
            agents: vec![],
            nodes: vec![
                Node::new(INITIAL_STEP, NodeKind::Agent).with_agent("a1"),
                Node::new("B", NodeKind::AgentDecision).with_agent("a2"),
                Node::new("C", NodeKind::Agent).with_agent("a1"),
            ],
            edges: vec![
                Edge::new(INITIAL_STEP, "B"),
                Edge::new("B", "C"),
                Edge::new("C", "B"),
                Edge::new(INITIAL_STEP, "C"),
            ],
        }
    }

    #[test]
    fn test_parse_document() {
        let graph: FlowGraph = serde_json::from_str(DOCUMENT).unwrap();

        assert_eq!(graph.start_node, INITIAL_STEP);
        assert_eq!(graph.agents.len(), 1);
        assert_eq!(graph.nodes.len(), 2);

        let root = graph.node(INITIAL_STEP).unwrap();
        assert_eq!(root.kind, NodeKind::Agent);
        assert_eq!(root.agent.as_deref(), Some("greeter"));
        assert_eq!(root.next_node_is_user, Some(true));
        assert_eq!(root.position, Some(Point::new(0.0, 10.0)));

        let ask = graph.node("ASK_NAME").unwrap();
        assert_eq!(ask.kind, NodeKind::AgentDecision);
        assert_eq!(ask.position, None);
        assert_eq!(ask.extra.get("customFlag"), Some(&Value::from(7)));

        let edge = &graph.edges[0];
        let preconditions = edge.preconditions.as_ref().unwrap();
        assert_eq!(preconditions[0].kind, PreconditionKind::UserSaid);
        assert_eq!(preconditions[0].description.as_deref(), Some("Greeting"));
        assert!(edge.context_preconditions.is_some());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let graph: FlowGraph = serde_json::from_str(DOCUMENT).unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let reparsed: FlowGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(graph, reparsed);
        assert!(json.contains("\"customFlag\":7"));
        assert!(json.contains("\"nextNodeIsUser\":true"));
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let graph: FlowGraph =
            serde_json::from_str(r#"{"nodes": [{"id": "A"}], "edges": []}"#).unwrap();

        assert_eq!(graph.start_node, "");
        assert!(graph.agents.is_empty());
        assert_eq!(graph.nodes[0].kind, NodeKind::Agent);
        assert!(!graph.is_fully_positioned());
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut graph = sample_graph();

        let removed = graph.remove_node("B").unwrap();
        assert_eq!(removed.id, "B");
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges, vec![Edge::new(INITIAL_STEP, "C")]);

        assert!(graph.remove_node("B").is_none());
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = sample_graph();

        assert_eq!(graph.remove_edge("B", "C"), 1);
        assert_eq!(graph.remove_edge("B", "C"), 0);
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.edges.iter().any(|edge| edge.connects("C", "B")));
    }

    #[test]
    fn test_set_node_position() {
        let mut graph = sample_graph();

        assert!(graph.set_node_position("C", Point::new(5.0, 6.0)));
        assert_eq!(graph.node("C").unwrap().position, Some(Point::new(5.0, 6.0)));
        assert!(!graph.set_node_position("GHOST", Point::default()));
    }

    #[test]
    fn test_nodes_using_agent() {
        let graph = sample_graph();

        let ids: Vec<_> = graph
            .nodes_using_agent("a1")
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(ids, vec![INITIAL_STEP, "C"]);
        assert_eq!(graph.nodes_using_agent("missing").count(), 0);
    }

    #[test]
    fn test_edge_with_precondition() {
        let edge = Edge::new("A", "B").with_precondition(Precondition {
            kind: PreconditionKind::ToolCall,
            value: "lookup".to_string(),
            description: None,
        });

        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(
            json,
            r#"{"from":"A","to":"B","preconditions":[{"type":"tool_call","value":"lookup"}]}"#
        );
    }
}
