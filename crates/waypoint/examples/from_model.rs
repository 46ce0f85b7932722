//! Example: Laying out a flow graph built in code
//!
//! This example builds a small support conversation with the document model
//! types directly, lays it out and prints each node's position along with
//! the transitions that survived as flow edges.

use waypoint::{
    FlowBuilder,
    graph::{Agent, Edge, FlowGraph, INITIAL_STEP, Node, NodeKind, Precondition, PreconditionKind},
    viewport,
};

fn user_said(value: &str) -> Precondition {
    Precondition {
        kind: PreconditionKind::UserSaid,
        value: value.to_string(),
        description: None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let graph = FlowGraph {
        start_node: INITIAL_STEP.to_string(),
        agents: vec![Agent {
            id: "support".to_string(),
            description: "Front-line support agent".to_string(),
        }],
        nodes: vec![
            Node::new(INITIAL_STEP, NodeKind::Agent)
                .with_text("Hi! How can I help?")
                .with_agent("support"),
            Node::new("TRIAGE", NodeKind::AgentDecision).with_agent("support"),
            Node::new("BILLING", NodeKind::Agent).with_text("Let's look at your invoice."),
            Node::new("TECHNICAL", NodeKind::Agent).with_text("Let's debug that."),
            Node::new("GOODBYE", NodeKind::Agent).with_text("Have a nice day!"),
        ],
        edges: vec![
            Edge::new(INITIAL_STEP, "TRIAGE"),
            Edge::new("TRIAGE", "BILLING").with_precondition(user_said("invoice")),
            Edge::new("TRIAGE", "TECHNICAL").with_precondition(user_said("error")),
            Edge::new("BILLING", "GOODBYE"),
            Edge::new("TECHNICAL", "GOODBYE"),
            // Loops back to the start; dropped from the laid out flow
            Edge::new("GOODBYE", INITIAL_STEP),
        ],
    };

    let builder = FlowBuilder::default();
    let graph = builder.layout(graph);

    println!("Positions:");
    for node in &graph.nodes {
        if let Some(position) = node.position {
            println!("  {:<10} x={:>6.1} y={:>6.1}", node.id, position.x(), position.y());
        }
    }

    println!("\nFlow edges:");
    for edge in &graph.edges {
        println!("  {} -> {}", edge.from, edge.to);
    }

    if let Some(position) = viewport::initial_node_position(&graph) {
        let view = viewport::initial_viewport(position, 800.0, builder.config().viewport());
        println!(
            "\nInitial viewport: offset=({}, {}) zoom={}",
            view.offset().x(),
            view.offset().y(),
            view.zoom()
        );
    }

    Ok(())
}
