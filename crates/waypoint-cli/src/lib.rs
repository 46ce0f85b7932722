//! CLI logic for the Waypoint flow graph layout tool.
//!
//! This module contains the core CLI logic: reading a flow graph document,
//! assigning positions to its nodes and writing the result.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use waypoint::{FlowBuilder, WaypointError};

/// Run the Waypoint CLI application
///
/// This function processes the input document through the Waypoint import
/// pipeline and writes the positioned document to the output file.
///
/// # Errors
///
/// Returns `WaypointError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Document parsing and validation errors
/// - Serialization errors
pub fn run(args: &Args) -> Result<(), WaypointError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        force = args.force;
        "Processing flow graph"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process document using FlowBuilder API
    let builder = FlowBuilder::new(app_config);
    let graph = builder.parse(&source)?;
    let graph = if args.force {
        builder.relayout(graph)
    } else {
        builder.layout(graph)
    };
    let json = builder.render_json(&graph)?;

    // Write output file
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Flow graph exported successfully");

    Ok(())
}
