//! Waypoint Core Types and Definitions
//!
//! This crate provides the foundational types for Waypoint conversational
//! flow graphs. It includes:
//!
//! - **Geometry**: Canvas coordinates ([`geometry::Point`])
//! - **Graph**: The flow graph document model and its editing operations
//!   ([`graph`] module)

pub mod geometry;
pub mod graph;
