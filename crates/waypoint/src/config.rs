//! Configuration types for Waypoint graph import and layout.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file. Every field is optional and falls
//! back to the defaults of the flow editor.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and viewport settings.
//! - [`LayoutConfig`] - Spacing used when positions are computed on import.
//! - [`ViewportConfig`] - Framing of the initial viewport around `INITIAL_STEP`.
//!
//! # Example
//!
//! ```
//! # use waypoint::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().horizontal_gap(), 150.0);
//! assert_eq!(config.viewport().padding(), 50.0);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Viewport configuration section.
    #[serde(default)]
    viewport: ViewportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    pub fn new(layout: LayoutConfig, viewport: ViewportConfig) -> Self {
        Self { layout, viewport }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the viewport configuration.
    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }
}

/// Spacing applied when a graph is laid out on import.
///
/// The horizontal distance between columns is not configured directly: it is
/// the width of the widest node plus [`horizontal_gap`](Self::horizontal_gap).
/// Node width is estimated from the length of the longest node identifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    horizontal_gap: f32,
    vertical_gap: f32,
    node_height: f32,
    char_width: f32,
    node_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 150.0,
            vertical_gap: 100.0,
            node_height: 100.0,
            char_width: 7.5,
            node_padding: 40.0,
        }
    }
}

impl LayoutConfig {
    /// Gap between the right edge of one column and the next column.
    pub fn horizontal_gap(&self) -> f32 {
        self.horizontal_gap
    }

    /// Gap between sibling subtrees.
    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    /// Height reserved for a single node.
    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Estimated width of one identifier character.
    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    /// Horizontal padding added to the identifier width.
    pub fn node_padding(&self) -> f32 {
        self.node_padding
    }

    pub fn with_horizontal_gap(mut self, gap: f32) -> Self {
        self.horizontal_gap = gap;
        self
    }

    pub fn with_vertical_gap(mut self, gap: f32) -> Self {
        self.vertical_gap = gap;
        self
    }

    pub fn with_node_height(mut self, height: f32) -> Self {
        self.node_height = height;
        self
    }
}

/// Framing of the viewport shown when a graph is first opened.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    padding: f32,
    node_height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding: 50.0,
            node_height: 120.0,
        }
    }
}

impl ViewportConfig {
    /// Distance kept between the left border and the start node.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Rendered height of the start node, used to centre it vertically.
    pub fn node_height(&self) -> f32 {
        self.node_height
    }
}
