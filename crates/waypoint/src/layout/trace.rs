//! Intermediate results of a layout run.

use indexmap::IndexMap;

/// A half-open vertical band `[start, end)` reserved for a node's subtree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalRange {
    start: f32,
    end: f32,
}

impl VerticalRange {
    /// Creates a range spanning `height` units downward from `start`.
    pub fn new(start: f32, height: f32) -> Self {
        Self {
            start,
            end: start + height,
        }
    }

    pub fn start(self) -> f32 {
        self.start
    }

    pub fn end(self) -> f32 {
        self.end
    }

    pub fn height(self) -> f32 {
        self.end - self.start
    }

    /// Returns the vertical midpoint of the range.
    pub fn center(self) -> f32 {
        (self.start + self.end) / 2.0
    }

    /// Returns true if the two ranges share any interior point.
    pub fn overlaps(self, other: VerticalRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Structured record of how a layout was derived.
///
/// Every map is keyed by node identifier and keeps the order in which the
/// engine produced its entries, so two runs over the same input produce
/// identical traces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutTrace {
    pub(super) distances: IndexMap<String, usize>,
    pub(super) levels: Vec<Vec<String>>,
    pub(super) tree_children: IndexMap<String, Vec<String>>,
    pub(super) subtree_heights: IndexMap<String, f32>,
    pub(super) ranges: IndexMap<String, VerticalRange>,
    pub(super) orphans: Vec<String>,
}

impl LayoutTrace {
    /// Distance of every node from the root, in assignment order.
    ///
    /// Nodes reached by the breadth-first search come first, in discovery
    /// order, followed by unreached nodes (distance 0) in input order.
    pub fn distances(&self) -> &IndexMap<String, usize> {
        &self.distances
    }

    /// Returns the distance assigned to a node.
    pub fn distance(&self, id: &str) -> Option<usize> {
        self.distances.get(id).copied()
    }

    /// Largest distance assigned to any node.
    pub fn max_distance(&self) -> usize {
        self.distances.values().copied().max().unwrap_or_default()
    }

    /// Node identifiers grouped by distance; index `d` holds level `d`.
    pub fn levels(&self) -> &[Vec<String>] {
        &self.levels
    }

    /// Children of a node along tree edges, in input edge order.
    pub fn tree_children(&self, id: &str) -> &[String] {
        self.tree_children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Vertical space reserved for a node and its tree descendants.
    pub fn subtree_height(&self, id: &str) -> Option<f32> {
        self.subtree_heights.get(id).copied()
    }

    /// Vertical band allocated to a node, if it is connected to the root.
    pub fn range(&self, id: &str) -> Option<VerticalRange> {
        self.ranges.get(id).copied()
    }

    /// Nodes that were stacked below the layout, in placement order.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_vertical_range_metrics() {
        let range = VerticalRange::new(50.0, 250.0);

        assert_approx_eq!(f32, range.start(), 50.0);
        assert_approx_eq!(f32, range.end(), 300.0);
        assert_approx_eq!(f32, range.height(), 250.0);
        assert_approx_eq!(f32, range.center(), 175.0);
    }

    #[test]
    fn test_vertical_range_overlap() {
        let upper = VerticalRange::new(0.0, 100.0);
        let touching = VerticalRange::new(100.0, 100.0);
        let inside = VerticalRange::new(20.0, 10.0);

        assert!(!upper.overlaps(touching));
        assert!(!touching.overlaps(upper));
        assert!(upper.overlaps(inside));
        assert!(inside.overlaps(upper));
    }

    #[test]
    fn test_empty_trace() {
        let trace = LayoutTrace::default();

        assert_eq!(trace.max_distance(), 0);
        assert!(trace.tree_children("A").is_empty());
        assert!(trace.range("A").is_none());
        assert!(trace.levels().is_empty());
    }
}
