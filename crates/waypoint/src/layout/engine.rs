//! Breadth-first tree layout engine.

use std::collections::{HashMap, VecDeque};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace};
use petgraph::{Direction, graphmap::DiGraphMap};

use waypoint_core::{geometry::Point, graph::INITIAL_STEP};

use super::{LayoutEdge, LayoutNode, LayoutTrace, VerticalRange};

/// Layout engine assigning canvas positions to flow graph nodes.
///
/// The algorithm works in five passes:
///
/// 1. Breadth-first search from [`INITIAL_STEP`] assigns every node its
///    shortest distance from the root. Edges whose endpoints are not both
///    part of the node set are ignored. Unreached nodes get distance 0.
/// 2. Edges going from distance `d` to `d + 1` become *tree edges*. Only
///    they shape the layout and only they are returned.
/// 3. Bottom-up, every node reserves vertical space for its subtree: a leaf
///    needs one node height, a parent needs the sum of its children plus
///    the spacing between them.
/// 4. Top-down, every node is centred in the band its parent gave it and
///    splits that band among its own children.
/// 5. Nodes never given a band are stacked below everything else.
///
/// The column of a node is always `distance * horizontal_spacing`.
///
/// A node with several tree parents (a diamond) is counted in the subtree
/// height of each of them, and takes the band of the parent processed last.
///
/// Node identifiers are expected to be unique. With duplicates the later
/// entry wins in every internal map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
    node_height: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            horizontal_spacing: 300.0,
            vertical_spacing: 50.0,
            node_height: 100.0,
        }
    }
}

/// Result of a layout run.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout<N, E> {
    nodes: Vec<N>,
    edges: Vec<E>,
    trace: LayoutTrace,
}

impl<N, E> Layout<N, E> {
    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            trace: LayoutTrace::default(),
        }
    }

    /// Input nodes, in input order, each carrying its computed position.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Tree edges, in input order.
    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Intermediate results the positions were derived from.
    pub fn trace(&self) -> &LayoutTrace {
        &self.trace
    }

    /// Consumes the layout, returning positioned nodes, tree edges and trace.
    pub fn into_parts(self) -> (Vec<N>, Vec<E>, LayoutTrace) {
        (self.nodes, self.edges, self.trace)
    }
}

/// Positions and edge classification computed from borrowed input.
struct Placement {
    positions: Vec<Point>,
    tree_edge_mask: Vec<bool>,
    trace: LayoutTrace,
}

impl Engine {
    /// Create an engine with default spacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal distance between two consecutive columns.
    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    /// Vertical gap between sibling subtrees and between stacked orphans.
    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    /// Height of a single node.
    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Lay out `nodes`, keeping only the tree edges of `edges`.
    ///
    /// Every returned node has its position set. Nothing but the position
    /// is modified.
    pub fn layout<N, E>(&self, mut nodes: Vec<N>, edges: Vec<E>) -> Layout<N, E>
    where
        N: LayoutNode,
        E: LayoutEdge,
    {
        info!(
            nodes_count = nodes.len(),
            edges_count = edges.len();
            "Starting layout"
        );

        if nodes.is_empty() {
            debug!("No nodes to lay out");
            return Layout::empty();
        }

        let Placement {
            positions,
            tree_edge_mask,
            trace,
        } = self.place(&nodes, &edges);

        for (node, position) in nodes.iter_mut().zip(positions) {
            node.set_position(position);
        }

        let edges: Vec<E> = edges
            .into_iter()
            .zip(tree_edge_mask)
            .filter_map(|(edge, is_tree)| is_tree.then_some(edge))
            .collect();

        info!(
            tree_edges_count = edges.len(),
            orphans_count = trace.orphans.len(),
            max_distance = trace.max_distance();
            "Layout calculated"
        );

        Layout {
            nodes,
            edges,
            trace,
        }
    }

    fn place<N: LayoutNode, E: LayoutEdge>(&self, nodes: &[N], edges: &[E]) -> Placement {
        let node_ids: IndexSet<&str> = nodes.iter().map(|node| node.id()).collect();

        // Step 1: Distances from the root
        let reachability = Self::reachability_graph(&node_ids, edges);
        let distances = Self::distances(&node_ids, &reachability);
        trace!(distances:?; "Distances assigned");

        // Step 2: Levels
        let max_distance = distances.values().copied().max().unwrap_or_default();
        let mut levels: Vec<Vec<&str>> = vec![Vec::new(); max_distance + 1];
        for (&id, &distance) in &distances {
            levels[distance].push(id);
        }
        trace!(levels:?; "Levels grouped");

        // Step 3: Tree edges
        let mut tree_children: IndexMap<&str, Vec<&str>> =
            node_ids.iter().map(|&id| (id, Vec::new())).collect();
        let tree_edge_mask: Vec<bool> = edges
            .iter()
            .map(|edge| {
                let is_tree = matches!(
                    (distances.get(edge.source()), distances.get(edge.target())),
                    (Some(&from), Some(&to)) if to == from + 1
                );
                if is_tree {
                    if let Some(children) = tree_children.get_mut(edge.source()) {
                        children.push(edge.target());
                    }
                }
                is_tree
            })
            .collect();
        trace!(
            tree_edges_count = tree_edge_mask.iter().filter(|&&is_tree| is_tree).count(),
            edges_count = edges.len();
            "Tree edges extracted"
        );

        // Step 4: Subtree heights, leaves first
        let subtree_heights = self.subtree_heights(&levels, &tree_children);
        trace!(subtree_heights:?; "Subtree heights calculated");

        // Step 5: Vertical bands, root first
        let (ranges, mut y_positions) = self.allocate_ranges(
            node_ids.contains(INITIAL_STEP),
            &levels,
            &tree_children,
            &subtree_heights,
        );

        // Step 6: Orphans below everything else
        let orphans = self.stack_orphans(&node_ids, &mut y_positions);
        trace!(y_positions:?; "Vertical positions assigned");

        let positions = nodes
            .iter()
            .map(|node| {
                let distance = distances.get(node.id()).copied().unwrap_or_default();
                let y = y_positions.get(node.id()).copied().unwrap_or_default();
                Point::new(distance as f32 * self.horizontal_spacing, y)
            })
            .collect();

        let trace = LayoutTrace {
            distances: owned_keys(distances),
            levels: levels
                .into_iter()
                .map(|level| level.into_iter().map(str::to_string).collect())
                .collect(),
            tree_children: tree_children
                .into_iter()
                .map(|(id, children)| {
                    let children = children.into_iter().map(str::to_string).collect();
                    (id.to_string(), children)
                })
                .collect(),
            subtree_heights: owned_keys(subtree_heights),
            ranges: owned_keys(ranges),
            orphans: orphans.into_iter().map(str::to_string).collect(),
        };

        Placement {
            positions,
            tree_edge_mask,
            trace,
        }
    }

    /// Builds the traversal graph from edges whose endpoints both exist.
    fn reachability_graph<'a, E: LayoutEdge>(
        node_ids: &IndexSet<&'a str>,
        edges: &'a [E],
    ) -> DiGraphMap<&'a str, ()> {
        let mut graph = DiGraphMap::new();

        for &id in node_ids {
            graph.add_node(id);
        }

        for edge in edges {
            let (source, target) = (edge.source(), edge.target());
            if node_ids.contains(source) && node_ids.contains(target) {
                graph.add_edge(source, target, ());
            } else {
                debug!(source, target; "Ignoring edge with unknown endpoint");
            }
        }

        graph
    }

    /// Breadth-first distances from the root, unreached nodes defaulting to 0.
    fn distances<'a>(
        node_ids: &IndexSet<&'a str>,
        reachability: &DiGraphMap<&'a str, ()>,
    ) -> IndexMap<&'a str, usize> {
        let mut distances = IndexMap::new();

        if let Some(&root) = node_ids.get(INITIAL_STEP) {
            let mut queue = VecDeque::from([(root, 0)]);
            distances.insert(root, 0);

            while let Some((id, distance)) = queue.pop_front() {
                for child in reachability.neighbors_directed(id, Direction::Outgoing) {
                    if !distances.contains_key(child) {
                        distances.insert(child, distance + 1);
                        queue.push_back((child, distance + 1));
                    }
                }
            }
        } else {
            debug!(root = INITIAL_STEP; "Root node not found, using a single column");
        }

        for &id in node_ids {
            distances.entry(id).or_insert(0);
        }

        distances
    }

    fn subtree_heights<'a>(
        &self,
        levels: &[Vec<&'a str>],
        tree_children: &IndexMap<&'a str, Vec<&'a str>>,
    ) -> IndexMap<&'a str, f32> {
        let mut heights = IndexMap::new();

        for level in levels.iter().rev() {
            for &id in level {
                let children = tree_children.get(id).map(Vec::as_slice).unwrap_or_default();
                let height = if children.is_empty() {
                    self.node_height
                } else {
                    let children_height: f32 = children
                        .iter()
                        .map(|child| heights.get(child).copied().unwrap_or(self.node_height))
                        .sum();
                    children_height + (children.len() - 1) as f32 * self.vertical_spacing
                };
                heights.insert(id, height);
            }
        }

        heights
    }

    /// Hands out vertical bands from the root down, returning the bands and
    /// the y coordinate of every node that received one.
    fn allocate_ranges<'a>(
        &self,
        has_root: bool,
        levels: &[Vec<&'a str>],
        tree_children: &IndexMap<&'a str, Vec<&'a str>>,
        subtree_heights: &IndexMap<&'a str, f32>,
    ) -> (IndexMap<&'a str, VerticalRange>, HashMap<&'a str, f32>) {
        let mut ranges = IndexMap::new();
        let mut y_positions = HashMap::new();

        let height_of = |id: &str| subtree_heights.get(id).copied().unwrap_or(self.node_height);

        if has_root {
            ranges.insert(INITIAL_STEP, VerticalRange::new(0.0, height_of(INITIAL_STEP)));
        }

        for level in levels {
            for &id in level {
                let Some(range) = ranges.get(id).copied() else {
                    continue;
                };

                let y = range.center() - self.node_height / 2.0;
                y_positions.insert(id, y);
                trace!(
                    node_id = id,
                    range_start = range.start(),
                    range_end = range.end(),
                    y;
                    "Node centred in range"
                );

                let mut current_y = range.start();
                for &child in tree_children.get(id).map(Vec::as_slice).unwrap_or_default() {
                    let child_height = height_of(child);
                    ranges.insert(child, VerticalRange::new(current_y, child_height));
                    current_y += child_height + self.vertical_spacing;
                }
            }
        }

        (ranges, y_positions)
    }

    /// Stacks nodes without a y coordinate below the lowest placed node.
    fn stack_orphans<'a>(
        &self,
        node_ids: &IndexSet<&'a str>,
        y_positions: &mut HashMap<&'a str, f32>,
    ) -> Vec<&'a str> {
        let step = self.node_height + self.vertical_spacing;
        let mut orphan_y = y_positions
            .values()
            .copied()
            .reduce(f32::max)
            .map_or(0.0, |max_y| max_y + step);

        let mut orphans = Vec::new();
        for &id in node_ids {
            if !y_positions.contains_key(id) {
                y_positions.insert(id, orphan_y);
                orphans.push(id);
                orphan_y += step;
            }
        }

        if !orphans.is_empty() {
            debug!(orphans_count = orphans.len(); "Stacked nodes unreachable from root");
        }

        orphans
    }
}

fn owned_keys<V>(map: IndexMap<&str, V>) -> IndexMap<String, V> {
    map.into_iter().map(|(id, value)| (id.to_string(), value)).collect()
}

/// Builder for creating and configuring a layout [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    engine: Engine,
}

impl EngineBuilder {
    /// Create a new engine builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance between consecutive columns
    pub fn with_horizontal_spacing(mut self, spacing: f32) -> Self {
        self.engine.horizontal_spacing = spacing;
        self
    }

    /// Set the gap between sibling subtrees
    pub fn with_vertical_spacing(mut self, spacing: f32) -> Self {
        self.engine.vertical_spacing = spacing;
        self
    }

    /// Set the height reserved for a single node
    pub fn with_node_height(mut self, height: f32) -> Self {
        self.engine.node_height = height;
        self
    }

    /// Build the configured engine
    pub fn build(self) -> Engine {
        self.engine
    }
}
