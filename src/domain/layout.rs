//! Layout engine: assigns canvas coordinates to tree nodes.
//!
//! Space-halving layout: the root is centred in the full horizontal extent and
//! every child gets the half of its parent's interval on its side. Depth maps
//! to a fixed vertical step.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::node::{Key, NodeId, NodeRef};
use crate::domain::tree::Tree;

/// Drawing surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1300.0,
            height: 500.0,
        }
    }
}

/// Presentation tuning for the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Empty band on the left and right edge of the canvas
    pub horizontal_margin: f64,
    /// Y coordinate of the root
    pub top_margin: f64,
    /// Upper bound for the distance between two levels
    pub max_level_height: f64,
    /// Lower bound for the height the levels are spread over
    pub min_usable_height: f64,
    /// Canvas height not available to levels
    pub vertical_reserve: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            horizontal_margin: 40.0,
            top_margin: 40.0,
            max_level_height: 120.0,
            min_usable_height: 120.0,
            vertical_reserve: 80.0,
        }
    }
}

impl LayoutParams {
    /// Vertical distance between consecutive levels for a tree of `height`.
    pub fn level_height(&self, canvas: Canvas, height: i32) -> f64 {
        let usable = self
            .min_usable_height
            .max(canvas.height - self.vertical_reserve);
        let levels = f64::from(height.max(1));
        self.max_level_height.min(usable / levels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionedNode {
    pub id: NodeId,
    pub key: Key,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Positioned nodes (pre-order) and parent-to-child edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<Edge>,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Compute positions for every node of `tree` on `canvas`.
#[instrument(level = "debug", skip(tree, params))]
pub fn compute_positions(tree: &Tree, canvas: Canvas, params: &LayoutParams) -> Layout {
    let mut layout = Layout::default();
    let Some(root) = tree.root() else {
        return layout;
    };

    let placer = Placer {
        level_height: params.level_height(canvas, tree.height()),
        top_margin: params.top_margin,
    };
    placer.place_all(
        root,
        params.horizontal_margin,
        canvas.width - params.horizontal_margin,
        &mut layout,
    );
    layout
}

struct Placer {
    level_height: f64,
    top_margin: f64,
}

/// Pending work; an edge is queued below its child's subtree so it is
/// emitted once that subtree is done.
enum Task<'a> {
    Place {
        node: &'a NodeRef,
        depth: u32,
        x_min: f64,
        x_max: f64,
    },
    Link(Edge),
}

impl Placer {
    fn position(&self, depth: u32, x_min: f64, x_max: f64) -> (f64, f64) {
        (
            (x_min + x_max) / 2.0,
            self.top_margin + f64::from(depth) * self.level_height,
        )
    }

    fn place_all(&self, root: &NodeRef, x_min: f64, x_max: f64, layout: &mut Layout) {
        let mut tasks = vec![Task::Place {
            node: root,
            depth: 0,
            x_min,
            x_max,
        }];
        while let Some(task) = tasks.pop() {
            let (node, depth, x_min, x_max) = match task {
                Task::Link(edge) => {
                    layout.edges.push(edge);
                    continue;
                }
                Task::Place {
                    node,
                    depth,
                    x_min,
                    x_max,
                } => (node, depth, x_min, x_max),
            };
            let (x, y) = self.position(depth, x_min, x_max);
            layout.nodes.push(PositionedNode {
                id: node.id(),
                key: node.key(),
                x,
                y,
            });

            // pushed in reverse: left subtree, left edge, right subtree, right edge
            let children = [(node.right(), x, x_max), (node.left(), x_min, x)];
            for (child, c_min, c_max) in children {
                let Some(child) = child else {
                    continue;
                };
                let (cx, cy) = self.position(depth + 1, c_min, c_max);
                tasks.push(Task::Link(Edge {
                    parent: node.id(),
                    child: child.id(),
                    x1: x,
                    y1: y,
                    x2: cx,
                    y2: cy,
                }));
                tasks.push(Task::Place {
                    node: child,
                    depth: depth + 1,
                    x_min: c_min,
                    x_max: c_max,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::NodeFactory;

    fn tree_of(keys: &[Key]) -> Tree {
        let mut factory = NodeFactory::new();
        Tree::from_keys(&mut factory, keys.iter().copied())
    }

    #[test]
    fn given_empty_tree_when_computing_then_layout_empty() {
        let layout = compute_positions(&Tree::new(), Canvas::default(), &LayoutParams::default());
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn given_single_node_when_computing_then_root_centred_at_top() {
        let canvas = Canvas {
            width: 800.0,
            height: 400.0,
        };
        let layout = compute_positions(&tree_of(&[1]), canvas, &LayoutParams::default());
        assert_eq!(layout.nodes.len(), 1);
        assert_eq!(layout.nodes[0].x, 400.0);
        assert_eq!(layout.nodes[0].y, 40.0);
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn given_three_nodes_when_computing_then_children_split_interval() {
        let canvas = Canvas {
            width: 880.0,
            height: 500.0,
        };
        let layout = compute_positions(&tree_of(&[10, 5, 15]), canvas, &LayoutParams::default());
        let xs: Vec<f64> = layout.nodes.iter().map(|n| n.x).collect();
        // root interval [40, 840]
        assert_eq!(xs, vec![440.0, 240.0, 640.0]);
        assert_eq!(layout.nodes[1].y, 160.0);
        assert_eq!(layout.edges.len(), 2);
        assert_eq!(layout.edges[0].x1, 440.0);
        assert_eq!(layout.edges[0].x2, 240.0);
    }

    #[test]
    fn given_tall_tree_when_computing_then_level_height_fits_canvas() {
        let params = LayoutParams::default();
        let canvas = Canvas {
            width: 600.0,
            height: 400.0,
        };
        // usable = max(120, 320) = 320, h = 4 -> 80 < 120
        assert_eq!(params.level_height(canvas, 4), 80.0);
        // h = 0 is treated as 1 and capped
        assert_eq!(params.level_height(canvas, 0), 120.0);
    }

    #[test]
    fn given_tree_when_computing_twice_then_identical() {
        let tree = tree_of(&[8, 4, 12, 2, 6, 10, 14, 1]);
        let a = compute_positions(&tree, Canvas::default(), &LayoutParams::default());
        let b = compute_positions(&tree, Canvas::default(), &LayoutParams::default());
        assert_eq!(a, b);
        assert_eq!(a.edges.len(), a.nodes.len() - 1);
    }

    #[test]
    fn given_nested_tree_when_computing_then_edges_follow_child_subtrees() {
        let layout = compute_positions(
            &tree_of(&[10, 5, 15, 3, 7]),
            Canvas::default(),
            &LayoutParams::default(),
        );
        let keys: Vec<Key> = layout.nodes.iter().map(|n| n.key).collect();
        assert_eq!(keys, vec![10, 5, 3, 7, 15]);
        let key_of = |id| layout.node(id).map(|n| n.key);
        let edges: Vec<(Option<Key>, Option<Key>)> = layout
            .edges
            .iter()
            .map(|e| (key_of(e.parent), key_of(e.child)))
            .collect();
        assert_eq!(
            edges,
            vec![
                (Some(5), Some(3)),
                (Some(5), Some(7)),
                (Some(10), Some(5)),
                (Some(10), Some(15)),
            ]
        );
    }
}
