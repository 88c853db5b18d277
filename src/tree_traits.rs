//! ASCII outline of a tree via `termtree`
//!
//! Kept as an extension trait so the domain types stay free of presentation
//! concerns.

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::{Key, NodeRef, Tree};

pub const EMPTY_OUTLINE: &str = "(empty tree)";

pub trait TreeConvert {
    /// Render as an outline. Children are prefixed `L` or `R`, the
    /// highlighted key is shown in brackets.
    fn to_term_tree(&self, highlight: Option<Key>) -> TermTree<String>;
}

impl TreeConvert for Tree {
    #[instrument(level = "trace", skip(self))]
    fn to_term_tree(&self, highlight: Option<Key>) -> TermTree<String> {
        match self.root() {
            Some(root) => build(root, highlight),
            None => TermTree::new(EMPTY_OUTLINE.to_string()),
        }
    }
}

/// Builds the outline bottom-up from an explicit stack so deep trees do
/// not recurse.
fn build(root: &NodeRef, highlight: Option<Key>) -> TermTree<String> {
    let mut built: Vec<TermTree<String>> = Vec::new();
    let mut pending: Vec<(&NodeRef, &str, bool)> = vec![(root, "", false)];
    while let Some((node, side, children_done)) = pending.pop() {
        if !children_done {
            pending.push((node, side, true));
            pending.extend(node.right().map(|r| (r, "R ", false)));
            pending.extend(node.left().map(|l| (l, "L ", false)));
            continue;
        }
        let right = node.right().and_then(|_| built.pop());
        let left = node.left().and_then(|_| built.pop());
        let mut tree = TermTree::new(label(node, side, highlight));
        for child in left.into_iter().chain(right) {
            tree.push(child);
        }
        built.push(tree);
    }
    built
        .pop()
        .unwrap_or_else(|| TermTree::new(EMPTY_OUTLINE.to_string()))
}

fn label(node: &NodeRef, side: &str, highlight: Option<Key>) -> String {
    if highlight == Some(node.key()) {
        format!("{side}[{}]", node.key())
    } else {
        format!("{side}{}", node.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeFactory;

    #[test]
    fn given_empty_tree_when_rendered_then_placeholder() {
        assert_eq!(Tree::new().to_term_tree(None).to_string().trim(), EMPTY_OUTLINE);
    }

    #[test]
    fn given_highlight_when_rendered_then_key_bracketed_and_sides_marked() {
        let mut factory = NodeFactory::new();
        let tree = Tree::from_keys(&mut factory, [10, 5, 15]);
        let text = tree.to_term_tree(Some(5)).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "10");
        assert!(lines[1].ends_with("L [5]"));
        assert!(lines[2].ends_with("R 15"));
    }

    #[test]
    fn given_nested_tree_when_rendered_then_children_in_left_right_order() {
        let mut factory = NodeFactory::new();
        let tree = Tree::from_keys(&mut factory, [10, 5, 15, 3, 7]);
        let text = tree.to_term_tree(None).to_string();
        let labels: Vec<&str> = text
            .lines()
            .map(|l| l.trim_start_matches(|c: char| !c.is_ascii_alphanumeric()))
            .collect();
        assert_eq!(labels, vec!["10", "L 5", "L 3", "R 7", "R 15"]);
    }
}
