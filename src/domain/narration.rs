//! Narration engine: turns recorded search paths into step-by-step text.
//!
//! All functions are pure; the same path always yields the same lines.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;

use crate::domain::node::Key;
use crate::domain::tree::{DeletionCase, SearchPath, Tree};

pub const EMPTY_TREE_LINE: &str = "Tree empty, operation impossible.";

/// Operation a path was recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Delete,
    Search,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Delete => "delete",
            Operation::Search => "search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Describe every comparison made along `path` and the search result.
pub fn narrate(key: Key, path: &SearchPath, op: Operation) -> Vec<String> {
    let Some(last) = path.last() else {
        return vec![EMPTY_TREE_LINE.to_string()];
    };

    let mut lines = Vec::with_capacity(path.len() + 2);
    lines.push(format!("Operation: {op}. Target key = {key}"));
    for (step, node) in path.nodes().iter().enumerate() {
        let step = step + 1;
        let current = node.key();
        lines.push(match key.cmp(&current) {
            Ordering::Equal => {
                format!("Step {step}: compare with {current}: keys are equal, stop (match).")
            }
            Ordering::Less => format!("Step {step}: compare with {current}: {key} < {current}, go left."),
            Ordering::Greater => {
                format!("Step {step}: compare with {current}: {key} > {current}, go right.")
            }
        });
    }

    if last.key() == key {
        lines.push(format!("Result: key {key} found."));
    } else {
        lines.push(format!(
            "Result: key {key} not found, search exhausted at {}.",
            last.key()
        ));
    }
    lines
}

/// Narration for inserting `key`, given the path recorded before the insert.
pub fn narrate_insert(key: Key, path: &SearchPath) -> Vec<String> {
    let Some(parent) = path.last() else {
        return vec![format!("Insert {key}: tree was empty, new root = {key}.")];
    };

    let mut lines = narrate(key, path, Operation::Insert);
    let parent = parent.key();
    lines.push(match key.cmp(&parent) {
        Ordering::Equal => format!("Insert skipped: key {key} already exists (duplicate ignored)."),
        Ordering::Less => format!(
            "Since {key} < {parent} and the left child is empty, insert {key} as the left child of {parent}."
        ),
        Ordering::Greater => format!(
            "Since {key} > {parent} and the right child is empty, insert {key} as the right child of {parent}."
        ),
    });
    lines
}

/// Narration for deleting `key`. `case` is `None` when the key is absent.
pub fn narrate_delete(key: Key, path: &SearchPath, case: Option<DeletionCase>) -> Vec<String> {
    let mut lines = narrate(key, path, Operation::Delete);
    if let Some(case) = case {
        lines.extend(describe_deletion(key, case));
    }
    lines
}

/// Explain how the place of a removed node is filled.
pub fn describe_deletion(key: Key, case: DeletionCase) -> Vec<String> {
    match case {
        DeletionCase::Leaf => vec![format!(
            "Node {key} is a leaf: remove it, the parent's link becomes empty."
        )],
        DeletionCase::OnlyLeft { child } => vec![format!(
            "Node {key} has only a left child {child}: the parent now links directly to {child} instead of {key}."
        )],
        DeletionCase::OnlyRight { child } => vec![format!(
            "Node {key} has only a right child {child}: the parent now links directly to {child} instead of {key}."
        )],
        DeletionCase::TwoChildren {
            left,
            right,
            successor,
        } => vec![
            format!(
                "Node {key} has two children ({left} and {right}): its in-order successor, the minimum of the right subtree, is {successor}."
            ),
            format!(
                "Replace key {key} with {successor}, then delete {successor} from the right subtree; the BST property is preserved."
            ),
        ],
    }
}

/// Lines listing the three depth-first traversals of `tree`.
pub fn describe_traversals(tree: &Tree) -> Vec<String> {
    vec![
        "Tree traversals:".to_string(),
        traversal_line("In-order (LNR):", &tree.inorder()),
        traversal_line("Pre-order (NLR):", &tree.preorder()),
        traversal_line("Post-order (LRN):", &tree.postorder()),
    ]
}

fn traversal_line(label: &str, keys: &[Key]) -> String {
    if keys.is_empty() {
        label.to_string()
    } else {
        format!("{label} {}", keys.iter().join(" "))
    }
}
