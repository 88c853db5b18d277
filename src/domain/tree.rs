//! Persistent binary search tree and its algorithms.
//!
//! Every structural change produces a new root. Nodes off the modification path
//! are shared with the previous version, so older `Tree` values stay valid.

use std::cmp::Ordering;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::domain::node::{Key, Node, NodeFactory, NodeRef};

/// Immutable BST value, identified by its root.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    root: Option<NodeRef>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by inserting `keys` in order. Duplicates are skipped.
    pub fn from_keys(factory: &mut NodeFactory, keys: impl IntoIterator<Item = Key>) -> Self {
        keys.into_iter()
            .fold(Self::new(), |tree, key| tree.insert(factory, key))
    }

    pub fn root(&self) -> Option<&NodeRef> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter_preorder().count()
    }

    /// True when both values share the same root handle, i.e. an operation
    /// left the tree untouched.
    pub fn same_version(&self, other: &Tree) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Height with the empty tree at -1 and a single node at 0.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> i32 {
        height_of(self.root.as_ref())
    }

    pub fn contains(&self, key: Key) -> bool {
        self.search_path(key).is_found()
    }

    pub fn min(&self) -> Option<Key> {
        self.root.as_ref().map(|n| leftmost(n).key())
    }

    pub fn max(&self) -> Option<Key> {
        let mut current = self.root.as_ref()?;
        while let Some(right) = current.right() {
            current = right;
        }
        Some(current.key())
    }

    /// Insert `key`, returning the new version. Inserting an existing key
    /// returns the same version.
    #[instrument(level = "debug", skip(self, factory))]
    pub fn insert(&self, factory: &mut NodeFactory, key: Key) -> Tree {
        let root = insert_into(self.root.as_ref(), factory, key);
        Tree { root: Some(root) }
    }

    /// Delete `key`, returning the new version. Deleting an absent key
    /// returns the same version.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, key: Key) -> Tree {
        match &self.root {
            None => self.clone(),
            Some(root) => Tree {
                root: remove_from(root, key),
            },
        }
    }

    /// Record the comparison-driven descent from the root toward `key`.
    #[instrument(level = "debug", skip(self))]
    pub fn search_path(&self, key: Key) -> SearchPath {
        let mut nodes = Vec::new();
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            nodes.push(Rc::clone(node));
            current = match key.cmp(&node.key()) {
                Ordering::Equal => None,
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        debug!("search_path: target={} visited={}", key, nodes.len());
        SearchPath { target: key, nodes }
    }

    /// Classify how deleting `key` would rebuild the tree, if `key` is present.
    pub fn deletion_case(&self, key: Key) -> Option<DeletionCase> {
        self.search_path(key).found_node().map(DeletionCase::classify)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<Key> {
        self.inorder()
    }

    /// Left, node, right. Ascending for a valid BST.
    pub fn inorder(&self) -> Vec<Key> {
        self.iter_inorder().map(|n| n.key()).collect()
    }

    /// Node, left, right.
    pub fn preorder(&self) -> Vec<Key> {
        self.iter_preorder().map(|n| n.key()).collect()
    }

    /// Left, right, node.
    pub fn postorder(&self) -> Vec<Key> {
        self.iter_postorder().map(|n| n.key()).collect()
    }

    pub fn iter_preorder(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    pub fn iter_inorder(&self) -> InOrderIter<'_> {
        InOrderIter::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Check the strict ordering invariant over the whole tree.
    pub fn is_valid_bst(&self) -> bool {
        let mut previous: Option<Key> = None;
        for node in self.iter_inorder() {
            if previous.is_some_and(|p| p >= node.key()) {
                return false;
            }
            previous = Some(node.key());
        }
        true
    }
}

fn height_of(node: Option<&NodeRef>) -> i32 {
    let mut height = -1;
    let mut pending: Vec<(&NodeRef, i32)> = node.map(|n| (n, 0)).into_iter().collect();
    while let Some((node, depth)) = pending.pop() {
        height = height.max(depth);
        pending.extend(node.left().map(|l| (l, depth + 1)));
        pending.extend(node.right().map(|r| (r, depth + 1)));
    }
    height
}

fn leftmost(node: &NodeRef) -> &NodeRef {
    let mut current = node;
    while let Some(left) = current.left() {
        current = left;
    }
    current
}

/// Rebuild the ancestors in `path` (root first) bottom-up around the
/// subtree that replaced `key`. Each ancestor keeps its identity.
fn rebuild_path(path: Vec<&NodeRef>, key: Key, mut subtree: Option<NodeRef>) -> Option<NodeRef> {
    for node in path.into_iter().rev() {
        subtree = Some(if key < node.key() {
            Node::with_left(node, subtree)
        } else {
            Node::with_right(node, subtree)
        });
    }
    subtree
}

fn insert_into(root: Option<&NodeRef>, factory: &mut NodeFactory, key: Key) -> NodeRef {
    let Some(root) = root else {
        return factory.leaf(key);
    };
    let mut path = Vec::new();
    let mut current = Some(root);
    while let Some(node) = current {
        if key == node.key() {
            return Rc::clone(root);
        }
        path.push(node);
        current = node.child_towards(key);
    }
    let mut subtree = factory.leaf(key);
    for node in path.into_iter().rev() {
        subtree = if key < node.key() {
            Node::with_left(node, Some(subtree))
        } else {
            Node::with_right(node, Some(subtree))
        };
    }
    subtree
}

fn remove_from(root: &NodeRef, key: Key) -> Option<NodeRef> {
    let mut path = Vec::new();
    let mut current = root;
    let target = loop {
        if key == current.key() {
            break current;
        }
        match current.child_towards(key) {
            Some(next) => {
                path.push(current);
                current = next;
            }
            None => return Some(Rc::clone(root)),
        }
    };

    let replacement = match (target.left(), target.right()) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(Rc::clone(only)),
        (Some(_), Some(right)) => {
            let successor = leftmost(right).key();
            debug!("remove_from: {} replaced by successor {}", key, successor);
            Some(Node::rekeyed(target, successor, remove_min(right)))
        }
    };
    rebuild_path(path, key, replacement)
}

/// `node` without its leftmost descendant.
fn remove_min(node: &NodeRef) -> Option<NodeRef> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(left) = current.left() {
        path.push(current);
        current = left;
    }
    let mut subtree = current.right().cloned();
    for ancestor in path.into_iter().rev() {
        subtree = Some(Node::with_left(ancestor, subtree));
    }
    subtree
}

/// Nodes visited while descending toward a target key.
#[derive(Debug, Clone)]
pub struct SearchPath {
    target: Key,
    nodes: Vec<NodeRef>,
}

impl SearchPath {
    pub fn target(&self) -> Key {
        self.target
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn last(&self) -> Option<&NodeRef> {
        self.nodes.last()
    }

    /// The search ended on a node holding the target.
    pub fn is_found(&self) -> bool {
        self.found_node().is_some()
    }

    pub fn found_node(&self) -> Option<&NodeRef> {
        self.last().filter(|n| n.key() == self.target)
    }

    pub fn keys(&self) -> Vec<Key> {
        self.nodes.iter().map(|n| n.key()).collect()
    }
}

/// How a present key is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionCase {
    Leaf,
    OnlyLeft { child: Key },
    OnlyRight { child: Key },
    TwoChildren { left: Key, right: Key, successor: Key },
}

impl DeletionCase {
    pub fn classify(node: &NodeRef) -> Self {
        match (node.left(), node.right()) {
            (None, None) => Self::Leaf,
            (Some(left), None) => Self::OnlyLeft { child: left.key() },
            (None, Some(right)) => Self::OnlyRight { child: right.key() },
            (Some(left), Some(right)) => Self::TwoChildren {
                left: left.key(),
                right: right.key(),
                successor: leftmost(right).key(),
            },
        }
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<&'a NodeRef>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            stack: tree.root.iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Right first so the left subtree is visited first
        self.stack.extend(current.right());
        self.stack.extend(current.left());
        Some(current)
    }
}

pub struct InOrderIter<'a> {
    stack: Vec<&'a NodeRef>,
}

impl<'a> InOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(tree.root.as_ref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a NodeRef>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.push_left_spine(current.right());
        Some(current)
    }
}

pub struct PostOrderIterator<'a> {
    stack: Vec<(&'a NodeRef, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            stack: tree.root.iter().map(|r| (r, false)).collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = &'a NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if visited {
                return Some(current);
            }
            self.stack.push((current, true));
            if let Some(right) = current.right() {
                self.stack.push((right, false));
            }
            if let Some(left) = current.left() {
                self.stack.push((left, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(keys: &[Key]) -> (NodeFactory, Tree) {
        let mut factory = NodeFactory::new();
        let tree = Tree::from_keys(&mut factory, keys.iter().copied());
        (factory, tree)
    }

    #[test]
    fn given_empty_tree_when_traversing_then_all_sequences_empty() {
        let tree = Tree::new();
        assert!(tree.inorder().is_empty());
        assert!(tree.preorder().is_empty());
        assert!(tree.postorder().is_empty());
        assert_eq!(tree.height(), -1);
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn given_sample_tree_when_traversing_then_orders_match() {
        let (_, tree) = build(&[50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(tree.inorder(), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.preorder(), vec![50, 30, 20, 40, 70, 60, 80]);
        assert_eq!(tree.postorder(), vec![20, 40, 30, 60, 80, 70, 50]);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.min(), Some(20));
        assert_eq!(tree.max(), Some(80));
    }

    #[test]
    fn given_existing_key_when_inserting_then_same_version_and_no_new_ids() {
        let (mut factory, tree) = build(&[10, 5, 15]);
        let before = factory.allocated();
        let again = tree.insert(&mut factory, 5);
        assert!(again.same_version(&tree));
        assert_eq!(factory.allocated(), before);
    }

    #[test]
    fn given_insert_when_applied_then_off_path_subtree_is_shared() {
        let (mut factory, tree) = build(&[10, 5, 15, 3]);
        let next = tree.insert(&mut factory, 20);
        let old_left = tree.root().and_then(|r| r.left()).cloned();
        let new_left = next.root().and_then(|r| r.left()).cloned();
        match (old_left, new_left) {
            (Some(a), Some(b)) => assert!(Rc::ptr_eq(&a, &b), "left subtree should be shared"),
            other => panic!("unexpected shape: {:?}", other),
        }
        assert_eq!(tree.inorder(), vec![3, 5, 10, 15]);
        assert_eq!(next.inorder(), vec![3, 5, 10, 15, 20]);
    }

    #[test]
    fn given_two_children_when_deleting_then_successor_takes_place() {
        let (_, tree) = build(&[10, 5, 15, 3]);
        let next = tree.delete(10);
        assert_eq!(next.inorder(), vec![3, 5, 15]);
        assert_eq!(next.root().map(|r| r.key()), Some(15));
        assert_eq!(
            next.root().map(|r| r.id()),
            tree.root().map(|r| r.id()),
            "rebuilt root keeps its identity"
        );
        assert!(next.is_valid_bst());
    }

    #[test]
    fn given_deep_successor_when_deleting_then_successor_right_child_is_kept() {
        let (_, tree) = build(&[50, 30, 70, 60, 80, 65]);
        let next = tree.delete(50);
        assert_eq!(next.root().map(|r| r.key()), Some(60));
        assert_eq!(next.inorder(), vec![30, 60, 65, 70, 80]);
        assert!(next.is_valid_bst());
    }

    #[test]
    fn given_absent_key_when_deleting_then_same_version() {
        let (_, tree) = build(&[10, 5, 15]);
        assert!(tree.delete(7).same_version(&tree));
        assert!(Tree::new().delete(1).is_empty());
    }

    #[test]
    fn given_single_child_when_deleting_then_child_promoted() {
        let (_, tree) = build(&[10, 5, 3]);
        let next = tree.delete(5);
        assert_eq!(next.preorder(), vec![10, 3]);
        assert_eq!(tree.preorder(), vec![10, 5, 3], "old version untouched");
    }

    #[test]
    fn given_keys_when_classifying_deletion_then_case_matches() {
        let (_, tree) = build(&[10, 5, 15, 3, 20, 12, 13]);
        assert_eq!(tree.deletion_case(3), Some(DeletionCase::Leaf));
        assert_eq!(tree.deletion_case(5), Some(DeletionCase::OnlyLeft { child: 3 }));
        assert_eq!(tree.deletion_case(12), Some(DeletionCase::OnlyRight { child: 13 }));
        assert_eq!(
            tree.deletion_case(10),
            Some(DeletionCase::TwoChildren { left: 5, right: 15, successor: 12 })
        );
        assert_eq!(tree.deletion_case(99), None);
    }

    #[test]
    fn given_absent_key_when_searching_then_path_ends_at_missing_child() {
        let (_, tree) = build(&[10, 5, 15, 3]);
        let path = tree.search_path(4);
        assert_eq!(path.keys(), vec![10, 5, 3]);
        assert!(!path.is_found());
        let last = path.last().expect("non-empty path");
        assert!(last.child_towards(4).is_none());
    }

    #[test]
    fn given_present_key_when_searching_then_path_ends_at_key() {
        let (_, tree) = build(&[10, 5, 15, 3]);
        let path = tree.search_path(15);
        assert_eq!(path.keys(), vec![10, 15]);
        assert!(path.is_found());
        assert!(Tree::new().search_path(1).is_empty());
    }
}
