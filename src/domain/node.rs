//! Node model: immutable tree nodes and identity allocation.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Ordered key stored in the tree.
pub type Key = i64;

/// Shared handle to a node. Tree versions share unchanged subtrees through it.
pub type NodeRef = Rc<Node>;

/// Float literals at or beyond 2^53 may already have been rounded.
const EXACT_FLOAT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Parse raw user input into a key.
///
/// Surrounding whitespace is ignored. Integers are taken as is. Float
/// notation (`5.0`, `1e3`) is accepted when it denotes a whole number that a
/// float represents exactly. Empty input and anything else is rejected.
pub fn parse_key(raw: &str) -> DomainResult<Key> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DomainError::EmptyKey);
    }
    if let Ok(key) = text.parse::<Key>() {
        return Ok(key);
    }
    match text.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value.abs() < EXACT_FLOAT_LIMIT =>
        {
            Ok(value as Key)
        }
        _ => Err(DomainError::InvalidKey(text.to_string())),
    }
}

/// Stable node identity, unique per [`NodeFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tree node. Never mutated after construction.
pub struct Node {
    id: NodeId,
    key: Key,
    left: Option<NodeRef>,
    right: Option<NodeRef>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn left(&self) -> Option<&NodeRef> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&NodeRef> {
        self.right.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Child on the side a search for `key` would continue to.
    pub fn child_towards(&self, key: Key) -> Option<&NodeRef> {
        if key < self.key {
            self.left()
        } else {
            self.right()
        }
    }

    /// New version of this node with a different left subtree.
    ///
    /// Returns the same handle when the subtree is unchanged.
    pub(crate) fn with_left(this: &NodeRef, left: Option<NodeRef>) -> NodeRef {
        if same_subtree(this.left.as_ref(), left.as_ref()) {
            return Rc::clone(this);
        }
        Rc::new(Node {
            id: this.id,
            key: this.key,
            left,
            right: this.right.clone(),
        })
    }

    /// New version of this node with a different right subtree.
    ///
    /// Returns the same handle when the subtree is unchanged.
    pub(crate) fn with_right(this: &NodeRef, right: Option<NodeRef>) -> NodeRef {
        if same_subtree(this.right.as_ref(), right.as_ref()) {
            return Rc::clone(this);
        }
        Rc::new(Node {
            id: this.id,
            key: this.key,
            left: this.left.clone(),
            right,
        })
    }

    /// New version of this node carrying `key` and a new right subtree.
    /// Used when a two-children node takes over its successor's key.
    pub(crate) fn rekeyed(this: &NodeRef, key: Key, right: Option<NodeRef>) -> NodeRef {
        Rc::new(Node {
            id: this.id,
            key,
            left: this.left.clone(),
            right,
        })
    }
}

// Shallow: children are shown by key only.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("left", &self.left.as_ref().map(|n| n.key))
            .field("right", &self.right.as_ref().map(|n| n.key))
            .finish()
    }
}

// Unlinks uniquely owned descendants one by one; the default drop glue
// would recurse once per level of a degenerate tree.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<NodeRef> = self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(node) {
                pending.extend(node.left.take());
                pending.extend(node.right.take());
            }
        }
    }
}

/// Identity comparison of two optional subtrees.
pub fn same_subtree(a: Option<&NodeRef>, b: Option<&NodeRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Allocates node identities. Owns the monotonically increasing counter.
///
/// A fresh factory restarts numbering at 1, which lets tests reset
/// identities deterministically.
#[derive(Debug, Default)]
pub struct NodeFactory {
    last_id: u64,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new leaf with a fresh identity.
    #[instrument(level = "trace", skip(self))]
    pub fn leaf(&mut self, key: Key) -> NodeRef {
        self.last_id += 1;
        Rc::new(Node {
            id: NodeId(self.last_id),
            key,
            left: None,
            right: None,
        })
    }

    /// Number of identities handed out so far.
    pub fn allocated(&self) -> u64 {
        self.last_id
    }
}
