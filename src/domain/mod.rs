//! Domain layer: the BST engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod layout;
pub mod narration;
pub mod node;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use layout::{compute_positions, Canvas, Edge, Layout, LayoutParams, PositionedNode};
pub use narration::Operation;
pub use node::{parse_key, Key, Node, NodeFactory, NodeId, NodeRef};
pub use tree::{DeletionCase, SearchPath, Tree};
