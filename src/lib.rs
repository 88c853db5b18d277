//! bstviz: a persistent binary search tree engine for teaching.
//!
//! Layers, innermost first:
//! - [`domain`]: nodes, tree algorithms, layout and narration
//! - [`application`]: the session controller and its search animation
//! - [`infrastructure`]: pacing, script input and the service container
//! - [`cli`]: the `bstviz` terminal host

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
