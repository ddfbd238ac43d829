//! Domain layer: branch data model and the tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no
//! config loading).

pub mod branch;
pub mod error;
pub mod tree;

pub use branch::{Branch, Priority};
pub use error::{TreeError, TreeResult};
pub use tree::{BranchNode, BranchTree, PreOrderIter, ROOT_LAYER};
