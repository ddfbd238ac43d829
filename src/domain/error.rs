//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Errors raised by structural tree operations.
///
/// Single-node operations validate their preconditions before mutating,
/// so a returned error means the tree is unchanged.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("branch has no parent: {0}")]
    NoParent(String),

    #[error("move out of bounds: {0}")]
    Boundary(String),

    #[error("cycle detected: target {0} is inside the moved subtree")]
    Cycle(String),

    #[error("stale branch handle: {0}")]
    StaleHandle(String),

    #[error("tree invariant violated: {0}")]
    Corrupt(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
