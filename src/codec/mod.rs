//! Persistence codec: one opaque blob per tree.
//!
//! The on-disk layout is magic bytes, a format version, a saved-at
//! timestamp, and one recursive record per branch (attributes plus child
//! records), encoded with postcard. Records are written by walking from
//! the root, so each branch is serialized exactly once; parent links and
//! layer numbers are never stored and are re-derived during
//! reconstruction.

pub mod error;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Branch, BranchTree, TreeError};
pub use error::{CodecError, CodecResult};

/// First bytes of every save file. Postcard writes leading fixed-size
/// fields verbatim, so these can be checked before parsing the body.
const MAGIC: [u8; 4] = *b"TNTR";
const FORMAT_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    magic: [u8; 4],
    version: u8,
    saved_at: DateTime<Utc>,
    root: NodeRecord,
}

/// One branch on the wire: its attributes and its children, in order.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    branch: Branch,
    children: Vec<NodeRecord>,
}

fn snapshot(tree: &BranchTree, idx: Index) -> CodecResult<NodeRecord> {
    let node = tree.node(idx).map_err(tree_err)?;
    let mut children = Vec::with_capacity(node.children.len());
    for &child in &node.children {
        children.push(snapshot(tree, child)?);
    }
    Ok(NodeRecord {
        branch: node.data.clone(),
        children,
    })
}

fn tree_err(e: TreeError) -> CodecError {
    CodecError::Encode(e.to_string())
}

/// Serialize the whole tree to an opaque byte blob.
#[instrument(level = "debug", skip(tree))]
pub fn encode(tree: &BranchTree) -> CodecResult<Vec<u8>> {
    let save = SaveFile {
        magic: MAGIC,
        version: FORMAT_VERSION,
        saved_at: Utc::now(),
        root: snapshot(tree, tree.root())?,
    };
    let bytes = postcard::to_allocvec(&save).map_err(|e| CodecError::Encode(e.to_string()))?;
    debug!(len = bytes.len(), "encoded tree");
    Ok(bytes)
}

/// Reconstruct a tree from a blob produced by [`encode`].
///
/// Builds a fresh tree or fails; the caller's state is never touched.
#[instrument(level = "debug", skip(bytes))]
pub fn decode(bytes: &[u8]) -> CodecResult<BranchTree> {
    let magic = bytes
        .get(0..4)
        .ok_or_else(|| CodecError::Decode("save data shorter than the header".into()))?;
    if magic != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = *bytes
        .get(4)
        .ok_or_else(|| CodecError::Decode("save data shorter than the header".into()))?;
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let save: SaveFile =
        postcard::from_bytes(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    rebuild(save.root)
}

fn rebuild(record: NodeRecord) -> CodecResult<BranchTree> {
    let mut tree = BranchTree::new("");
    let root = tree.root();
    if let Some(node) = tree.get_mut(root) {
        node.data = record.branch;
    }

    // Non-recursive rebuild; sibling order is preserved because children
    // are appended in record order regardless of stack pop order.
    let mut stack: Vec<(Index, Vec<NodeRecord>)> = vec![(root, record.children)];
    while let Some((parent, children)) = stack.pop() {
        for child_record in children {
            let child = tree
                .create_child(parent, "")
                .map_err(|e| CodecError::Decode(e.to_string()))?;
            if let Some(node) = tree.get_mut(child) {
                node.data = child_record.branch;
            }
            stack.push((child, child_record.children));
        }
    }
    Ok(tree)
}

/// Write the tree to `path` as a single blob.
pub fn save(tree: &BranchTree, path: &Path) -> CodecResult<()> {
    let bytes = encode(tree)?;
    fs::write(path, bytes).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a tree from `path`.
pub fn load(path: &Path) -> CodecResult<BranchTree> {
    let bytes = fs::read(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&bytes)
}
