//! Arena-based branch tree: the structural engine of the outline.
//!
//! Uses a generational arena for memory-safe node handles and O(1) lookups.
//! Parent links are non-owning navigation handles; the only ownership edge
//! is the ordered child list. Detached subtrees stay in the arena as
//! unreachable garbage so a cut buffer can point into them until pasted.

use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::branch::{Branch, Priority};
use crate::domain::error::{TreeError, TreeResult};

/// Layer of the root node. Its direct children sit at layer 0.
pub const ROOT_LAYER: i32 = -1;

/// One vertex of the outline tree.
#[derive(Debug)]
pub struct BranchNode {
    /// Attribute payload for this branch
    pub data: Branch,
    /// Depth relative to the root sentinel; `parent.layer + 1` for every
    /// non-root node
    pub layer: i32,
    /// Navigation handle to the owner, `None` for the root. Left in place
    /// on detach so callers can find where a cut branch came from.
    pub parent: Option<Index>,
    /// Ordered child handles; order is display order
    pub children: Vec<Index>,
}

/// Arena-backed tree with a single root.
#[derive(Debug)]
pub struct BranchTree {
    arena: Arena<BranchNode>,
    root: Index,
}

impl BranchTree {
    /// Create a tree whose root sits at the sentinel layer with priority 0.
    pub fn new(title: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(BranchNode {
            data: Branch::new(title, Priority::default()),
            layer: ROOT_LAYER,
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get(&self, idx: Index) -> Option<&BranchNode> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut BranchNode> {
        self.arena.get_mut(idx)
    }

    /// Fallible lookup for operations that must report bad handles.
    pub fn node(&self, idx: Index) -> TreeResult<&BranchNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| TreeError::StaleHandle(format!("{:?}", idx)))
    }

    pub fn node_mut(&mut self, idx: Index) -> TreeResult<&mut BranchNode> {
        self.arena
            .get_mut(idx)
            .ok_or_else(|| TreeError::StaleHandle(format!("{:?}", idx)))
    }

    /// Create a branch one layer below `parent`, inheriting the parent's
    /// current priority as a one-time initial value, appended to the
    /// parent's child list.
    #[instrument(level = "trace", skip(self, title))]
    pub fn create_child(&mut self, parent: Index, title: impl Into<String>) -> TreeResult<Index> {
        let (layer, priority) = {
            let node = self.node(parent)?;
            (node.layer + 1, node.data.priority)
        };
        let child = self.arena.insert(BranchNode {
            data: Branch::new(title, priority),
            layer,
            parent: Some(parent),
            children: Vec::new(),
        });
        // parent checked above, still present
        self.arena[parent].children.push(child);
        Ok(child)
    }

    /// Remove `node` from its parent's child list and return the former
    /// parent. The node's own parent link is left pointing at it so the
    /// caller can re-anchor a cursor; the subtree becomes unreachable.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, node: Index) -> TreeResult<Index> {
        if node == self.root {
            return Err(TreeError::NoParent("cannot detach the root".into()));
        }
        let parent = self
            .node(node)?
            .parent
            .ok_or_else(|| TreeError::NoParent(format!("{:?}", node)))?;
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == node)
            .ok_or_else(|| TreeError::NoParent("branch is already detached".into()))?;
        self.arena[parent].children.remove(position);
        Ok(parent)
    }

    /// Attach `node` (typically a detached subtree) under `new_parent`,
    /// appended to its child list. The whole subtree is re-layered so
    /// relative depths are preserved.
    ///
    /// Fails with [`TreeError::Cycle`] when `new_parent` is `node` itself
    /// or any of its descendants; the tree is untouched in that case. A
    /// node still linked from an old parent is unlinked first, so a branch
    /// can only ever appear in one child list.
    #[instrument(level = "trace", skip(self))]
    pub fn reattach(&mut self, node: Index, new_parent: Index) -> TreeResult<Index> {
        self.node(node)?;
        let target_layer = self.node(new_parent)?.layer;
        if self.is_in_subtree(node, new_parent) {
            return Err(TreeError::Cycle(format!("{:?}", new_parent)));
        }

        if let Some(old_parent) = self.arena[node].parent {
            if let Some(old) = self.arena.get_mut(old_parent) {
                old.children.retain(|&c| c != node);
            }
        }

        let delta = target_layer + 1 - self.arena[node].layer;
        if delta != 0 {
            let subtree: Vec<Index> = self.iter_from(node).map(|(idx, _)| idx).collect();
            for idx in subtree {
                self.arena[idx].layer += delta;
            }
        }

        self.arena[node].parent = Some(new_parent);
        self.arena[new_parent].children.push(node);
        Ok(node)
    }

    /// Reorder `node` among its siblings: -1 moves up, +1 moves down
    /// (any magnitude is normalized to its sign). No-op when `direction`
    /// is 0 or `node` is the root; returns the parent otherwise.
    ///
    /// A move past either end of the sibling list fails with
    /// [`TreeError::Boundary`] and leaves the order unchanged.
    #[instrument(level = "trace", skip(self))]
    pub fn move_lateral(&mut self, node: Index, direction: i32) -> TreeResult<Option<Index>> {
        let direction = direction.signum();
        if direction == 0 || node == self.root {
            return Ok(None);
        }
        let parent = match self.node(node)?.parent {
            Some(parent) => parent,
            None => return Ok(None),
        };
        let siblings = &self.node(parent)?.children;
        let position = siblings
            .iter()
            .position(|&c| c == node)
            .ok_or_else(|| TreeError::StaleHandle("branch is detached".into()))?;
        let target = position as i64 + direction as i64;
        if target < 0 || target >= siblings.len() as i64 {
            return Err(TreeError::Boundary(format!(
                "sibling position {} of {}",
                target,
                siblings.len()
            )));
        }
        let children = &mut self.arena[parent].children;
        children.remove(position);
        children.insert(target as usize, node);
        Ok(Some(parent))
    }

    /// Re-parent `node` by one level: -1 ("in") wraps it under a newly
    /// created empty-titled sibling, demoting it one layer; +1 ("out")
    /// promotes it to a child of its grandparent. No-op when `direction`
    /// is 0.
    ///
    /// Fails with [`TreeError::Boundary`] when the root is moved in or a
    /// child of the root is moved out; boundaries are checked before any
    /// mutation.
    #[instrument(level = "trace", skip(self))]
    pub fn move_vertical(&mut self, node: Index, direction: i32) -> TreeResult<()> {
        let direction = direction.signum();
        if direction == 0 {
            return Ok(());
        }
        let parent = self
            .node(node)?
            .parent
            .ok_or_else(|| TreeError::Boundary("the root cannot be moved".into()))?;
        if direction < 0 {
            let wrapper = self.create_child(parent, "")?;
            self.detach(node)?;
            self.reattach(node, wrapper)?;
        } else {
            let grandparent = self
                .node(parent)?
                .parent
                .ok_or_else(|| TreeError::Boundary("no grandparent above this branch".into()))?;
            self.detach(node)?;
            self.reattach(node, grandparent)?;
        }
        Ok(())
    }

    /// Pre-order iterator over the whole tree.
    pub fn iter(&self) -> PreOrderIter<'_> {
        self.iter_from(self.root)
    }

    /// Pre-order iterator over `start` and all its descendants,
    /// left-to-right, each yielded exactly once. Restartable: every call
    /// produces a fresh iterator.
    pub fn iter_from(&self, start: Index) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            stack: vec![start],
        }
    }

    /// Apply `apply` to the payload of `start` and, pre-order, to every
    /// descendant.
    pub fn apply_recursive<F>(&mut self, start: Index, mut apply: F) -> TreeResult<()>
    where
        F: FnMut(&mut Branch),
    {
        self.node(start)?;
        let order: Vec<Index> = self.iter_from(start).map(|(idx, _)| idx).collect();
        for idx in order {
            if let Some(node) = self.arena.get_mut(idx) {
                apply(&mut node.data);
            }
        }
        Ok(())
    }

    /// Fallible variant of [`apply_recursive`](Self::apply_recursive).
    ///
    /// Best-effort bulk apply, not atomic: the walk stops at the first
    /// error and branches already visited keep the applied effect.
    pub fn try_apply_recursive<E, F>(&mut self, start: Index, mut apply: F) -> Result<(), E>
    where
        F: FnMut(&mut Branch) -> Result<(), E>,
        E: From<TreeError>,
    {
        self.node(start)?;
        let order: Vec<Index> = self.iter_from(start).map(|(idx, _)| idx).collect();
        for idx in order {
            if let Some(node) = self.arena.get_mut(idx) {
                apply(&mut node.data)?;
            }
        }
        Ok(())
    }

    /// True when `candidate` lies inside the subtree rooted at `node`
    /// (including `node` itself).
    pub fn is_in_subtree(&self, node: Index, candidate: Index) -> bool {
        self.iter_from(node).any(|(idx, _)| idx == candidate)
    }

    /// Number of branches reachable from the root. Detached garbage is
    /// not counted.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Check every structural invariant over the reachable tree: layer
    /// numbering, parent/child link symmetry, duplicate-free child lists,
    /// and single-visit reachability.
    pub fn validate(&self) -> TreeResult<()> {
        let root = self.node(self.root)?;
        if root.parent.is_some() {
            return Err(TreeError::Corrupt("root has a parent link".into()));
        }
        if root.layer != ROOT_LAYER {
            return Err(TreeError::Corrupt(format!(
                "root layer is {}, expected {}",
                root.layer, ROOT_LAYER
            )));
        }

        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                return Err(TreeError::Corrupt(format!(
                    "branch {:?} is reachable more than once",
                    idx
                )));
            }
            let node = self.node(idx)?;
            let mut child_set = HashSet::new();
            for &child_idx in &node.children {
                if !child_set.insert(child_idx) {
                    return Err(TreeError::Corrupt(format!(
                        "duplicate child {:?} under {:?}",
                        child_idx, idx
                    )));
                }
                let child = self.node(child_idx)?;
                if child.parent != Some(idx) {
                    return Err(TreeError::Corrupt(format!(
                        "parent link of {:?} does not match its owner {:?}",
                        child_idx, idx
                    )));
                }
                if child.layer != node.layer + 1 {
                    return Err(TreeError::Corrupt(format!(
                        "layer of {:?} is {}, expected {}",
                        child_idx,
                        child.layer,
                        node.layer + 1
                    )));
                }
                stack.push(child_idx);
            }
        }
        Ok(())
    }
}

pub struct PreOrderIter<'a> {
    tree: &'a BranchTree,
    stack: Vec<Index>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a BranchNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
