//! Interactive session state: the tree, the cursor, and the paste buffer.
//!
//! All command semantics live here so the line loop stays a thin shell.
//! Nothing in this module reads the terminal; interactive choices are
//! resolved by the caller before the matching method is invoked.

use std::path::PathBuf;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::cli::commands::MoveDirection;
use crate::cli::error::{CliError, CliResult};
use crate::codec;
use crate::config::Settings;
use crate::domain::BranchTree;
use crate::render::{self, RenderOptions};

/// Title given to the root of a fresh tree.
pub const DEFAULT_ROOT_TITLE: &str = "Notes";

/// File extension for saved trees, owned by this layer.
pub const SAVE_EXT: &str = "tree";

pub struct Session {
    pub tree: BranchTree,
    pub current: Index,
    buffer: Option<Index>,
    pub file: Option<String>,
    pub settings: Settings,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let tree = BranchTree::new(DEFAULT_ROOT_TITLE);
        let current = tree.root();
        Self {
            tree,
            current,
            buffer: None,
            file: None,
            settings,
        }
    }

    pub fn buffer(&self) -> Option<Index> {
        self.buffer
    }

    /// Create a branch below the cursor and descend into it.
    pub fn create(&mut self, title: &str) -> CliResult<()> {
        self.current = self.tree.create_child(self.current, title)?;
        Ok(())
    }

    /// Detach the current subtree into the paste buffer; the cursor moves
    /// to the former parent.
    #[instrument(level = "debug", skip(self))]
    pub fn cut(&mut self) -> CliResult<()> {
        let former_parent = self.tree.detach(self.current)?;
        self.buffer = Some(self.current);
        self.current = former_parent;
        Ok(())
    }

    /// Attach the buffered subtree below the cursor and descend into it.
    /// The buffer is kept, so pasting again moves the subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn paste(&mut self) -> CliResult<()> {
        let buffered = self
            .buffer
            .ok_or_else(|| CliError::Usage("nothing to paste; cut a branch first".into()))?;
        self.current = self.tree.reattach(buffered, self.current)?;
        Ok(())
    }

    /// Detach the current subtree for good; the cursor moves to the
    /// former parent.
    pub fn remove(&mut self) -> CliResult<()> {
        let former_parent = self.tree.detach(self.current)?;
        if self.buffer == Some(self.current) {
            self.buffer = None;
        }
        self.current = former_parent;
        Ok(())
    }

    /// Replace everything with a fresh tree. Handles never cross arenas,
    /// so the buffer is dropped with the old tree.
    pub fn reset(&mut self) {
        self.tree = BranchTree::new(DEFAULT_ROOT_TITLE);
        self.current = self.tree.root();
        self.buffer = None;
    }

    /// Cursor to the parent branch; no-op at the top.
    pub fn go_out(&mut self) -> CliResult<()> {
        if let Some(parent) = self.tree.node(self.current)?.parent {
            self.current = parent;
        }
        Ok(())
    }

    /// Cursor to the root.
    pub fn go_top(&mut self) {
        self.current = self.tree.root();
    }

    /// Cursor to the child at `position` (0-based).
    pub fn go_child(&mut self, position: usize) -> CliResult<()> {
        let children = &self.tree.node(self.current)?.children;
        let child = *children.get(position).ok_or_else(|| {
            CliError::Usage(format!("no branch at position {}", position + 1))
        })?;
        self.current = child;
        Ok(())
    }

    /// Titles of the cursor's children, in display order.
    pub fn child_titles(&self) -> Vec<String> {
        self.tree
            .node(self.current)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.tree.get(child))
                    .map(|child| child.data.title.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn describe(&mut self, text: &str) -> CliResult<()> {
        self.tree.node_mut(self.current)?.data.set_description(text);
        Ok(())
    }

    pub fn set_date(&mut self, date: &str) -> CliResult<()> {
        self.tree.node_mut(self.current)?.data.set_date(date);
        Ok(())
    }

    /// Set the priority of the current branch only.
    pub fn set_priority(&mut self, level: i64) -> CliResult<()> {
        self.tree.node_mut(self.current)?.data.set_priority(level);
        Ok(())
    }

    /// Set the priority of the current branch and its whole subtree.
    pub fn set_priority_recursive(&mut self, level: i64) -> CliResult<()> {
        self.tree
            .apply_recursive(self.current, |branch| branch.set_priority(level))?;
        Ok(())
    }

    /// Add tags across the current subtree.
    pub fn tag_add(&mut self, tags: &[String]) -> CliResult<()> {
        for tag in tags {
            self.tree
                .apply_recursive(self.current, |branch| branch.set_tag(tag.clone()))?;
        }
        Ok(())
    }

    /// Remove tags across the current subtree.
    pub fn tag_remove(&mut self, tags: &[String]) -> CliResult<()> {
        for tag in tags {
            self.tree
                .apply_recursive(self.current, |branch| branch.unset_tag(tag))?;
        }
        Ok(())
    }

    /// Reorder or re-parent the current branch.
    pub fn move_branch(&mut self, direction: MoveDirection) -> CliResult<()> {
        match direction {
            MoveDirection::Up => {
                self.tree.move_lateral(self.current, -1)?;
            }
            MoveDirection::Down => {
                self.tree.move_lateral(self.current, 1)?;
            }
            MoveDirection::In => self.tree.move_vertical(self.current, -1)?,
            MoveDirection::Out => self.tree.move_vertical(self.current, 1)?,
        }
        Ok(())
    }

    /// Render the outline: the whole tree, or the cursor's subtree.
    /// Persistent print options combine with per-command flags.
    pub fn render(&self, overview: bool, extra_flags: &[String]) -> String {
        let flags = self
            .settings
            .print_options
            .iter()
            .chain(extra_flags.iter())
            .map(String::as_str);
        let options = RenderOptions::from_flags(flags);
        let start = if overview {
            self.tree.root()
        } else {
            self.current
        };
        render::render_subtree(&self.tree, start, options)
    }

    /// Box-drawing view of the whole tree.
    pub fn render_termtree(&self) -> String {
        render::to_termtree(&self.tree, self.tree.root()).to_string()
    }

    /// Remember `name` as the active save file (extension added when
    /// missing).
    pub fn set_file(&mut self, name: &str) {
        self.file = Some(ensure_ext(name.trim()));
    }

    /// Save the tree to the named or active file; returns the name used.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self, name: Option<&str>) -> CliResult<String> {
        let name = self.resolve_name(name)?;
        let path = self.save_path(&name);
        codec::save(&self.tree, &path)?;
        debug!(path = %path.display(), "saved tree");
        Ok(name)
    }

    /// Load a tree from the named or active file; returns the name used.
    /// On any failure the current tree is untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self, name: Option<&str>) -> CliResult<String> {
        let name = self.resolve_name(name)?;
        let path = self.save_path(&name);
        let tree = codec::load(&path)?;
        self.tree = tree;
        self.current = self.tree.root();
        self.buffer = None;
        debug!(path = %path.display(), "loaded tree");
        Ok(name)
    }

    pub fn save_dir(&self) -> PathBuf {
        self.settings.save_dir()
    }

    fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir().join(name)
    }

    fn resolve_name(&self, arg: Option<&str>) -> CliResult<String> {
        match arg.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(ensure_ext(name)),
            _ => self.file.clone().ok_or_else(|| {
                CliError::Usage("no file set; use `file <name>` or give a name".into())
            }),
        }
    }
}

fn ensure_ext(name: &str) -> String {
    if name.ends_with(&format!(".{}", SAVE_EXT)) {
        name.to_string()
    } else {
        format!("{}.{}", name, SAVE_EXT)
    }
}
