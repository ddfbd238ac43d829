//! Outline renderer: formats subtrees as colorized text.
//!
//! Consumes read accessors only; the engine stores raw text and this
//! module applies layer prefixes, indentation, and priority colors.

use colored::{Color, Colorize};
use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{BranchNode, BranchTree, Priority};

/// Display toggles for the outline view. All default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Magenta background behind the title
    pub highlight: bool,
    /// Truncate descriptions to ten characters
    pub ellipsis: bool,
    /// Append `(priority: n)`
    pub priority: bool,
    /// Append `(tags: ...)`
    pub tags: bool,
    /// Append `(date: ...)`
    pub date: bool,
}

impl RenderOptions {
    /// Build options from flag words (config `print_options` and `print`
    /// command arguments). Unknown words are ignored.
    pub fn from_flags<'a>(flags: impl IntoIterator<Item = &'a str>) -> Self {
        let mut options = Self::default();
        for flag in flags {
            match flag {
                "highlight" => options.highlight = true,
                "ellipsis" => options.ellipsis = true,
                "priority" => options.priority = true,
                "tags" => options.tags = true,
                "date" => options.date = true,
                _ => {}
            }
        }
        options
    }
}

/// Color for a priority level: neutral white up to urgent red.
fn priority_color(priority: Priority) -> Color {
    match priority.value() {
        1 => Color::Magenta,
        2 => Color::Blue,
        3 => Color::Cyan,
        4 => Color::Green,
        5 => Color::Yellow,
        6 => Color::Red,
        _ => Color::White,
    }
}

/// Dash prefix scaled by layer: `>` at the top, `--->` one layer down,
/// four more dashes per layer after that.
fn layer_prefix(layer: i32) -> String {
    let correction = if layer == 0 { 0 } else { 1 };
    let dashes = (layer * 4 - correction).max(0) as usize;
    format!("{}>", "-".repeat(dashes))
}

fn layer_indent(layer: i32) -> String {
    " ".repeat((layer * 4).max(0) as usize)
}

/// Format a single branch as one outline entry (title line plus optional
/// indented description).
pub fn render_branch(node: &BranchNode, options: RenderOptions) -> String {
    let mut line = layer_prefix(node.layer);

    let mut title = node
        .data
        .title
        .as_str()
        .color(priority_color(node.data.priority));
    if options.highlight {
        title = title.on_magenta();
    }
    line.push_str(&title.to_string());

    if options.priority {
        line.push_str(&format!(" (priority: {})", node.data.priority));
    }
    if options.tags {
        line.push_str(&format!(" (tags: {})", node.data.tags.iter().join(", ")));
    }
    if options.date {
        line.push_str(&format!(" (date: {})", node.data.date));
    }

    if !node.data.description.is_empty() {
        let indent = layer_indent(node.layer);
        if options.ellipsis {
            let truncated: String = node.data.description.chars().take(10).collect();
            line.push_str(&format!("\n{}{}...", indent, truncated.trim_end()));
        } else {
            line.push_str(&format!("\n{}{}", indent, node.data.description));
        }
    }
    line
}

/// Pre-order outline of `start` and everything below it.
pub fn render_subtree(tree: &BranchTree, start: Index, options: RenderOptions) -> String {
    tree.iter_from(start)
        .map(|(_, node)| render_branch(node, options))
        .join("\n")
}

/// Box-drawing view of titles, for the alternate tree display.
pub fn to_termtree(tree: &BranchTree, start: Index) -> Tree<String> {
    let title = tree
        .get(start)
        .map(|node| node.data.title.clone())
        .unwrap_or_default();
    let mut out = Tree::new(title);

    fn build(tree: &BranchTree, node_idx: Index, parent_tree: &mut Tree<String>) {
        if let Some(node) = tree.get(node_idx) {
            for &child_idx in &node.children {
                if let Some(child) = tree.get(child_idx) {
                    let mut child_tree = Tree::new(child.data.title.clone());
                    build(tree, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }
    }

    build(tree, start, &mut out);
    out
}
