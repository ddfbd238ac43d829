//! Outline and tree-view rendering

use treenote::domain::BranchTree;
use treenote::render::{render_subtree, to_termtree, RenderOptions};

fn plain() {
    colored::control::set_override(false);
}

fn sample_tree() -> BranchTree {
    let mut tree = BranchTree::new("Notes");
    let work = tree.create_child(tree.root(), "work").unwrap();
    let report = tree.create_child(work, "report").unwrap();
    tree.create_child(tree.root(), "home").unwrap();
    {
        let data = &mut tree.get_mut(report).unwrap().data;
        data.set_description("draft the outline");
        data.set_priority(6);
        data.set_tag("deadline");
        data.set_date("tomorrow");
    }
    tree
}

// ============================================================
// Outline View
// ============================================================

#[test]
fn given_tree_when_rendering_then_prefixes_scale_with_layer() {
    plain();
    let tree = sample_tree();
    let rendered = render_subtree(&tree, tree.root(), RenderOptions::default());
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], ">Notes");
    assert_eq!(lines[1], ">work");
    assert_eq!(lines[2], "--->report");
    // description follows its branch, indented one layer
    assert_eq!(lines[3], "    draft the outline");
    assert_eq!(lines[4], ">home");
}

#[test]
fn given_flags_when_rendering_then_suffixes_toggle() {
    plain();
    let tree = sample_tree();

    let bare = render_subtree(&tree, tree.root(), RenderOptions::default());
    assert!(!bare.contains("(priority:"));
    assert!(!bare.contains("(tags:"));

    let options = RenderOptions::from_flags(["priority", "tags", "date"]);
    let full = render_subtree(&tree, tree.root(), options);
    assert!(full.contains("--->report (priority: 6) (tags: deadline) (date: tomorrow)"));
}

#[test]
fn given_subtree_start_when_rendering_then_only_that_branch_down() {
    plain();
    let tree = sample_tree();
    let work = tree.get(tree.root()).unwrap().children[0];

    let rendered = render_subtree(&tree, work, RenderOptions::default());

    assert!(rendered.contains("work"));
    assert!(rendered.contains("report"));
    assert!(!rendered.contains("home"));
}

// ============================================================
// Tree View
// ============================================================

#[test]
fn given_tree_when_converting_to_termtree_then_titles_nested() {
    let tree = sample_tree();
    let view = to_termtree(&tree, tree.root()).to_string();

    assert!(view.starts_with("Notes"));
    assert!(view.contains("work"));
    assert!(view.contains("report"));
    assert!(view.contains("home"));
    // report is nested under work, so it is indented deeper
    let work_line = view.lines().find(|l| l.contains("work")).unwrap();
    let report_line = view.lines().find(|l| l.contains("report")).unwrap();
    assert!(
        report_line.find("report").unwrap() > work_line.find("work").unwrap()
    );
}
