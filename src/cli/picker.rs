//! Save-file listing and interactive selection.

use std::io::{self, BufRead, Cursor};
use std::path::Path;

use skim::prelude::*;
use walkdir::WalkDir;

use crate::cli::output;

/// Names of save files directly under `dir` with the given extension.
pub fn list_save_files(dir: &Path, ext: &str) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.path().is_dir())
        .filter(|e| e.path().extension().map(|x| x == ext).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    files
}

/// Pick a save file under `dir`: none found yields `None`, a single file
/// is chosen outright, more open a fuzzy finder.
pub fn select_save_file(dir: &Path, ext: &str) -> Option<String> {
    let mut files = list_save_files(dir, ext);
    match files.len() {
        0 => None,
        1 => files.pop(),
        _ => run_skim(&files),
    }
}

fn run_skim(items: &[String]) -> Option<String> {
    let options = SkimOptionsBuilder::default()
        .height(Some("50%"))
        .multi(false)
        .build()
        .ok()?;
    let item_reader = SkimItemReader::default();
    let source = item_reader.of_bufread(Cursor::new(items.join("\n")));

    let selected_items = Skim::run_with(&options, Some(source))
        .map(|out| out.selected_items)
        .unwrap_or_default();

    selected_items.first().map(|item| item.output().to_string())
}

/// Numbered pick over `items`: returns the 0-based choice. An empty list
/// yields `None`; a single item is chosen without prompting.
pub fn select_numbered(items: &[String]) -> Option<usize> {
    match items.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }
    for (position, item) in items.iter().enumerate() {
        output::info(&format!("{} {}", position + 1, item));
    }
    output::prompt("select:");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    let choice: usize = line.trim().parse().ok()?;
    if (1..=items.len()).contains(&choice) {
        Some(choice - 1)
    } else {
        None
    }
}
