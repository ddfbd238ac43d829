//! The interactive command loop.
//!
//! Thin shell around [`Session`]: reads lines, expands aliases, parses
//! them into commands, and prints results. Errors are reported and the
//! loop continues; only end-of-input or `quit` leaves it.

use std::io::{self, BufRead};

use crate::cli::commands::{self, Command, ConfigAction, PrintTarget};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::picker;
use crate::cli::session::{Session, SAVE_EXT};

const INTRO: &str = r#"
************************************************************************
*                                                                      *
*                              TREE NOTE                               *
*                                                                      *
************************************************************************
"#;

const PROMPT: &str = "~:";

/// Levels offered by the interactive priority pick, applied to the whole
/// subtree under the cursor.
const PRIORITY_CHOICES: [(&str, i64); 5] = [
    ("Default", 0),
    ("Low", 1),
    ("Medium", 3),
    ("High", 5),
    ("Critical", 6),
];

pub fn run(session: &mut Session) -> CliResult<()> {
    output::info(INTRO);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        output::prompt(PROMPT);
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = commands::expand_alias(&line, &session.settings.aliases);
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                output::error(&e);
                continue;
            }
        };
        if matches!(command, Command::Quit) {
            break;
        }
        if let Err(e) = dispatch(session, command) {
            output::error(&e);
        }
    }
    if let Err(e) = session.settings.store() {
        output::warning(&e);
    }
    Ok(())
}

fn dispatch(session: &mut Session, command: Command) -> CliResult<()> {
    match command {
        Command::Empty | Command::Quit => {}
        Command::New(title) => {
            session.create(&title)?;
            print_tree(session);
        }
        Command::Cut => {
            session.cut()?;
            print_tree(session);
        }
        Command::Paste => {
            session.paste()?;
            print_tree(session);
        }
        Command::Clear => {
            session.remove()?;
            print_tree(session);
        }
        Command::Reset => {
            session.reset();
            print_tree(session);
        }
        Command::Out => {
            session.go_out()?;
            print_tree(session);
        }
        Command::In(position) => {
            let position = match position {
                Some(position) => Some(position),
                None => picker::select_numbered(&session.child_titles()),
            };
            if let Some(position) = position {
                session.go_child(position)?;
                print_tree(session);
            }
        }
        Command::Top => {
            session.go_top();
            print_tree(session);
        }
        Command::Description(text) => {
            session.describe(&text)?;
            print_tree(session);
        }
        Command::Date(text) => {
            session.set_date(&text)?;
        }
        Command::Priority(level) => {
            match level {
                Some(level) => session.set_priority(level)?,
                None => {
                    let labels: Vec<String> = PRIORITY_CHOICES
                        .iter()
                        .map(|(label, level)| format!("{} ({})", label, level))
                        .collect();
                    if let Some(choice) = picker::select_numbered(&labels) {
                        session.set_priority_recursive(PRIORITY_CHOICES[choice].1)?;
                    }
                }
            }
            print_tree(session);
        }
        Command::Tag { remove, tags } => {
            if remove {
                session.tag_remove(&tags)?;
            } else {
                session.tag_add(&tags)?;
            }
            output::info(&session.render(false, &["tags".to_string()]));
        }
        Command::Move(direction) => {
            session.move_branch(direction)?;
            print_tree(session);
        }
        Command::Print(target) => match target {
            PrintTarget::Overview(flags) => output::info(&session.render(true, &flags)),
            PrintTarget::Here(flags) => output::info(&session.render(false, &flags)),
            PrintTarget::File => {
                output::info(session.file.as_deref().unwrap_or("(no file set)"))
            }
            PrintTarget::Dir => {
                for name in picker::list_save_files(&session.save_dir(), SAVE_EXT) {
                    output::info(&name);
                }
            }
            PrintTarget::Config => output::info(&session.settings.to_toml()?),
            PrintTarget::Tree => output::info(&session.render_termtree()),
        },
        Command::File(name) => {
            let name = match name {
                Some(name) => Some(name),
                None => picker::select_save_file(&session.save_dir(), SAVE_EXT),
            };
            match name {
                Some(name) => {
                    session.set_file(&name);
                    output::action(
                        "file",
                        &format!("name set to {}", session.file.as_deref().unwrap_or("")),
                    );
                }
                None => output::info("no save files found"),
            }
        }
        Command::Save(name) => {
            let name = session.save(name.as_deref())?;
            output::action("saved", &name);
        }
        Command::Load(name) => {
            let name = session.load(name.as_deref())?;
            output::action("loaded", &name);
            output::info(&session.render(true, &[]));
        }
        Command::Config(action) => apply_config(session, action),
        Command::Help(topic) => print_help(topic.as_deref()),
    }
    Ok(())
}

fn print_tree(session: &Session) {
    output::info(&session.render(false, &[]));
}

fn apply_config(session: &mut Session, action: ConfigAction) {
    match action {
        ConfigAction::PrintOptions(flags) => {
            session.settings.print_options.extend(flags);
        }
        ConfigAction::Alias { alias, command } => {
            session.settings.aliases.insert(alias, command);
        }
        ConfigAction::Clear(keys) => {
            for key in keys {
                match key.as_str() {
                    "print_options" => session.settings.print_options.clear(),
                    "aliases" => session.settings.aliases.clear(),
                    "data_dir" => session.settings.data_dir = None,
                    other => output::warning(&format!("unknown config key '{}'", other)),
                }
            }
        }
    }
}

fn print_help(topic: Option<&str>) {
    match topic {
        Some("new") => output::info(
            "Create a new branch nested below the current branch.\nArgs: name of the new branch.",
        ),
        Some("cut") => output::info(
            "Detach the current branch into the paste buffer and move to its parent.",
        ),
        Some("paste") => output::info(
            "Attach the cut branch below the current branch. Pasting again moves it.",
        ),
        Some("clear") => {
            output::info("Remove the current branch and all lower branches from the tree.")
        }
        Some("reset") => output::info("Removes all branches from the current tree."),
        Some("out") => output::info("Move one layer out of the tree, to the previous branch."),
        Some("in") => output::info(
            "Move one layer into the tree.\nIf multiple branches are available, a list will be presented to choose from.",
        ),
        Some("top") => output::info("Go to the top of the tree."),
        Some("description") => output::info("Enter a description for the current branch."),
        Some("date") => output::info("Set a date on the current branch."),
        Some("priority") => output::info(
            "Sets the priority of the branch, giving it an integer value and a text color.\nArgs:\n(int) 0-6\nNone - a list will be presented with options to choose from, applied to the whole subtree.",
        ),
        Some("tag") => output::info(
            "Add tags to the current branch and all lower branches.\n'tag remove <tags>' removes them instead.",
        ),
        Some("move") => output::info(
            "Moves a branch.\nup - move branch upwards among its siblings.\ndown - move branch downwards.\nin - wrap the branch one layer deeper.\nout - promote the branch to its grandparent.",
        ),
        Some("print") => output::info(
            "Displays the entire tree, according to additional arguments or options set with 'config print_options'.\nArguments: 'here' - the tree from the current branch down.\nfile - the current filename.\ndir - save files in the data directory.\nconfig - the effective settings.\ntree - box-drawing view.",
        ),
        Some("file") => output::info(
            "Sets the current file to the name given as an argument. With no argument, pick from the save files in the data directory.",
        ),
        Some("save") => output::info(
            "Saves the current tree to the file given as an argument or, with no argument, to the current file shown by 'print file'.",
        ),
        Some("load") => output::info(
            "Loads a tree from the file given as an argument or, with no argument, from the current file shown by 'print file'.",
        ),
        Some("config") => output::info(
            "Set the configurations.\nOPTIONS:\n-> print_options : [highlight,ellipsis,priority,tags,date]\n-> aliases : 'alias name' 'operation'\n-> clear : reset the named keys",
        ),
        Some("quit") => output::info("Saves settings and quits."),
        _ => output::info(
            "Commands: new cut paste clear reset out in top description date priority tag move print file save load config help quit\nUse 'help <command>' for details.",
        ),
    }
}
