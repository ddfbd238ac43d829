//! Line parsing for the interactive loop.
//!
//! The first whitespace-delimited word selects the command; aliases from
//! the config expand before parsing. Everything here is pure string work
//! so it stays testable without a terminal.

use std::collections::BTreeMap;

use crate::cli::error::{CliError, CliResult};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a branch below the current one and descend into it
    New(String),
    /// Detach the current branch into the paste buffer
    Cut,
    /// Attach the buffered branch below the current one
    Paste,
    /// Detach the current branch and all lower branches
    Clear,
    /// Start over with an empty tree
    Reset,
    /// Move the cursor to the parent branch
    Out,
    /// Move the cursor to a child branch (by 1-based position, or pick)
    In(Option<usize>),
    /// Move the cursor to the top of the tree
    Top,
    /// Set the description of the current branch
    Description(String),
    /// Set the date of the current branch
    Date(String),
    /// Set priority: a level for the current branch, or pick one to apply
    /// to the whole subtree
    Priority(Option<i64>),
    /// Add or remove tags across the current subtree
    Tag { remove: bool, tags: Vec<String> },
    /// Reorder or re-parent the current branch
    Move(MoveDirection),
    /// Display the tree or session facts
    Print(PrintTarget),
    /// Set the active save file (no name: pick interactively)
    File(Option<String>),
    /// Save the tree
    Save(Option<String>),
    /// Load a tree
    Load(Option<String>),
    /// Change settings
    Config(ConfigAction),
    /// Show command help
    Help(Option<String>),
    /// Save settings and leave
    Quit,
    /// Blank line
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    /// Whole tree with extra render flags
    Overview(Vec<String>),
    /// Current branch downward with extra render flags
    Here(Vec<String>),
    /// Active save file name
    File,
    /// Save files in the data directory
    Dir,
    /// Effective settings
    Config,
    /// Box-drawing view of titles
    Tree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Extend the persistent render flags
    PrintOptions(Vec<String>),
    /// Map an alias word to a command word
    Alias { alias: String, command: String },
    /// Reset named settings keys to their defaults
    Clear(Vec<String>),
}

/// Replace an aliased first word with its target command word.
pub fn expand_alias(line: &str, aliases: &BTreeMap<String, String>) -> String {
    let mut parts = line.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    if let Some(target) = aliases.get(head) {
        match parts.next() {
            Some(rest) => format!("{} {}", target, rest),
            None => target.clone(),
        }
    } else {
        line.to_string()
    }
}

/// Parse one input line into a [`Command`].
pub fn parse(line: &str) -> CliResult<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let words = || -> Vec<String> { rest.split_whitespace().map(str::to_string).collect() };

    let command = match head {
        "new" => Command::New(rest.to_string()),
        "cut" => Command::Cut,
        "paste" => Command::Paste,
        "clear" => Command::Clear,
        "reset" => Command::Reset,
        "out" => Command::Out,
        "in" => match rest {
            "" => Command::In(None),
            n => Command::In(Some(parse_position(n)?)),
        },
        "top" => Command::Top,
        "description" => Command::Description(rest.to_string()),
        "date" => Command::Date(rest.to_string()),
        "priority" => match rest {
            "" => Command::Priority(None),
            n => Command::Priority(Some(n.parse().map_err(|_| {
                CliError::Usage(format!("priority takes a number, got '{}'", n))
            })?)),
        },
        "tag" => {
            let mut tags = words();
            if tags.is_empty() {
                return Err(CliError::Usage("tag needs at least one tag word".into()));
            }
            let remove = tags.first().map(String::as_str) == Some("remove");
            if remove {
                tags.remove(0);
                if tags.is_empty() {
                    return Err(CliError::Usage("tag remove needs tag words".into()));
                }
            }
            Command::Tag { remove, tags }
        }
        "move" => match rest {
            "up" => Command::Move(MoveDirection::Up),
            "down" => Command::Move(MoveDirection::Down),
            "in" => Command::Move(MoveDirection::In),
            "out" => Command::Move(MoveDirection::Out),
            other => {
                return Err(CliError::Usage(format!(
                    "move takes up, down, in, or out, got '{}'",
                    other
                )))
            }
        },
        "print" => {
            let mut flags = words();
            match flags.first().map(String::as_str) {
                Some("here") => {
                    flags.remove(0);
                    Command::Print(PrintTarget::Here(flags))
                }
                Some("file") => Command::Print(PrintTarget::File),
                Some("dir") => Command::Print(PrintTarget::Dir),
                Some("config") => Command::Print(PrintTarget::Config),
                Some("tree") => Command::Print(PrintTarget::Tree),
                _ => Command::Print(PrintTarget::Overview(flags)),
            }
        }
        "file" => Command::File(optional(rest)),
        "save" => Command::Save(optional(rest)),
        "load" => Command::Load(optional(rest)),
        "config" => {
            let mut args = words();
            match args.first().map(String::as_str) {
                Some("print_options") => {
                    args.remove(0);
                    if args.is_empty() {
                        return Err(CliError::Usage(
                            "config print_options needs flag words".into(),
                        ));
                    }
                    Command::Config(ConfigAction::PrintOptions(args))
                }
                Some("aliases") => {
                    if args.len() != 3 {
                        return Err(CliError::Usage(
                            "config aliases takes an alias and a command".into(),
                        ));
                    }
                    Command::Config(ConfigAction::Alias {
                        alias: args[1].clone(),
                        command: args[2].clone(),
                    })
                }
                Some("clear") => {
                    args.remove(0);
                    if args.is_empty() {
                        return Err(CliError::Usage(
                            "config clear needs the keys to reset".into(),
                        ));
                    }
                    Command::Config(ConfigAction::Clear(args))
                }
                _ => {
                    return Err(CliError::Usage(
                        "config takes print_options, aliases, or clear".into(),
                    ))
                }
            }
        }
        "help" | "?" => Command::Help(optional(rest)),
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(CliError::Usage(format!(
                "unknown command '{}'; try help",
                other
            )))
        }
    };
    Ok(command)
}

fn optional(rest: &str) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn parse_position(word: &str) -> CliResult<usize> {
    let n: usize = word
        .parse()
        .map_err(|_| CliError::Usage(format!("in takes a branch number, got '{}'", word)))?;
    if n == 0 {
        return Err(CliError::Usage("branch numbers start at 1".into()));
    }
    Ok(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_title_with_spaces_when_parsing_new_then_whole_rest_is_title() {
        assert_eq!(
            parse("new plan the week").unwrap(),
            Command::New("plan the week".to_string())
        );
    }

    #[test]
    fn given_alias_when_expanding_then_first_word_replaced() {
        let mut aliases = BTreeMap::new();
        aliases.insert("n".to_string(), "new".to_string());
        assert_eq!(expand_alias("n groceries", &aliases), "new groceries");
        assert_eq!(expand_alias("new groceries", &aliases), "new groceries");
    }

    #[test]
    fn given_tag_remove_when_parsing_then_remove_flag_set() {
        assert_eq!(
            parse("tag remove urgent stale").unwrap(),
            Command::Tag {
                remove: true,
                tags: vec!["urgent".to_string(), "stale".to_string()],
            }
        );
    }

    #[test]
    fn given_print_here_with_flags_when_parsing_then_flags_kept() {
        assert_eq!(
            parse("print here tags date").unwrap(),
            Command::Print(PrintTarget::Here(vec![
                "tags".to_string(),
                "date".to_string()
            ]))
        );
    }

    #[test]
    fn given_unknown_command_when_parsing_then_usage_error() {
        assert!(matches!(parse("frobnicate"), Err(CliError::Usage(_))));
    }

    #[test]
    fn given_one_based_position_when_parsing_in_then_zero_based() {
        assert_eq!(parse("in 2").unwrap(), Command::In(Some(1)));
        assert!(parse("in 0").is_err());
    }
}
