//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use clap_complete::Shell;

/// Interactive tree outliner: hierarchical branches with tags, due dates, and priorities
#[derive(Parser, Debug)]
#[command(name = "tn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Save file to load at startup
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Increase logging verbosity (-d, -d -d, -d -d -d)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    /// Print author and version information
    #[arg(long)]
    pub info: bool,
}
