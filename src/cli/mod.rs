//! CLI layer: argument parsing, the interactive loop, and session state

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod picker;
pub mod repl;
pub mod session;

pub use args::Cli;
pub use error::{CliError, CliResult};
pub use session::Session;
