//! CLI-level errors (wraps the lower layers)

use thiserror::Error;

use crate::codec::CodecError;
use crate::config::SettingsError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Codec(#[from] CodecError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Tree(_) => crate::exitcode::SOFTWARE,
            CliError::Codec(e) => match e {
                CodecError::Io { .. } => crate::exitcode::IOERR,
                _ => crate::exitcode::DATAERR,
            },
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Io(_) => crate::exitcode::IOERR,
        }
    }
}
