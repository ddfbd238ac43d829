//! Codec-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while encoding or decoding a saved tree.
///
/// Decode failures are distinguishable from I/O failures; decoding builds
/// a fresh tree or fails, it never touches caller-visible state.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("not a treenote save file (bad magic)")]
    BadMagic,

    #[error("unsupported save format version {found}, expected {expected}")]
    UnsupportedVersion { found: u8, expected: u8 },

    #[error("corrupt or truncated save data: {0}")]
    Decode(String),

    #[error("failed to encode tree: {0}")]
    Encode(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CodecResult<T> = Result<T, CodecError>;
