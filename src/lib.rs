//! treenote: an interactive tree outliner.
//!
//! A hierarchy of labeled branches carrying descriptions, tags, due dates,
//! and priorities. The engine lives in [`domain`]; [`codec`] persists a
//! whole tree as one opaque blob; [`render`] formats subtrees for the
//! terminal; [`cli`] holds the interactive loop and its session state.

pub mod cli;
pub mod codec;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod render;
pub mod util;
