//! Filesystem adapter (spec §4.2, component B): a thin, typed layer over
//! the shell bridge. Each operation is one shell round-trip; non-zero
//! returncodes become typed failures instead of silent empty strings.

mod adapter;
mod error;
mod quote;
mod tree;

pub use adapter::{FsAdapter, GrepMatch};
pub use error::FsError;
pub use quote::shell_quote;
pub use tree::DirTree;
