//! Command implementations
//!
//! Commands come in two layers, following the usual split:
//!
//! - `plumbing`: low-level object manipulation (hash-object, cat-file,
//!   write-tree, read-tree)
//! - `porcelain`: user-facing workflows (init, commit, checkout, merge,
//!   fetch, push, ...)
//!
//! Every command is an `impl Repository` block, so the CLI layer only has to
//! construct a repository and call a method.

pub mod plumbing;
pub mod porcelain;
