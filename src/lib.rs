//! ugit - a minimal distributed version-control engine
//!
//! The crate is split the same way the on-disk repository is:
//!
//! - `areas`: the places data lives (object database, refs, workspace)
//! - `artifacts`: the data structures and algorithms built on top of them
//! - `commands`: thin plumbing/porcelain entry points used by the CLI

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
