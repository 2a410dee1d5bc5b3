//! Porcelain commands (user-facing operations)
//!
//! High-level workflows composed from the plumbing layer, the graph
//! algorithms and the merge engine.
//!
//! ## Commands
//!
//! - `init`: initialize a new repository
//! - `commit`: snapshot the working directory into a new commit
//! - `checkout`: switch branches or jump to a commit
//! - `branch`: create or list branches
//! - `tag`: create a tag
//! - `log`: show commit history
//! - `status`: show the current branch and working tree changes
//! - `diff`: show content changes against a commit
//! - `reset`: move HEAD to another commit
//! - `merge`: three-way merge another revision into the working tree
//! - `merge-base`: print the common ancestor of two revisions
//! - `fetch`/`push`: synchronize with a filesystem remote

pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod fetch;
pub mod init;
pub mod log;
pub mod merge;
pub mod push;
pub mod reset;
pub mod status;
pub mod tag;
