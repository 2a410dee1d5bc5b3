//! Plumbing commands (low-level object operations)
//!
//! Direct access to the object database and the snapshot/restore machinery.
//! Porcelain commands are built out of these.
//!
//! ## Commands
//!
//! - `hash-object`: compute an oid and optionally store the blob
//! - `cat-file`: print the payload of a stored object
//! - `write-tree`: snapshot the working directory into a tree object
//! - `read-tree`: replace the working directory with a stored tree

pub mod cat_file;
pub mod hash_object;
pub mod read_tree;
pub mod write_tree;
