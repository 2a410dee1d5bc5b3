//! Object types and their wire encoding
//!
//! Everything the engine stores is an object identified by a SHA-1 digest.
//! There are three kinds:
//!
//! - **Blob**: raw file content
//! - **Tree**: a sorted directory listing of `<kind> <oid> <name>` lines
//! - **Commit**: a tree reference, parent oid(s) and a message
//!
//! On disk every object is `<kind>\x00<payload>`; the digest is computed over
//! exactly those bytes, so lookup by oid is lookup by content.

pub mod commit;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
