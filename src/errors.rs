//! Error taxonomy for the core engine
//!
//! Every terminal failure mode of the object store, the reference store and
//! the sync protocol has a typed variant here. Commands propagate them
//! through `anyhow`, so callers can either print them or downcast when they
//! need to react to a specific condition (e.g. a rejected push).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UgitError {
    /// The object database has no file for this oid.
    #[error("object {0} not found")]
    NotFound(String),

    /// The stored object kind differs from the kind the caller asked for.
    #[error("object {oid} is a {actual}, expected {expected}")]
    TypeMismatch {
        oid: String,
        expected: String,
        actual: String,
    },

    /// The stored bytes are not a valid `<kind>\0<payload>` object.
    #[error("corrupt object {0}")]
    CorruptObject(String),

    /// A tree payload failed validation (bad line, bad entry name).
    #[error("corrupt tree {oid}: {reason}")]
    CorruptTree { oid: String, reason: String },

    /// A commit payload carries an unrecognized header key.
    #[error("corrupt commit {oid}: {reason}")]
    CorruptCommit { oid: String, reason: String },

    /// A user-supplied name resolved to neither a ref nor an oid.
    #[error("unknown reference {0}")]
    UnknownReference(String),

    /// A symbolic ref chain exceeded the dereference depth bound.
    #[error("reference chain starting at {0} is too deep or cyclic")]
    ReferenceCycle(String),

    /// Push safety: the remote ref is not an ancestor of the local value.
    #[error("push of {refname} rejected: remote is not an ancestor (not a fast-forward)")]
    NonFastForward { refname: String },

    /// An operation precondition does not hold (e.g. pushing an unset ref).
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),
}
