//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: content-addressed object store for blobs, trees and commits
//! - `refs`: reference management (HEAD, branches, tags, MERGE_HEAD)
//! - `repository`: high-level composition over one repository root
//! - `workspace`: working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
