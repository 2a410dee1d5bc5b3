pub mod branch;
pub mod diff;
pub mod graph;
pub mod merge;
pub mod objects;
pub mod remote;
