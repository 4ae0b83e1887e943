//! Wrappers around the external tools a subgraph workflow drives.

pub mod git;
pub mod graph;
