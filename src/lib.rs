//! Keep a subgraph in sync with the compiled contracts of a Hardhat project.
//!
//! The CLI in `graph-hardhat` drives the workflows; this crate holds the
//! pieces that read and write project files and the event reconciliation
//! that decides whether a subgraph can be regenerated safely.

pub mod abi;
pub mod artifacts;
pub mod config;
pub mod events;
pub mod manifest;
pub mod networks;
