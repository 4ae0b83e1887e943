//! Errors that halt a subgraph workflow.

use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No subgraph found! Please first initialize a new subgraph!")]
    MissingSubgraph,

    #[error(
        "Subgraph already exists! Please use the update subtask to update an existing subgraph!"
    )]
    SubgraphExists,

    #[error("Could not read {}", .0.display())]
    Unreadable(PathBuf),

    /// The contract's events no longer match the subgraph's event handlers.
    /// Code generation was skipped and the manifest needs to be fixed by hand.
    #[error("contract events have changed, subgraph was not regenerated")]
    EventsChanged,

    #[error("error running `{command}` ({status}): {stderr}")]
    Tool {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}
