//! Data source addition subcommand implementation.

use crate::{api::graph, cmd::Context, error::Error, spinner::with_spinner};
use anyhow::Result;
use hardhat_graph::{artifacts::ContractName, config::Config};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Options {
    /// Address the contract is deployed at.
    #[structopt(long)]
    pub address: String,

    /// The subgraph manifest to add the data source to.
    #[structopt(long, default_value = "subgraph.yaml")]
    pub subgraph_yaml: PathBuf,

    /// Name of the contract, optionally fully qualified.
    #[structopt(long, default_value = "Contract")]
    pub contract_name: String,

    /// Merge entities with the same name instead of prefixing them with the
    /// contract name.
    #[structopt(long)]
    pub merge_entities: bool,

    /// Path to a local ABI file or compiler artifact.
    #[structopt(long)]
    pub abi: Option<PathBuf>,
}

/// Run the `add` subcommand.
pub fn run(context: &Context, options: Options) -> Result<()> {
    let config = &context.config;
    let dir = config.subgraph_dir();
    let manifest = subgraph_relative(config, &options.subgraph_yaml);
    if !dir.is_dir() || !dir.join(&manifest).is_file() {
        return Err(Error::MissingSubgraph.into());
    }

    let add = graph::Add {
        address: &options.address,
        contract_name: ContractName::parse(&options.contract_name).contract_name,
        manifest,
        merge_entities: options.merge_entities,
        abi: options
            .abi
            .as_deref()
            .map(|abi| subgraph_relative(config, abi)),
    };

    with_spinner(
        "Add a new datasource",
        "Failed to add a new datasource",
        "Warnings while adding a new datasource",
        |spinner| {
            spinner.step("Initiating graph add command");
            context.graph.add(&dir, &add)
        },
    )
}

/// Makes a path usable from within the subgraph directory, where graph-cli
/// runs. Paths that point into the subgraph directory, either as typed
/// relative to the project root or absolute, are made relative to it. Other
/// paths are passed on as they are.
fn subgraph_relative(config: &Config, path: &Path) -> PathBuf {
    let dir = config.subgraph_dir();
    path.strip_prefix(&dir)
        .or_else(|_| path.strip_prefix(&config.paths.subgraph))
        .unwrap_or(path)
        .to_owned()
}
