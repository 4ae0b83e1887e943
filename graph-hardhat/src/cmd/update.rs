//! Subgraph update subcommand implementation.
//!
//! Syncs the subgraph's copy of a contract ABI and its network address with
//! the contract's current artifact. Code generation and the build only run if
//! the contract's events still match the subgraph's event handlers; otherwise
//! the update stops so the manifest can be fixed by hand first.

use crate::{
    cmd::Context,
    error::Error,
    spinner::{with_spinner, Spinner},
};
use anyhow::{Context as _, Result};
use hardhat_graph::{
    artifacts::Artifacts, events::EventDiff, manifest::Manifest, networks::Networks,
};
use std::fs;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Options {
    /// Name of the contract, optionally fully qualified.
    #[structopt(long)]
    pub contract_name: String,

    /// Address the contract is deployed at.
    #[structopt(long)]
    pub address: String,
}

/// Run the `update` subcommand.
pub fn run(context: &Context, options: Options) -> Result<()> {
    if !context.config.subgraph_exists() {
        return Err(Error::MissingSubgraph.into());
    }

    let diff = with_spinner(
        "Update subgraph",
        "Failed to update subgraph",
        "Warnings while updating subgraph",
        |spinner| update(spinner, context, &options),
    )?;

    match diff {
        Some(_) => Err(Error::EventsChanged.into()),
        None => Ok(()),
    }
}

/// Performs the update, returning the event diff if the events changed and
/// code generation was skipped.
fn update(spinner: &mut Spinner, context: &Context, options: &Options) -> Result<Option<EventDiff>> {
    let config = &context.config;

    spinner.step("Fetching new contract version");
    let artifact = Artifacts::new(config.artifacts_dir()).read_artifact(&options.contract_name)?;

    spinner.step("Fetching current contract version from subgraph");
    let manifest = Manifest::read(&config.manifest_path())?;
    let data_source = manifest
        .data_source_for_abi(&artifact.contract_name)
        .with_context(|| {
            format!(
                "no data source in the subgraph uses the '{}' ABI",
                artifact.contract_name,
            )
        })?;
    let abi_path = manifest.abi_path(data_source, &artifact.contract_name)?;
    match fs::read(&abi_path) {
        Ok(contents) if !contents.is_empty() => {}
        _ => return Err(Error::Unreadable(abi_path).into()),
    }

    spinner.step("Updating contract ABI in subgraph");
    manifest.replace_abi(data_source, &artifact.contract_name, &artifact.abi)?;

    spinner.step(&format!(
        "Updating contract's {} address in networks.json",
        context.network,
    ));
    let networks_path = config.networks_path();
    let mut networks = Networks::read_or_default(&networks_path)?;
    networks.upsert_address(&context.network, &data_source.name, &options.address);
    networks.write(&networks_path)?;

    spinner.step("Checking events for changes");
    let diff = EventDiff::new(
        data_source.event_signatures(),
        artifact.abi()?.event_signatures(),
    );
    if diff.changed() {
        log::debug!("events changed: {:?}", diff.change());
        spinner.warn(&diff.to_string());
        return Ok(Some(diff));
    }

    let dir = config.subgraph_dir();
    spinner.step("Generating code from ABI and GraphQL schema");
    context.graph.codegen(&dir)?;
    spinner.step(&format!("Building subgraph for {}", context.network));
    context.graph.build(&dir, &context.network)?;

    Ok(None)
}
