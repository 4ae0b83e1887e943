//! Subcommand that picks `init`, `update` or `add` for a contract.

use crate::cmd::{add, init, update, Context};
use anyhow::{bail, Result};
use hardhat_graph::{
    artifacts::{Artifacts, ContractName},
    config::Config,
    manifest::Manifest,
};
use std::{path::PathBuf, str::FromStr};
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct Options {
    /// Run this subtask instead of picking one: `init`, `update` or `add`.
    #[structopt(name = "SUBTASK")]
    subtask: Option<Subtask>,

    /// Name of the contract, optionally fully qualified.
    #[structopt(long)]
    contract_name: String,

    /// Address the contract is deployed at.
    #[structopt(long)]
    address: String,

    /// Merge entities with the same name when adding a data source.
    #[structopt(long)]
    merge_entities: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Subtask {
    Init,
    Update,
    Add,
}

impl FromStr for Subtask {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "init" => Ok(Subtask::Init),
            "update" => Ok(Subtask::Update),
            "add" => Ok(Subtask::Add),
            _ => bail!("unknown subtask '{}', expected init, update or add", s),
        }
    }
}

/// Run the `graph` subcommand.
pub fn run(context: &Context, options: Options) -> Result<()> {
    let subtask = match options.subtask {
        Some(subtask) => subtask,
        None => choose(&context.config, &options.contract_name)?,
    };
    log::debug!("running {:?} for '{}'", subtask, options.contract_name);

    match subtask {
        Subtask::Init => init::run(
            context,
            init::Options {
                contract_name: options.contract_name,
                address: options.address,
            },
        ),
        Subtask::Update => update::run(
            context,
            update::Options {
                contract_name: options.contract_name,
                address: options.address,
            },
        ),
        Subtask::Add => {
            let abi = Artifacts::new(context.config.artifacts_dir())
                .artifact_path(&options.contract_name)?;
            add::run(
                context,
                add::Options {
                    address: options.address,
                    subgraph_yaml: PathBuf::from("subgraph.yaml"),
                    contract_name: options.contract_name,
                    merge_entities: options.merge_entities,
                    abi: Some(abi),
                },
            )
        }
    }
}

/// Picks the subtask for a contract: a project without a subgraph gets one
/// initialized, a contract that already has a data source is updated, and any
/// other contract is added as a new data source.
fn choose(config: &Config, contract_name: &str) -> Result<Subtask> {
    if !config.subgraph_exists() {
        return Ok(Subtask::Init);
    }

    let manifest = Manifest::read(&config.manifest_path())?;
    let name = ContractName::parse(contract_name).contract_name;
    if manifest.data_source(name).is_some() {
        Ok(Subtask::Update)
    } else {
        Ok(Subtask::Add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::tests::project;

    #[test]
    fn chooses_subtask() {
        let (_dir, context) = project(false);
        assert_eq!(choose(&context.config, "Token").unwrap(), Subtask::Init);

        let (_dir, context) = project(true);
        assert_eq!(choose(&context.config, "Token").unwrap(), Subtask::Update);
        assert_eq!(
            choose(&context.config, "contracts/Token.sol:Token").unwrap(),
            Subtask::Update,
        );
        assert_eq!(choose(&context.config, "Vault").unwrap(), Subtask::Add);
    }

    #[test]
    fn parse_subtask() {
        assert_eq!("add".parse::<Subtask>().unwrap(), Subtask::Add);
        assert!("deploy".parse::<Subtask>().is_err());
    }
}
