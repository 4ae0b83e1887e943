//! Subgraph initialization subcommand implementation.

use crate::{
    api::{git, graph},
    cmd::Context,
    error::Error,
    spinner::{with_spinner, Spinner},
};
use anyhow::{Context as _, Result};
use hardhat_graph::{
    artifacts::{Artifacts, ContractName},
    config::Config,
    manifest::Manifest,
    networks::Networks,
};
use serde::Serialize;
use std::{
    fs::{self, OpenOptions},
    io::Write as _,
    path::Path,
};
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

/// Run the `init` subcommand.
pub fn run(context: &Context, options: Options) -> Result<()> {
    let config = &context.config;
    if config.subgraph_exists() {
        return Err(Error::SubgraphExists.into());
    }

    with_spinner(
        "Create subgraph scaffold",
        "Failed to create subgraph scaffold",
        "Warnings while creating subgraph scaffold",
        |_| scaffold(context, &options),
    )?;

    with_spinner(
        "Initialize networks config",
        "Failed to initialize networks config",
        "Warnings while initializing networks config",
        |_| {
            let manifest = Manifest::read(&config.manifest_path())?;
            Networks::from_manifest(&manifest, &context.network).write(&config.networks_path())
        },
    )?;

    if !git::is_inside_work_tree(&config.root)? {
        with_spinner(
            "Create git repository",
            "Failed to create git repository",
            "Warnings while creating git repository",
            |_| git::init(&config.root),
        )?;
    }

    write_matchstick_config(config)?;

    with_spinner(
        "Add subgraph files to .gitignore",
        "Failed to add subgraph files to .gitignore",
        "Warnings while adding subgraph files to .gitignore",
        |spinner| update_gitignore(spinner, config),
    )?;

    with_spinner(
        "Generate ABI and schema types",
        "Failed to generate code from ABI and GraphQL schema",
        "Warnings while generating code from ABI and GraphQL schema",
        |_| context.graph.codegen(&config.subgraph_dir()),
    )
}

fn scaffold(context: &Context, options: &Options) -> Result<()> {
    let config = &context.config;
    let subgraph = &config.subgraph;
    subgraph.validate()?;

    let abi = Artifacts::new(config.artifacts_dir()).artifact_path(&options.contract_name)?;
    let node = subgraph.node_url();

    context.graph.init(
        &config.root,
        &graph::Scaffold {
            product: subgraph.product,
            node: node.as_str(),
            subgraph_name: &subgraph.name,
            directory: &config.subgraph_dir(),
            network: &context.network,
            address: &options.address,
            contract_name: ContractName::parse(&options.contract_name).contract_name,
            abi: &abi,
            index_events: subgraph.index_events,
            allow_simple_name: subgraph.allows_simple_name(),
        },
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Matchstick {
    tests_folder: String,
    manifest_path: String,
}

/// Writes `matchstick.yaml` to the project root so that unit tests find the
/// subgraph.
fn write_matchstick_config(config: &Config) -> Result<()> {
    let directory = slash_path(&config.paths.subgraph);
    let matchstick = Matchstick {
        tests_folder: format!("{}/tests", directory),
        manifest_path: format!("{}/subgraph.yaml", directory),
    };

    let path = config.root.join("matchstick.yaml");
    fs::write(&path, serde_yaml::to_string(&matchstick)?)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}

/// Appends subgraph build outputs to the project's `.gitignore`, creating it
/// if needed. Nothing is appended when the entries are already there.
fn update_gitignore(spinner: &mut Spinner, config: &Config) -> Result<()> {
    let path = config.root.join(".gitignore");
    let directory = slash_path(&config.paths.subgraph);
    let entries = format!(
        "# Matchstick\n{dir}/tests/.*/\n\n# Subgraph\n{dir}/generated/\n{dir}/build/\n",
        dir = directory,
    );

    spinner.step("Check if .gitignore already exists");
    let existing = if path.exists() {
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        spinner.step("Create .gitignore file");
        String::new()
    };
    if existing.contains(&format!("{}/generated/", directory)) {
        return Ok(());
    }

    spinner.step("Add subgraph files and folders to .gitignore file");
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    file.write_all(entries.as_bytes())?;

    Ok(())
}

/// Renders a relative path with `/` separators, as used in `.gitignore` and
/// matchstick configuration.
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
