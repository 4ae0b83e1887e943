//! Module for `graph-hardhat` subcommands.

use crate::api;
use anyhow::{Context as _, Result};
use hardhat_graph::config::Config;
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

pub mod add;
pub mod graph;
pub mod init;
pub mod update;

#[derive(StructOpt)]
#[structopt(
    name = "graph-hardhat",
    about = "Manage subgraphs for Hardhat projects 🦀"
)]
pub struct Options {
    /// Root directory of the Hardhat project.
    #[structopt(long, env = "HARDHAT_ROOT", default_value = ".")]
    root: PathBuf,

    /// Configuration file, relative to the project root. Defaults to
    /// `hardhat-graph.yaml` when it exists.
    #[structopt(long, env = "HARDHAT_GRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Network the contract is deployed on. Defaults to the configured
    /// default network.
    #[structopt(long, env = "HARDHAT_NETWORK")]
    network: Option<String>,

    /// Increase log verbosity. Can be repeated.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
pub enum Command {
    #[structopt(about = "Initialize, update or extend a subgraph, whichever applies.")]
    Graph(graph::Options),
    #[structopt(about = "Initialize a subgraph.")]
    Init(init::Options),
    #[structopt(about = "Update an existing subgraph from a contract artifact.")]
    Update(update::Options),
    #[structopt(about = "Add a data source to the subgraph.")]
    Add(add::Options),
}

/// State shared by all subcommands.
pub struct Context {
    pub config: Config,
    pub network: String,
    pub graph: api::graph::Client,
}

impl Context {
    fn new(options: &Options) -> Result<Self> {
        let root = options
            .root
            .canonicalize()
            .with_context(|| format!("invalid project root {}", options.root.display()))?;
        let config = Config::load(&root, options.config.as_deref())?;
        let network = options
            .network
            .clone()
            .unwrap_or_else(|| config.default_network.clone());
        log::debug!("using project {} on network {}", root.display(), network);

        Ok(Self {
            config,
            network,
            graph: api::graph::Client::from_env(),
        })
    }
}

pub fn run() -> Result<()> {
    let options = Options::from_args();

    env_logger::Builder::new()
        .filter_level(match options.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let context = Context::new(&options)?;
    match options.command {
        Command::Graph(options) => graph::run(&context, options),
        Command::Init(options) => init::run(&context, options),
        Command::Update(options) => update::run(&context, options),
        Command::Add(options) => add::run(&context, options),
    }
}
