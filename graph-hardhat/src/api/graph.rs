//! A simple API wrapper around the `graph` binary from graph-cli.
//!
//! Every command runs in an explicit working directory. The binary defaults
//! to `graph` and can be overridden with the `GRAPH_CLI` environment variable.

use crate::error::Error;
use anyhow::{ensure, Result};
use hardhat_graph::config::Product;
use std::{
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

/// A graph-cli client.
pub struct Client {
    program: OsString,
    prefix: Vec<OsString>,
}

impl Client {
    /// Creates a client running the specified `graph` binary.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
        }
    }

    /// Creates a client for the binary named by `GRAPH_CLI`, or `graph`.
    pub fn from_env() -> Self {
        Self::new(env::var_os("GRAPH_CLI").unwrap_or_else(|| "graph".into()))
    }

    /// Creates a client running a shell script in place of graph-cli.
    #[cfg(test)]
    pub fn script(path: &Path) -> Self {
        Self {
            program: "sh".into(),
            prefix: vec![path.into()],
        }
    }

    /// Generates AssemblyScript types for the subgraph in `dir`.
    pub fn codegen(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["codegen"])
    }

    /// Builds the subgraph in `dir` for the specified network.
    pub fn build(&self, dir: &Path, network: &str) -> Result<()> {
        self.run(dir, &["build", "--network", network])
    }

    /// Scaffolds a new subgraph from a contract.
    pub fn init(&self, dir: &Path, scaffold: &Scaffold) -> Result<()> {
        self.run(dir, scaffold.args())
    }

    /// Adds a data source to the subgraph in `dir`.
    pub fn add(&self, dir: &Path, add: &Add) -> Result<()> {
        self.run(dir, add.args())
    }

    fn run<I, S>(&self, dir: &Path, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut graph = Command::new(&self.program);
        graph.current_dir(dir).args(&self.prefix).args(args);
        log::debug!("running {:?} in {}", graph, dir.display());

        let output = graph.output()?;
        log::debug!("{}", String::from_utf8_lossy(&output.stdout));
        ensure!(
            output.status.success(),
            Error::Tool {
                command: format!("{:?}", graph),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
        );

        Ok(())
    }
}

/// Arguments for scaffolding a subgraph with `graph init`.
pub struct Scaffold<'a> {
    pub product: Product,
    pub node: &'a str,
    pub subgraph_name: &'a str,
    pub directory: &'a Path,
    pub network: &'a str,
    pub address: &'a str,
    pub contract_name: &'a str,
    /// Path to the ABI, or to a compiler artifact containing it.
    pub abi: &'a Path,
    pub index_events: bool,
    pub allow_simple_name: bool,
}

impl Scaffold<'_> {
    fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "init".into(),
            "--protocol".into(),
            "ethereum".into(),
            "--product".into(),
            self.product.as_str().into(),
            "--node".into(),
            self.node.into(),
            "--from-contract".into(),
            self.address.into(),
            "--abi".into(),
            self.abi.into(),
            "--network".into(),
            self.network.into(),
            "--contract-name".into(),
            self.contract_name.into(),
        ];
        if self.index_events {
            args.push("--index-events".into());
        }
        if self.allow_simple_name {
            args.push("--allow-simple-name".into());
        }
        args.push(self.subgraph_name.into());
        args.push(self.directory.into());

        args
    }
}

/// Arguments for adding a data source with `graph add`.
pub struct Add<'a> {
    pub address: &'a str,
    pub contract_name: &'a str,
    /// The manifest to add the data source to.
    pub manifest: PathBuf,
    pub merge_entities: bool,
    pub abi: Option<PathBuf>,
}

impl Add<'_> {
    fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "add".into(),
            self.address.into(),
            "--contract-name".into(),
            self.contract_name.into(),
            self.manifest.clone().into(),
        ];
        if self.merge_entities {
            args.push("--merge-entities".into());
        }
        if let Some(abi) = &self.abi {
            args.push("--abi".into());
            args.push(abi.clone().into());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn scaffold_args() {
        let scaffold = Scaffold {
            product: Product::HostedService,
            node: "https://api.thegraph.com/deploy/",
            subgraph_name: "gnosis/token",
            directory: Path::new("/project/subgraph"),
            network: "mainnet",
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            contract_name: "Token",
            abi: Path::new("/project/artifacts/contracts/Token.sol/Token.json"),
            index_events: true,
            allow_simple_name: false,
        };

        assert_eq!(
            strings(scaffold.args()),
            [
                "init",
                "--protocol",
                "ethereum",
                "--product",
                "hosted-service",
                "--node",
                "https://api.thegraph.com/deploy/",
                "--from-contract",
                "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                "--abi",
                "/project/artifacts/contracts/Token.sol/Token.json",
                "--network",
                "mainnet",
                "--contract-name",
                "Token",
                "--index-events",
                "gnosis/token",
                "/project/subgraph",
            ],
        );
    }

    #[test]
    fn add_args() {
        let add = Add {
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            contract_name: "Vault",
            manifest: PathBuf::from("subgraph.yaml"),
            merge_entities: true,
            abi: Some(PathBuf::from("/project/artifacts/contracts/Vault.sol/Vault.json")),
        };

        assert_eq!(
            strings(add.args()),
            [
                "add",
                "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                "--contract-name",
                "Vault",
                "subgraph.yaml",
                "--merge-entities",
                "--abi",
                "/project/artifacts/contracts/Vault.sol/Vault.json",
            ],
        );

        let add = Add {
            merge_entities: false,
            abi: None,
            ..add
        };
        assert_eq!(strings(add.args()).len(), 5);
    }

    #[test]
    #[ignore]
    fn codegen_sample() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../test");
        Client::from_env().codegen(&dir).unwrap();
    }
}
