//! The `networks.json` file of a subgraph.
//!
//! graph-cli reads contract addresses per network from this file when
//! building with `--network`, overriding the addresses in the manifest.

use crate::manifest::Manifest;
use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, path::Path};

/// Contract addresses keyed by network and data source name, in file order.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Networks {
    networks: IndexMap<String, IndexMap<String, Contract>>,
}

/// A data source's contract on a single network.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Contract {
    pub address: String,
    #[serde(rename = "startBlock", skip_serializing_if = "Option::is_none")]
    pub start_block: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contract {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_owned(),
            start_block: None,
            extra: Map::new(),
        }
    }
}

impl Networks {
    /// Reads a networks file, returning an empty configuration if it does not
    /// exist yet.
    pub fn read_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} does not exist, starting empty", path.display());
            return Ok(Self::default());
        }

        let contents =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let networks = serde_json::from_slice(&contents)
            .with_context(|| format!("invalid networks file {}", path.display()))?;

        Ok(networks)
    }

    /// Writes the networks file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;

        Ok(())
    }

    /// Builds the initial networks configuration from the addresses recorded
    /// in a manifest. Data sources without a network fall back to the one
    /// specified.
    pub fn from_manifest(manifest: &Manifest, network: &str) -> Self {
        let mut networks = Self::default();
        for data_source in manifest.data_sources() {
            let address = match &data_source.source.address {
                Some(address) => address,
                None => continue,
            };
            networks.upsert_address(
                data_source.network.as_deref().unwrap_or(network),
                &data_source.name,
                address,
            );
        }

        networks
    }

    /// Sets the address of a data source on a network.
    ///
    /// Other properties of an existing entry are kept. An unknown network is
    /// added holding just this data source.
    pub fn upsert_address(&mut self, network: &str, data_source: &str, address: &str) {
        self.networks
            .entry(network.to_owned())
            .or_default()
            .entry(data_source.to_owned())
            .and_modify(|contract| contract.address = address.to_owned())
            .or_insert_with(|| Contract::new(address));
    }

    pub fn get(&self, network: &str, data_source: &str) -> Option<&Contract> {
        self.networks.get(network)?.get(data_source)
    }
}
