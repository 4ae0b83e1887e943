//! Partial Subgraph manifest implementation.
//!
//! Only the parts of `subgraph.yaml` needed to reconcile a data source with a
//! contract artifact are parsed: data source names and networks, their ABI
//! files and their event handlers. Everything else is ignored, so this stays
//! compatible with manifest properties it does not know about. The manifest
//! itself is never written back; graph-cli owns its format.

use anyhow::{Context as _, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

/// A parsed Subgraph manifest.
#[derive(Debug)]
pub struct Manifest {
    root: PathBuf,
    data_sources: Vec<DataSource>,
}

impl Manifest {
    /// Reads and parses a subgraph manifest file.
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(
            File::open(path)
                .with_context(|| format!("failed to open manifest {}", path.display()))?,
        );
        let root = path
            .parent()
            .context("manifest file has no parent directory")?
            .canonicalize()?;
        let document = serde_yaml::from_reader::<_, Document>(reader)
            .with_context(|| format!("invalid manifest {}", path.display()))?;

        Ok(Self {
            root,
            data_sources: document.data_sources,
        })
    }

    /// The directory containing the manifest. Relative file paths in the
    /// manifest are resolved against it.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    /// Finds a data source by name.
    pub fn data_source(&self, name: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|ds| ds.name == name)
    }

    /// Finds the data source whose source contract uses the specified ABI.
    pub fn data_source_for_abi(&self, abi: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|ds| ds.source.abi == abi)
    }

    /// Returns the resolved path of the ABI file the data source registers
    /// under the specified name.
    pub fn abi_path(&self, data_source: &DataSource, name: &str) -> Result<PathBuf> {
        let file = data_source.abi_file(name).with_context(|| {
            format!(
                "data source '{}' has no ABI named '{}'",
                data_source.name, name,
            )
        })?;

        Ok(self.root.join(file))
    }

    /// Replaces the contents of the ABI file registered under the specified
    /// name with a new ABI, returning the path that was written.
    pub fn replace_abi(&self, data_source: &DataSource, name: &str, abi: &Value) -> Result<PathBuf> {
        let path = self.abi_path(data_source, name)?;
        let mut contents = serde_json::to_string_pretty(abi)?;
        contents.push('\n');
        fs::write(&path, contents)
            .with_context(|| format!("failed to write ABI {}", path.display()))?;
        log::debug!("replaced ABI {}", path.display());

        Ok(path)
    }
}

#[derive(Deserialize)]
struct Document {
    #[serde(rename = "dataSources", default)]
    data_sources: Vec<DataSource>,
}

/// A manifest data source binding a contract to its event handlers.
#[derive(Debug, Deserialize)]
pub struct DataSource {
    pub name: String,
    #[serde(default)]
    pub network: Option<String>,
    pub source: Source,
    pub mapping: Mapping,
}

impl DataSource {
    /// Returns the file of the ABI registered under the specified name.
    pub fn abi_file(&self, name: &str) -> Option<&Path> {
        self.mapping
            .abis
            .iter()
            .find(|abi| abi.name == name)
            .map(|abi| abi.file.as_path())
    }

    /// Returns the event signatures this data source has handlers for, in
    /// manifest order.
    pub fn event_signatures(&self) -> Vec<String> {
        self.mapping
            .event_handlers
            .iter()
            .map(|handler| handler.event.clone())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub address: Option<String>,
    pub abi: String,
    #[serde(rename = "startBlock", default)]
    pub start_block: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Mapping {
    #[serde(default)]
    pub abis: Vec<Abi>,
    #[serde(rename = "eventHandlers", default)]
    pub event_handlers: Vec<EventHandler>,
}

#[derive(Debug, Deserialize)]
pub struct Abi {
    pub name: String,
    pub file: PathBuf,
}

/// An event signature and the name of the mapping function handling it.
#[derive(Debug, Deserialize)]
pub struct EventHandler {
    pub event: String,
    pub handler: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("test/subgraph.yaml")
    }

    #[test]
    fn deserialize_manifest() {
        let manifest = Manifest::read(&fixture_path()).unwrap();

        assert_eq!(manifest.data_sources().len(), 1);
        let data_source = &manifest.data_sources()[0];
        assert_eq!(data_source.name, "Token");
        assert_eq!(data_source.network.as_deref(), Some("mainnet"));
        assert_eq!(data_source.source.abi, "Token");
        assert_eq!(data_source.source.start_block, Some(1));
        assert_eq!(
            data_source.source.address.as_deref(),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        );
        assert_eq!(data_source.mapping.event_handlers[0].handler, "handleTransfer");
        assert_eq!(
            data_source.event_signatures(),
            ["Transfer(indexed address,indexed address,uint256)"],
        );
    }

    #[test]
    fn lookups() {
        let manifest = Manifest::read(&fixture_path()).unwrap();

        assert!(manifest.data_source("Token").is_some());
        assert!(manifest.data_source("Other").is_none());
        let data_source = manifest.data_source_for_abi("Token").unwrap();
        assert_eq!(
            data_source.abi_file("Token"),
            Some(Path::new("./abis/Token.json")),
        );
        assert!(manifest.abi_path(data_source, "Other").is_err());

        let path = manifest.abi_path(data_source, "Token").unwrap();
        assert!(path.starts_with(manifest.root()));
        assert!(path.is_file());
    }

    #[test]
    fn replace_abi() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("abis")).unwrap();
        fs::copy(fixture_path(), dir.path().join("subgraph.yaml")).unwrap();
        fs::write(dir.path().join("abis/Token.json"), "[]").unwrap();

        let manifest = Manifest::read(&dir.path().join("subgraph.yaml")).unwrap();
        let data_source = manifest.data_source("Token").unwrap();
        let abi = serde_json::json!([{ "type": "event", "name": "Paused", "inputs": [] }]);
        let path = manifest.replace_abi(data_source, "Token", &abi).unwrap();

        let written = serde_json::from_str::<Value>(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, abi);
    }

    #[test]
    fn manifest_without_data_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subgraph.yaml");
        fs::write(&path, "specVersion: 0.0.4\nschema:\n  file: ./schema.graphql\n").unwrap();

        let manifest = Manifest::read(&path).unwrap();
        assert!(manifest.data_sources().is_empty());
    }
}
