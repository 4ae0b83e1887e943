//! Reading Hardhat compiler artifacts from disk.
//!
//! Hardhat writes one JSON artifact per contract to
//! `<artifacts>/<sourceName>/<contractName>.json`, next to a `.dbg.json` file
//! and a shared `build-info` directory. Contracts can be referred to either by
//! their bare name, which must be unique across the project, or by their
//! fully qualified `<sourceName>:<contractName>` name.

use crate::abi::Abi;
use anyhow::{anyhow, bail, Context as _, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{
    fmt::{self, Display, Formatter},
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// A contract name, optionally qualified with its source file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContractName<'a> {
    pub source_name: Option<&'a str>,
    pub contract_name: &'a str,
}

impl<'a> ContractName<'a> {
    /// Splits a fully qualified contract name on its last `:`. Bare names are
    /// returned without a source name.
    pub fn parse(name: &'a str) -> Self {
        match name.rfind(':') {
            Some(index) => Self {
                source_name: Some(&name[..index]),
                contract_name: &name[index + 1..],
            },
            None => Self {
                source_name: None,
                contract_name: name,
            },
        }
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.source_name.is_some()
    }
}

impl Display for ContractName<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.source_name {
            Some(source_name) => write!(f, "{}:{}", source_name, self.contract_name),
            None => f.write_str(self.contract_name),
        }
    }
}

/// A compiled contract artifact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    /// The raw JSON ABI, as written by the compiler.
    pub abi: Value,
}

impl Artifact {
    /// Parses the artifact's ABI.
    pub fn abi(&self) -> Result<Abi> {
        Abi::from_value(&self.abi)
            .with_context(|| format!("invalid ABI in artifact for '{}'", self.contract_name))
    }

    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

/// The artifacts directory of a Hardhat project.
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the path to the artifact file for the specified contract.
    pub fn artifact_path(&self, name: &str) -> Result<PathBuf> {
        let name = ContractName::parse(name);
        if let Some(source_name) = name.source_name {
            let path = self
                .root
                .join(source_name)
                .join(format!("{}.json", name.contract_name));
            if !path.is_file() {
                bail!("artifact for contract '{}' not found", name);
            }
            return Ok(path);
        }

        let mut candidates = self.find(name.contract_name)?;
        match candidates.len() {
            0 => bail!("artifact for contract '{}' not found", name),
            1 => Ok(candidates.remove(0)),
            _ => {
                let names = candidates
                    .iter()
                    .map(|path| self.qualified_name(path))
                    .collect::<Vec<_>>();
                bail!(
                    "there are multiple artifacts for contract '{}', please use a \
                     fully qualified name instead:\n{}",
                    name,
                    names.join("\n"),
                )
            }
        }
    }

    /// Reads the artifact for the specified contract.
    pub fn read_artifact(&self, name: &str) -> Result<Artifact> {
        let path = self.artifact_path(name)?;
        log::debug!("reading artifact {}", path.display());

        let contents = fs::read(&path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        let artifact = serde_json::from_slice(&contents)
            .with_context(|| format!("invalid artifact {}", path.display()))?;

        Ok(artifact)
    }

    fn find(&self, contract_name: &str) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(anyhow!(
                "artifacts directory {} does not exist, did you compile your contracts?",
                self.root.display(),
            ));
        }

        let file_name = format!("{}.json", contract_name);
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != "build-info")
        {
            let entry = entry?;
            if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }

    fn qualified_name(&self, path: &Path) -> String {
        let source_name = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(|source| {
                source
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        let contract_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();

        format!("{}:{}", source_name, contract_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Artifacts {
        Artifacts::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("test/artifacts"))
    }

    #[test]
    fn parse_contract_names() {
        assert_eq!(
            ContractName::parse("Token"),
            ContractName {
                source_name: None,
                contract_name: "Token",
            },
        );

        let name = ContractName::parse("contracts/tokens/Token.sol:Token");
        assert!(name.is_fully_qualified());
        assert_eq!(name.source_name, Some("contracts/tokens/Token.sol"));
        assert_eq!(name.contract_name, "Token");
        assert_eq!(name.to_string(), "contracts/tokens/Token.sol:Token");
    }

    #[test]
    fn read_artifact_by_bare_name() {
        let artifact = fixture().read_artifact("Token").unwrap();

        assert_eq!(artifact.contract_name, "Token");
        assert_eq!(artifact.source_name, "contracts/Token.sol");
        assert_eq!(artifact.fully_qualified_name(), "contracts/Token.sol:Token");
        assert_eq!(
            artifact.abi().unwrap().event_signatures(),
            [
                "Transfer(indexed address,indexed address,uint256)",
                "Approval(indexed address,indexed address,uint256)",
            ],
        );
    }

    #[test]
    fn read_artifact_by_qualified_name() {
        let artifacts = fixture();
        let path = artifacts.artifact_path("contracts/Token.sol:Token").unwrap();

        assert!(path.ends_with("contracts/Token.sol/Token.json"));
        assert_eq!(
            artifacts
                .read_artifact("contracts/Token.sol:Token")
                .unwrap()
                .contract_name,
            "Token",
        );
    }

    #[test]
    fn missing_artifacts() {
        let artifacts = fixture();
        assert!(artifacts.artifact_path("Missing").is_err());
        assert!(artifacts.artifact_path("contracts/Token.sol:Missing").is_err());
        assert!(Artifacts::new("/does/not/exist").artifact_path("Token").is_err());
    }

    #[test]
    fn ambiguous_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        for source in &["contracts/A.sol", "contracts/B.sol"] {
            let source_dir = dir.path().join(source);
            fs::create_dir_all(&source_dir).unwrap();
            fs::write(
                source_dir.join("Token.json"),
                r#"{"contractName":"Token","sourceName":"x","abi":[]}"#,
            )
            .unwrap();
        }

        let err = Artifacts::new(dir.path())
            .artifact_path("Token")
            .unwrap_err()
            .to_string();
        assert!(err.contains("contracts/A.sol:Token"));
        assert!(err.contains("contracts/B.sol:Token"));
    }
}
