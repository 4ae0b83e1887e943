//! Project configuration.
//!
//! Configuration is read from an optional `hardhat-graph.yaml` in the project
//! root. Every field has a default, so a project without the file works with
//! the standard Hardhat layout:
//!
//! ```yaml
//! paths:
//!   artifacts: artifacts
//!   subgraph: subgraph
//! defaultNetwork: hardhat
//! subgraph:
//!   product: subgraph-studio
//!   name: my-subgraph
//!   allowSimpleName: false
//!   indexEvents: true
//! ```

use anyhow::{bail, Context as _, Result};
use serde::Deserialize;
use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};
use url::Url;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE: &str = "hardhat-graph.yaml";

/// The Graph product a subgraph is deployed to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub enum Product {
    SubgraphStudio,
    HostedService,
}

impl Product {
    pub fn as_str(self) -> &'static str {
        match self {
            Product::SubgraphStudio => "subgraph-studio",
            Product::HostedService => "hosted-service",
        }
    }

    /// The deploy node of the product.
    pub fn node_url(self) -> Url {
        let url = match self {
            Product::SubgraphStudio => "https://api.studio.thegraph.com/deploy/",
            Product::HostedService => "https://api.thegraph.com/deploy/",
        };
        Url::parse(url).expect("product node URLs are valid")
    }
}

impl Default for Product {
    fn default() -> Self {
        Product::SubgraphStudio
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subgraph-studio" => Ok(Product::SubgraphStudio),
            "hosted-service" => Ok(Product::HostedService),
            _ => bail!(
                "Unsupported product {}. Currently available products are \
                 subgraph-studio and hosted-service",
                s,
            ),
        }
    }
}

impl TryFrom<String> for Product {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Settings for the subgraph scaffold.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubgraphConfig {
    pub product: Product,
    pub name: String,
    pub allow_simple_name: bool,
    pub index_events: bool,
}

impl SubgraphConfig {
    /// Whether names without a `<PREFIX>/` are accepted. Subgraph Studio
    /// always uses simple names.
    pub fn allows_simple_name(&self) -> bool {
        self.allow_simple_name || self.product == Product::SubgraphStudio
    }

    /// The node the subgraph is deployed to.
    pub fn node_url(&self) -> Url {
        self.product.node_url()
    }

    /// Checks that the subgraph name is valid for the configured product.
    pub fn validate(&self) -> Result<()> {
        validate_subgraph_name(&self.name, self.allows_simple_name())
    }
}

/// Checks that a subgraph name has the `<PREFIX>/<name>` format, unless simple
/// names are allowed.
pub fn validate_subgraph_name(name: &str, allow_simple_name: bool) -> Result<()> {
    if allow_simple_name || name.split('/').count() == 2 {
        return Ok(());
    }

    bail!(
        r#"Subgraph name "{name}" needs to have the format "<PREFIX>/{name}".
When using the Hosted Service at https://thegraph.com, <PREFIX> is the
name of your GitHub user or organization. You can configure the name in {file}:

subgraph:
  product: hosted-service
  name: <PREFIX>/{name}

Or you can bypass this check by setting allowSimpleName to true in {file}:

subgraph:
  product: hosted-service
  allowSimpleName: true"#,
        name = name,
        file = CONFIG_FILE,
    )
}

/// Project directories, relative to the project root unless absolute.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Paths {
    pub artifacts: PathBuf,
    pub subgraph: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("artifacts"),
            subgraph: PathBuf::from("subgraph"),
        }
    }
}

/// Resolved project configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub root: PathBuf,
    pub paths: Paths,
    pub default_network: String,
    pub subgraph: SubgraphConfig,
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigFile {
    paths: Paths,
    default_network: String,
    subgraph: SubgraphFile,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            paths: Paths::default(),
            default_network: "hardhat".to_owned(),
            subgraph: SubgraphFile::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SubgraphFile {
    product: Product,
    name: Option<String>,
    allow_simple_name: bool,
    index_events: bool,
}

impl Default for SubgraphFile {
    fn default() -> Self {
        Self {
            product: Product::default(),
            name: None,
            allow_simple_name: false,
            index_events: true,
        }
    }
}

impl Config {
    /// Loads the configuration of the project at `root`.
    ///
    /// An explicitly specified configuration file must exist, while the
    /// default `hardhat-graph.yaml` is optional.
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Self::read_file(&root.join(path))?,
            None => {
                let path = root.join(CONFIG_FILE);
                if path.is_file() {
                    Self::read_file(&path)?
                } else {
                    log::debug!("no {} in {}, using defaults", CONFIG_FILE, root.display());
                    ConfigFile::default()
                }
            }
        };

        Ok(Self::resolve(root, file))
    }

    /// Returns the default configuration for the project at `root`.
    pub fn with_defaults(root: &Path) -> Self {
        Self::resolve(root, ConfigFile::default())
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        );
        let file = serde_yaml::from_reader(reader)
            .with_context(|| format!("invalid configuration {}", path.display()))?;
        log::debug!("loaded configuration from {}", path.display());

        Ok(file)
    }

    fn resolve(root: &Path, file: ConfigFile) -> Self {
        let name = file.subgraph.name.unwrap_or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Self {
            root: root.to_owned(),
            paths: file.paths,
            default_network: file.default_network,
            subgraph: SubgraphConfig {
                product: file.subgraph.product,
                name,
                allow_simple_name: file.subgraph.allow_simple_name,
                index_events: file.subgraph.index_events,
            },
        }
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(&self.paths.artifacts)
    }

    pub fn subgraph_dir(&self) -> PathBuf {
        self.root.join(&self.paths.subgraph)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.subgraph_dir().join("subgraph.yaml")
    }

    pub fn networks_path(&self) -> PathBuf {
        self.subgraph_dir().join("networks.json")
    }

    /// Whether a subgraph has been initialized, that is the subgraph
    /// directory exists and contains a manifest.
    pub fn subgraph_exists(&self) -> bool {
        self.subgraph_dir().is_dir() && self.manifest_path().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("my-project");
        fs::create_dir(&root).unwrap();

        let config = Config::load(&root, None).unwrap();
        assert_eq!(config.paths, Paths::default());
        assert_eq!(config.default_network, "hardhat");
        assert_eq!(
            config.subgraph,
            SubgraphConfig {
                product: Product::SubgraphStudio,
                name: "my-project".to_owned(),
                allow_simple_name: false,
                index_events: true,
            },
        );
        assert_eq!(config.manifest_path(), root.join("subgraph/subgraph.yaml"));
        assert_eq!(config.networks_path(), root.join("subgraph/networks.json"));
        assert!(!config.subgraph_exists());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "paths:\n  subgraph: indexer\n\
             defaultNetwork: goerli\n\
             subgraph:\n  product: hosted-service\n  name: gnosis/token\n  indexEvents: false\n",
        )
        .unwrap();

        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.paths.artifacts, Path::new("artifacts"));
        assert_eq!(config.subgraph_dir(), dir.path().join("indexer"));
        assert_eq!(config.default_network, "goerli");
        assert_eq!(config.subgraph.product, Product::HostedService);
        assert_eq!(config.subgraph.name, "gnosis/token");
        assert!(!config.subgraph.index_events);
        assert!(config.subgraph.validate().is_ok());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path(), Some(Path::new("missing.yaml"))).is_err());
    }

    #[test]
    fn rejects_unknown_product() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "subgraph:\n  product: decentralized-network\n",
        )
        .unwrap();

        let err = format!("{:#}", Config::load(dir.path(), None).unwrap_err());
        assert!(err.contains("Unsupported product decentralized-network"));
    }

    #[test]
    fn subgraph_exists_needs_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_defaults(dir.path());

        fs::create_dir(config.subgraph_dir()).unwrap();
        assert!(!config.subgraph_exists());
        fs::write(config.manifest_path(), "dataSources: []\n").unwrap();
        assert!(config.subgraph_exists());
    }

    #[test]
    fn subgraph_names() {
        assert!(validate_subgraph_name("gnosis/token", false).is_ok());
        assert!(validate_subgraph_name("token", true).is_ok());
        assert!(validate_subgraph_name("a/b/c", false).is_err());

        let err = validate_subgraph_name("token", false).unwrap_err().to_string();
        assert!(err.starts_with(r#"Subgraph name "token" needs to have the format "<PREFIX>/token"."#));
    }

    #[test]
    fn studio_allows_simple_names() {
        let mut subgraph = SubgraphConfig {
            product: Product::SubgraphStudio,
            name: "token".to_owned(),
            allow_simple_name: false,
            index_events: true,
        };
        assert!(subgraph.validate().is_ok());
        assert_eq!(
            subgraph.node_url().as_str(),
            "https://api.studio.thegraph.com/deploy/",
        );

        subgraph.product = Product::HostedService;
        assert!(subgraph.validate().is_err());
        assert_eq!(subgraph.node_url().as_str(), "https://api.thegraph.com/deploy/");

        subgraph.allow_simple_name = true;
        assert!(subgraph.validate().is_ok());
    }

    #[test]
    fn parse_products() {
        assert_eq!("hosted-service".parse::<Product>().unwrap(), Product::HostedService);
        assert_eq!(Product::SubgraphStudio.to_string(), "subgraph-studio");
        assert!("studio".parse::<Product>().is_err());
    }
}
