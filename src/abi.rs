//! Partial contract ABI implementation.
//!
//! Only as much of the JSON ABI is modeled as is needed to derive event
//! signatures. The raw JSON is kept by the caller for writing ABI files, so
//! nothing here needs to round trip.

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

/// A parsed contract ABI.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Abi {
    descriptors: Vec<Descriptor>,
}

impl Abi {
    /// Parses an ABI from its JSON representation.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    /// Returns the signatures of all events in ABI order.
    ///
    /// Signatures use the format graph-cli writes into `eventHandlers`:
    /// indexed parameters are prefixed with `indexed ` and tuples are spelled
    /// out as their component types, for example
    /// `Transfer(indexed address,indexed address,uint256)`.
    pub fn event_signatures(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.kind.as_deref() == Some("event"))
            .map(Descriptor::signature)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Descriptor {
    // Function descriptors are allowed to omit their type.
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<Param>,
}

impl Descriptor {
    fn signature(&self) -> String {
        let params = self
            .inputs
            .iter()
            .map(|input| {
                if input.indexed {
                    format!("indexed {}", input.canonical_type())
                } else {
                    input.canonical_type()
                }
            })
            .collect::<Vec<_>>();

        format!("{}({})", self.name, params.join(","))
    }
}

#[derive(Debug, Deserialize)]
struct Param {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    indexed: bool,
    #[serde(default)]
    components: Vec<Param>,
}

impl Param {
    fn canonical_type(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let components = self
                    .components
                    .iter()
                    .map(Param::canonical_type)
                    .collect::<Vec<_>>();
                format!("({}){}", components.join(","), suffix)
            }
            None => self.kind.clone(),
        }
    }
}
