//! Foreign subgraph manifest model.
//!
//! Only the parts the importer reads are modelled. Data sources are kept as
//! raw YAML until [`SubgraphManifest::data_sources`] validates them one by
//! one, so an error can name the offending entry.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

use crate::abi::event_base_name;
use crate::error::{CodegenError, Result};
use crate::types::is_identifier;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphManifest {
    pub schema: Option<SchemaRef>,
    #[serde(default)]
    data_sources: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SchemaRef {
    pub file: String,
}

/// A validated `dataSources` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub name: String,
    pub network: Option<String>,
    pub address: String,
    /// `source.abi`, the name of the ABI the contract is bound to.
    pub abi: Option<String>,
    pub start_block: Option<u64>,
    pub abis: Vec<AbiRef>,
    pub event_handlers: Vec<EventHandler>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AbiRef {
    pub name: String,
    pub file: String,
}

/// An `eventHandlers` entry. Only the event signature is read; the
/// mapping function name has no counterpart in the generated project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventHandler {
    pub event: String,
}

impl EventHandler {
    /// `Transfer(indexed address,indexed address,uint256)` -> `Transfer`
    pub fn event_name(&self) -> &str {
        event_base_name(&self.event)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataSource {
    name: String,
    network: Option<String>,
    source: RawSource,
    mapping: RawMapping,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSource {
    address: String,
    abi: Option<String>,
    start_block: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMapping {
    abis: Vec<AbiRef>,
    #[serde(default)]
    event_handlers: Vec<EventHandler>,
}

impl SubgraphManifest {
    /// Find the first candidate filename present in `dir`.
    pub fn locate(dir: &Path, candidates: &[String]) -> Result<PathBuf> {
        candidates
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| CodegenError::ManifestNotFound {
                dir: dir.to_path_buf(),
                candidates: candidates.to_vec(),
            })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Self::parse(&yaml).map_err(|reason| CodegenError::ManifestParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(yaml: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    pub fn schema_file(&self) -> Result<&str> {
        self.schema
            .as_ref()
            .map(|s| s.file.as_str())
            .ok_or_else(|| CodegenError::InvalidManifest("missing `schema.file`".to_string()))
    }

    /// Validate every data source. The first invalid entry fails the whole
    /// manifest.
    pub fn data_sources(&self) -> Result<Vec<DataSource>> {
        let mut validated: Vec<DataSource> = Vec::with_capacity(self.data_sources.len());
        for (index, value) in self.data_sources.iter().enumerate() {
            let ds = validate_data_source(index, value)?;
            if validated.iter().any(|other| other.name == ds.name) {
                return Err(CodegenError::InvalidDataSource {
                    index,
                    name: ds.name,
                    reason: "duplicate data source name".to_string(),
                });
            }
            validated.push(ds);
        }
        Ok(validated)
    }
}

fn validate_data_source(index: usize, value: &Value) -> Result<DataSource> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string();
    let invalid = |reason: String| CodegenError::InvalidDataSource {
        index,
        name: name.clone(),
        reason,
    };

    let raw: RawDataSource =
        serde_yaml::from_value(value.clone()).map_err(|e| invalid(e.to_string()))?;

    if !is_identifier(&raw.name) {
        return Err(invalid(format!(
            "`name` must be a valid identifier, got `{}`",
            raw.name
        )));
    }
    if raw.source.address.trim().is_empty() {
        return Err(invalid("`source.address` is empty".to_string()));
    }
    if let Some(pos) = raw
        .mapping
        .event_handlers
        .iter()
        .position(|h| h.event_name().is_empty())
    {
        return Err(invalid(format!(
            "event handler #{} has no event name",
            pos
        )));
    }

    Ok(DataSource {
        name: raw.name,
        network: raw.network,
        address: raw.source.address,
        abi: raw.source.abi,
        start_block: raw.source.start_block,
        abis: raw.mapping.abis,
        event_handlers: raw.mapping.event_handlers,
    })
}

impl DataSource {
    /// The ABI file bound to this data source: the `mapping.abis` entry
    /// named by `source.abi`, else the one named after the data source.
    pub fn abi_file(&self) -> Option<&str> {
        let find = |name: &str| self.abis.iter().find(|a| a.name == name);
        self.abi
            .as_deref()
            .and_then(find)
            .or_else(|| find(&self.name))
            .map(|a| a.file.as_str())
    }

    /// Distinct event names with a declared handler, in manifest order.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for handler in &self.event_handlers {
            let name = handler.event_name();
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
specVersion: 0.0.4
schema:
  file: ./schema.graphql
dataSources:
  - kind: ethereum/contract
    name: ERC20
    network: mainnet
    source:
      address: "0x6b175474e89094c44da98b954eedeac495271d0f"
      abi: Token
      startBlock: 8928158
    mapping:
      kind: ethereum/events
      apiVersion: 0.0.6
      language: wasm/assemblyscript
      entities:
        - Transfer
      abis:
        - name: ERC20
          file: ./abis/IERC20.json
        - name: Token
          file: ./abis/Token.json
      eventHandlers:
        - event: Transfer(indexed address,indexed address,uint256)
          handler: handleTransfer
        - event: Approval(indexed address,indexed address,uint256)
          handler: handleApproval
        - event: Transfer(indexed address,indexed address,uint256,bytes)
          handler: handleTransferWithData
      file: ./src/mapping.ts
  - kind: ethereum/contract
    name: Vault
    source:
      address: "0x0000000000000000000000000000000000000001"
    mapping:
      abis:
        - name: Vault
          file: ./abis/Vault.json
"#;

    #[test]
    fn test_parse_and_validate() {
        let manifest = SubgraphManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.schema_file().unwrap(), "./schema.graphql");

        let sources = manifest.data_sources().unwrap();
        assert_eq!(sources.len(), 2);

        let erc20 = &sources[0];
        assert_eq!(erc20.name, "ERC20");
        assert_eq!(erc20.network.as_deref(), Some("mainnet"));
        assert_eq!(erc20.start_block, Some(8928158));
        assert_eq!(erc20.abi_file(), Some("./abis/Token.json"));
        assert_eq!(erc20.event_names(), vec!["Transfer", "Approval"]);

        let vault = &sources[1];
        assert_eq!(vault.network, None);
        assert_eq!(vault.start_block, None);
        assert_eq!(vault.abi_file(), Some("./abis/Vault.json"));
        assert!(vault.event_handlers.is_empty());
    }

    #[test]
    fn test_invalid_data_source_names_entry() {
        let yaml = r#"
schema:
  file: ./schema.graphql
dataSources:
  - name: Broken
    network: mainnet
    mapping:
      abis: []
"#;
        let manifest = SubgraphManifest::parse(yaml).unwrap();
        match manifest.data_sources().unwrap_err() {
            CodegenError::InvalidDataSource { index, name, reason } => {
                assert_eq!(index, 0);
                assert_eq!(name, "Broken");
                assert!(reason.contains("source"), "{}", reason);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_duplicate_data_source() {
        let yaml = r#"
schema:
  file: ./schema.graphql
dataSources:
  - name: A
    source: { address: "0x1" }
    mapping: { abis: [] }
  - name: A
    source: { address: "0x2" }
    mapping: { abis: [] }
"#;
        let manifest = SubgraphManifest::parse(yaml).unwrap();
        assert!(matches!(
            manifest.data_sources().unwrap_err(),
            CodegenError::InvalidDataSource { index: 1, .. }
        ));
    }

    #[test]
    fn test_data_source_name_must_be_identifier() {
        for name in ["Token-V2", "../../escaped", "\"\""] {
            let yaml = format!(
                "dataSources:\n  - name: {}\n    source: {{ address: \"0x1\" }}\n    mapping: {{ abis: [] }}\n",
                name
            );
            let manifest = SubgraphManifest::parse(&yaml).unwrap();
            match manifest.data_sources().unwrap_err() {
                CodegenError::InvalidDataSource { index, reason, .. } => {
                    assert_eq!(index, 0);
                    assert!(reason.contains("valid identifier"), "{}", reason);
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_missing_schema() {
        let manifest = SubgraphManifest::parse("dataSources: []").unwrap();
        assert!(matches!(
            manifest.schema_file().unwrap_err(),
            CodegenError::InvalidManifest(_)
        ));
    }

    #[test]
    fn test_locate_tries_candidates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec!["subgraph.yaml".to_string(), "subgraph-mainnet.yaml".to_string()];

        let err = SubgraphManifest::locate(dir.path(), &candidates).unwrap_err();
        assert!(matches!(err, CodegenError::ManifestNotFound { .. }));

        fs::write(dir.path().join("subgraph-mainnet.yaml"), "").unwrap();
        assert_eq!(
            SubgraphManifest::locate(dir.path(), &candidates).unwrap(),
            dir.path().join("subgraph-mainnet.yaml")
        );

        fs::write(dir.path().join("subgraph.yaml"), "").unwrap();
        assert_eq!(
            SubgraphManifest::locate(dir.path(), &candidates).unwrap(),
            dir.path().join("subgraph.yaml")
        );
    }
}
