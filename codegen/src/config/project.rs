//! Local project configuration.
//!
//! A project is described by `ponder.config.json` at its root. The importer
//! writes it; the `codegen` command reads it back to find contract sources.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::networks::{rpc_url_env_var, ChainKind, Network};
use crate::error::{CodegenError, Result};
use crate::types::is_identifier;

pub const CONFIG_FILE: &str = "ponder.config.json";
pub const ENV_LOCAL_FILE: &str = ".env.local";
pub const SCHEMA_FILE: &str = "schema.graphql";

/// A contract source: one deployed contract and the ABI describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub kind: ChainKind,
    pub name: String,
    pub network: String,
    /// ABI path relative to the project root, e.g. `./abis/ERC20.json`.
    pub abi: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_block: Option<u64>,
}

impl Source {
    pub fn abi_path(&self, root: &Path) -> PathBuf {
        root.join(self.abi.trim_start_matches("./"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl ProjectConfig {
    /// Load `ponder.config.json` from a project root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Err(CodegenError::MissingFile { path });
        }
        let json = fs::read_to_string(&path).map_err(|e| CodegenError::io(&path, e))?;
        let config: ProjectConfig =
            serde_json::from_str(&json).map_err(|e| CodegenError::Config {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        config.validate(&path)?;
        Ok(config)
    }

    /// Source names become type and module identifiers, so they must be
    /// unique, and every source must point at a declared network.
    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: String| CodegenError::Config {
            path: path.to_path_buf(),
            reason,
        };
        for (i, source) in self.sources.iter().enumerate() {
            if !is_identifier(&source.name) {
                return Err(invalid(format!(
                    "source name `{}` is not a valid identifier",
                    source.name
                )));
            }
            if self.sources[..i].iter().any(|s| s.name == source.name) {
                return Err(invalid(format!("duplicate source name `{}`", source.name)));
            }
            if !self.networks.is_empty() && !self.networks.iter().any(|n| n.name == source.network)
            {
                return Err(invalid(format!(
                    "source `{}` uses undeclared network `{}`",
                    source.name, source.network
                )));
            }
        }
        Ok(())
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self).map_err(|e| CodegenError::Config {
            path: PathBuf::from(CONFIG_FILE),
            reason: e.to_string(),
        })?;
        json.push('\n');
        Ok(json)
    }
}

/// Contents of `.env.local`: one empty RPC URL entry per distinct chain id,
/// in network order.
pub fn env_local(networks: &[Network]) -> String {
    let mut seen = Vec::new();
    let mut out = String::new();
    for network in networks {
        if seen.contains(&network.chain_id) {
            continue;
        }
        seen.push(network.chain_id);
        out.push_str(&format!("{}=\"\"\n", rpc_url_env_var(network.chain_id)));
    }
    out
}
