//! Network descriptors and the network name to chain id table.
//!
//! Names follow the network identifiers used in subgraph manifests. Each
//! distinct name gets one [`Network`] entry in the project configuration,
//! with its RPC endpoint left as an environment variable placeholder.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manifest network names and their EIP-155 chain ids.
pub const CHAIN_IDS: &[(&str, u64)] = &[
    ("mainnet", 1),
    ("ropsten", 3),
    ("rinkeby", 4),
    ("goerli", 5),
    ("optimism", 10),
    ("kovan", 42),
    ("bsc", 56),
    ("chapel", 97),
    ("poa-sokol", 77),
    ("poa-core", 99),
    ("xdai", 100),
    ("gnosis", 100),
    ("fuse", 122),
    ("matic", 137),
    ("fantom", 250),
    ("zksync-era", 324),
    ("optimism-goerli", 420),
    ("clover", 1023),
    ("polygon-zkevm", 1101),
    ("moonbeam", 1284),
    ("moonriver", 1285),
    ("mbase", 1287),
    ("fantom-testnet", 4002),
    ("base", 8453),
    ("holesky", 17000),
    ("celo-alfajores", 44787),
    ("celo", 42220),
    ("arbitrum-one", 42161),
    ("fuji", 43113),
    ("avalanche", 43114),
    ("linea", 59144),
    ("mumbai", 80001),
    ("blast-mainnet", 81457),
    ("base-sepolia", 84532),
    ("arbitrum-goerli", 421613),
    ("arbitrum-sepolia", 421614),
    ("scroll", 534352),
    ("sepolia", 11155111),
    ("optimism-sepolia", 11155420),
    ("aurora", 1313161554),
    ("aurora-testnet", 1313161555),
    ("harmony", 1666600000),
];

lazy_static! {
    static ref CHAIN_ID_INDEX: HashMap<&'static str, u64> = CHAIN_IDS.iter().copied().collect();
}

/// Resolve a manifest network name to its chain id.
pub fn chain_id(network: &str) -> Option<u64> {
    CHAIN_ID_INDEX.get(network).copied()
}

/// Name of the environment variable holding the RPC URL for a chain.
pub fn rpc_url_env_var(chain_id: u64) -> String {
    format!("PONDER_RPC_URL_{}", chain_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    #[default]
    Evm,
}

/// A network the project indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    #[serde(default)]
    pub kind: ChainKind,
    pub name: String,
    pub chain_id: u64,
    /// `${PONDER_RPC_URL_<chainId>}`, resolved by the runtime, never here.
    pub rpc_url: String,
}

impl Network {
    pub fn new(name: impl Into<String>, chain_id: u64) -> Self {
        Network {
            kind: ChainKind::Evm,
            name: name.into(),
            chain_id,
            rpc_url: format!("${{{}}}", rpc_url_env_var(chain_id)),
        }
    }
}

/// Networks collected in first-seen order, one per distinct name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSet {
    networks: Vec<Network>,
}

impl NetworkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a network unless one with the same name is already present.
    /// Returns true if it was added.
    pub fn insert(&mut self, network: Network) -> bool {
        if self.networks.iter().any(|n| n.name == network.name) {
            return false;
        }
        self.networks.push(network);
        true
    }

    pub fn into_vec(self) -> Vec<Network> {
        self.networks
    }
}
