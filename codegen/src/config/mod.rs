pub mod networks;
pub mod project;

pub use networks::{chain_id, ChainKind, Network, NetworkSet};
pub use project::{env_local, ProjectConfig, Source, CONFIG_FILE, ENV_LOCAL_FILE, SCHEMA_FILE};
