//! Environment-driven settings.
//!
//! Read once on first access through [`ENV_VARS`]; command-line flags take
//! precedence where both exist.

use std::collections::HashMap;
use std::fmt;

use envconfig::Envconfig;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref ENV_VARS: EnvVars = EnvVars::from_env().unwrap_or_default();
}

#[derive(Clone)]
pub struct EnvVars {
    /// Manifest filenames the importer tries, in order.
    ///
    /// Set by `PONDER_MANIFEST_FILES` as a comma separated list. The default
    /// is `subgraph.yaml,subgraph-mainnet.yaml`.
    pub manifest_files: Vec<String>,
    /// Directory, relative to the project root, that receives generated types.
    ///
    /// Set by `PONDER_GENERATED_DIR`. The default is `generated`.
    pub generated_dir: String,
    /// Network assumed for data sources that do not name one.
    ///
    /// Set by `PONDER_DEFAULT_NETWORK`. The default is `mainnet`.
    pub default_network: String,
}

impl EnvVars {
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Ok(Inner::init_from_env()?.into())
    }
}

/// The values used when no variable is set, taken from the `#[envconfig]`
/// defaults on `Inner`.
impl Default for EnvVars {
    fn default() -> Self {
        Inner::init_from_hashmap(&HashMap::new())
            .expect("every setting has a string default")
            .into()
    }
}

impl fmt::Debug for EnvVars {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EnvVars")
            .field("manifest_files", &self.manifest_files)
            .field("generated_dir", &self.generated_dir)
            .field("default_network", &self.default_network)
            .finish()
    }
}

#[derive(Clone, Debug, Envconfig)]
struct Inner {
    #[envconfig(
        from = "PONDER_MANIFEST_FILES",
        default = "subgraph.yaml,subgraph-mainnet.yaml"
    )]
    manifest_files: String,
    #[envconfig(from = "PONDER_GENERATED_DIR", default = "generated")]
    generated_dir: String,
    #[envconfig(from = "PONDER_DEFAULT_NETWORK", default = "mainnet")]
    default_network: String,
}

impl From<Inner> for EnvVars {
    fn from(x: Inner) -> Self {
        Self {
            manifest_files: split_list(&x.manifest_files),
            generated_dir: x.generated_dir,
            default_network: x.default_network,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
