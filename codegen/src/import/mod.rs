//! Import an existing subgraph project.
//!
//! The importer reads a subgraph manifest and bootstraps a project from it:
//! schema and ABIs are copied, each data source becomes a contract source,
//! and a stub handler module is written per source.
//!
//! Work happens in two phases. [`ManifestImporter::plan`] reads and
//! validates everything and decides every output; [`ImportPlan::apply`]
//! performs the writes. A manifest that fails validation leaves the target
//! directory untouched.

mod manifest;
mod stubs;

use std::fs;
use std::path::{Path, PathBuf};

use slog::{debug, info, Logger};

use crate::codegen::GeneratedFile;
use crate::config::{
    chain_id, env_local, Network, NetworkSet, ProjectConfig, Source, CONFIG_FILE, ENV_LOCAL_FILE,
    SCHEMA_FILE,
};
use crate::env::ENV_VARS;
use crate::error::{CodegenError, Result};

pub use manifest::{AbiRef, DataSource, EventHandler, SubgraphManifest};
pub use stubs::{handler_index, handler_stub, HANDLERS_DIR, INDEX_FILE};

pub const ABIS_DIR: &str = "abis";

pub struct ManifestImporter {
    logger: Logger,
    from: PathBuf,
    root: PathBuf,
    candidates: Vec<String>,
    default_network: String,
}

/// Everything an import will write, decided up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub root: PathBuf,
    pub schema: PathBuf,
    /// (source file, file name under `abis/`)
    pub abis: Vec<(PathBuf, String)>,
    pub stubs: Vec<GeneratedFile>,
    pub index: GeneratedFile,
    pub config: ProjectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub sources: Vec<Source>,
    pub networks: Vec<Network>,
    /// Paths of the written stub modules, index last.
    pub stubs: Vec<PathBuf>,
    pub schema_file: PathBuf,
}

impl ManifestImporter {
    /// Import from the subgraph in `from` into the project at `root`, using
    /// the manifest candidates and default network from the environment.
    pub fn new(logger: &Logger, from: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        ManifestImporter {
            logger: logger.clone(),
            from: from.into(),
            root: root.into(),
            candidates: ENV_VARS.manifest_files.clone(),
            default_network: ENV_VARS.default_network.clone(),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_default_network(mut self, network: impl Into<String>) -> Self {
        self.default_network = network.into();
        self
    }

    pub fn run(&self) -> Result<ImportOutcome> {
        self.plan()?.apply(&self.logger)
    }

    pub fn plan(&self) -> Result<ImportPlan> {
        let manifest_path = SubgraphManifest::locate(&self.from, &self.candidates)?;
        info!(self.logger, "Importing subgraph manifest"; "path" => %manifest_path.display());
        let manifest = SubgraphManifest::load(&manifest_path)?;

        let schema = self.from.join(manifest.schema_file()?);
        if !schema.is_file() {
            return Err(CodegenError::MissingFile { path: schema });
        }

        let mut networks = NetworkSet::new();
        let mut sources = Vec::new();
        let mut abis: Vec<(PathBuf, String)> = Vec::new();
        let mut stubs = Vec::new();

        for ds in manifest.data_sources()? {
            let network = ds
                .network
                .clone()
                .unwrap_or_else(|| self.default_network.clone());
            let chain_id = chain_id(&network).ok_or_else(|| CodegenError::UnknownNetwork {
                source_name: ds.name.clone(),
                network: network.clone(),
            })?;
            if networks.insert(Network::new(&network, chain_id)) {
                debug!(self.logger, "Added network"; "name" => &network, "chain_id" => chain_id);
            }

            let abi_file = ds.abi_file().ok_or_else(|| CodegenError::AbiPathNotFound {
                source_name: ds.name.clone(),
            })?;
            let abi_path = self.from.join(abi_file);
            if !abi_path.is_file() {
                return Err(CodegenError::MissingFile { path: abi_path });
            }
            let abi_name = file_name(&abi_path)?;
            match abis.iter().find(|(_, name)| *name == abi_name) {
                Some((other, _)) if *other != abi_path => {
                    return Err(CodegenError::InvalidManifest(format!(
                        "ABI files {} and {} would both be copied to {}/{}",
                        other.display(),
                        abi_path.display(),
                        ABIS_DIR,
                        abi_name
                    )));
                }
                Some(_) => {}
                None => abis.push((abi_path, abi_name.clone())),
            }

            stubs.push(handler_stub(&ds.name, &ds.event_names()));
            sources.push(Source {
                kind: Default::default(),
                name: ds.name,
                network,
                abi: format!("./{}/{}", ABIS_DIR, abi_name),
                address: ds.address,
                start_block: ds.start_block,
            });
        }

        let names: Vec<String> = sources.iter().map(|s| s.name.clone()).collect();
        Ok(ImportPlan {
            root: self.root.clone(),
            schema,
            abis,
            stubs,
            index: handler_index(&names),
            config: ProjectConfig {
                networks: networks.into_vec(),
                sources,
            },
        })
    }
}

impl ImportPlan {
    /// Perform the writes. Project configuration and `.env.local` go last.
    pub fn apply(self, logger: &Logger) -> Result<ImportOutcome> {
        let abis_dir = self.root.join(ABIS_DIR);
        let handlers_dir = self.root.join(HANDLERS_DIR);
        for dir in [&abis_dir, &handlers_dir] {
            fs::create_dir_all(dir).map_err(|e| CodegenError::io(dir.as_path(), e))?;
        }

        let schema_file = self.root.join(SCHEMA_FILE);
        if copy(&self.schema, &schema_file)? {
            info!(logger, "Copied schema"; "path" => %schema_file.display());
        }

        for (from, name) in &self.abis {
            let to = abis_dir.join(name);
            if copy(from, &to)? {
                info!(logger, "Copied ABI"; "path" => %to.display());
            }
        }

        let mut stubs = Vec::with_capacity(self.stubs.len() + 1);
        for stub in self.stubs.iter().chain(std::iter::once(&self.index)) {
            let path = stub.write(&handlers_dir)?;
            info!(logger, "Wrote handler module"; "path" => %path.display());
            stubs.push(path);
        }

        let config_path = self.root.join(CONFIG_FILE);
        write(&config_path, &self.config.to_json()?)?;
        info!(logger, "Wrote project config"; "path" => %config_path.display());

        let env_path = self.root.join(ENV_LOCAL_FILE);
        write(&env_path, &env_local(&self.config.networks))?;
        info!(logger, "Wrote environment file"; "path" => %env_path.display());

        Ok(ImportOutcome {
            sources: self.config.sources,
            networks: self.config.networks,
            stubs,
            schema_file,
        })
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| CodegenError::MissingFile {
            path: path.to_path_buf(),
        })
}

/// Copy `from` to `to`, unless both name the same file. Importing into the
/// subgraph directory itself must not truncate its inputs.
fn copy(from: &Path, to: &Path) -> Result<bool> {
    if same_file(from, to) {
        return Ok(false);
    }
    fs::copy(from, to)
        .map(|_| true)
        .map_err(|e| CodegenError::io(from, e))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| CodegenError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::discard;

    fn subgraph(dir: &Path, manifest: &str) {
        fs::create_dir_all(dir.join("abis")).unwrap();
        fs::write(dir.join("subgraph.yaml"), manifest).unwrap();
        fs::write(dir.join("schema.graphql"), "type Token @entity { id: ID! }\n").unwrap();
        fs::write(dir.join("abis/ERC20.json"), "[]").unwrap();
    }

    const MANIFEST: &str = r#"
schema:
  file: ./schema.graphql
dataSources:
  - name: ERC20
    source:
      address: "0x6b175474e89094c44da98b954eedeac495271d0f"
      abi: ERC20
    mapping:
      abis:
        - name: ERC20
          file: ./abis/ERC20.json
      eventHandlers:
        - event: Transfer(indexed address,indexed address,uint256)
          handler: handleTransfer
"#;

    #[test]
    fn test_plan_uses_default_network() {
        let from = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        subgraph(from.path(), MANIFEST);

        let plan = ManifestImporter::new(&discard(), from.path(), root.path())
            .with_default_network("goerli")
            .plan()
            .unwrap();
        assert_eq!(plan.config.networks, vec![Network::new("goerli", 5)]);
        assert_eq!(plan.config.sources[0].network, "goerli");
        assert_eq!(plan.config.sources[0].abi, "./abis/ERC20.json");
        assert_eq!(plan.config.sources[0].start_block, None);
        assert_eq!(plan.abis.len(), 1);
        assert_eq!(plan.stubs[0].filename, "ERC20.ts");
    }

    #[test]
    fn test_unknown_network_is_fatal_and_writes_nothing() {
        let from = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        subgraph(from.path(), &MANIFEST.replace("    source:", "    network: moonnet\n    source:"));

        let err = ManifestImporter::new(&discard(), from.path(), root.path())
            .run()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unhandled network name `moonnet` for source `ERC20`"
        );
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_abi_reference() {
        let from = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        subgraph(
            from.path(),
            &MANIFEST
                .replace("abi: ERC20", "abi: Other")
                .replace("- name: ERC20\n          file", "- name: Other2\n          file"),
        );

        let err = ManifestImporter::new(&discard(), from.path(), root.path())
            .plan()
            .unwrap_err();
        assert!(matches!(err, CodegenError::AbiPathNotFound { ref source_name } if source_name == "ERC20"));
    }

    #[test]
    fn test_missing_abi_file() {
        let from = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        subgraph(from.path(), MANIFEST);
        fs::remove_file(from.path().join("abis/ERC20.json")).unwrap();

        let err = ManifestImporter::new(&discard(), from.path(), root.path())
            .run()
            .unwrap_err();
        assert!(matches!(err, CodegenError::MissingFile { .. }));
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_source_name_outside_root_is_rejected() {
        let from = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let root_dir = root.path().join("project");
        subgraph(
            from.path(),
            &MANIFEST.replace("name: ERC20\n    source", "name: ../../escaped\n    source"),
        );

        let err = ManifestImporter::new(&discard(), from.path(), &root_dir)
            .run()
            .unwrap_err();
        assert!(
            matches!(err, CodegenError::InvalidDataSource { index: 0, ref name, .. } if name == "../../escaped")
        );
        assert!(!root_dir.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_import_in_place_keeps_inputs() {
        let dir = tempfile::tempdir().unwrap();
        subgraph(dir.path(), MANIFEST);

        let outcome = ManifestImporter::new(&discard(), dir.path(), dir.path())
            .run()
            .unwrap();
        assert_eq!(outcome.schema_file, dir.path().join(SCHEMA_FILE));
        assert_eq!(
            fs::read_to_string(dir.path().join(SCHEMA_FILE)).unwrap(),
            "type Token @entity { id: ID! }\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("abis/ERC20.json")).unwrap(),
            "[]"
        );
        assert!(dir.path().join("handlers/ERC20.ts").is_file());
    }

    #[test]
    fn test_custom_candidates() {
        let from = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        subgraph(from.path(), MANIFEST);
        fs::rename(
            from.path().join("subgraph.yaml"),
            from.path().join("subgraph-goerli.yaml"),
        )
        .unwrap();

        let importer = ManifestImporter::new(&discard(), from.path(), root.path());
        assert!(matches!(
            importer.plan().unwrap_err(),
            CodegenError::ManifestNotFound { .. }
        ));

        let plan = importer
            .with_candidates(vec!["subgraph-goerli.yaml".to_string()])
            .plan()
            .unwrap();
        assert_eq!(plan.config.sources.len(), 1);
    }
}
