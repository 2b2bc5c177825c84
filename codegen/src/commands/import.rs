use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use slog::{info, Logger};

use crate::import::{ImportOutcome, ManifestImporter};

#[derive(Clone, Debug, Parser)]
#[clap(about = "Bootstrap a project from an existing subgraph")]
pub struct ImportOpt {
    /// Directory containing the subgraph manifest
    #[clap(long, value_name = "DIR")]
    pub from: PathBuf,

    /// Project root to write into
    #[clap(short = 'r', long, default_value = ".")]
    pub root: PathBuf,

    /// Manifest filenames to try, in order (overrides PONDER_MANIFEST_FILES)
    #[clap(long = "manifest", value_name = "FILE", value_delimiter = ',')]
    pub manifests: Vec<String>,

    /// Network for data sources that do not name one (overrides PONDER_DEFAULT_NETWORK)
    #[clap(long, value_name = "NETWORK")]
    pub default_network: Option<String>,
}

/// Run the import command
pub fn run_import(logger: &Logger, opt: ImportOpt) -> Result<ImportOutcome> {
    let mut importer = ManifestImporter::new(logger, &opt.from, &opt.root);
    if !opt.manifests.is_empty() {
        importer = importer.with_candidates(opt.manifests.clone());
    }
    if let Some(network) = &opt.default_network {
        importer = importer.with_default_network(network);
    }

    let outcome = importer
        .run()
        .with_context(|| format!("Failed to import subgraph from {}", opt.from.display()))?;

    info!(logger, "Imported subgraph";
        "sources" => outcome.sources.len(),
        "networks" => outcome.networks.len(),
    );
    Ok(outcome)
}
