//! Code generation command.
//!
//! Generates TypeScript types for a project from:
//! - `schema.graphql` (entity instances and models)
//! - the ABI of every contract source in `ponder.config.json`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use futures03::future::try_join_all;
use slog::{debug, info, Logger};

use crate::abi::Abi;
use crate::codegen::{EntityCodeGenerator, GeneratedFile, HandlerCodeGenerator, UnmappedParam};
use crate::config::{ProjectConfig, Source, SCHEMA_FILE};
use crate::env::ENV_VARS;
use crate::error::CodegenError;
use crate::schema::EntitySchema;

#[derive(Clone, Debug, Parser)]
#[clap(about = "Generate TypeScript types for entities and event handlers")]
pub struct CodegenOpt {
    /// Project root containing ponder.config.json and schema.graphql
    #[clap(short = 'r', long, default_value = ".")]
    pub root: PathBuf,

    /// Output directory for generated types, relative to the project root
    #[clap(short = 'o', long)]
    pub output_dir: Option<PathBuf>,
}

impl CodegenOpt {
    pub fn output_dir(&self) -> PathBuf {
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&ENV_VARS.generated_dir));
        self.root.join(dir)
    }
}

/// What a codegen run wrote.
#[derive(Debug, Default)]
pub struct CodegenSummary {
    pub files: Vec<PathBuf>,
    pub unmapped: Vec<UnmappedParam>,
}

/// Run the codegen command.
///
/// Every artifact is rendered before the first one is written, so a fatal
/// error leaves the output directory as it was.
pub async fn run_codegen(logger: &Logger, opt: CodegenOpt) -> Result<CodegenSummary> {
    let config = ProjectConfig::load(&opt.root).context("Failed to load project config")?;

    let entities = generate_entity_types(&opt.root)?;
    let handlers = generate_handler_types(logger, &opt.root, &config.sources).await?;

    let output_dir = opt.output_dir();
    let mut summary = CodegenSummary::default();
    for file in std::iter::once(&entities).chain(handlers.iter().map(|(file, _)| file)) {
        let path = file
            .write(&output_dir)
            .with_context(|| format!("Failed to write {}", file.filename))?;
        info!(logger, "Wrote types"; "path" => %path.display());
        summary.files.push(path);
    }
    summary.unmapped = handlers.into_iter().flat_map(|(_, u)| u).collect();

    Ok(summary)
}

/// Render `entities.ts` from the project's schema.
pub fn generate_entity_types(root: &Path) -> Result<GeneratedFile> {
    let path = root.join(SCHEMA_FILE);
    if !path.is_file() {
        return Err(CodegenError::MissingFile { path }.into());
    }
    let sdl = fs::read_to_string(&path).map_err(|e| CodegenError::io(&path, e))?;
    let schema = EntitySchema::parse(&sdl)?;
    let file = EntityCodeGenerator::new(&schema)
        .generate()
        .context("Failed to generate entity types")?;
    Ok(file)
}

/// Render one handler declaration file per source.
///
/// Sources share nothing, so each one is loaded and rendered on the blocking
/// pool. Results come back in source order.
pub async fn generate_handler_types(
    logger: &Logger,
    root: &Path,
    sources: &[Source],
) -> Result<Vec<(GeneratedFile, Vec<UnmappedParam>)>> {
    let tasks = sources.iter().map(|source| {
        let logger = logger.clone();
        let name = source.name.clone();
        let path = source.abi_path(root);
        async move {
            debug!(logger, "Generating handler types"; "source" => &name, "abi" => %path.display());
            let generated = tokio::task::spawn_blocking(move || {
                let abi = Abi::load(&path)?;
                Ok::<_, CodegenError>(HandlerCodeGenerator::new(&name, &abi).generate(&logger))
            })
            .await
            .context("Handler generation task failed")??;
            Ok::<_, anyhow::Error>(generated)
        }
    });
    try_join_all(tasks).await
}
