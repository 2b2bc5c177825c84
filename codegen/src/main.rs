use anyhow::Result;
use clap::{Parser, Subcommand};
use slog::info;

use ponder_codegen::commands::{run_codegen, run_import, CodegenOpt, ImportOpt};
use ponder_codegen::log::logger;

#[derive(Parser)]
#[clap(
    name = "ponder-codegen",
    about = "Generate typed entity and handler declarations for Ponder projects",
    version
)]
struct Cli {
    /// Enable debug logging
    #[clap(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript types from the project schema and ABIs
    Codegen(CodegenOpt),

    /// Bootstrap a project from an existing subgraph
    Import(ImportOpt),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = logger(cli.verbose);

    match cli.command {
        Commands::Codegen(opt) => {
            let summary = run_codegen(&logger, opt).await?;
            if !summary.unmapped.is_empty() {
                info!(logger, "Some ABI parameters were typed as `unknown`";
                    "count" => summary.unmapped.len(),
                );
            }
        }
        Commands::Import(opt) => {
            run_import(&logger, opt)?;
        }
    }

    Ok(())
}
