//! Typed declaration generator for Ponder projects.
//!
//! Reads an entity schema and contract ABIs and emits TypeScript types that
//! handler code can be checked against. Can also bootstrap a project from an
//! existing subgraph manifest.

pub mod abi;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod import;
pub mod log;
pub mod schema;
pub mod types;

pub use error::{CodegenError, Result};
