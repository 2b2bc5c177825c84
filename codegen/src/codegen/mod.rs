//! TypeScript type generation.
//!
//! This module generates TypeScript declarations from:
//! - an entity schema (instance shapes and data-access models)
//! - contract ABIs (event payloads and handler signatures)
//!
//! Generators are pure: they return [`GeneratedFile`]s and leave writing to
//! the caller.

mod entities;
mod handlers;
mod typescript;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CodegenError, Result};

pub use entities::{EntityCodeGenerator, ENTITIES_FILE};
pub use handlers::{HandlerCodeGenerator, UnmappedParam};
pub use typescript::{
    array_of, inline_object, object_alias, string_union, Member, ModuleImports,
    GENERATED_FILE_NOTE,
};

/// One output artifact, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
}

impl GeneratedFile {
    /// Write the file into `dir`, creating the directory if needed.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| CodegenError::io(dir, e))?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content).map_err(|e| CodegenError::io(&path, e))?;
        Ok(path)
    }
}
