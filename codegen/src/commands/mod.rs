mod codegen;
mod import;

pub use codegen::{
    generate_entity_types, generate_handler_types, run_codegen, CodegenOpt, CodegenSummary,
};
pub use import::{run_import, ImportOpt};
