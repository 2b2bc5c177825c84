//! Skeleton handler modules written by the importer.
//!
//! These files are meant to be edited, so they carry no autogenerated note.

use crate::codegen::{GeneratedFile, ModuleImports};

pub const HANDLERS_DIR: &str = "handlers";
pub const INDEX_FILE: &str = "index.ts";

/// `handlers/<Source>.ts` with one no-op handler per event.
pub fn handler_stub(source: &str, events: &[String]) -> GeneratedFile {
    let mut content = String::new();

    if !events.is_empty() {
        let types = events.iter().map(|e| format!("{}Handler", e));
        content.push_str(&format!(
            "{}\n\n",
            ModuleImports::new(types, &format!("../generated/{}", source))
        ));
    }

    for event in events {
        content.push_str(&format!(
            "const handle{event}: {event}Handler = async (event, context) => {{\n  return;\n}};\n\n",
            event = event
        ));
    }

    if events.is_empty() {
        content.push_str(&format!("export const {} = {{}};\n", source));
    } else {
        content.push_str(&format!("export const {} = {{\n", source));
        for event in events {
            content.push_str(&format!("  {}: handle{},\n", event, event));
        }
        content.push_str("};\n");
    }

    GeneratedFile {
        filename: format!("{}.ts", source),
        content,
    }
}

/// `handlers/index.ts`, default-exporting every source's handlers.
pub fn handler_index(sources: &[String]) -> GeneratedFile {
    let mut content = String::new();
    for source in sources {
        content.push_str(&format!("import {{ {0} }} from \"./{0}\";\n", source));
    }
    if !sources.is_empty() {
        content.push('\n');
    }

    if sources.is_empty() {
        content.push_str("export default {};\n");
    } else {
        content.push_str("export default {\n");
        for source in sources {
            content.push_str(&format!("  {0}: {0},\n", source));
        }
        content.push_str("};\n");
    }

    GeneratedFile {
        filename: INDEX_FILE.to_string(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_stub() {
        let stub = handler_stub("ERC20", &["Transfer".to_string(), "Approval".to_string()]);
        assert_eq!(stub.filename, "ERC20.ts");
        assert_eq!(
            stub.content,
            r#"import type { TransferHandler, ApprovalHandler } from "../generated/ERC20";

const handleTransfer: TransferHandler = async (event, context) => {
  return;
};

const handleApproval: ApprovalHandler = async (event, context) => {
  return;
};

export const ERC20 = {
  Transfer: handleTransfer,
  Approval: handleApproval,
};
"#
        );
    }

    #[test]
    fn test_stub_without_handlers() {
        let stub = handler_stub("Vault", &[]);
        assert_eq!(stub.content, "export const Vault = {};\n");
    }

    #[test]
    fn test_handler_index() {
        let index = handler_index(&["ERC20".to_string(), "Vault".to_string()]);
        assert_eq!(index.filename, "index.ts");
        assert_eq!(
            index.content,
            r#"import { ERC20 } from "./ERC20";
import { Vault } from "./Vault";

export default {
  ERC20: ERC20,
  Vault: Vault,
};
"#
        );
        assert_eq!(handler_index(&[]).content, "export default {};\n");
    }
}
