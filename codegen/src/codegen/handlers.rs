//! Handler type generation.
//!
//! For one contract source, emits `<Source>.d.ts` with an event payload
//! interface and a handler function type per event, plus the source's
//! handler-set type. ABI parameter families without a mapping become
//! `unknown` and are reported, never fatal.

use std::collections::HashSet;

use slog::{debug, warn, Logger};

use super::typescript::{inline_object, object_alias, Member, ModuleImports, GENERATED_FILE_NOTE};
use super::GeneratedFile;
use crate::abi::{event_base_name, Abi, Param, ParamKind};
use crate::types::{ts_type_for_abi_base_type, UNKNOWN_TYPE};

/// An ABI parameter rendered as `unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedParam {
    pub source: String,
    pub event: String,
    /// Dotted path through enclosing tuples, e.g. `order.amounts.take`.
    pub param: String,
    pub ty: String,
}

pub struct HandlerCodeGenerator<'a> {
    source: &'a str,
    abi: &'a Abi,
}

impl<'a> HandlerCodeGenerator<'a> {
    pub fn new(source: &'a str, abi: &'a Abi) -> Self {
        Self { source, abi }
    }

    pub fn filename(&self) -> String {
        format!("{}.d.ts", self.source)
    }

    /// Render the handler types for this source. Every unmapped parameter is
    /// logged once and returned alongside the file.
    pub fn generate(&self, logger: &Logger) -> (GeneratedFile, Vec<UnmappedParam>) {
        let mut unmapped = Vec::new();
        let mut seen = HashSet::new();
        let mut events = String::new();
        let mut handlers = Vec::new();

        for event in &self.abi.events {
            let signature = event.signature();
            let name = event_base_name(&signature);
            if !seen.insert(name.to_string()) {
                warn!(logger, "Skipping overloaded event";
                    "source" => self.source,
                    "signature" => &signature,
                );
                continue;
            }
            debug!(logger, "Generating event types";
                "source" => self.source,
                "signature" => &signature,
            );

            let mut ctx = ParamContext {
                logger,
                source: self.source,
                event: name,
                unmapped: &mut unmapped,
            };
            events.push_str(&event_types(name, &ctx.shape(&event.inputs, "")));
            handlers.push(Member::optional(name, format!("{}Handler", name)));
        }

        let mut content = String::new();
        content.push_str(GENERATED_FILE_NOTE);
        content.push_str("\n\n");
        content.push_str(&format!(
            "{}\n{}\n\n{}\n",
            ModuleImports::new(["Block", "EventLog", "Transaction"], "@ponder/ponder"),
            ModuleImports::new(["BigNumber", "Bytes"], "ethers"),
            ModuleImports::new(["Context"], "./context"),
        ));
        content.push('\n');
        content.push_str(&events);
        if !events.is_empty() {
            content.push('\n');
        }
        content.push_str(&object_alias(&format!("{}Handlers", self.source), &handlers));

        let file = GeneratedFile {
            filename: self.filename(),
            content,
        };
        (file, unmapped)
    }
}

fn event_types(name: &str, params: &str) -> String {
    format!(
        "export interface {name}Event extends EventLog {{\n  \
         name: \"{name}\";\n  \
         params: {params};\n  \
         block: Block;\n  \
         transaction: Transaction;\n\
         }}\n\
         export type {name}Handler = (event: {name}Event, context: Context) => void;\n",
        name = name,
        params = params,
    )
}

struct ParamContext<'a, 'b> {
    logger: &'a Logger,
    source: &'a str,
    event: &'a str,
    unmapped: &'b mut Vec<UnmappedParam>,
}

impl ParamContext<'_, '_> {
    fn shape(&mut self, params: &[Param], prefix: &str) -> String {
        let members: Vec<Member> = params
            .iter()
            .map(|param| {
                let path = if prefix.is_empty() {
                    param.name.clone()
                } else {
                    format!("{}.{}", prefix, param.name)
                };
                let ty = match &param.kind {
                    ParamKind::Tuple(children) => self.shape(children, &path),
                    ParamKind::Value(_) => self.value_type(param, path),
                };
                Member::new(&param.name, ty)
            })
            .collect();
        inline_object(&members)
    }

    fn value_type(&mut self, param: &Param, path: String) -> String {
        if let Some(ty) = ts_type_for_abi_base_type(param.base_type()) {
            return ty.to_string();
        }
        let ty = match &param.kind {
            ParamKind::Value(ty) => ty.clone(),
            ParamKind::Tuple(_) => "tuple".to_string(),
        };
        warn!(self.logger, "Unhandled ABI parameter type, using `unknown`";
            "source" => self.source,
            "event" => self.event,
            "param" => &path,
            "type" => &ty,
        );
        self.unmapped.push(UnmappedParam {
            source: self.source.to_string(),
            event: self.event.to_string(),
            param: path,
            ty,
        });
        UNKNOWN_TYPE.to_string()
    }
}
