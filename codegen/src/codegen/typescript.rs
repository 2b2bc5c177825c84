//! Minimal TypeScript declaration rendering.
//!
//! Only the shapes the generators emit are modelled: type-only imports,
//! object type aliases and inline object shapes. Output is already
//! formatted; nothing downstream reflows it.

use std::fmt;

pub const GENERATED_FILE_NOTE: &str = "/* Autogenerated file. Do not edit manually. */";

const INDENT: &str = "  ";

/// `import type { A, B } from "module";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImports {
    pub names: Vec<String>,
    pub module: String,
}

impl ModuleImports {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, module: &str) -> Self {
        ModuleImports {
            names: names.into_iter().map(Into::into).collect(),
            module: module.to_string(),
        }
    }
}

impl fmt::Display for ModuleImports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "import type {{ {} }} from \"{}\";",
            self.names.join(", "),
            self.module
        )
    }
}

/// A member of an object type: `name: ty;` or `name?: ty;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            ty: ty.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Member {
            optional: true,
            ..Member::new(name, ty)
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.optional { "?" } else { "" };
        write!(f, "{}{}: {};", self.name, mark, self.ty)
    }
}

/// `export type Name = { .. };` with one member per line.
pub fn object_alias(name: &str, members: &[Member]) -> String {
    if members.is_empty() {
        return format!("export type {} = {{}};\n", name);
    }
    let mut out = format!("export type {} = {{\n", name);
    for member in members {
        out.push_str(INDENT);
        out.push_str(&member.to_string());
        out.push('\n');
    }
    out.push_str("};\n");
    out
}

/// A single-line object shape: `{ a: string; b: number }`.
pub fn inline_object(members: &[Member]) -> String {
    if members.is_empty() {
        return "{}".to_string();
    }
    let body = members
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    // Drop the separator after the last member.
    format!("{{ {} }}", body.trim_end_matches(';'))
}

/// A closed union of string literals: `"A" | "B"`.
pub fn string_union<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        return "never".to_string();
    }
    values
        .iter()
        .map(|v| format!("\"{}\"", v.as_ref()))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// `T[]`, parenthesizing unions.
pub fn array_of(ty: &str) -> String {
    if ty.contains(" | ") {
        format!("({})[]", ty)
    } else {
        format!("{}[]", ty)
    }
}
