use tracing::trace;

use crate::{
    error::GenError,
    options::GenOptions,
    render::render_type,
    types::{Field, NodeDecl, Schema, Variant},
    utils::{banner, escape_rust_keyword},
    verifier::Symbols,
};

/// Emits the node definitions file: one struct or enum per declaration, in
/// schema order, each node with a `span()` accessor.
pub fn emit_definitions(schema: &Schema, symbols: &Symbols, options: &GenOptions) -> Result<String, GenError> {
    let mut rust_code: Vec<String> = banner(&options.ast_command);
    rust_code.push(format!("use {};", options.span_import));
    rust_code.push("".to_string());
    rust_code.push(format!(
        "pub type {}<{lt}> = &{lt} str;",
        options.text_alias,
        lt = symbols.lifetime()
    ));

    for decl in &schema.declarations {
        trace!(name = decl.name(), "emitting definition");
        rust_code.push("".to_string());
        match decl {
            NodeDecl::Record { name, fields } => {
                rust_code.push(generate_struct(name, fields, symbols)?);
            }
            NodeDecl::Union { name, variants } => {
                rust_code.push(generate_enum(name, variants, symbols)?);
            }
            NodeDecl::PlainUnion { name, tags } => {
                rust_code.push(generate_plain_enum(name, tags));
            }
        }
    }

    rust_code.push("".to_string());
    Ok(rust_code.join("\n"))
}

fn generate_struct(name: &str, fields: &[Field], symbols: &Symbols) -> Result<String, GenError> {
    let mut lines = Vec::new();
    lines.push("#[derive(Debug)]".to_string());
    lines.push(format!("pub struct {}<{}> {{", name, symbols.lifetime()));
    lines.push("    pub span: Span,".to_string());
    for field in fields {
        lines.push(format!(
            "    pub {}: {},",
            escape_rust_keyword(&field.name),
            render_type(&field.type_, symbols)?
        ));
    }
    lines.push("}".to_string());
    lines.push(format!("impl {}<'_> {{", name));
    lines.push("    pub fn span(&self) -> Span {".to_string());
    lines.push("        self.span".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    Ok(lines.join("\n"))
}

fn generate_enum(name: &str, variants: &[Variant], symbols: &Symbols) -> Result<String, GenError> {
    let mut lines = Vec::new();
    lines.push("#[derive(Debug)]".to_string());
    lines.push(format!("pub enum {}<{}> {{", name, symbols.lifetime()));
    for variant in variants {
        let mut slots = vec!["Span".to_string()];
        for slot in &variant.payload {
            slots.push(render_type(slot, symbols)?);
        }
        lines.push(format!("    {}({}),", variant.name, slots.join(", ")));
    }
    lines.push("}".to_string());

    // Every variant stores its span first; the match stays exhaustive.
    lines.push(format!("impl {}<'_> {{", name));
    lines.push("    pub fn span(&self) -> Span {".to_string());
    lines.push("        match self {".to_string());
    for variant in variants {
        lines.push(format!("            {}::{}(span, ..) => *span,", name, variant.name));
    }
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    Ok(lines.join("\n"))
}

fn generate_plain_enum(name: &str, tags: &[String]) -> String {
    let mut lines = Vec::new();
    lines.push("#[derive(Debug, Clone, Copy, PartialEq, Eq)]".to_string());
    lines.push(format!("pub enum {} {{", name));
    for tag in tags {
        lines.push(format!("    {},", tag));
    }
    lines.push("}".to_string());
    lines.join("\n")
}
