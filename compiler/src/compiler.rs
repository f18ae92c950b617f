use std::{fs, path::Path};

use tracing::{debug, info, instrument};

use crate::{
    error::GenError,
    gen_ast::emit_definitions,
    gen_visitor::emit_traversal,
    options::GenOptions,
    types::Schema,
    verifier::verify_schema,
};

/// File name of the generated node definitions.
pub const AST_FILE: &str = "ast.rs";
/// File name of the generated visitor and walkers.
pub const VISITOR_FILE: &str = "visitor.rs";

/// Both generated files for one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub ast:     String,
    pub visitor: String,
}

/// Verifies `schema` and renders the node definitions file.
pub fn compile_ast(schema: &Schema, options: &GenOptions) -> Result<String, GenError> {
    let symbols = verify_schema(schema, options)?;
    emit_definitions(schema, &symbols, options)
}

/// Verifies `schema` and renders the visitor file.
pub fn compile_visitor(schema: &Schema, options: &GenOptions) -> Result<String, GenError> {
    let symbols = verify_schema(schema, options)?;
    emit_traversal(schema, &symbols, options)
}

/// Renders both files from a single verification pass.
#[instrument(skip_all)]
pub fn compile_schema(schema: &Schema, options: &GenOptions) -> Result<Generated, GenError> {
    let symbols = verify_schema(schema, options)?;
    let ast = emit_definitions(schema, &symbols, options)?;
    let visitor = emit_traversal(schema, &symbols, options)?;
    debug!(ast_bytes = ast.len(), visitor_bytes = visitor.len(), "schema compiled");
    Ok(Generated { ast, visitor })
}

/// Writes `ast.rs` and `visitor.rs` into `out_dir`, for use from a build
/// script. Nothing is written unless both files generate successfully.
pub fn write_generated(out_dir: &Path, schema: &Schema, options: &GenOptions) -> Result<Generated, GenError> {
    let generated = compile_schema(schema, options)?;
    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join(AST_FILE), &generated.ast)?;
    fs::write(out_dir.join(VISITOR_FILE), &generated.visitor)?;
    info!(dir = %out_dir.display(), "wrote {} and {}", AST_FILE, VISITOR_FILE);
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeDecl, TypeExpr};

    fn schema() -> Schema {
        Schema::new(vec![
            NodeDecl::record("Block", [("stmts", TypeExpr::vec("Stmt".into()))]),
            NodeDecl::union("Stmt", [("Expr", ["Ident"])]),
        ])
    }

    #[test]
    fn test_compile_schema_matches_single_entry_points() {
        let options = GenOptions::default();
        let generated = compile_schema(&schema(), &options).unwrap();
        assert_eq!(generated.ast, compile_ast(&schema(), &options).unwrap());
        assert_eq!(generated.visitor, compile_visitor(&schema(), &options).unwrap());
    }

    #[test]
    fn test_write_generated() {
        let dir = std::env::temp_dir().join(format!("astgen-write-{}", std::process::id()));
        let generated = write_generated(&dir, &schema(), &GenOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(dir.join(AST_FILE)).unwrap(), generated.ast);
        assert_eq!(fs::read_to_string(dir.join(VISITOR_FILE)).unwrap(), generated.visitor);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_generation_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("astgen-nothing-{}", std::process::id()));
        let bad = Schema::new(vec![NodeDecl::record("Block", [("stmts", TypeExpr::vec("Missing".into()))])]);
        assert!(write_generated(&dir, &bad, &GenOptions::default()).is_err());
        assert!(!dir.join(AST_FILE).exists());
    }
}
