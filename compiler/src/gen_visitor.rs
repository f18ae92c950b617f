use tracing::trace;

use crate::{
    error::GenError,
    options::GenOptions,
    types::{Field, NodeDecl, Schema, TypeExpr, Variant, OPTIONAL, OWNED, SEQUENCE},
    utils::{banner, escape_rust_keyword, quote, to_snake_case},
    verifier::Symbols,
};

/// Emits the visitor file: a `Visitor` trait with one default `visit_*`
/// method per record/union and the matching `walk_*` functions.
/// Plain unions have no children and are skipped.
pub fn emit_traversal(schema: &Schema, symbols: &Symbols, options: &GenOptions) -> Result<String, GenError> {
    let lt = symbols.lifetime();
    let mut rust_code: Vec<String> = banner(&options.visitor_command);
    rust_code.push(format!("use {}::*;", options.ast_module));
    rust_code.push("".to_string());

    rust_code.push(format!("pub trait Visitor<{}>: Sized {{", lt));
    for (i, decl) in schema.nodes().enumerate() {
        if i > 0 {
            rust_code.push("".to_string());
        }
        let snake = to_snake_case(decl.name());
        rust_code.push(format!("    fn visit_{}(&mut self, node: &{}<{}>) {{", snake, decl.name(), lt));
        rust_code.push(format!("        walk_{}(self, node)", snake));
        rust_code.push("    }".to_string());
    }
    rust_code.push("}".to_string());

    for decl in schema.nodes() {
        trace!(name = decl.name(), "emitting walker");
        rust_code.push("".to_string());
        rust_code.push(format!(
            "pub fn walk_{}<{lt}, V: Visitor<{lt}>>(visitor: &mut V, node: &{}<{lt}>) {{",
            to_snake_case(decl.name()),
            decl.name(),
            lt = lt
        ));
        match decl {
            NodeDecl::Record { fields, .. } => walk_struct(fields, symbols, &mut rust_code)?,
            NodeDecl::Union { name, variants } => walk_enum(name, variants, symbols, &mut rust_code)?,
            NodeDecl::PlainUnion { .. } => {}
        }
        rust_code.push("}".to_string());
    }

    rust_code.push("".to_string());
    Ok(rust_code.join("\n"))
}

fn walk_struct(fields: &[Field], symbols: &Symbols, lines: &mut Vec<String>) -> Result<(), GenError> {
    let mut visited = false;
    for field in fields {
        if symbols.contains_node(&field.type_) {
            let value = format!("&node.{}", escape_rust_keyword(&field.name));
            visit_value(&field.type_, &value, 1, symbols, lines)?;
            visited = true;
        }
    }
    if !visited {
        lines.push("    let _ = (visitor, node);".to_string());
    }
    Ok(())
}

fn walk_enum(name: &str, variants: &[Variant], symbols: &Symbols, lines: &mut Vec<String>) -> Result<(), GenError> {
    let visits_any = variants
        .iter()
        .flat_map(|variant| variant.payload.iter())
        .any(|slot| symbols.contains_node(slot));
    if !visits_any {
        lines.push("    let _ = visitor;".to_string());
    }

    lines.push("    match node {".to_string());
    for variant in variants {
        if !variant.payload.iter().any(|slot| symbols.contains_node(slot)) {
            lines.push(format!("        {}::{}(..) => {{}}", name, variant.name));
            continue;
        }

        // Slots that hold no node are bound to `_`.
        let mut patterns = vec!["_".to_string()];
        for (i, slot) in variant.payload.iter().enumerate() {
            if symbols.contains_node(slot) {
                patterns.push(format!("f{}", i));
            } else {
                patterns.push("_".to_string());
            }
        }
        lines.push(format!("        {}::{}({}) => {{", name, variant.name, patterns.join(", ")));
        for (i, slot) in variant.payload.iter().enumerate() {
            visit_value(slot, &format!("f{}", i), 3, symbols, lines)?;
        }
        lines.push("        }".to_string());
    }
    lines.push("    }".to_string());
    Ok(())
}

/// Emits the traversal of `value` (an expression of type `&T` for the
/// schema type `expr`), recursing through `Vec`, `Option` and `Box` down to
/// the node visits. Types without any node inside emit nothing.
fn visit_value(
    expr: &TypeExpr,
    value: &str,
    depth: usize,
    symbols: &Symbols,
    lines: &mut Vec<String>,
) -> Result<(), GenError> {
    if !symbols.contains_node(expr) {
        return Ok(());
    }
    let indent = "    ".repeat(depth);

    match expr {
        TypeExpr::Atomic(name) => {
            lines.push(format!("{}visitor.visit_{}({});", indent, to_snake_case(name), value));
        }
        TypeExpr::Generic(container, args) if args.len() == 1 && container == SEQUENCE => {
            lines.push(format!("{}for item in {} {{", indent, value));
            visit_value(&args[0], "item", depth + 1, symbols, lines)?;
            lines.push(format!("{}}}", indent));
        }
        TypeExpr::Generic(container, args) if args.len() == 1 && container == OPTIONAL => {
            lines.push(format!("{}if let Some(item) = {} {{", indent, value));
            visit_value(&args[0], "item", depth + 1, symbols, lines)?;
            lines.push(format!("{}}}", indent));
        }
        TypeExpr::Generic(container, args) if args.len() == 1 && container == OWNED => {
            // `&Box<Node>` coerces to `&Node` at the call; anything else
            // needs the box dereferenced before it can be matched on.
            match &args[0] {
                TypeExpr::Atomic(_) => visit_value(&args[0], value, depth, symbols, lines)?,
                inner => visit_value(inner, &format!("&**{}", value), depth, symbols, lines)?,
            }
        }
        TypeExpr::Generic(container, _) => {
            return Err(GenError::type_shape(
                quote(&expr.to_string()),
                format!(
                    "cannot traverse {} holding nodes; only {}<T>, {}<T> and {}<T> are walked",
                    quote(container),
                    SEQUENCE,
                    OPTIONAL,
                    OWNED
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::verify_schema;

    fn emit(declarations: Vec<NodeDecl>) -> Result<String, GenError> {
        let schema = Schema::new(declarations);
        let options = GenOptions::default();
        let symbols = verify_schema(&schema, &options)?;
        emit_traversal(&schema, &symbols, &options)
    }

    fn ty(text: &str) -> TypeExpr {
        text.parse().unwrap()
    }

    fn stmt_and_expr() -> Vec<NodeDecl> {
        vec![
            NodeDecl::union("Stmt", [("Expr", vec![ty("Box<Expr>")])]),
            NodeDecl::union(
                "Expr",
                [
                    ("Lit", vec![ty("Ident")]),
                    ("Bin", vec![ty("Box<Expr>"), ty("Box<Expr>")]),
                ],
            ),
        ]
    }

    #[test]
    fn test_visitor_trait() {
        let mut decls = stmt_and_expr();
        decls.push(NodeDecl::plain_union("BinOp", ["Add"]));
        let code = emit(decls).unwrap();
        let expected = [
            "use crate::ast::*;",
            "",
            "pub trait Visitor<'src>: Sized {",
            "    fn visit_stmt(&mut self, node: &Stmt<'src>) {",
            "        walk_stmt(self, node)",
            "    }",
            "",
            "    fn visit_expr(&mut self, node: &Expr<'src>) {",
            "        walk_expr(self, node)",
            "    }",
            "}",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
        assert!(!code.contains("bin_op"));
    }

    #[test]
    fn test_sequence_field() {
        let mut decls = stmt_and_expr();
        decls.insert(0, NodeDecl::record("Block", [("stmts", ty("Vec<Stmt>"))]));
        let code = emit(decls).unwrap();
        let expected = [
            "pub fn walk_block<'src, V: Visitor<'src>>(visitor: &mut V, node: &Block<'src>) {",
            "    for item in &node.stmts {",
            "        visitor.visit_stmt(item);",
            "    }",
            "}",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
    }

    #[test]
    fn test_union_walker_visits_boxed_children_in_order() {
        let code = emit(stmt_and_expr()).unwrap();
        let expected = [
            "pub fn walk_expr<'src, V: Visitor<'src>>(visitor: &mut V, node: &Expr<'src>) {",
            "    match node {",
            "        Expr::Lit(..) => {}",
            "        Expr::Bin(_, f0, f1) => {",
            "            visitor.visit_expr(f0);",
            "            visitor.visit_expr(f1);",
            "        }",
            "    }",
            "}",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
    }

    #[test]
    fn test_optional_shapes() {
        let mut decls = stmt_and_expr();
        decls.push(NodeDecl::record(
            "Return",
            [
                ("label", ty("Option<Ident>")),
                ("value", ty("Option<Box<Expr>>")),
                ("rest", ty("Option<Expr>")),
            ],
        ));
        let code = emit(decls).unwrap();
        let expected = [
            "pub fn walk_return<'src, V: Visitor<'src>>(visitor: &mut V, node: &Return<'src>) {",
            "    if let Some(item) = &node.value {",
            "        visitor.visit_expr(item);",
            "    }",
            "    if let Some(item) = &node.rest {",
            "        visitor.visit_expr(item);",
            "    }",
            "}",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
    }

    #[test]
    fn test_nested_shapes() {
        let mut decls = stmt_and_expr();
        decls.push(NodeDecl::union(
            "Nested",
            [
                ("Grid", vec![ty("Vec<Vec<Expr>>")]),
                ("Holes", vec![ty("Ident"), ty("Vec<Option<Expr>>")]),
                ("Boxed", vec![ty("Box<Option<Expr>>")]),
            ],
        ));
        let code = emit(decls).unwrap();
        let expected = [
            "    match node {",
            "        Nested::Grid(_, f0) => {",
            "            for item in f0 {",
            "                for item in item {",
            "                    visitor.visit_expr(item);",
            "                }",
            "            }",
            "        }",
            "        Nested::Holes(_, _, f1) => {",
            "            for item in f1 {",
            "                if let Some(item) = item {",
            "                    visitor.visit_expr(item);",
            "                }",
            "            }",
            "        }",
            "        Nested::Boxed(_, f0) => {",
            "            if let Some(item) = &**f0 {",
            "                visitor.visit_expr(item);",
            "            }",
            "        }",
            "    }",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
    }

    #[test]
    fn test_sequence_of_alias_is_a_leaf() {
        let code = emit(vec![NodeDecl::record("Names", [("names", ty("Option<Vec<Ident>>"))])]).unwrap();
        let expected = [
            "pub fn walk_names<'src, V: Visitor<'src>>(visitor: &mut V, node: &Names<'src>) {",
            "    let _ = (visitor, node);",
            "}",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
        assert!(!code.contains("visitor.visit_"));
    }

    #[test]
    fn test_leaf_only_union_still_matches_every_variant() {
        let code = emit(vec![NodeDecl::union("Lit", [("Str", ["Ident"]), ("Num", ["Ident"])])]).unwrap();
        let expected = [
            "    let _ = visitor;",
            "    match node {",
            "        Lit::Str(..) => {}",
            "        Lit::Num(..) => {}",
            "    }",
        ]
        .join("\n");
        assert!(code.contains(&expected), "generated:\n{}", code);
    }

    #[test]
    fn test_unsupported_container_over_nodes() {
        let mut decls = stmt_and_expr();
        decls.push(NodeDecl::record(
            "Shared",
            [("expr", TypeExpr::generic("Rc", vec!["Expr".into()]))],
        ));
        let err = emit(decls).unwrap_err();
        match err {
            GenError::UnresolvedTypeShape { expr, .. } => assert_eq!(expr, "\"Rc<Expr>\""),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_container_over_leaves_is_ignored() {
        let mut decls = stmt_and_expr();
        decls.push(NodeDecl::record(
            "Pair",
            [("names", TypeExpr::generic("Map", vec!["Ident".into(), "u32".into()])), ("expr", "Expr".into())],
        ));
        let code = emit(decls).unwrap();
        assert!(code.contains("    visitor.visit_expr(&node.expr);\n}"), "generated:\n{}", code);
    }
}
