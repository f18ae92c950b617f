use crate::{
    error::GenError,
    types::TypeExpr,
    utils::quote,
    verifier::{NameKind, Symbols},
};

/// Renders a type expression as a Rust type.
///
/// Node names and the text alias take the source lifetime (`Expr<'src>`),
/// everything else known to `symbols` is written verbatim, and a generic
/// application is the container applied to its rendered arguments.
pub fn render_type(expr: &TypeExpr, symbols: &Symbols) -> Result<String, GenError> {
    match expr {
        TypeExpr::Atomic(name) => match symbols.kind(name) {
            Some(NameKind::Alias | NameKind::Node) => Ok(format!("{}<{}>", name, symbols.lifetime())),
            Some(NameKind::Plain | NameKind::Opaque) => Ok(name.clone()),
            None => Err(GenError::type_shape(
                quote(name),
                "not a declared node, the text alias, or a primitive",
            )),
        },
        TypeExpr::Generic(container, args) if !args.is_empty() => {
            let args = args
                .iter()
                .map(|arg| render_type(arg, symbols))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{}<{}>", container, args.join(", ")))
        }
        TypeExpr::Generic(..) => Err(GenError::type_shape(
            quote(&expr.to_string()),
            "a container needs at least one argument",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        options::GenOptions,
        types::{NodeDecl, Schema},
        verifier::verify_schema,
    };

    fn symbols() -> Symbols {
        let schema = Schema::new(vec![
            NodeDecl::union("Expr", [("Var", ["Ident"])]),
            NodeDecl::record("Param", [("name", "Ident")]),
            NodeDecl::plain_union("BinOp", ["Add", "Sub"]),
        ]);
        verify_schema(&schema, &GenOptions::default()).unwrap()
    }

    fn render(text: &str) -> String {
        render_type(&text.parse().unwrap(), &symbols()).unwrap()
    }

    #[test]
    fn test_render_atomic() {
        assert_eq!(render("Ident"), "Ident<'src>");
        assert_eq!(render("Expr"), "Expr<'src>");
        assert_eq!(render("BinOp"), "BinOp");
        assert_eq!(render("u32"), "u32");
    }

    #[test]
    fn test_render_is_compositional() {
        let symbols = symbols();
        let args: Vec<TypeExpr> = vec!["Expr".into(), "BinOp".into(), TypeExpr::vec("Param".into())];
        let expr = TypeExpr::generic("Tuple3", args.clone());
        let expected = format!(
            "Tuple3<{}>",
            args.iter()
                .map(|arg| render_type(arg, &symbols).unwrap())
                .collect::<Vec<_>>()
                .join(", ")
        );
        assert_eq!(render_type(&expr, &symbols).unwrap(), expected);
        assert_eq!(expected, "Tuple3<Expr<'src>, BinOp, Vec<Param<'src>>>");
    }

    #[test]
    fn test_render_nested_containers() {
        assert_eq!(render("Option<Box<Expr>>"), "Option<Box<Expr<'src>>>");
        assert_eq!(render("Vec<Option<Ident>>"), "Vec<Option<Ident<'src>>>");
    }

    #[test]
    fn test_render_unknown_name() {
        let err = render_type(&TypeExpr::vec("Stmt".into()), &symbols()).unwrap_err();
        assert!(matches!(err, GenError::UnresolvedTypeShape { ref expr, .. } if expr == "\"Stmt\""));
    }

    #[test]
    fn test_render_custom_lifetime() {
        let options = GenOptions { lifetime: "a".to_string(), ..GenOptions::default() };
        let schema = Schema::new(vec![NodeDecl::record("Param", [("name", "Ident")])]);
        let symbols = verify_schema(&schema, &options).unwrap();
        assert_eq!(render_type(&"Vec<Param>".parse().unwrap(), &symbols).unwrap(), "Vec<Param<'a>>");
    }
}
