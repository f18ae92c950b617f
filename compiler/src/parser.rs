use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::GenError,
    tokenizer::{tokenize_type, Token},
    types::{Field, NodeDecl, Schema, TypeExpr, Variant},
    utils::quote,
};

lazy_static! {
    pub static ref IDENTIFIER:  Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref LEFT_ANGLE:      Regex = Regex::new(r"^<$").unwrap();
    static ref RIGHT_ANGLE:     Regex = Regex::new(r"^>$").unwrap();
    static ref COMMA:           Regex = Regex::new(r"^,$").unwrap();
    static ref EOF:             Regex = Regex::new(r"^$").unwrap();
}

/// Parses the text form of a type expression: `Name` or `Container<Arg, ...>`.
pub fn parse_type(text: &str) -> Result<TypeExpr, GenError> {
    let tokens = tokenize_type(text)?;
    let mut index = 0;

    fn current_token<'a>(tokens: &'a [Token], index: usize) -> &'a Token {
        // The end marker is never consumed, so `index` stays in bounds.
        &tokens[index.min(tokens.len() - 1)]
    }

    fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
        if test.is_match(&current_token(tokens, *index).text) {
            *index += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(text: &str, tokens: &[Token], index: usize, expected: &str) -> GenError {
        let tok = current_token(tokens, index);
        let found = if tok.text.is_empty() { "end of input".to_string() } else { quote(&tok.text) };
        GenError::type_shape(
            quote(text),
            format!("expected {} but found {} at offset {}", expected, found, tok.offset),
        )
    }

    fn parse_expr(text: &str, tokens: &[Token], index: &mut usize) -> Result<TypeExpr, GenError> {
        let name_tok = current_token(tokens, *index);
        if !eat(tokens, index, &IDENTIFIER) {
            return Err(unexpected(text, tokens, *index, "identifier"));
        }
        if !eat(tokens, index, &LEFT_ANGLE) {
            return Ok(TypeExpr::Atomic(name_tok.text.clone()));
        }

        let mut args = vec![parse_expr(text, tokens, index)?];
        while eat(tokens, index, &COMMA) {
            args.push(parse_expr(text, tokens, index)?);
        }
        if !eat(tokens, index, &RIGHT_ANGLE) {
            return Err(unexpected(text, tokens, *index, "\",\" or \">\""));
        }
        Ok(TypeExpr::Generic(name_tok.text.clone(), args))
    }

    let expr = parse_expr(text, &tokens, &mut index)?;
    if !eat(&tokens, &mut index, &EOF) {
        return Err(unexpected(text, &tokens, index, "end of input"));
    }
    Ok(expr)
}

impl FromStr for TypeExpr {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s)
    }
}

/// Converts one raw type: a string in text form, or `[Container, arg, ...]`.
pub fn parse_type_value(value: &Value) -> Result<TypeExpr, GenError> {
    match value {
        Value::String(text) => parse_type(text),
        Value::Array(items) => match items.as_slice() {
            [Value::String(container), args @ ..] if !args.is_empty() => {
                if !IDENTIFIER.is_match(container) {
                    return Err(GenError::type_shape(
                        value.to_string(),
                        format!("container {} is not an identifier", quote(container)),
                    ));
                }
                let args = args
                    .iter()
                    .map(parse_type_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeExpr::Generic(container.clone(), args))
            }
            _ => Err(GenError::type_shape(
                value.to_string(),
                "expected [container, arg, ...] with at least one argument",
            )),
        },
        _ => Err(GenError::type_shape(
            value.to_string(),
            "expected a type name or a [container, arg, ...] list",
        )),
    }
}

fn expect_name<'a>(value: Option<&'a Value>, decl: &Value, what: &str) -> Result<&'a str, GenError> {
    match value {
        Some(Value::String(name)) if IDENTIFIER.is_match(name) => Ok(name.as_str()),
        _ => Err(GenError::declaration(
            decl.to_string(),
            format!("expected {} to be an identifier", what),
        )),
    }
}

fn parse_field(node: &str, value: &Value) -> Result<Field, GenError> {
    match value.as_array().map(Vec::as_slice) {
        Some([Value::String(name), type_]) if IDENTIFIER.is_match(name) => Ok(Field {
            name:  name.clone(),
            type_: parse_type_value(type_)?,
        }),
        _ => Err(GenError::declaration(
            quote(node),
            format!("field {} is not a [name, type] pair", value),
        )),
    }
}

fn parse_variant(node: &str, value: &Value) -> Result<Variant, GenError> {
    match value.as_array().map(Vec::as_slice) {
        Some([Value::String(name), payload @ ..]) if IDENTIFIER.is_match(name) => Ok(Variant {
            name:    name.clone(),
            payload: payload
                .iter()
                .map(parse_type_value)
                .collect::<Result<Vec<_>, _>>()?,
        }),
        _ => Err(GenError::variant_form(
            quote(node),
            value.to_string(),
            "expected [VariantName, type, ...]",
        )),
    }
}

/// Parses one raw declaration:
/// - `["ast", "struct", Name, [field, type], ...]`
/// - `["ast", "enum", Name, [Variant, type, ...], ...]`
/// - `["enum", Name, Tag, ...]`
pub fn parse_declaration(value: &Value) -> Result<NodeDecl, GenError> {
    let items = value.as_array().ok_or_else(|| {
        GenError::declaration(value.to_string(), "expected a declaration list")
    })?;
    let tag = |i: usize| items.get(i).and_then(Value::as_str);

    match (tag(0), tag(1)) {
        (Some("ast"), Some("struct")) => {
            let name = expect_name(items.get(2), value, "the struct name")?;
            let fields = items[3..]
                .iter()
                .map(|field| parse_field(name, field))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NodeDecl::Record { name: name.to_string(), fields })
        }
        (Some("ast"), Some("enum")) => {
            let name = expect_name(items.get(2), value, "the enum name")?;
            let variants = items[3..]
                .iter()
                .map(|variant| parse_variant(name, variant))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NodeDecl::Union { name: name.to_string(), variants })
        }
        (Some("enum"), _) => {
            let name = expect_name(items.get(1), value, "the enum name")?;
            let tags = items[2..]
                .iter()
                .map(|tag| expect_name(Some(tag), value, "every tag").map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NodeDecl::PlainUnion { name: name.to_string(), tags })
        }
        _ => Err(GenError::declaration(
            value.to_string(),
            "expected [\"ast\", \"struct\" | \"enum\", ...] or [\"enum\", ...]",
        )),
    }
}

/// Builds a `Schema` from the raw nested declaration value.
pub fn parse_schema(value: &Value) -> Result<Schema, GenError> {
    let items = value.as_array().ok_or_else(|| {
        GenError::declaration("<schema>", "expected a list of declarations")
    })?;
    let declarations = items
        .iter()
        .map(parse_declaration)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(declarations = declarations.len(), "parsed schema");
    Ok(Schema::new(declarations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_type_nested() {
        let expr = parse_type("Option<Box<Expr>>").unwrap();
        assert_eq!(expr, TypeExpr::option(TypeExpr::boxed(TypeExpr::atomic("Expr"))));
        assert_eq!(expr.to_string(), "Option<Box<Expr>>");
    }

    #[test]
    fn test_parse_type_multiple_args() {
        let expr: TypeExpr = "Map<Ident, Vec<Expr>>".parse().unwrap();
        assert_eq!(
            expr,
            TypeExpr::generic(
                "Map",
                vec![TypeExpr::atomic("Ident"), TypeExpr::vec(TypeExpr::atomic("Expr"))],
            )
        );
    }

    #[test]
    fn test_parse_type_rejects_malformed() {
        for text in ["", "Vec<", "Vec<>", "Vec<Expr", "Vec<Expr>>", "Vec Expr", "Box<Expr,>"] {
            let err = parse_type(text).unwrap_err();
            assert!(
                matches!(err, GenError::UnresolvedTypeShape { .. }),
                "{:?} should be rejected, got {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_parse_type_value_array_form() {
        let expr = parse_type_value(&json!(["Vec", ["Option", "Expr"]])).unwrap();
        assert_eq!(expr, TypeExpr::vec(TypeExpr::option(TypeExpr::atomic("Expr"))));

        let err = parse_type_value(&json!(["Vec"])).unwrap_err();
        assert!(matches!(err, GenError::UnresolvedTypeShape { ref expr, .. } if expr == "[\"Vec\"]"));

        let err = parse_type_value(&json!(42)).unwrap_err();
        assert!(matches!(err, GenError::UnresolvedTypeShape { .. }));
    }

    #[test]
    fn test_parse_schema() {
        let raw = json!([
            ["ast", "struct", "Block", ["stmts", ["Vec", "Stmt"]]],
            ["ast", "enum", "Stmt",
                ["Expr", "Box<Expr>"],
                ["Empty"]],
            ["enum", "BinOp", "Add", "Sub"],
        ]);
        let schema = parse_schema(&raw).unwrap();
        assert_eq!(schema.declarations.len(), 3);
        assert_eq!(
            schema.declarations[0],
            NodeDecl::record("Block", [("stmts", TypeExpr::vec("Stmt".into()))])
        );
        match &schema.declarations[1] {
            NodeDecl::Union { name, variants } => {
                assert_eq!(name, "Stmt");
                assert_eq!(variants[0].name, "Expr");
                assert_eq!(variants[0].payload, vec![TypeExpr::boxed("Expr".into())]);
                assert_eq!(variants[1].name, "Empty");
                assert!(variants[1].payload.is_empty());
            }
            other => panic!("expected a union, got {:?}", other),
        }
        assert_eq!(schema.declarations[2], NodeDecl::plain_union("BinOp", ["Add", "Sub"]));
    }

    #[test]
    fn test_parse_schema_malformed_variant() {
        let raw = json!([["ast", "enum", "Expr", ["Lit", "Ident"], "Bin"]]);
        let err = parse_schema(&raw).unwrap_err();
        assert!(
            matches!(err, GenError::UnrecognizedVariantForm { ref variant, .. } if variant == "\"Bin\""),
            "got {:?}",
            err
        );
    }

    #[test]
    fn test_parse_schema_unknown_declaration() {
        let raw = json!([["ast", "trait", "Foo"]]);
        let err = parse_schema(&raw).unwrap_err();
        assert!(matches!(err, GenError::MalformedDeclaration { .. }));

        let raw = json!([["ast", "struct", "Foo", ["bar"]]]);
        let err = parse_schema(&raw).unwrap_err();
        assert!(matches!(err, GenError::MalformedDeclaration { .. }));
    }
}
