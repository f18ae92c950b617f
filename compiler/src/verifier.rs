use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::{
    error::GenError,
    options::GenOptions,
    parser::IDENTIFIER,
    types::{NodeDecl, Schema, TypeExpr, OPTIONAL, OWNED, SEQUENCE},
    utils::{escape_rust_keyword, is_rust_keyword, quote, to_snake_case},
};

/// Names that may not be declared: the recognized containers and the names
/// the generated files define or import themselves.
pub const RESERVED_NAMES: [&str; 5] = [SEQUENCE, OPTIONAL, OWNED, "Span", "Visitor"];
pub const PRIMITIVE_TYPES: [&str; 18] = [
    "bool", "char", "str", "String",
    "u8", "u16", "u32", "u64", "u128", "usize",
    "i8", "i16", "i32", "i64", "i128", "isize",
    "f32", "f64",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Borrowed source text, e.g. `Ident<'src>`.
    Alias,
    /// A record or union; generic over the source lifetime.
    Node,
    /// A plain union; rendered verbatim.
    Plain,
    /// A primitive or configured opaque type; rendered verbatim.
    Opaque,
}

/// What every atomic name in a schema refers to. Built once per run by
/// `verify_schema` and shared by both emitters.
#[derive(Debug, Clone)]
pub struct Symbols {
    kinds:    HashMap<String, NameKind>,
    lifetime: String,
}

impl Symbols {
    pub fn kind(&self, name: &str) -> Option<NameKind> {
        self.kinds.get(name).copied()
    }

    pub fn is_node(&self, name: &str) -> bool {
        self.kind(name) == Some(NameKind::Node)
    }

    /// True if visiting a value of this type can reach a node.
    pub fn contains_node(&self, expr: &TypeExpr) -> bool {
        match expr {
            TypeExpr::Atomic(name) => self.is_node(name),
            TypeExpr::Generic(_, args) => args.iter().any(|arg| self.contains_node(arg)),
        }
    }

    /// The source lifetime as written in Rust, e.g. `'src`.
    pub fn lifetime(&self) -> &str {
        &self.lifetime
    }
}

fn check_type(
    expr: &TypeExpr,
    kinds: &HashMap<String, NameKind>,
    location: &str,
) -> Result<(), GenError> {
    match expr {
        TypeExpr::Atomic(name) => {
            if !IDENTIFIER.is_match(name) {
                return Err(GenError::type_shape(
                    quote(name),
                    format!("{} is not a type name", location),
                ));
            }
            if !kinds.contains_key(name) {
                return Err(GenError::type_shape(
                    quote(name),
                    format!("{} refers to an undeclared node", location),
                ));
            }
            Ok(())
        }
        TypeExpr::Generic(container, args) => {
            if !IDENTIFIER.is_match(container) || args.is_empty() {
                return Err(GenError::type_shape(
                    quote(&expr.to_string()),
                    format!("{} is not a container applied to arguments", location),
                ));
            }
            for arg in args {
                check_type(arg, kinds, location)?;
            }
            Ok(())
        }
    }
}

/// Lifetime and alias names are spliced into the generated code as written.
fn check_options(options: &GenOptions) -> Result<(), GenError> {
    for (key, value) in [("lifetime", &options.lifetime), ("text_alias", &options.text_alias)] {
        if !IDENTIFIER.is_match(value) || is_rust_keyword(value) {
            return Err(GenError::declaration(
                format!("<options>.{}", key),
                format!("{} is not a usable identifier (the lifetime is given without its quote)", quote(value)),
            ));
        }
    }
    Ok(())
}

fn member_types(decl: &NodeDecl) -> Vec<&TypeExpr> {
    match decl {
        NodeDecl::Record { fields, .. } => fields.iter().map(|field| &field.type_).collect(),
        NodeDecl::Union { variants, .. } => variants.iter().flat_map(|variant| variant.payload.iter()).collect(),
        NodeDecl::PlainUnion { .. } => Vec::new(),
    }
}

/// Nodes whose definition actually uses the source lifetime: the ones that
/// mention the text alias, then, until nothing changes, every node that
/// mentions one of those. A node reaching `'src` only through itself never
/// enters the set.
fn borrowing_nodes<'a>(schema: &'a Schema, kinds: &HashMap<String, NameKind>) -> HashSet<&'a str> {
    let mut borrowing: HashSet<&'a str> = HashSet::new();
    loop {
        let mut changed = false;
        for decl in schema.nodes() {
            if borrowing.contains(decl.name()) {
                continue;
            }
            let borrows = member_types(decl).into_iter().any(|expr| {
                let mut found = false;
                expr.for_each_atom(&mut |atom| {
                    found |= match kinds.get(atom) {
                        Some(NameKind::Alias) => true,
                        Some(NameKind::Node) => borrowing.contains(atom),
                        _ => false,
                    };
                });
                found
            });
            if borrows {
                borrowing.insert(decl.name());
                changed = true;
            }
        }
        if !changed {
            return borrowing;
        }
    }
}

/// Returns the symbol table if the schema is well formed, or the first
/// problem found otherwise.
#[instrument(skip_all, fields(declarations = schema.declarations.len()))]
pub fn verify_schema(schema: &Schema, options: &GenOptions) -> Result<Symbols, GenError> {
    check_options(options)?;

    let mut kinds: HashMap<String, NameKind> = HashMap::new();
    for name in PRIMITIVE_TYPES {
        kinds.insert(name.to_string(), NameKind::Opaque);
    }
    for name in &options.opaque_types {
        kinds.insert(name.clone(), NameKind::Opaque);
    }
    kinds.insert(options.text_alias.clone(), NameKind::Alias);

    // 1) Check duplicate / reserved declaration names, and that no two nodes
    //    share a `visit_*` method name
    let mut method_names: HashMap<String, &str> = HashMap::new();
    for decl in &schema.declarations {
        let name = decl.name();
        if !IDENTIFIER.is_match(name) || is_rust_keyword(name) {
            return Err(GenError::declaration(quote(name), "the name is not an identifier"));
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(GenError::declaration(quote(name), "the name is reserved"));
        }
        let kind = if decl.is_node() { NameKind::Node } else { NameKind::Plain };
        if let Some(previous) = kinds.insert(name.to_string(), kind) {
            let reason = match previous {
                NameKind::Node | NameKind::Plain => "the name is declared twice",
                NameKind::Alias => "the name is the text alias",
                NameKind::Opaque => "the name is a primitive or opaque type",
            };
            return Err(GenError::declaration(quote(name), reason));
        }
        if decl.is_node() {
            let snake = to_snake_case(name);
            if let Some(other) = method_names.insert(snake.clone(), name) {
                return Err(GenError::declaration(
                    quote(name),
                    format!("visit_{} would also be generated for {}", snake, quote(other)),
                ));
            }
        }
    }

    let symbols = Symbols {
        kinds,
        lifetime: options.lifetime(),
    };

    // 2) Check members and type references of each declaration
    for decl in &schema.declarations {
        match decl {
            NodeDecl::Record { name, fields } => {
                let mut seen = HashSet::new();
                for field in fields {
                    // `type` and `type_` are both emitted as `type_`.
                    let emitted = escape_rust_keyword(&field.name);
                    if emitted == "span" || !seen.insert(emitted.clone()) {
                        return Err(GenError::declaration(
                            quote(name),
                            format!("field {} is emitted as {} twice (every node has an implicit span)", quote(&field.name), quote(&emitted)),
                        ));
                    }
                    let location = format!("field {} of {}", quote(&field.name), quote(name));
                    check_type(&field.type_, &symbols.kinds, &location)?;
                }
            }
            NodeDecl::Union { name, variants } => {
                if variants.is_empty() {
                    return Err(GenError::variant_form(quote(name), "<none>", "a union needs at least one variant"));
                }
                let mut seen = HashSet::new();
                for variant in variants {
                    if !IDENTIFIER.is_match(&variant.name) || is_rust_keyword(&variant.name) {
                        return Err(GenError::variant_form(quote(name), quote(&variant.name), "the variant name is not an identifier"));
                    }
                    if !seen.insert(variant.name.as_str()) {
                        return Err(GenError::variant_form(quote(name), quote(&variant.name), "the variant is declared twice"));
                    }
                    for (i, slot) in variant.payload.iter().enumerate() {
                        let location = format!("slot {} of {}::{}", i, name, variant.name);
                        check_type(slot, &symbols.kinds, &location)?;
                    }
                }
            }
            NodeDecl::PlainUnion { name, tags } => {
                let mut seen = HashSet::new();
                for tag in tags {
                    if !IDENTIFIER.is_match(tag) || is_rust_keyword(tag) || !seen.insert(tag.as_str()) {
                        return Err(GenError::declaration(
                            quote(name),
                            format!("tag {} is not a unique identifier", quote(tag)),
                        ));
                    }
                }
            }
        }
    }

    // 3) Every node must carry the source lifetime, or its parameter is unused
    let borrowing = borrowing_nodes(schema, &symbols.kinds);
    if let Some(decl) = schema.nodes().find(|decl| !borrowing.contains(decl.name())) {
        return Err(GenError::declaration(
            quote(decl.name()),
            format!(
                "nothing it holds leads to {}, so its {} parameter would be unused",
                quote(&options.text_alias),
                symbols.lifetime()
            ),
        ));
    }

    debug!(nodes = schema.nodes().count(), "schema verified");
    Ok(symbols)
}
