use std::fmt;

use serde::Serialize;

/// Container name for sequences.
pub const SEQUENCE: &str = "Vec";
/// Container name for optional slots.
pub const OPTIONAL: &str = "Option";
/// Container name for owned (boxed) slots.
pub const OWNED: &str = "Box";

/// A field or payload type as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeExpr {
    Atomic(String),
    Generic(String, Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn atomic(name: impl Into<String>) -> Self {
        TypeExpr::Atomic(name.into())
    }

    pub fn generic(container: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic(container.into(), args)
    }

    pub fn vec(arg: TypeExpr) -> Self {
        TypeExpr::generic(SEQUENCE, vec![arg])
    }

    pub fn option(arg: TypeExpr) -> Self {
        TypeExpr::generic(OPTIONAL, vec![arg])
    }

    pub fn boxed(arg: TypeExpr) -> Self {
        TypeExpr::generic(OWNED, vec![arg])
    }

    /// Calls `f` on every atomic name in the expression, left to right.
    pub fn for_each_atom<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            TypeExpr::Atomic(name) => f(name.as_str()),
            TypeExpr::Generic(_, args) => {
                for arg in args {
                    arg.for_each_atom(f);
                }
            }
        }
    }
}

/// A bare name is always atomic; use `str::parse` for the `Container<Arg>` text form.
impl From<&str> for TypeExpr {
    fn from(name: &str) -> Self {
        TypeExpr::Atomic(name.to_string())
    }
}

impl From<String> for TypeExpr {
    fn from(name: String) -> Self {
        TypeExpr::Atomic(name)
    }
}

/// Prints the schema text form, e.g. `Option<Box<Expr>>`.
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Atomic(name) => f.write_str(name),
            TypeExpr::Generic(container, args) => {
                write!(f, "{}<", container)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name:  String,
    #[serde(rename = "type")]
    pub type_: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name:    String,
    pub payload: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeDecl {
    /// A struct with an implicit leading `span`.
    Record {
        name:   String,
        fields: Vec<Field>,
    },
    /// An enum whose variants each carry a span as their first slot.
    Union {
        name:     String,
        variants: Vec<Variant>,
    },
    /// A closed enumeration of bare tags: no span, no payload.
    PlainUnion {
        name: String,
        tags: Vec<String>,
    },
}

impl NodeDecl {
    pub fn record<N, T>(name: impl Into<String>, fields: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<TypeExpr>,
    {
        NodeDecl::Record {
            name:   name.into(),
            fields: fields
                .into_iter()
                .map(|(name, type_)| Field { name: name.into(), type_: type_.into() })
                .collect(),
        }
    }

    pub fn union<N, P>(name: impl Into<String>, variants: impl IntoIterator<Item = (N, P)>) -> Self
    where
        N: Into<String>,
        P: IntoIterator,
        P::Item: Into<TypeExpr>,
    {
        NodeDecl::Union {
            name:     name.into(),
            variants: variants
                .into_iter()
                .map(|(name, payload)| Variant {
                    name:    name.into(),
                    payload: payload.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    pub fn plain_union<T: Into<String>>(name: impl Into<String>, tags: impl IntoIterator<Item = T>) -> Self {
        NodeDecl::PlainUnion {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeDecl::Record { name, .. }
            | NodeDecl::Union { name, .. }
            | NodeDecl::PlainUnion { name, .. } => name,
        }
    }

    /// Records and unions are nodes: they carry a span and get a visitor method.
    pub fn is_node(&self) -> bool {
        !matches!(self, NodeDecl::PlainUnion { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub declarations: Vec<NodeDecl>,
}

impl Schema {
    pub fn new(declarations: Vec<NodeDecl>) -> Self {
        Schema { declarations }
    }

    /// Declarations that get a visitor method and walker, in schema order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDecl> {
        self.declarations.iter().filter(|decl| decl.is_node())
    }
}
