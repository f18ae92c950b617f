use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unresolved type shape {expr}: {reason}")]
    UnresolvedTypeShape {
        expr:   String,
        reason: String,
    },

    #[error("Unrecognized variant form {variant} in {node}: {reason}")]
    UnrecognizedVariantForm {
        node:    String,
        variant: String,
        reason:  String,
    },

    #[error("Malformed declaration {decl}: {reason}")]
    MalformedDeclaration {
        decl:   String,
        reason: String,
    },
}

impl GenError {
    pub(crate) fn type_shape(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        GenError::UnresolvedTypeShape { expr: expr.into(), reason: reason.into() }
    }

    pub(crate) fn variant_form(
        node: impl Into<String>,
        variant: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        GenError::UnrecognizedVariantForm {
            node:    node.into(),
            variant: variant.into(),
            reason:  reason.into(),
        }
    }

    pub(crate) fn declaration(decl: impl Into<String>, reason: impl Into<String>) -> Self {
        GenError::MalformedDeclaration { decl: decl.into(), reason: reason.into() }
    }
}
