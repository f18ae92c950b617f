use serde::Deserialize;

/// Knobs for the generated output. Every field has a default, so a JSON
/// options file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenOptions {
    /// Lifetime of the source buffer, without the leading quote.
    pub lifetime:           String,
    /// Atomic name that stands for borrowed source text.
    pub text_alias:         String,
    /// Path the definitions file imports `Span` from.
    pub span_import:        String,
    /// Module the visitor file glob-imports the node definitions from.
    pub ast_module:         String,
    /// Extra names rendered verbatim (type parameters, external types).
    pub opaque_types:       Vec<String>,
    /// Command recorded in the banner of the definitions file.
    pub ast_command:        String,
    /// Command recorded in the banner of the visitor file.
    pub visitor_command:    String,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            lifetime:        "src".to_string(),
            text_alias:      "Ident".to_string(),
            span_import:     "crate::Span".to_string(),
            ast_module:      "crate::ast".to_string(),
            opaque_types:    Vec::new(),
            ast_command:     "cargo run -p astgen-cli -- ast".to_string(),
            visitor_command: "cargo run -p astgen-cli -- visitor".to_string(),
        }
    }
}

impl GenOptions {
    /// Reads options from JSON; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The lifetime as written in Rust, e.g. `'src`.
    pub fn lifetime(&self) -> String {
        format!("'{}", self.lifetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_keep_defaults() {
        let options = GenOptions::from_json(r#"{ "lifetime": "a", "opaque_types": ["Number"] }"#).unwrap();
        assert_eq!(options.lifetime(), "'a");
        assert_eq!(options.opaque_types, vec!["Number".to_string()]);
        assert_eq!(options.text_alias, "Ident");
        assert_eq!(options.span_import, "crate::Span");
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert!(GenOptions::from_json(r#"{ "lifetimes": "a" }"#).is_err());
    }
}
