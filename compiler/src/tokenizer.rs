use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::quote;
use crate::error::GenError;

lazy_static! {
    pub static ref TOKEN_REGEX:    Regex = Regex::new(r"([<>,]|\b[A-Za-z_][A-Za-z0-9_]*\b|\s+)").unwrap();
    pub static ref WHITESPACE_RX:  Regex = Regex::new(r"^\s+$").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub text:   String,
    pub offset: usize,
}

/// Splits a type expression such as `Option<Box<Expr>>` into tokens.
/// The last token is always an empty end marker.
pub fn tokenize_type(text: &str) -> Result<Vec<Token>, GenError> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let part  = mat.as_str();

        if start > last_end {
            // Unexpected text between last_end and start
            return Err(GenError::type_shape(
                quote(text),
                format!("unexpected {} at offset {}", quote(&text[last_end..start]), last_end),
            ));
        }

        if !WHITESPACE_RX.is_match(part) {
            tokens.push(Token {
                text:   part.to_string(),
                offset: start,
            });
        }

        last_end = mat.end();
    }

    if last_end != text.len() {
        return Err(GenError::type_shape(
            quote(text),
            format!("unexpected {} at offset {}", quote(&text[last_end..]), last_end),
        ));
    }

    tokens.push(Token {
        text:   "".to_string(),
        offset: text.len(),
    });
    Ok(tokens)
}
