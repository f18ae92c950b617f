/// Quotes `text` as a JSON string literal, for use in diagnostics.
pub fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Header lines of every generated file. The first line is the marker tools
/// look for to recognize generated code.
pub fn banner(command: &str) -> Vec<String> {
    vec![
        "// @generated by astgen. DO NOT EDIT.".to_string(),
        format!("// Regenerate with: {}", command),
    ]
}

/// Converts a node name to snake_case for `visit_*`/`walk_*` names.
/// A run of capitals stays one word, so "JSXElement" becomes "jsx_element".
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut snake = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            snake.push(c);
            continue;
        }
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
        let starts_word = match prev {
            None | Some('_') => false,
            Some(p) => !p.is_uppercase() || next_is_lower,
        };
        if starts_word {
            snake.push('_');
        }
        snake.extend(c.to_lowercase());
    }
    snake
}

/// Strict and reserved keywords across editions, including the ones that are
/// only reserved for future use (`try`, `yield`, `gen`, ...).
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn",
    "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield", "_",
];

pub fn is_rust_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s)
}

/// Field names that collide with a keyword get a trailing underscore.
pub fn escape_rust_keyword(s: &str) -> String {
    if is_rust_keyword(s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}
