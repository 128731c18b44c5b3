//! Free-variable extraction and the legal-name predicate

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexer::tokenize;
use crate::token::TokenKind;

/// Matches `$identifier` or `${anything up to the closing brace}` inside
/// expandable string content.
static INTERPOLATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z0-9_]+)|\$\{([^}]+)\}").unwrap());

/// All variable names referenced by a script, case-insensitively
/// deduplicated (first-seen spelling wins), in discovery order.
///
/// Covers direct `$name` / `${name}` references plus interpolation forms
/// embedded in string literals. Best-effort: a script that fails to tokenize
/// yields an empty list.
pub fn extract_variables(script: &str) -> Vec<String> {
    let tokens = match tokenize(script) {
        Ok(tokens) => tokens,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut add = |name: &str| {
        let folded = name.to_ascii_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            names.push(name.to_string());
        }
    };

    for token in &tokens {
        match token.kind {
            TokenKind::Variable => add(&token.text),
            TokenKind::String => {
                for captures in INTERPOLATION.captures_iter(&token.text) {
                    if let Some(name) = captures.get(1).or_else(|| captures.get(2)) {
                        add(name.as_str());
                    }
                }
            }
            _ => {}
        }
    }

    names
}

/// Referenced variables that are legal for environment injection
pub fn extract_assignable_variables(script: &str) -> Vec<String> {
    extract_variables(script)
        .into_iter()
        .filter(|name| is_legal_variable_name(name))
        .collect()
}

/// Whether a character may appear in a basic variable name
pub fn is_legal_basic_variable_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a character may appear in an expanded (braced) variable name
pub fn is_legal_expanded_variable_char(c: char) -> bool {
    is_legal_basic_variable_char(c) || c == '-' || c == '.' || c == ' '
}

/// Whether a name is safe to inject into a script session: non-empty, at
/// most 50 characters, no leading or trailing whitespace, and every
/// character alphanumeric, `_`, `-`, `.`, or space.
pub fn is_legal_variable_name(s: &str) -> bool {
    if s.trim().is_empty() {
        return false;
    }

    if s.chars().count() > 50 {
        return false;
    }

    let first = s.chars().next().expect("non-empty");
    let last = s.chars().next_back().expect("non-empty");
    if first.is_whitespace() || last.is_whitespace() {
        return false;
    }

    s.chars().all(is_legal_expanded_variable_char)
}
