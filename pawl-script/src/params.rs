//! Formal-parameter scraping from a script's `param(...)` block

use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// One declared formal parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    /// Declared type annotation, if any (`[int] $Count` → `Some("int")`)
    pub type_name: Option<String>,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
        }
    }
}

impl std::fmt::Display for ParameterInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.type_name {
            Some(type_name) => write!(f, "[{}] ${}", type_name, self.name),
            None => write!(f, "${}", self.name),
        }
    }
}

/// Scrape declared parameters from the tokens following a `param` keyword.
///
/// Scans forward tracking group depth from the first `(`; the matching close
/// ends the block. Within the span, a type literal annotates the next
/// variable token. Declaration order is preserved.
pub fn scrape_parameters<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Vec<ParameterInfo> {
    let mut block = Vec::new();
    let mut depth = 0i32;

    for token in tokens {
        block.push(token);

        match token.kind {
            TokenKind::GroupStart => depth += 1,
            TokenKind::GroupEnd => {
                depth -= 1;
                if depth <= 0 {
                    break;
                }
            }
            _ => {}
        }
    }

    let mut parameters = Vec::new();
    let mut current_type: Option<String> = None;

    for token in block {
        match token.kind {
            TokenKind::Type => current_type = Some(token.text.clone()),
            TokenKind::Variable => {
                parameters.push(ParameterInfo::new(token.text.clone(), current_type.take()));
            }
            _ => {}
        }
    }

    parameters
}

/// Declared parameters of a script, or empty when there is no `param` block
/// or the source fails to tokenize.
pub fn script_parameters(script: &str) -> Vec<ParameterInfo> {
    let tokens = match tokenize(script) {
        Ok(tokens) => tokens,
        Err(_) => return Vec::new(),
    };

    match param_keyword_index(&tokens) {
        Some(index) => scrape_parameters(tokens.iter().skip(index + 1)),
        None => Vec::new(),
    }
}

/// Index of the `param` keyword token, if present
pub(crate) fn param_keyword_index(tokens: &[Token]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| t.kind == TokenKind::Keyword && t.text_eq("param"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_and_untyped_parameters() {
        let params = script_parameters("param([int] $Count, $Name)\nWrite-Output $Name");
        assert_eq!(
            params,
            vec![
                ParameterInfo::new("Count", Some("int".to_string())),
                ParameterInfo::new("Name", None),
            ]
        );
    }

    #[test]
    fn test_type_resets_after_use() {
        let params = script_parameters("param([string] $First, $Second, [bool] $Third)");
        assert_eq!(params[0].type_name.as_deref(), Some("string"));
        assert_eq!(params[1].type_name, None);
        assert_eq!(params[2].type_name.as_deref(), Some("bool"));
    }

    #[test]
    fn test_nested_groups_do_not_end_block() {
        let params = script_parameters("param($Path = $(Get-Location), $Mode)\n($ignored)");
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Path", "Mode"]);
    }

    #[test]
    fn test_variables_after_block_are_not_parameters() {
        let params = script_parameters("param($Only)\nWrite-Output $NotAParam");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Only");
    }

    #[test]
    fn test_no_param_block() {
        assert!(script_parameters("Write-Output $x").is_empty());
    }

    #[test]
    fn test_attributes_are_skipped() {
        let params = script_parameters("param([Parameter(Mandatory)] [string] $Target)");
        assert_eq!(
            params,
            vec![ParameterInfo::new("Target", Some("string".to_string()))]
        );
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let params = script_parameters("Param($x)");
        assert_eq!(params.len(), 1);
    }
}
