//! Comment-help metadata for scripts
//!
//! A comment block immediately preceding the `param` block may carry
//! `.SYNOPSIS` / `.DESCRIPTION` / `.PARAMETER <name>` help directives; this
//! module surfaces them alongside the scraped parameter list so callers can
//! present a script's signature to an operator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexer::tokenize;
use crate::params::{param_keyword_index, scrape_parameters, ParameterInfo};
use crate::token::TokenKind;

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\.(\S+)[ \t]*(.*)$").unwrap());
static SPACE_COLLAPSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// Help text and signature scraped from a script
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptMetadata {
    /// `.SYNOPSIS` (or `.DESCRIPTION`) text, when present
    pub description: Option<String>,
    pub parameters: Vec<ScriptParameterMetadata>,
}

/// One declared parameter with its help text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParameterMetadata {
    pub name: String,
    pub type_name: Option<String>,
    pub description: Option<String>,
}

impl ScriptMetadata {
    /// Parse metadata from script source. Returns `None` only when the
    /// source cannot be tokenized; a script without help text parses to
    /// metadata with no description.
    pub fn parse(script: &str) -> Option<ScriptMetadata> {
        let tokens = tokenize(script).ok()?;

        let param_index = param_keyword_index(&tokens).unwrap_or(tokens.len());
        let parameters = if param_index < tokens.len() {
            scrape_parameters(tokens.iter().skip(param_index + 1))
        } else {
            Vec::new()
        };

        let help = tokens[..param_index]
            .iter()
            .rev()
            .find(|t| t.kind == TokenKind::Comment)
            .map(|t| parse_help_blocks(&t.text))
            .unwrap_or_default();

        let description = help
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case("SYNOPSIS"))
            .or_else(|| help.iter().find(|b| b.name.eq_ignore_ascii_case("DESCRIPTION")))
            .map(|b| b.value.clone());

        let parameters = parameters
            .into_iter()
            .map(|p| attach_help(p, &help))
            .collect();

        Some(ScriptMetadata {
            description,
            parameters,
        })
    }
}

struct HelpBlock {
    name: String,
    argument: Option<String>,
    value: String,
}

fn attach_help(parameter: ParameterInfo, help: &[HelpBlock]) -> ScriptParameterMetadata {
    let description = help
        .iter()
        .filter(|b| b.name.eq_ignore_ascii_case("PARAMETER"))
        .find(|b| {
            b.argument
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(&parameter.name))
        })
        .map(|b| b.value.clone());

    ScriptParameterMetadata {
        name: parameter.name,
        type_name: parameter.type_name,
        description,
    }
}

fn parse_help_blocks(comment: &str) -> Vec<HelpBlock> {
    let inner = comment
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix("#>"))
        .unwrap_or(comment);

    let mut blocks = Vec::new();
    let mut current: Option<(String, Option<String>, Vec<String>)> = None;

    for line in inner.lines() {
        if let Some(captures) = DIRECTIVE.captures(line) {
            finish_block(&mut blocks, current.take());

            let name = captures[1].to_string();
            let argument = Some(captures[2].trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string);
            current = Some((name, argument, Vec::new()));
        } else if let Some((_, _, lines)) = current.as_mut() {
            lines.push(line.to_string());
        }
    }
    finish_block(&mut blocks, current.take());

    blocks
}

fn finish_block(blocks: &mut Vec<HelpBlock>, block: Option<(String, Option<String>, Vec<String>)>) {
    if let Some((name, argument, lines)) = block {
        let value = SPACE_COLLAPSE
            .replace_all(lines.join("\n").trim(), " ")
            .into_owned();
        if !value.is_empty() {
            blocks.push(HelpBlock {
                name,
                argument,
                value,
            });
        }
    }
}
