//! Static analysis of script source text
//!
//! This crate discovers what a script needs before it runs: the free
//! variables it references (including inside double-quoted string
//! interpolation), the formal parameters declared in its `param(...)` block,
//! and the comment-help metadata preceding it. Everything here is
//! best-effort: a script that fails to tokenize yields empty results, never
//! an error to the caller.

pub mod classify;
pub mod extract;
pub mod lexer;
pub mod metadata;
pub mod params;
pub mod token;

// Re-export commonly used types
pub use classify::{classify_arguments, ClassifiedArguments};
pub use extract::{extract_assignable_variables, extract_variables, is_legal_variable_name};
pub use lexer::{tokenize, LexError};
pub use metadata::{ScriptMetadata, ScriptParameterMetadata};
pub use params::{scrape_parameters, script_parameters, ParameterInfo};
pub use token::{Token, TokenKind};
