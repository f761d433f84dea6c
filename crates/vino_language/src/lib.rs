//! Parser, symbol table, and semantic analyzer for ViNo scripts.
//!
//! This crate provides:
//! - [`TokenSource`] - Pull-based token input, from a buffer or a live lexer
//! - [`Parser`] - Parsing tokens into a [`Script`]
//! - [`SymbolTable`] - The environment of declared identifiers
//! - [`SemanticAnalyzer`] - Checking a script against the environment
//!
//! The flow is: Token source → Parser → Script → `SemanticAnalyzer` → accept or diagnostic

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod parser;
pub mod symbol_table;
pub mod token_source;
pub mod visitor;


pub use analyzer::{AnalyzerState, SemanticAnalyzer, analyze};
pub use ast::{
    Attribute, AttributeKey, BackgroundAssignment, Blank, PersonaDeclaration, Script, Statement,
    TextDisplay, TextStatement,
};
pub use config::{AnalyzerConfig, AttributePolicy, ResourcePolicy};
pub use parser::{Parser, parse};
pub use symbol_table::{SymbolEntry, SymbolKind, SymbolTable};
pub use token_source::{FromFn, TokenSource, TokenStream, from_fn, from_kinds};
pub use visitor::{ScriptVisitor, walk_script, walk_statement};

use vino_foundation::Result;

/// Parses and analyzes a script in one go.
///
/// # Errors
/// Returns the parse error or the first semantic error.
pub fn check(
    source: impl TokenSource,
    env: &mut SymbolTable,
    config: &AnalyzerConfig,
) -> Result<Script> {
    let script = parse(source)?;
    analyze(&script, env, config)?;
    Ok(script)
}
