//! Tokens, errors, and diagnostics for the ViNo front end.
//!
//! This crate provides:
//! - [`Token`] and [`TokenKind`] - The interface between the lexer and the parser
//! - [`Error`] - Parsing and semantic diagnostics with context
//! - [`Violation`] - The semantic rules a script can break

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod token;

pub use error::{Error, ErrorContext, ErrorKind, Expected, Violation};
pub use token::{NARRATION_KEYWORD, Token, TokenKind};

/// Result type alias using the ViNo [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
