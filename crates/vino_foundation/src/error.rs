//! Error types for the ViNo front end.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Parsing and semantic diagnostics share one [`Error`] type; [`ErrorKind`]
//! keeps the two families apart.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::token::TokenKind;

/// The main error type for ViNo operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a syntax error for a token that did not match.
    #[must_use]
    pub fn unexpected_token(
        line: u32,
        expected: Expected,
        found: TokenKind,
        lexeme: Option<String>,
    ) -> Self {
        Self::new(ErrorKind::Parse {
            line,
            expected,
            found,
            lexeme,
        })
    }

    /// Creates a syntax error for a persona body cut off by a newline.
    #[must_use]
    pub fn unterminated_declaration(line: u32, identifier: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnterminatedDeclaration {
            line,
            identifier: identifier.into(),
            found: TokenKind::Newline,
        })
    }

    /// Creates a semantic error.
    #[must_use]
    pub fn semantic(line: u32, violation: Violation) -> Self {
        Self::new(ErrorKind::Semantic { line, violation })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a syntax error raised by the parser.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Parse { .. } | ErrorKind::UnterminatedDeclaration { .. }
        )
    }

    /// Returns true if this is a semantic error raised by the analyzer.
    #[must_use]
    pub const fn is_semantic(&self) -> bool {
        matches!(self.kind, ErrorKind::Semantic { .. })
    }

    /// Returns the source line the error points at, if any.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        match &self.kind {
            ErrorKind::Parse { line, .. }
            | ErrorKind::UnterminatedDeclaration { line, .. }
            | ErrorKind::Semantic { line, .. } => Some(*line),
            ErrorKind::Internal(_) => None,
        }
    }

    /// Returns the semantic violation, if this is a semantic error.
    #[must_use]
    pub const fn violation(&self) -> Option<&Violation> {
        match &self.kind {
            ErrorKind::Semantic { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A token did not match the grammar.
    #[error("syntax error on line {line}: expected {expected}, found {}", found_text(.found, .lexeme.as_deref()))]
    Parse {
        /// Line number (1-indexed).
        line: u32,
        /// What the grammar allowed at this point.
        expected: Expected,
        /// The kind of the token actually found.
        found: TokenKind,
        /// The lexeme of the token actually found.
        lexeme: Option<String>,
    },

    /// A persona declaration body ran into a newline.
    #[error("syntax error on line {line}: unterminated declaration of persona `{identifier}`")]
    UnterminatedDeclaration {
        /// Line number (1-indexed).
        line: u32,
        /// The persona being declared.
        identifier: String,
        /// The token that cut the body off.
        found: TokenKind,
    },

    /// A rule the grammar cannot express was broken.
    #[error("semantic error on line {line}: {violation}")]
    Semantic {
        /// Line number (1-indexed).
        line: u32,
        /// The rule that was broken.
        violation: Violation,
    },

    /// Internal error (misuse of the API).
    #[error("internal error: {0}")]
    Internal(String),
}

fn found_text(kind: &TokenKind, lexeme: Option<&str>) -> String {
    match lexeme {
        Some(lexeme) if kind.carries_lexeme() => format!("{kind} {lexeme:?}"),
        _ => kind.to_string(),
    }
}

/// What the parser expected at the point of failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// Exactly one token kind.
    Kind(TokenKind),
    /// Any of several token kinds.
    OneOf(Vec<TokenKind>),
}

impl Expected {
    /// Returns true if `kind` would have been accepted.
    #[must_use]
    pub fn accepts(&self, kind: TokenKind) -> bool {
        match self {
            Self::Kind(expected) => *expected == kind,
            Self::OneOf(kinds) => kinds.contains(&kind),
        }
    }
}

impl From<TokenKind> for Expected {
    fn from(kind: TokenKind) -> Self {
        Self::Kind(kind)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::OneOf(kinds) => {
                f.write_str("one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{kind}")?;
                }
                Ok(())
            }
        }
    }
}

/// Semantic rules a script can violate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    /// An identifier was declared twice.
    #[error("`{identifier}` is already declared on line {first_line} (redeclared on line {second_line})")]
    DuplicateDeclaration {
        /// The identifier declared twice.
        identifier: String,
        /// Line of the existing declaration.
        first_line: u32,
        /// Line of the rejected declaration.
        second_line: u32,
    },

    /// A mandatory attribute is absent.
    #[error("persona `{identifier}` is missing required attribute `{attribute}`")]
    MissingAttribute {
        /// The persona being declared.
        identifier: String,
        /// The missing attribute key.
        attribute: String,
    },

    /// A resource literal is empty and can never resolve.
    #[error("{} has an empty `{attribute}` resource", owner_text(.identifier.as_deref()))]
    EmptyResource {
        /// The persona owning the attribute, if any.
        identifier: Option<String>,
        /// The attribute or statement carrying the literal.
        attribute: String,
    },

    /// An identifier was used before being declared.
    #[error("`{identifier}` is not declared")]
    UndeclaredReference {
        /// The unknown identifier.
        identifier: String,
    },

    /// An attribute key appears twice in one declaration.
    #[error("persona `{identifier}` sets attribute `{attribute}` more than once")]
    DuplicateAttribute {
        /// The persona being declared.
        identifier: String,
        /// The repeated attribute key.
        attribute: String,
    },

    /// A user-defined attribute key is not allowed by the attribute policy.
    #[error("persona `{identifier}` uses unknown attribute `{attribute}`")]
    UnknownAttribute {
        /// The persona being declared.
        identifier: String,
        /// The rejected attribute key.
        attribute: String,
    },

    /// A resource does not name a reachable filesystem entry.
    #[error("{}`{attribute}` resource {} does not exist", resource_owner(.identifier.as_deref()), .path.display())]
    MissingResource {
        /// The persona owning the attribute, if any.
        identifier: Option<String>,
        /// The attribute or statement carrying the literal.
        attribute: String,
        /// The resolved path that was checked.
        path: PathBuf,
    },
}

fn resource_owner(identifier: Option<&str>) -> String {
    identifier.map_or_else(String::new, |identifier| format!("persona `{identifier}`: "))
}

fn owner_text(identifier: Option<&str>) -> String {
    match identifier {
        Some(identifier) => format!("persona `{identifier}`"),
        None => "statement".to_string(),
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Script file or other origin of the token stream.
    pub source: Option<String>,
    /// Free-form notes added by callers.
    pub notes: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        for note in &self.notes {
            writeln!(f)?;
            write!(f, "  note: {note}")?;
        }
        Ok(())
    }
}
