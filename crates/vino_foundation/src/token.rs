//! Token types for ViNo scripts.
//!
//! Tokens are the output of the (external) lexer and the input to the parser.
//! They live in the foundation layer so that a lexer can produce them without
//! depending on the parser.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The lexeme of a `TextType` token that marks unkeyed narration.
pub const NARRATION_KEYWORD: &str = "text";

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// The kind of this token.
    pub kind: TokenKind,
    /// Literal text, for text-bearing tokens.
    pub lexeme: Option<String>,
}

impl Token {
    /// Creates a token without a lexeme.
    #[must_use]
    pub const fn new(kind: TokenKind) -> Self {
        Self { kind, lexeme: None }
    }

    /// Creates a token carrying a lexeme.
    #[must_use]
    pub fn with_lexeme(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: Some(lexeme.into()),
        }
    }

    /// Creates the end-of-input sentinel.
    #[must_use]
    pub const fn exit() -> Self {
        Self::new(TokenKind::Exit)
    }

    /// Creates a text line token.
    #[must_use]
    pub fn text_line(text: impl Into<String>) -> Self {
        Self::with_lexeme(TokenKind::TextLine, text)
    }

    /// Creates an identifier token.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::with_lexeme(TokenKind::Identifier, name)
    }

    /// Returns the lexeme, or an empty string when there is none.
    #[must_use]
    pub fn text(&self) -> &str {
        self.lexeme.as_deref().unwrap_or_default()
    }

    /// Returns true if this is the end-of-input sentinel.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self.kind, TokenKind::Exit)
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Some(lexeme) => write!(f, "{} {lexeme:?}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Token kinds of the ViNo scripting language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    // Layout
    /// End of a source line
    Newline,
    /// End of input
    Exit,

    // Keywords
    /// `background`
    Background,
    /// `foreground`
    Foreground,
    /// `persona`
    Persona,
    /// `path`
    Path,
    /// `name`
    Name,
    /// `text` or a speaker identifier opening a text statement
    TextType,

    // Payload
    /// A user identifier
    Identifier,
    /// A quoted text line
    TextLine,

    // Punctuation
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `=`
    Equals,
    /// `,`
    Comma,
}

impl TokenKind {
    /// Returns true if this kind can start a persona attribute.
    #[must_use]
    pub const fn is_attribute_key(self) -> bool {
        matches!(
            self,
            Self::Path | Self::Name | Self::Foreground | Self::Identifier
        )
    }

    /// Returns true if tokens of this kind carry a meaningful lexeme.
    #[must_use]
    pub const fn carries_lexeme(self) -> bool {
        matches!(self, Self::Identifier | Self::TextLine | Self::TextType)
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Newline => "newline",
            Self::Exit => "end of input",
            Self::Background => "background",
            Self::Foreground => "foreground",
            Self::Persona => "persona",
            Self::Path => "path",
            Self::Name => "name",
            Self::TextType => "text type",
            Self::Identifier => "identifier",
            Self::TextLine => "text line",
            Self::BraceOpen => "'{'",
            Self::BraceClose => "'}'",
            Self::Equals => "'='",
            Self::Comma => "','",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
