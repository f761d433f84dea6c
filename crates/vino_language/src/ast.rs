//! Abstract Syntax Tree for ViNo scripts.
//!
//! A [`Script`] owns its statements in source order. Every statement records
//! the 1-based source line it was parsed from.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The root of a parsed script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Script {
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Script {
    /// Creates an empty script.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    /// Returns true if the script has no statements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Returns the number of statements, blanks included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Iterates over statements that are not blank lines.
    pub fn significant(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(|stmt| !stmt.is_blank())
    }

    /// Iterates over persona declarations.
    pub fn personas(&self) -> impl Iterator<Item = &PersonaDeclaration> {
        self.statements.iter().filter_map(Statement::as_persona)
    }
}

impl From<Vec<Statement>> for Script {
    fn from(statements: Vec<Statement>) -> Self {
        Self { statements }
    }
}

/// A statement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    /// `background = "bg.png"`
    Background(BackgroundAssignment),
    /// `persona Human { name = "Humanio", ... }`
    Persona(PersonaDeclaration),
    /// `text "hello"`, `text = "intro.txt"` or `Human "hi"`
    Text(TextStatement),
    /// An empty source line
    Blank(Blank),
}

impl Statement {
    /// Returns the source line of this statement.
    #[must_use]
    pub const fn line(&self) -> u32 {
        match self {
            Self::Background(BackgroundAssignment { line, .. })
            | Self::Persona(PersonaDeclaration { line, .. })
            | Self::Text(TextStatement { line, .. })
            | Self::Blank(Blank { line }) => *line,
        }
    }

    /// Returns true if this is a blank line.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// Returns the persona declaration, if this is one.
    #[must_use]
    pub const fn as_persona(&self) -> Option<&PersonaDeclaration> {
        match self {
            Self::Persona(decl) => Some(decl),
            _ => None,
        }
    }

    /// Returns the text statement, if this is one.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextStatement> {
        match self {
            Self::Text(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// Returns the background assignment, if this is one.
    #[must_use]
    pub const fn as_background(&self) -> Option<&BackgroundAssignment> {
        match self {
            Self::Background(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// Returns a human-readable name for this statement kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Background(_) => "background",
            Self::Persona(_) => "persona",
            Self::Text(_) => "text",
            Self::Blank(_) => "blank",
        }
    }
}

/// Sets the scene background.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BackgroundAssignment {
    /// The background image resource.
    pub resource: String,
    /// Source line.
    pub line: u32,
}

/// Declares a persona and its attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PersonaDeclaration {
    /// The persona's identifier.
    pub identifier: String,
    /// Attributes in the order they were written.
    pub attributes: Vec<Attribute>,
    /// Source line.
    pub line: u32,
}

impl PersonaDeclaration {
    /// Returns the value of the first attribute with the given key.
    #[must_use]
    pub fn attribute(&self, key: &AttributeKey) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| &attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// A `key = "value"` pair inside a persona declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    /// The attribute key.
    pub key: AttributeKey,
    /// The literal value.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(key: AttributeKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Keys a persona attribute may use.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeKey {
    /// `path`: directory holding the persona's resources
    Path,
    /// `name`: display name (required)
    Name,
    /// `foreground`: sprite image
    Foreground,
    /// A user-defined key
    Custom(String),
}

impl AttributeKey {
    /// Returns true if the value of this key names a resource.
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self, Self::Path | Self::Foreground)
    }

    /// Returns the key as written in source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path => "path",
            Self::Name => "name",
            Self::Foreground => "foreground",
            Self::Custom(key) => key,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displays text, inline or from a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextStatement {
    /// How the payload is interpreted.
    pub display: TextDisplay,
    /// The speaking persona, or `None` for narration.
    pub speaker: Option<String>,
    /// The text itself, or the resource holding it.
    pub text: String,
    /// Source line.
    pub line: u32,
}

/// How a text statement's payload is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TextDisplay {
    /// `text "hello"`: the payload is shown as is
    Inline,
    /// `text = "intro.txt"`: the payload names a text resource
    File,
}

/// An empty source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blank {
    /// Source line.
    pub line: u32,
}
