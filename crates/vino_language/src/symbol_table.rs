//! Symbol table environment for semantic analysis.
//!
//! ViNo has a single global scope: every identifier maps to at most one
//! [`SymbolEntry`]. Entries are never overwritten; inserting an identifier a
//! second time is a duplicate declaration.

use std::collections::hash_map::{self, HashMap};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use vino_foundation::{Error, Result, Violation};

use crate::ast::{Attribute, AttributeKey};

/// What a symbol names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolKind {
    /// A declared persona
    Persona,
    /// A script variable, defined by the caller
    Variable,
    /// A named resource, defined by the caller
    Resource,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Persona => "persona",
            Self::Variable => "variable",
            Self::Resource => "resource",
        })
    }
}

/// Metadata recorded for a declared identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolEntry {
    /// What the identifier names.
    pub kind: SymbolKind,
    /// Line of the declaration.
    pub line: u32,
    /// Attribute values by key.
    pub attributes: BTreeMap<AttributeKey, String>,
}

impl SymbolEntry {
    /// Creates an entry without attributes.
    #[must_use]
    pub const fn new(kind: SymbolKind, line: u32) -> Self {
        Self {
            kind,
            line,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a persona entry from its declared attributes.
    #[must_use]
    pub fn persona<'a>(line: u32, attributes: impl IntoIterator<Item = &'a Attribute>) -> Self {
        Self {
            kind: SymbolKind::Persona,
            line,
            attributes: attributes
                .into_iter()
                .map(|attr| (attr.key.clone(), attr.value.clone()))
                .collect(),
        }
    }

    /// Creates a variable entry.
    #[must_use]
    pub const fn variable(line: u32) -> Self {
        Self::new(SymbolKind::Variable, line)
    }

    /// Creates a resource entry pointing at `path`.
    #[must_use]
    pub fn resource(line: u32, path: impl Into<String>) -> Self {
        Self::new(SymbolKind::Resource, line).with_attribute(AttributeKey::Path, path)
    }

    /// Builder method to add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: AttributeKey, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value.into());
        self
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, key: &AttributeKey) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// The global symbol table environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolEntry>,
}

impl SymbolTable {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `identifier`.
    ///
    /// # Errors
    /// Returns a duplicate declaration error if the identifier is already
    /// declared. The existing entry is left untouched.
    pub fn insert(&mut self, identifier: impl Into<String>, entry: SymbolEntry) -> Result<()> {
        match self.symbols.entry(identifier.into()) {
            hash_map::Entry::Occupied(existing) => Err(Error::semantic(
                entry.line,
                Violation::DuplicateDeclaration {
                    identifier: existing.key().clone(),
                    first_line: existing.get().line,
                    second_line: entry.line,
                },
            )),
            hash_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Looks up an identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&SymbolEntry> {
        self.symbols.get(identifier)
    }

    /// Returns true if the identifier is declared.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.symbols.contains_key(identifier)
    }

    /// Returns the number of declared identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over all declarations, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> {
        self.symbols.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Returns the identifiers of all personas, sorted by declaration line.
    #[must_use]
    pub fn personas(&self) -> Vec<&str> {
        let mut personas: Vec<_> = self
            .iter()
            .filter(|(_, entry)| entry.kind == SymbolKind::Persona)
            .collect();
        personas.sort_by_key(|(name, entry)| (entry.line, *name));
        personas.into_iter().map(|(name, _)| name).collect()
    }
}
