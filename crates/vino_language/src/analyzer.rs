//! Semantic analysis of parsed scripts.
//!
//! The analyzer walks a [`Script`] once, in source order, and checks what the
//! grammar cannot: personas are declared once and carry a name, resources are
//! non-empty (and reachable, if the policy says so), and speakers refer to
//! declared identifiers. Persona declarations are recorded in the
//! [`SymbolTable`] as they are met, so a speaker must be declared above the
//! line that uses it.
//!
//! Analysis is fail-fast: the first violation ends the walk. Declarations
//! made before that point stay in the symbol table.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, trace};
use vino_foundation::{Error, Result, Violation};

use crate::ast::{
    AttributeKey, BackgroundAssignment, PersonaDeclaration, Script, Statement, TextDisplay,
    TextStatement,
};
use crate::config::AnalyzerConfig;
use crate::symbol_table::{SymbolEntry, SymbolTable};
use crate::visitor::{ScriptVisitor, walk_script};

/// Analyzes `script` against `env`, declaring its personas in `env`.
///
/// # Errors
/// Returns a semantic error describing the first violation found.
pub fn analyze(script: &Script, env: &mut SymbolTable, config: &AnalyzerConfig) -> Result<()> {
    walk_script(&mut SemanticVisitor::new(env, config, false), script)
}

/// Lifecycle of a [`SemanticAnalyzer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyzerState {
    /// Configured but not yet run.
    NotRun,
    /// Walking the script.
    Running,
    /// The script passed analysis.
    Completed,
    /// The script was rejected.
    Failed,
}

impl fmt::Display for AnalyzerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotRun => "not run",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Owns a script and the environment it is analyzed against.
///
/// An analyzer runs once. Running it again requires a new script or a new
/// symbol table, since a finished run has already declared its personas.
#[derive(Clone, Debug)]
pub struct SemanticAnalyzer {
    script: Script,
    env: SymbolTable,
    config: AnalyzerConfig,
    state: AnalyzerState,
}

impl SemanticAnalyzer {
    /// Creates an analyzer for `script` with an empty environment.
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            script,
            env: SymbolTable::new(),
            config: AnalyzerConfig::default(),
            state: AnalyzerState::NotRun,
        }
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the environment and makes the analyzer runnable again.
    pub fn set_symbol_table(&mut self, env: SymbolTable) {
        self.env = env;
        self.state = AnalyzerState::NotRun;
    }

    /// Replaces the script and makes the analyzer runnable again.
    pub fn set_script(&mut self, script: Script) {
        self.script = script;
        self.state = AnalyzerState::NotRun;
    }

    /// Runs the analysis.
    ///
    /// With `verbose` set, every visited statement is reported as a `DEBUG`
    /// tracing event.
    ///
    /// # Errors
    /// Returns a semantic error for the first violation found, or an internal
    /// error if the analyzer has already run.
    pub fn run(&mut self, verbose: bool) -> Result<()> {
        if self.state != AnalyzerState::NotRun {
            return Err(Error::internal(format!(
                "semantic analyzer has already {}; set a new script or symbol table to run again",
                self.state
            )));
        }

        if self.script.is_empty() {
            debug!("script is empty, nothing to analyze");
            self.state = AnalyzerState::Completed;
            return Ok(());
        }

        self.state = AnalyzerState::Running;
        let mut visitor = SemanticVisitor::new(&mut self.env, &self.config, verbose);
        let result = walk_script(&mut visitor, &self.script);
        self.state = match result {
            Ok(()) => AnalyzerState::Completed,
            Err(_) => AnalyzerState::Failed,
        };
        result
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> AnalyzerState {
        self.state
    }

    /// Returns the analyzed script.
    #[must_use]
    pub const fn script(&self) -> &Script {
        &self.script
    }

    /// Returns the environment.
    #[must_use]
    pub const fn symbol_table(&self) -> &SymbolTable {
        &self.env
    }

    /// Consumes the analyzer, returning the environment.
    #[must_use]
    pub fn into_symbol_table(self) -> SymbolTable {
        self.env
    }
}

/// Filesystem entry a resource must name.
#[derive(Clone, Copy)]
enum Entry {
    File,
    Directory,
}

/// The visitor doing the actual checks.
struct SemanticVisitor<'a> {
    env: &'a mut SymbolTable,
    config: &'a AnalyzerConfig,
    verbose: bool,
}

impl<'a> SemanticVisitor<'a> {
    fn new(env: &'a mut SymbolTable, config: &'a AnalyzerConfig, verbose: bool) -> Self {
        Self {
            env,
            config,
            verbose,
        }
    }

    /// Checks a resource literal: non-empty, and reachable under the
    /// verifying policy. `relative_to` is joined between the base directory
    /// and the resource.
    fn check_resource(
        &self,
        line: u32,
        owner: Option<&str>,
        attribute: &str,
        value: &str,
        entry: Entry,
        relative_to: Option<&str>,
    ) -> Result<()> {
        if value.is_empty() {
            return Err(Error::semantic(
                line,
                Violation::EmptyResource {
                    identifier: owner.map(ToString::to_string),
                    attribute: attribute.to_string(),
                },
            ));
        }

        let Some(base_dir) = self.config.resources.base_dir() else {
            return Ok(());
        };

        let mut path = PathBuf::from(base_dir);
        if let Some(dir) = relative_to {
            path.push(dir);
        }
        path.push(value);

        let exists = match entry {
            Entry::File => path.is_file(),
            Entry::Directory => path.is_dir(),
        };
        if exists {
            Ok(())
        } else {
            Err(Error::semantic(
                line,
                Violation::MissingResource {
                    identifier: owner.map(ToString::to_string),
                    attribute: attribute.to_string(),
                    path,
                },
            ))
        }
    }

    /// Checks attribute keys: each at most once, custom keys allowed by policy.
    fn check_attribute_keys(&self, decl: &PersonaDeclaration) -> Result<()> {
        let mut seen = BTreeSet::new();
        for attr in &decl.attributes {
            if !seen.insert(&attr.key) {
                return Err(Error::semantic(
                    decl.line,
                    Violation::DuplicateAttribute {
                        identifier: decl.identifier.clone(),
                        attribute: attr.key.to_string(),
                    },
                ));
            }
            if let AttributeKey::Custom(key) = &attr.key {
                if !self.config.attributes.allows(key) {
                    return Err(Error::semantic(
                        decl.line,
                        Violation::UnknownAttribute {
                            identifier: decl.identifier.clone(),
                            attribute: key.clone(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ScriptVisitor for SemanticVisitor<'_> {
    fn enter_statement(&mut self, stmt: &Statement) -> Result<()> {
        if self.verbose {
            debug!(line = stmt.line(), kind = stmt.kind_name(), "analyzing statement");
        }
        Ok(())
    }

    fn visit_background(&mut self, stmt: &BackgroundAssignment) -> Result<()> {
        self.check_resource(stmt.line, None, "background", &stmt.resource, Entry::File, None)
    }

    fn visit_persona(&mut self, decl: &PersonaDeclaration) -> Result<()> {
        if let Some(existing) = self.env.get(&decl.identifier) {
            return Err(Error::semantic(
                decl.line,
                Violation::DuplicateDeclaration {
                    identifier: decl.identifier.clone(),
                    first_line: existing.line,
                    second_line: decl.line,
                },
            ));
        }

        self.check_attribute_keys(decl)?;

        if decl.attribute(&AttributeKey::Name).is_none() {
            return Err(Error::semantic(
                decl.line,
                Violation::MissingAttribute {
                    identifier: decl.identifier.clone(),
                    attribute: AttributeKey::Name.to_string(),
                },
            ));
        }

        let owner = Some(decl.identifier.as_str());
        let path = decl.attribute(&AttributeKey::Path);
        if let Some(path) = path {
            self.check_resource(decl.line, owner, "path", path, Entry::Directory, None)?;
        }
        if let Some(sprite) = decl.attribute(&AttributeKey::Foreground) {
            self.check_resource(decl.line, owner, "foreground", sprite, Entry::File, path)?;
        }

        self.env.insert(
            decl.identifier.clone(),
            SymbolEntry::persona(decl.line, &decl.attributes),
        )?;
        trace!(identifier = %decl.identifier, line = decl.line, "declared persona");
        Ok(())
    }

    fn visit_text(&mut self, stmt: &TextStatement) -> Result<()> {
        if let Some(speaker) = &stmt.speaker {
            if !self.env.contains(speaker) {
                return Err(Error::semantic(
                    stmt.line,
                    Violation::UndeclaredReference {
                        identifier: speaker.clone(),
                    },
                ));
            }
        }

        if stmt.display == TextDisplay::File {
            self.check_resource(stmt.line, None, "text", &stmt.text, Entry::File, None)?;
        }
        Ok(())
    }
}
