//! Visitor pattern for traversing scripts.
//!
//! [`ScriptVisitor`] has one method per statement kind. [`walk_script`]
//! dispatches on the statement enum with an exhaustive `match`, so a new
//! statement kind cannot be added without every walker noticing.
//!
//! Visits are fallible: the first error stops the walk.
//!
//! # Example
//!
//! ```
//! use vino_foundation::Result;
//! use vino_language::ast::{PersonaDeclaration, Script};
//! use vino_language::visitor::{ScriptVisitor, walk_script};
//!
//! struct PersonaCounter(usize);
//!
//! impl ScriptVisitor for PersonaCounter {
//!     fn visit_persona(&mut self, _decl: &PersonaDeclaration) -> Result<()> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut counter = PersonaCounter(0);
//! walk_script(&mut counter, &Script::new()).unwrap();
//! assert_eq!(counter.0, 0);
//! ```

use vino_foundation::Result;

use crate::ast::{BackgroundAssignment, Blank, PersonaDeclaration, Script, Statement, TextStatement};

/// Trait for read-only script visitors.
///
/// Implement the `visit_*` methods of interest; the defaults accept
/// everything.
#[allow(unused_variables)]
pub trait ScriptVisitor {
    /// Called before the type-specific visit of every statement.
    fn enter_statement(&mut self, stmt: &Statement) -> Result<()> {
        Ok(())
    }

    /// Visit a background assignment.
    fn visit_background(&mut self, stmt: &BackgroundAssignment) -> Result<()> {
        Ok(())
    }

    /// Visit a persona declaration.
    fn visit_persona(&mut self, decl: &PersonaDeclaration) -> Result<()> {
        Ok(())
    }

    /// Visit a text statement.
    fn visit_text(&mut self, stmt: &TextStatement) -> Result<()> {
        Ok(())
    }

    /// Visit a blank line.
    fn visit_blank(&mut self, blank: &Blank) -> Result<()> {
        Ok(())
    }
}

/// Walk one statement, calling the matching visitor method.
///
/// # Errors
/// Returns the first error raised by the visitor.
pub fn walk_statement<V: ScriptVisitor + ?Sized>(visitor: &mut V, stmt: &Statement) -> Result<()> {
    visitor.enter_statement(stmt)?;

    match stmt {
        Statement::Background(bg) => visitor.visit_background(bg),
        Statement::Persona(decl) => visitor.visit_persona(decl),
        Statement::Text(text) => visitor.visit_text(text),
        Statement::Blank(blank) => visitor.visit_blank(blank),
    }
}

/// Walk every statement of a script in source order.
///
/// # Errors
/// Returns the first error raised by the visitor; later statements are not
/// visited.
pub fn walk_script<V: ScriptVisitor + ?Sized>(visitor: &mut V, script: &Script) -> Result<()> {
    for stmt in &script.statements {
        walk_statement(visitor, stmt)?;
    }
    Ok(())
}
