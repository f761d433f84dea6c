//! ViNo - visual novel scripting front end
//!
//! This crate re-exports all layers of the ViNo front end for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: vino_language   - Token sources, parser, symbol table, semantic analyzer
//! Layer 0: vino_foundation - Tokens and diagnostics (Token, Error, Violation)
//! ```

pub use vino_foundation as foundation;
pub use vino_language as language;
