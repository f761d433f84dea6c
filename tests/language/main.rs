//! Integration tests for Layer 1: Language
//!
//! Tests for the parser, the semantic analyzer, and the two run together.

mod analyzer;
