//! Pull-based token sources for the parser.
//!
//! The parser never tokenizes text itself. It asks a [`TokenSource`] for one
//! token at a time, which lets the same parser run over a live lexer or a
//! pre-built buffer of tokens.

use std::collections::VecDeque;

use vino_foundation::{Token, TokenKind};

/// A source of tokens, consumed left to right.
///
/// Implementations must eventually yield [`TokenKind::Exit`] and keep
/// yielding it once their input is exhausted. Sources are never rewound.
pub trait TokenSource {
    /// Returns the next token.
    fn next_token(&mut self) -> Token;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

/// A token source backed by an iterator.
///
/// Yields `Exit` forever once the iterator runs dry, so a buffer that lacks
/// an explicit sentinel (including an empty one) still terminates the script.
#[derive(Clone, Debug)]
pub struct TokenStream<I> {
    tokens: I,
    exhausted: bool,
}

impl<I: Iterator<Item = Token>> TokenStream<I> {
    /// Creates a token stream over an iterator of tokens.
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            exhausted: false,
        }
    }

    /// Returns true once the underlying iterator has run dry.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<I: Iterator<Item = Token>> TokenSource for TokenStream<I> {
    fn next_token(&mut self) -> Token {
        if self.exhausted {
            return Token::exit();
        }
        match self.tokens.next() {
            Some(token) => token,
            None => {
                self.exhausted = true;
                Token::exit()
            }
        }
    }
}

impl From<Vec<Token>> for TokenStream<std::vec::IntoIter<Token>> {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl From<VecDeque<Token>> for TokenStream<std::collections::vec_deque::IntoIter<Token>> {
    fn from(tokens: VecDeque<Token>) -> Self {
        Self::new(tokens)
    }
}

/// Builds a token stream from bare kinds, without lexemes.
///
/// Handy for grammar-level tests that only care about token shapes.
pub fn from_kinds(kinds: &[TokenKind]) -> TokenStream<std::vec::IntoIter<Token>> {
    TokenStream::from(kinds.iter().copied().map(Token::new).collect::<Vec<_>>())
}

/// A token source backed by a closure, such as a live lexer callback.
#[derive(Clone, Debug)]
pub struct FromFn<F>(F);

impl<F: FnMut() -> Token> TokenSource for FromFn<F> {
    fn next_token(&mut self) -> Token {
        (self.0)()
    }
}

/// Creates a token source that calls `f` for every token.
pub const fn from_fn<F: FnMut() -> Token>(f: F) -> FromFn<F> {
    FromFn(f)
}
