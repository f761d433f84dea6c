//! Parser for ViNo scripts.
//!
//! A predictive recursive-descent parser with one token of lookahead. It
//! pulls tokens from a [`TokenSource`], never backtracks, and stops at the
//! first token that does not fit the grammar:
//!
//! ```text
//! script       := (stmt? NEWLINE)* EXIT
//! stmt         := bg_stmt | persona_stmt | text_stmt
//! bg_stmt      := BG EQ TEXT_LINE
//! persona_stmt := PERSONA IDENT BRACE_OPEN attr (COMMA attr)* BRACE_CLOSE
//! attr         := attr_key EQ TEXT_LINE
//! attr_key     := PATH | NAME | FG | IDENT
//! text_stmt    := TEXT_TYPE (EQ)? TEXT_LINE
//! ```

use std::mem;

use tracing::debug;
use vino_foundation::{Error, Expected, NARRATION_KEYWORD, Result, Token, TokenKind};

use crate::ast::{
    Attribute, AttributeKey, BackgroundAssignment, Blank, PersonaDeclaration, Script, Statement,
    TextDisplay, TextStatement,
};
use crate::token_source::TokenSource;

const STATEMENT_START: [TokenKind; 5] = [
    TokenKind::Background,
    TokenKind::Persona,
    TokenKind::TextType,
    TokenKind::Newline,
    TokenKind::Exit,
];

const ATTRIBUTE_KEYS: [TokenKind; 4] = [
    TokenKind::Path,
    TokenKind::Name,
    TokenKind::Foreground,
    TokenKind::Identifier,
];

/// Parser for ViNo token streams.
pub struct Parser<S> {
    /// The source providing tokens.
    source: S,
    /// Current token (lookahead).
    current: Token,
    /// Newlines consumed so far.
    line: u32,
    /// Tokens consumed so far.
    position: usize,
    /// Report every matched token.
    verbose: bool,
}

impl<S: TokenSource> Parser<S> {
    /// Creates a new parser reading from the given source.
    #[must_use]
    pub fn new(mut source: S) -> Self {
        let current = source.next_token();
        Self {
            source,
            current,
            line: 0,
            position: 0,
            verbose: false,
        }
    }

    /// Rebinds the parser to a fresh source and resets its counters.
    pub fn set_input(&mut self, mut source: S) {
        self.current = source.next_token();
        self.source = source;
        self.line = 0;
        self.position = 0;
    }

    /// Returns the 1-based source line of the lookahead token.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line + 1
    }

    /// Returns the number of tokens consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Parses a whole script, up to and including the end-of-input token.
    ///
    /// With `verbose` set, every matched token is reported as a `DEBUG`
    /// tracing event.
    ///
    /// # Errors
    /// Returns a parse error at the first token that does not fit the grammar.
    pub fn run(&mut self, verbose: bool) -> Result<Script> {
        self.verbose = verbose;
        let result = self.script();
        self.verbose = false;
        result
    }

    /// `script := (stmt? NEWLINE)* EXIT`
    fn script(&mut self) -> Result<Script> {
        let mut script = Script::new();

        loop {
            match self.current.kind {
                TokenKind::Exit => {
                    // The sentinel is matched but not pulled past.
                    self.report(&self.current);
                    return Ok(script);
                }
                TokenKind::Newline => {
                    let line = self.line();
                    self.expect(TokenKind::Newline)?;
                    script.statements.push(Statement::Blank(Blank { line }));
                }
                _ => {
                    let stmt = self.statement()?;
                    script.statements.push(stmt);
                    self.expect(TokenKind::Newline)?;
                }
            }
        }
    }

    /// `stmt := bg_stmt | persona_stmt | text_stmt`
    fn statement(&mut self) -> Result<Statement> {
        match self.current.kind {
            TokenKind::Background => self.background().map(Statement::Background),
            TokenKind::Persona => self.persona().map(Statement::Persona),
            TokenKind::TextType => self.text().map(Statement::Text),
            _ => Err(self.unexpected(Expected::OneOf(STATEMENT_START.to_vec()))),
        }
    }

    /// `bg_stmt := BG EQ TEXT_LINE`
    fn background(&mut self) -> Result<BackgroundAssignment> {
        let line = self.line();
        self.expect(TokenKind::Background)?;
        self.expect(TokenKind::Equals)?;
        let resource = lexeme(self.expect(TokenKind::TextLine)?);

        Ok(BackgroundAssignment { resource, line })
    }

    /// `persona_stmt := PERSONA IDENT BRACE_OPEN attr (COMMA attr)* BRACE_CLOSE`
    fn persona(&mut self) -> Result<PersonaDeclaration> {
        let line = self.line();
        self.expect(TokenKind::Persona)?;
        let identifier = lexeme(self.expect(TokenKind::Identifier)?);
        self.expect(TokenKind::BraceOpen)?;

        let mut attributes = vec![self.attribute(&identifier)?];
        loop {
            match self.current.kind {
                TokenKind::Comma => {
                    self.expect(TokenKind::Comma)?;
                    attributes.push(self.attribute(&identifier)?);
                }
                TokenKind::BraceClose => {
                    self.expect(TokenKind::BraceClose)?;
                    break;
                }
                TokenKind::Newline => {
                    return Err(Error::unterminated_declaration(self.line(), identifier));
                }
                _ => {
                    return Err(self.unexpected(Expected::OneOf(vec![
                        TokenKind::Comma,
                        TokenKind::BraceClose,
                    ])));
                }
            }
        }

        Ok(PersonaDeclaration {
            identifier,
            attributes,
            line,
        })
    }

    /// `attr := attr_key EQ TEXT_LINE`
    fn attribute(&mut self, persona: &str) -> Result<Attribute> {
        let key = match self.current.kind {
            TokenKind::Path => AttributeKey::Path,
            TokenKind::Name => AttributeKey::Name,
            TokenKind::Foreground => AttributeKey::Foreground,
            TokenKind::Identifier => AttributeKey::Custom(self.current.text().to_string()),
            TokenKind::Newline => return Err(Error::unterminated_declaration(self.line(), persona)),
            _ => return Err(self.unexpected(Expected::OneOf(ATTRIBUTE_KEYS.to_vec()))),
        };
        self.advance();
        self.expect(TokenKind::Equals)?;
        let value = lexeme(self.expect(TokenKind::TextLine)?);

        Ok(Attribute { key, value })
    }

    /// `text_stmt := TEXT_TYPE (EQ)? TEXT_LINE`
    fn text(&mut self) -> Result<TextStatement> {
        let line = self.line();
        let speaker = match self.expect(TokenKind::TextType)?.lexeme {
            Some(word) if !word.is_empty() && word != NARRATION_KEYWORD => Some(word),
            _ => None,
        };

        let display = if self.current.kind == TokenKind::Equals {
            self.advance();
            TextDisplay::File
        } else {
            TextDisplay::Inline
        };
        let text = lexeme(self.expect(TokenKind::TextLine)?);

        Ok(TextStatement {
            display,
            speaker,
            text,
            line,
        })
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        if self.current.kind == expected {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Expected::Kind(expected)))
        }
    }

    /// Consumes the lookahead and pulls the next token.
    fn advance(&mut self) -> Token {
        let next = self.source.next_token();
        let token = mem::replace(&mut self.current, next);
        self.report(&token);
        self.position += 1;
        if token.kind == TokenKind::Newline {
            self.line += 1;
        }
        token
    }

    fn report(&self, token: &Token) {
        if self.verbose {
            debug!(line = self.line(), position = self.position, %token, "matched token");
        }
    }

    /// Creates a parse error for the lookahead token.
    fn unexpected(&self, expected: Expected) -> Error {
        Error::unexpected_token(
            self.line(),
            expected,
            self.current.kind,
            self.current.lexeme.clone(),
        )
    }
}

fn lexeme(token: Token) -> String {
    token.lexeme.unwrap_or_default()
}

/// Parses a complete script from a token source.
///
/// # Errors
/// Returns a parse error if the tokens do not form a valid script.
pub fn parse(source: impl TokenSource) -> Result<Script> {
    Parser::new(source).run(false)
}
