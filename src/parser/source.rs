//! Token source consumed by the parse context.
//!
//! The parser never talks to the scanner directly. It reads tokens through
//! [`TokenSource`], which offers bounded lookahead, snapshots for
//! backtracking and in-place substitution of the next token (used to split
//! `>>` into two closing angle brackets without re-lexing).

use super::lexer::{Lexer, Token, TokenKind};
use super::span::Location;

/// Opaque scanner position captured by [`TokenSource::snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceState {
    cursor: usize,
}

pub trait TokenSource {
    /// Kind of the token `n` positions ahead (0 is the next token)
    fn peek(&self, n: usize) -> TokenKind;

    /// Text of the token `n` positions ahead, if it carries any
    fn peek_text(&self, n: usize) -> Option<&str>;

    /// Start location of the token `n` positions ahead
    fn peek_location(&self, n: usize) -> Location;

    /// Consume the next token. At end of input this is a no-op.
    fn advance(&mut self);

    /// Text of the most recently consumed token
    fn current_text(&self) -> Option<&str>;

    /// End location of the most recently consumed token
    fn current_end(&self) -> Location;

    /// Absolute index of the next token in the stream
    fn position(&self) -> usize;

    fn snapshot(&self) -> SourceState;

    fn restore(&mut self, state: SourceState);

    /// Replace the next token with one of `kind` covering its tail; returns
    /// the replaced token so the change can be undone with [`put_back`].
    ///
    /// [`put_back`]: TokenSource::put_back
    fn substitute(&mut self, kind: TokenKind) -> Token;

    /// Reinstate `token` at absolute index `index`
    fn put_back(&mut self, index: usize, token: Token);
}

/// [`TokenSource`] over a fully scanned token vector.
///
/// The vector always ends with an [`TokenKind::Eof`] token, which is never
/// consumed, so every lookahead is answerable.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(source: &str) -> Self {
        Self::from_tokens(Lexer::new(source).tokenize())
    }

    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map(|t| t.end).unwrap_or_else(Location::start);
            tokens.push(Token::new(TokenKind::Eof, None, end, end));
        }
        Self { tokens, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    fn token(&self, n: usize) -> &Token {
        let index = (self.cursor + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }
}

impl TokenSource for TokenStream {
    fn peek(&self, n: usize) -> TokenKind {
        self.token(n).kind
    }

    fn peek_text(&self, n: usize) -> Option<&str> {
        self.token(n).text.as_deref()
    }

    fn peek_location(&self, n: usize) -> Location {
        self.token(n).location
    }

    fn advance(&mut self) {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
    }

    fn current_text(&self) -> Option<&str> {
        match self.cursor {
            0 => None,
            i => self.tokens[i - 1].text.as_deref(),
        }
    }

    fn current_end(&self) -> Location {
        match self.cursor {
            0 => self.tokens[0].location,
            i => self.tokens[i - 1].end,
        }
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn snapshot(&self) -> SourceState {
        SourceState { cursor: self.cursor }
    }

    fn restore(&mut self, state: SourceState) {
        self.cursor = state.cursor;
    }

    fn substitute(&mut self, kind: TokenKind) -> Token {
        let index = self.cursor;
        let previous = self.tokens[index].clone();
        let dropped = previous.kind.as_str().len().saturating_sub(kind.as_str().len());
        let replacement = Token::new(kind, None, previous.location.shifted(dropped), previous.end);
        self.tokens[index] = replacement;
        previous
    }

    fn put_back(&mut self, index: usize, token: Token) {
        if let Some(slot) = self.tokens.get_mut(index) {
            *slot = token;
        }
    }
}
