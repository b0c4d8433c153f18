//! Error recovery helpers.
//!
//! Each helper either consumes what it was asked for, or reports once and
//! skips ahead to a point where parsing can resume. None of them can leave
//! the stream where it was unless it stopped at a token an enclosing rule
//! owns or at end of input.

use log::trace;

use super::error::DiagnosticSink;
use super::lexer::TokenKind;
use super::parser::Parser;
use super::source::TokenSource;
use crate::ast::{Block, ErrorNode};

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    pub(crate) fn expect_close_paren(&mut self) -> bool {
        self.expect_closer(TokenKind::LParen, TokenKind::RParen)
    }

    pub(crate) fn expect_close_bracket(&mut self) -> bool {
        self.expect_closer(TokenKind::LBracket, TokenKind::RBracket)
    }

    pub(crate) fn expect_close_brace(&mut self) -> bool {
        self.expect_closer(TokenKind::LBrace, TokenKind::RBrace)
    }

    /// Consume `close`, or report it and skip to the matching one.
    ///
    /// Skipping tracks nesting of `open`/`close` and stops without consuming
    /// at a token that plausibly ends an enclosing construct.
    fn expect_closer(&mut self, open: TokenKind, close: TokenKind) -> bool {
        if self.optional(close) {
            return true;
        }
        self.report_expected(close);
        let mut depth = 0usize;
        loop {
            let kind = self.peek(0);
            if kind == TokenKind::Eof {
                return false;
            }
            if kind == close {
                self.next();
                if depth == 0 {
                    trace!("resynchronized at '{}'", close.as_str());
                    return true;
                }
                depth -= 1;
                continue;
            }
            if kind == open {
                depth += 1;
            } else if depth == 0 && ends_enclosing_construct(close, kind) {
                return false;
            }
            self.next();
        }
    }

    /// Consume `;`, or report it and skip to the next `;` outside braces.
    ///
    /// Stops before an unmatched `}`.
    pub(crate) fn expect_statement_end(&mut self) {
        if self.optional(TokenKind::Semicolon) {
            return;
        }
        self.report_expected(TokenKind::Semicolon);
        let mut depth = 0usize;
        loop {
            match self.peek(0) {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.next();
                    return;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.next();
        }
    }

    /// Consume tokens up to a safe boundary and keep their text.
    ///
    /// A `;` ends the capture and is included; a `}` closing a brace opened
    /// during the capture is included too, an unmatched one is not.
    pub(crate) fn capture_error_text(&mut self) -> ErrorNode {
        self.begin();
        let mut words: Vec<String> = Vec::new();
        let mut depth = 0usize;
        loop {
            let kind = self.peek(0);
            if kind == TokenKind::Eof || (kind == TokenKind::RBrace && depth == 0) {
                break;
            }
            words.push(self.lexeme());
            self.next();
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Semicolon if depth == 0 => break,
                _ => {}
            }
        }
        let span = self.done();
        trace!("captured {} tokens as error text", words.len());
        ErrorNode {
            text: words.join(" "),
            span,
        }
    }

    /// Skip a `{ ... }` body by brace counting (diet mode)
    pub(crate) fn skip_block(&mut self) -> Block {
        self.begin();
        debug_assert!(self.at(TokenKind::LBrace));
        let mut depth = 0usize;
        loop {
            match self.peek(0) {
                TokenKind::Eof => {
                    self.report_expected(TokenKind::RBrace);
                    break;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next();
                        break;
                    }
                }
                _ => {}
            }
            self.next();
        }
        let span = self.done();
        Block {
            statements: Vec::new(),
            span,
        }
    }

    /// Skip `=> expr;` up to and including the `;` (diet mode)
    pub(crate) fn skip_arrow_body(&mut self) -> Block {
        self.begin();
        debug_assert!(self.at(TokenKind::Arrow));
        let mut depth = 0usize;
        loop {
            match self.peek(0) {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => {
                    self.next();
                    break;
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.next();
        }
        let span = self.done();
        Block {
            statements: Vec::new(),
            span,
        }
    }
}

/// Tokens that end the construct around a missing `)` or `]`
fn ends_enclosing_construct(close: TokenKind, kind: TokenKind) -> bool {
    match close {
        TokenKind::RBrace => false,
        TokenKind::RParen => matches!(
            kind,
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace | TokenKind::RBracket
        ),
        _ => matches!(
            kind,
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace | TokenKind::RParen
        ),
    }
}
