//! Parser for the Quill language
//!
//! A speculative recursive-descent parser. Grammar rules live in sibling
//! modules as further `impl` blocks on [`Parser`]; this file holds the
//! struct, the token-level helpers every rule uses and the entry points.
//!
//! Rules never fail: a malformed construct is reported to the diagnostic
//! sink and replaced by the best node that can be built, so callers always
//! receive a complete tree.

use log::debug;

use super::context::ParserContext;
use super::error::{DiagnosticSink, ErrorCode};
use super::keywords::PseudoKeyword;
use super::lexer::TokenKind;
use super::source::{TokenSource, TokenStream};
use super::span::{Location, Span};
use crate::ast::*;
use crate::config::ParserConfig;

/// Parser for Quill source
pub struct Parser<S: TokenSource, D: DiagnosticSink> {
    pub(super) ctx: ParserContext<S, D>,
    pub(super) config: ParserConfig,
}

impl<D: DiagnosticSink> Parser<TokenStream, D> {
    /// Create a parser over `source`, reporting diagnostics to `sink`
    pub fn new(source: &str, config: ParserConfig, sink: D) -> Self {
        let stream = TokenStream::new(source);
        debug!("scanned {} tokens (diet: {})", stream.len(), config.diet);
        Self::with_source(stream, config, sink)
    }
}

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    pub fn with_source(source: S, config: ParserConfig, sink: D) -> Self {
        Self {
            ctx: ParserContext::new(source, sink, &config),
            config,
        }
    }

    /// Parse a whole compilation unit: directives, then declarations
    pub fn parse_unit(&mut self) -> Unit {
        self.begin();
        let directives = self.parse_directive_list();
        let mut declarations = Vec::new();
        while !self.at(TokenKind::Eof) {
            let before = self.ctx.position();
            if self.at(TokenKind::Hash) {
                let location = self.location();
                self.error(ErrorCode::DirectiveAfterDeclaration, location, vec![]);
                self.parse_directive();
            } else if let Some(declaration) = self.parse_top_level_declaration() {
                declarations.push(declaration);
            }
            if self.ctx.position() == before {
                let error = self.capture_error_text();
                declarations.push(Declaration::Error(error));
                if self.ctx.position() == before {
                    self.next();
                }
            }
        }
        let span = self.done();
        self.check_balanced();
        debug!(
            "parsed {} directives, {} declarations, {} errors",
            directives.len(),
            declarations.len(),
            self.ctx.error_count()
        );
        Unit {
            directives,
            declarations,
            span,
        }
    }

    /// Parse only the leading directives and stop at the first declaration
    pub fn parse_directives(&mut self) -> Vec<Directive> {
        let directives = self.parse_directive_list();
        self.check_balanced();
        directives
    }

    /// Parse a single expression that must span the whole input
    pub fn parse_standalone_expression(&mut self) -> Expr {
        let expr = self.parse_expression();
        self.expect_end_of_input();
        self.check_balanced();
        expr
    }

    /// Parse a single statement that must span the whole input
    pub fn parse_standalone_statement(&mut self) -> Stmt {
        let stmt = self.parse_statement();
        self.expect_end_of_input();
        self.check_balanced();
        stmt
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Open parse frames; zero between top-level calls
    pub fn depth(&self) -> usize {
        self.ctx.depth()
    }

    pub fn error_count(&self) -> usize {
        self.ctx.error_count()
    }

    pub fn sink(&self) -> &D {
        self.ctx.sink()
    }

    pub fn into_sink(self) -> D {
        self.ctx.into_sink()
    }

    fn expect_end_of_input(&mut self) {
        if !self.at(TokenKind::Eof) {
            let location = self.location();
            let found = self.describe_next();
            self.error(ErrorCode::UnexpectedToken, location, vec![found]);
        }
    }

    fn check_balanced(&self) {
        debug_assert_eq!(self.ctx.depth(), 0, "unbalanced parse frames");
    }

    // Frame primitives

    pub(super) fn begin(&mut self) {
        self.ctx.begin();
    }

    pub(super) fn done(&mut self) -> Span {
        self.ctx.done()
    }

    pub(super) fn done_without_consuming(&self) -> Span {
        self.ctx.done_without_consuming()
    }

    pub(super) fn rollback(&mut self) {
        self.ctx.rollback();
    }

    // Token helpers

    pub(super) fn peek(&self, n: usize) -> TokenKind {
        self.ctx.peek(n)
    }

    pub(super) fn peek_text(&self, n: usize) -> Option<&str> {
        self.ctx.peek_text(n)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.ctx.peek(0) == kind
    }

    /// Start location of the next token
    pub(super) fn location(&self) -> Location {
        self.ctx.peek_location(0)
    }

    pub(super) fn next(&mut self) {
        self.ctx.advance();
    }

    /// Consume the next token if it is `kind`
    pub(super) fn optional(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report it missing.
    ///
    /// On a mismatch the offending token is skipped unless it is end of
    /// input or a delimiter an enclosing rule is waiting for.
    pub(super) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.optional(kind) {
            return true;
        }
        self.report_expected(kind);
        if !self.at_structural_token() {
            self.next();
        }
        false
    }

    pub(super) fn report_expected(&mut self, kind: TokenKind) {
        let location = self.location();
        let found = self.describe_next();
        self.error(ErrorCode::ExpectedToken, location, vec![format!("'{}'", kind.as_str()), found]);
    }

    pub(super) fn at_structural_token(&self) -> bool {
        matches!(
            self.peek(0),
            TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::LBrace
                | TokenKind::Semicolon
                | TokenKind::InterpolationEnd
                | TokenKind::Eof
        )
    }

    /// The pseudo keyword `n` tokens ahead, if that token is one
    pub(super) fn pseudo_keyword_at(&self, n: usize) -> Option<PseudoKeyword> {
        if self.peek(n) != TokenKind::Identifier {
            return None;
        }
        self.peek_text(n).and_then(PseudoKeyword::lookup)
    }

    pub(super) fn at_pseudo_keyword(&self, keyword: PseudoKeyword) -> bool {
        self.peek(0) == TokenKind::Identifier && self.peek_text(0) == Some(keyword.as_str())
    }

    pub(super) fn optional_pseudo_keyword(&mut self, keyword: PseudoKeyword) -> bool {
        if self.at_pseudo_keyword(keyword) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consume an identifier, or report one missing and return a
    /// placeholder with an empty name
    pub(super) fn parse_identifier(&mut self) -> Identifier {
        self.begin();
        if self.at(TokenKind::Identifier) {
            let name = self.peek_text(0).unwrap_or_default().to_string();
            self.next();
            let span = self.done();
            return Identifier::new(name, span);
        }
        let location = self.location();
        let found = self.describe_next();
        self.error(ErrorCode::ExpectedIdentifier, location, vec![found]);
        if !self.at_structural_token() {
            self.next();
        }
        let span = self.done();
        Identifier::missing(span)
    }

    /// Text of the next token as written, for error nodes
    pub(super) fn lexeme(&self) -> String {
        match self.peek_text(0) {
            Some(text) if self.peek(0).is_string_start() || self.peek(0) == TokenKind::StringEnd => {
                format!("'{}'", text)
            }
            Some(text) => text.to_string(),
            None => self.peek(0).as_str().to_string(),
        }
    }

    /// Human-readable description of the next token for diagnostics
    pub(super) fn describe_next(&self) -> String {
        match self.peek(0) {
            TokenKind::Eof => TokenKind::Eof.as_str().to_string(),
            kind @ (TokenKind::StringLiteral
            | TokenKind::StringSegment
            | TokenKind::StringEnd
            | TokenKind::UnterminatedString) => kind.as_str().to_string(),
            kind => match self.peek_text(0) {
                Some(text) => format!("'{}'", text),
                None => format!("'{}'", kind.as_str()),
            },
        }
    }

    pub(super) fn error(&mut self, code: ErrorCode, location: Location, args: Vec<String>) {
        self.ctx.error(code, location, args);
    }

    pub(super) fn warning(&mut self, code: ErrorCode, location: Location, args: Vec<String>) {
        self.ctx.warning(code, location, args);
    }

    /// Report the next token as unexpected
    pub(super) fn report_unexpected(&mut self) {
        let location = self.location();
        if self.at(TokenKind::Eof) {
            self.error(ErrorCode::UnexpectedEndOfInput, location, vec![]);
        } else {
            let found = self.describe_next();
            self.error(ErrorCode::UnexpectedToken, location, vec![found]);
        }
    }
}
