//! Parse context: the only channel between grammar rules and the token source.
//!
//! Every node is bracketed by [`ParserContext::begin`] and either
//! [`ParserContext::done`], which yields the node's span, or
//! [`ParserContext::rollback`], which rewinds the source to where the frame
//! began. Token substitutions made while a frame is open are recorded on the
//! frame so that a rollback can undo them; a finished frame hands its records
//! to the enclosing frame, so an outer rollback still undoes substitutions
//! made by nested rules.
//!
//! Diagnostics go through [`ParserContext::error`], which suppresses
//! cascades: errors at or before the last reported position, errors already
//! reported at the same position with the same code, and everything past the
//! configured maximum. Warnings are deduplicated by position and code and
//! capped at the same maximum, counted apart from errors.

use std::collections::HashSet;

use log::{debug, trace, warn};

use super::error::{Diagnostic, DiagnosticSink, ErrorCode, Severity};
use super::lexer::{Token, TokenKind};
use super::source::{SourceState, TokenSource};
use super::span::{Location, Span};
use crate::config::ParserConfig;

/// A substitution to undo on rollback: the token that used to be at `index`
#[derive(Debug, Clone)]
struct RollbackToken {
    index: usize,
    previous: Token,
}

#[derive(Debug)]
struct Frame {
    state: SourceState,
    begin: Location,
    /// Earliest start among the frame's finished children
    earliest_child: Option<Location>,
    rollback_tokens: Vec<RollbackToken>,
}

pub struct ParserContext<S: TokenSource, D: DiagnosticSink> {
    source: S,
    sink: D,
    frames: Vec<Frame>,
    max_errors: usize,
    error_count: usize,
    warning_count: usize,
    last_error_offset: Option<usize>,
    reported: HashSet<(usize, ErrorCode)>,
    throttled: bool,
}

impl<S: TokenSource, D: DiagnosticSink> ParserContext<S, D> {
    pub fn new(source: S, sink: D, config: &ParserConfig) -> Self {
        Self {
            source,
            sink,
            frames: Vec::new(),
            max_errors: config.max_errors,
            error_count: 0,
            warning_count: 0,
            last_error_offset: None,
            reported: HashSet::new(),
            throttled: false,
        }
    }

    /// Open a frame at the next token
    pub fn begin(&mut self) {
        let frame = Frame {
            state: self.source.snapshot(),
            begin: self.source.peek_location(0),
            earliest_child: None,
            rollback_tokens: Vec::new(),
        };
        self.frames.push(frame);
    }

    /// Close the innermost frame and return the span it covered
    pub fn done(&mut self) -> Span {
        let Some(frame) = self.frames.pop() else {
            debug!("done() without a matching begin()");
            return Span::single(self.source.current_end());
        };
        let span = self.span_of(&frame);
        if let Some(parent) = self.frames.last_mut() {
            parent.rollback_tokens.extend(frame.rollback_tokens);
            if parent.earliest_child.map_or(true, |earliest| span.start.offset < earliest.offset) {
                parent.earliest_child = Some(span.start);
            }
        }
        span
    }

    /// Span of the innermost frame so far, leaving the frame open.
    ///
    /// Left-associative chains use this to stamp each intermediate node with
    /// a span that starts where the whole chain began.
    pub fn done_without_consuming(&self) -> Span {
        match self.frames.last() {
            Some(frame) => self.span_of(frame),
            None => Span::single(self.source.current_end()),
        }
    }

    /// Discard the innermost frame and rewind the source to where it began,
    /// undoing every substitution made inside it in reverse order.
    pub fn rollback(&mut self) {
        let Some(frame) = self.frames.pop() else {
            debug!("rollback() without a matching begin()");
            return;
        };
        for record in frame.rollback_tokens.into_iter().rev() {
            trace!("undo substitution at token {}", record.index);
            self.source.put_back(record.index, record.previous);
        }
        self.source.restore(frame.state);
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// From the frame's first token to the end of the last consumed one.
    ///
    /// A frame that consumed nothing is an empty span at the end of the last
    /// consumed token, so it stays inside whatever encloses it. The start is
    /// pulled back to cover any child that ended up earlier.
    fn span_of(&self, frame: &Frame) -> Span {
        let end = self.source.current_end();
        let mut start = if end.offset < frame.begin.offset { end } else { frame.begin };
        if let Some(earliest) = frame.earliest_child {
            if earliest.offset < start.offset {
                start = earliest;
            }
        }
        Span::new(start, end)
    }

    pub fn peek(&self, n: usize) -> TokenKind {
        self.source.peek(n)
    }

    pub fn peek_text(&self, n: usize) -> Option<&str> {
        self.source.peek_text(n)
    }

    pub fn peek_location(&self, n: usize) -> Location {
        self.source.peek_location(n)
    }

    pub fn advance(&mut self) {
        self.source.advance();
    }

    pub fn current_text(&self) -> Option<&str> {
        self.source.current_text()
    }

    pub fn current_end(&self) -> Location {
        self.source.current_end()
    }

    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Replace the next token with `kind`, e.g. `>>` with `>` once the first
    /// `>` has closed a type argument list.
    pub fn replace_next_token(&mut self, kind: TokenKind) {
        let index = self.source.position();
        let previous = self.source.substitute(kind);
        trace!("substitute {} -> {} at token {}", previous.kind.as_str(), kind.as_str(), index);
        let record = RollbackToken { index, previous };
        match self.frames.last_mut() {
            Some(frame) => frame.rollback_tokens.push(record),
            None => debug!("substitution outside of any frame cannot be rolled back"),
        }
    }

    pub fn error(&mut self, code: ErrorCode, location: Location, args: Vec<String>) {
        self.report(Diagnostic::new(code, location, args));
    }

    pub fn warning(&mut self, code: ErrorCode, location: Location, args: Vec<String>) {
        let mut diagnostic = Diagnostic::new(code, location, args);
        diagnostic.severity = Severity::Warning;
        self.report(diagnostic);
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        let offset = diagnostic.location.offset;
        if diagnostic.severity == Severity::Warning {
            if !self.reported.insert((offset, diagnostic.code)) {
                return;
            }
            if self.warning_count >= self.max_errors {
                self.throttle();
                return;
            }
            self.warning_count += 1;
            self.sink.report(diagnostic);
            return;
        }

        if self.last_error_offset.is_some_and(|last| offset <= last) {
            trace!("suppressed cascading error: {}", diagnostic);
            return;
        }
        if !self.reported.insert((offset, diagnostic.code)) {
            return;
        }
        if self.error_count >= self.max_errors {
            self.throttle();
            return;
        }

        debug!("{}", diagnostic);
        self.error_count += 1;
        self.last_error_offset = Some(offset);
        self.sink.report(diagnostic);
    }

    fn throttle(&mut self) {
        if !self.throttled {
            warn!("diagnostic limit of {} reached, further diagnostics are suppressed", self.max_errors);
            self.throttled = true;
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn into_sink(self) -> D {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::source::TokenStream;

    fn context(source: &str) -> ParserContext<TokenStream, Vec<Diagnostic>> {
        ParserContext::new(TokenStream::new(source), Vec::new(), &ParserConfig::default())
    }

    #[test]
    fn done_spans_consumed_tokens() {
        let mut ctx = context("foo bar baz");
        ctx.advance();
        ctx.begin();
        ctx.advance();
        ctx.advance();
        let span = ctx.done();
        assert_eq!(span.start.offset, 4);
        assert_eq!(span.end.offset, 11);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn empty_frame_spans_nothing() {
        let mut ctx = context("a b");
        ctx.advance();
        ctx.begin();
        let span = ctx.done();
        assert!(span.is_empty());
        assert_eq!(span.start.offset, 1);
    }

    #[test]
    fn rollback_restores_position_and_tokens() {
        let mut ctx = context("a >> b");
        ctx.advance();
        ctx.begin();
        ctx.begin();
        ctx.replace_next_token(TokenKind::Gt);
        ctx.advance();
        ctx.done();
        assert_eq!(ctx.peek(0), TokenKind::Identifier);
        ctx.rollback();
        assert_eq!(ctx.peek(0), TokenKind::Sar);
        assert_eq!(ctx.peek_location(0).offset, 2);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn done_without_consuming_keeps_frame_open() {
        let mut ctx = context("a + b + c");
        ctx.begin();
        ctx.advance();
        ctx.advance();
        ctx.advance();
        let first = ctx.done_without_consuming();
        ctx.advance();
        ctx.advance();
        let whole = ctx.done();
        assert_eq!(first.start, whole.start);
        assert!(whole.encloses(first));
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn errors_at_or_before_last_are_suppressed() {
        let mut ctx = context("a b c");
        ctx.error(ErrorCode::UnexpectedToken, Location::new(1, 3, 2), vec!["b".into()]);
        ctx.error(ErrorCode::ExpectedToken, Location::new(1, 3, 2), vec![]);
        ctx.error(ErrorCode::ExpectedToken, Location::new(1, 1, 0), vec![]);
        ctx.error(ErrorCode::ExpectedToken, Location::new(1, 5, 4), vec![]);
        assert_eq!(ctx.error_count(), 2);
        assert_eq!(ctx.into_sink().len(), 2);
    }

    #[test]
    fn error_limit_caps_reports() {
        let config = ParserConfig::default().with_max_errors(2);
        let mut ctx = ParserContext::new(TokenStream::new("x"), Vec::new(), &config);
        for offset in 0..5 {
            ctx.error(ErrorCode::UnexpectedToken, Location::new(1, offset + 1, offset), vec![]);
        }
        assert_eq!(ctx.into_sink().len(), 2);
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut ctx = context(";;");
        ctx.warning(ErrorCode::UnnecessarySemicolon, Location::new(1, 2, 1), vec![]);
        ctx.error(ErrorCode::UnexpectedToken, Location::new(1, 1, 0), vec![]);
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.into_sink().len(), 2);
    }

    #[test]
    fn warnings_have_their_own_limit() {
        let config = ParserConfig::default().with_max_errors(2);
        let mut ctx = ParserContext::new(TokenStream::new("x"), Vec::new(), &config);
        for offset in 0..5 {
            ctx.warning(ErrorCode::UnnecessarySemicolon, Location::new(1, offset + 1, offset), vec![]);
        }
        ctx.error(ErrorCode::UnexpectedToken, Location::new(1, 7, 6), vec![]);
        assert_eq!(ctx.warning_count(), 2);
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.into_sink().len(), 3);
    }
}
