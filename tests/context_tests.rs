use quill::parser::{Diagnostic, ErrorCode, Location, ParserContext, TokenKind, TokenStream};
use quill::ParserConfig;

fn context(source: &str) -> ParserContext<TokenStream, Vec<Diagnostic>> {
    ParserContext::new(TokenStream::new(source), Vec::new(), &ParserConfig::default())
}

fn at(offset: usize) -> Location {
    Location::new(1, offset + 1, offset)
}

#[test]
fn done_spans_consumed_tokens() {
    let mut ctx = context("alpha beta gamma");
    ctx.advance();
    ctx.begin();
    ctx.advance();
    ctx.advance();
    let span = ctx.done();
    assert_eq!(span.start.offset, 6);
    assert_eq!(span.end.offset, 16);
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn empty_frame_has_single_point_span() {
    let mut ctx = context("x");
    ctx.begin();
    let span = ctx.done();
    assert_eq!(span.start, span.end);
    assert_eq!(span.start.offset, 0);
}

#[test]
fn empty_child_stays_inside_its_parent() {
    let mut ctx = context("a +   ;");
    ctx.advance();
    ctx.advance();
    ctx.begin();
    ctx.begin();
    let child = ctx.done();
    let parent = ctx.done();
    assert_eq!(child.start.offset, 3);
    assert!(parent.encloses(child), "{} outside {}", child, parent);
}

#[test]
fn rollback_restores_every_lookahead() {
    let mut ctx = context("a < b < c < d >>> e");
    let before: Vec<TokenKind> = (0..10).map(|i| ctx.peek(i)).collect();
    let position = ctx.position();

    ctx.begin();
    ctx.advance();
    ctx.advance();
    ctx.begin();
    for _ in 0..5 {
        ctx.advance();
    }
    ctx.replace_next_token(TokenKind::Sar);
    ctx.replace_next_token(TokenKind::Gt);
    assert_eq!(ctx.peek(0), TokenKind::Gt);
    ctx.done();
    ctx.rollback();

    let after: Vec<TokenKind> = (0..10).map(|i| ctx.peek(i)).collect();
    assert_eq!(before, after);
    assert_eq!(ctx.position(), position);
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn substitution_survives_done() {
    let mut ctx = context("x >> y");
    ctx.advance();
    ctx.begin();
    ctx.replace_next_token(TokenKind::Gt);
    assert_eq!(ctx.peek(0), TokenKind::Gt);
    ctx.advance();
    assert_eq!(ctx.peek(0), TokenKind::Gt);
    ctx.done();
    assert_eq!(ctx.peek(0), TokenKind::Gt);
}

#[test]
fn errors_are_monotonic() {
    let mut ctx = context("");
    ctx.error(ErrorCode::ExpectedToken, at(5), vec![]);
    ctx.error(ErrorCode::UnexpectedToken, at(3), vec![]);
    ctx.error(ErrorCode::UnexpectedToken, at(5), vec![]);
    ctx.error(ErrorCode::ExpectedIdentifier, at(9), vec![]);
    let codes: Vec<ErrorCode> = ctx.into_sink().into_iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::ExpectedToken, ErrorCode::ExpectedIdentifier]);
}

#[test]
fn warnings_do_not_move_the_watermark() {
    let mut ctx = context("");
    ctx.warning(ErrorCode::UnnecessarySemicolon, at(10), vec![]);
    ctx.warning(ErrorCode::UnnecessarySemicolon, at(10), vec![]);
    ctx.error(ErrorCode::ExpectedToken, at(4), vec![]);
    assert_eq!(ctx.error_count(), 1);
    assert_eq!(ctx.into_sink().len(), 2);
}

#[test]
fn error_cap_stops_reporting() {
    let config = ParserConfig::default().with_max_errors(2);
    let mut ctx = ParserContext::new(TokenStream::new(""), Vec::new(), &config);
    for offset in 0..10 {
        ctx.error(ErrorCode::UnexpectedToken, at(offset), vec![]);
    }
    assert_eq!(ctx.error_count(), 2);
    assert_eq!(ctx.into_sink().len(), 2);
}
