//! Disambiguation probes.
//!
//! Each probe opens a frame, walks ahead and then either rolls back (a pure
//! yes/no answer) or keeps what it parsed. Probes never report diagnostics
//! and give up once they have walked `max_lookahead` tokens.

use log::trace;

use super::error::DiagnosticSink;
use super::lexer::TokenKind;
use super::parser::Parser;
use super::source::TokenSource;
use crate::ast::TypeRef;

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    /// A type annotation followed by an identifier
    pub(crate) fn looks_like_return_type(&mut self) -> bool {
        self.begin();
        let result = self.type_annotation(true).is_some() && self.at(TokenKind::Identifier);
        self.rollback();
        trace!("looks_like_return_type: {}", result);
        result
    }

    /// `[type] name(params)` followed by `=>` or `{`
    pub(crate) fn looks_like_function_header(&mut self) -> bool {
        self.begin();
        let result = self.scan_function_header();
        self.rollback();
        trace!("looks_like_function_header: {}", result);
        result
    }

    fn scan_function_header(&mut self) -> bool {
        if (self.at(TokenKind::Void) || self.looks_like_return_type()) && self.type_annotation(true).is_none() {
            return false;
        }
        if !self.optional(TokenKind::Identifier) || !self.at(TokenKind::LParen) {
            return false;
        }
        self.skip_balanced(TokenKind::LParen, TokenKind::RParen)
            && matches!(self.peek(0), TokenKind::Arrow | TokenKind::LBrace)
    }

    /// `(params)` followed by `=>` or `{`, the start of a function literal
    pub(crate) fn looks_like_function_literal(&mut self) -> bool {
        self.begin();
        let result = self.skip_balanced(TokenKind::LParen, TokenKind::RParen)
            && matches!(self.peek(0), TokenKind::Arrow | TokenKind::LBrace);
        self.rollback();
        trace!("looks_like_function_literal: {}", result);
        result
    }

    /// In a typedef: whether the next identifier is the alias name itself,
    /// meaning no return type was written
    pub(crate) fn is_function_type_alias_name(&mut self) -> bool {
        self.begin();
        let result = self.optional(TokenKind::Identifier)
            && (self.at(TokenKind::LParen)
                || (self.at(TokenKind::Lt)
                    && self.skip_balanced(TokenKind::Lt, TokenKind::Gt)
                    && self.at(TokenKind::LParen)));
        self.rollback();
        trace!("is_function_type_alias_name: {}", result);
        result
    }

    /// `<T>[` or `<K, V>{`
    pub(crate) fn looks_like_typed_literal(&mut self) -> bool {
        self.begin();
        let result = self.skip_balanced(TokenKind::Lt, TokenKind::Gt)
            && matches!(self.peek(0), TokenKind::LBracket | TokenKind::LBrace);
        self.rollback();
        trace!("looks_like_typed_literal: {}", result);
        result
    }

    /// Speculatively parse the type of a local declaration such as
    /// `List<List<int>> x = ...`.
    ///
    /// The type is kept when an identifier and a declaration continuation
    /// follow it; otherwise the tokens, including any split `>>`, are put
    /// back and `None` is returned.
    pub(crate) fn try_type_annotation_for_declaration(&mut self) -> Option<TypeRef> {
        self.begin();
        match self.type_annotation(true) {
            Some(type_ref)
                if self.at(TokenKind::Identifier)
                    && matches!(
                        self.peek(1),
                        TokenKind::Assign
                            | TokenKind::Semicolon
                            | TokenKind::Comma
                            | TokenKind::In
                            | TokenKind::RParen
                    ) =>
            {
                self.done();
                trace!("declaration type kept: {}", type_ref);
                Some(type_ref)
            }
            _ => {
                self.rollback();
                trace!("declaration type rolled back");
                None
            }
        }
    }

    /// Whether `const` starts a declaration rather than a constant
    /// expression such as `const Point(0, 0)` or `const [1]`
    pub(crate) fn const_starts_declaration(&mut self) -> bool {
        if self.peek(1) != TokenKind::Identifier {
            return false;
        }
        if !matches!(self.peek(2), TokenKind::Lt | TokenKind::Period) {
            return self.peek(2) != TokenKind::LParen;
        }
        self.begin();
        self.next();
        let result = self.looks_like_return_type();
        self.rollback();
        result
    }

    /// Walk from `open` to its matching `close`, consuming both.
    ///
    /// For angle brackets `>>` and `>>>` close two and three levels and `<<`
    /// opens two. False at end of input or past the lookahead limit.
    pub(crate) fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) -> bool {
        if !self.at(open) {
            return false;
        }
        let angles = open == TokenKind::Lt;
        let mut depth: usize = 0;
        let mut walked = 0;
        loop {
            if walked >= self.config.max_lookahead {
                trace!("lookahead limit reached");
                return false;
            }
            let kind = self.peek(0);
            let (opens, closes) = match kind {
                TokenKind::Eof => return false,
                k if k == open => (1, 0),
                k if k == close => (0, 1),
                TokenKind::Shl if angles => (2, 0),
                TokenKind::Sar if angles => (0, 2),
                TokenKind::Shr if angles => (0, 3),
                _ => (0, 0),
            };
            self.next();
            walked += 1;
            depth += opens;
            if closes > 0 {
                if depth <= closes {
                    return true;
                }
                depth -= closes;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::parser::error::Diagnostics;
    use crate::parser::source::TokenStream;

    fn parser(source: &str) -> Parser<TokenStream, Diagnostics> {
        Parser::new(source, ParserConfig::default(), Diagnostics::new())
    }

    #[test]
    fn function_headers() {
        assert!(parser("foo(a, b) { }").looks_like_function_header());
        assert!(parser("int foo(a) => a;").looks_like_function_header());
        assert!(parser("List<int> foo() {").looks_like_function_header());
        assert!(!parser("foo(a, b);").looks_like_function_header());
        assert!(!parser("a < b").looks_like_function_header());
    }

    #[test]
    fn probes_leave_stream_untouched() {
        let mut p = parser("List<List<int>> x;");
        let before: Vec<TokenKind> = (0..8).map(|i| p.peek(i)).collect();
        assert!(p.looks_like_return_type());
        assert!(!p.looks_like_function_header());
        let after: Vec<TokenKind> = (0..8).map(|i| p.peek(i)).collect();
        assert_eq!(before, after);
        assert_eq!(p.depth(), 0);
    }

    #[test]
    fn declaration_type_kept_or_rolled_back() {
        let mut p = parser("List<List<int>> x = y;");
        let ty = p.try_type_annotation_for_declaration();
        assert_eq!(ty.map(|t| t.to_string()), Some("List<List<int>>".to_string()));
        assert_eq!(p.peek_text(0), Some("x"));

        let mut p = parser("a < b >> c;");
        assert!(p.try_type_annotation_for_declaration().is_none());
        assert_eq!(p.peek(3), TokenKind::Sar);
        assert_eq!(p.depth(), 0);
    }

    #[test]
    fn typedef_name_detection() {
        assert!(parser("F(int x);").is_function_type_alias_name());
        assert!(parser("F<T>(T x);").is_function_type_alias_name());
        assert!(!parser("int F(int x);").is_function_type_alias_name());
    }

    #[test]
    fn typed_literals() {
        assert!(parser("<int>[1]").looks_like_typed_literal());
        assert!(parser("<String, List<int>>{}").looks_like_typed_literal());
        assert!(!parser("<int> x").looks_like_typed_literal());
    }

    #[test]
    fn lookahead_is_bounded() {
        let config = ParserConfig::default().with_max_lookahead(4);
        let mut p = Parser::new("(a, b, c, d, e) => 1", config, Diagnostics::new());
        assert!(!p.looks_like_function_literal());
    }
}
