//! Type annotations, type argument and type parameter lists.

use super::error::{DiagnosticSink, ErrorCode};
use super::lexer::TokenKind;
use super::parser::Parser;
use super::source::TokenSource;
use super::span::Span;
use crate::ast::*;

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    /// `void`, or a possibly qualified name with optional type arguments
    pub(crate) fn parse_type_annotation(&mut self) -> TypeRef {
        self.type_annotation(false).unwrap_or_else(|| TypeRef {
            name: String::new(),
            type_args: Vec::new(),
            span: Span::single(self.ctx.current_end()),
        })
    }

    /// Type annotation parser shared by real parses and probes.
    ///
    /// With `quiet` set nothing is reported: a malformed type rolls back and
    /// yields `None`. Otherwise errors are reported and a (possibly
    /// nameless) type is always returned.
    pub(crate) fn type_annotation(&mut self, quiet: bool) -> Option<TypeRef> {
        self.begin();
        let name = if self.optional(TokenKind::Void) {
            Some("void".to_string())
        } else {
            self.qualified_type_name()
        };
        let Some(name) = name else {
            if quiet {
                self.rollback();
                return None;
            }
            let location = self.location();
            let found = self.describe_next();
            self.error(ErrorCode::ExpectedType, location, vec![found]);
            let span = self.done();
            return Some(TypeRef {
                name: String::new(),
                type_args: Vec::new(),
                span,
            });
        };

        let mut type_args = Vec::new();
        if self.at(TokenKind::Lt) {
            self.next();
            loop {
                match self.type_annotation(quiet) {
                    Some(arg) => type_args.push(arg),
                    None => {
                        self.rollback();
                        return None;
                    }
                }
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
            if !self.close_type_arguments(quiet) && quiet {
                self.rollback();
                return None;
            }
        }
        let span = self.done();
        Some(TypeRef { name, type_args, span })
    }

    /// `ident` or `prefix.ident`
    fn qualified_type_name(&mut self) -> Option<String> {
        if !self.at(TokenKind::Identifier) {
            return None;
        }
        let mut name = self.peek_text(0).unwrap_or_default().to_string();
        self.next();
        if self.at(TokenKind::Period) && self.peek(1) == TokenKind::Identifier {
            self.next();
            name.push('.');
            name.push_str(self.peek_text(0).unwrap_or_default());
            self.next();
        }
        Some(name)
    }

    /// Consume the `>` closing a type argument list.
    ///
    /// A `>>` or `>>>` closes this list and leaves the rest of the token for
    /// the enclosing lists.
    pub(crate) fn close_type_arguments(&mut self, quiet: bool) -> bool {
        match self.peek(0) {
            TokenKind::Gt => {
                self.next();
                true
            }
            TokenKind::Sar => {
                self.ctx.replace_next_token(TokenKind::Gt);
                true
            }
            TokenKind::Shr => {
                self.ctx.replace_next_token(TokenKind::Sar);
                true
            }
            _ => {
                if !quiet {
                    self.report_expected(TokenKind::Gt);
                }
                false
            }
        }
    }

    /// `<T, U>` used as type arguments
    pub(crate) fn parse_type_arguments(&mut self) -> Vec<TypeRef> {
        let mut args = Vec::new();
        if !self.expect(TokenKind::Lt) {
            return args;
        }
        loop {
            args.push(self.parse_type_annotation());
            if !self.optional(TokenKind::Comma) {
                break;
            }
        }
        self.close_type_arguments(false);
        args
    }

    /// `<T extends B, U>` on a class, interface or typedef
    pub(crate) fn parse_type_parameters(&mut self) -> Vec<TypeParam> {
        let mut params = Vec::new();
        if !self.expect(TokenKind::Lt) {
            return params;
        }
        loop {
            self.begin();
            let name = self.parse_identifier();
            let bound = if self.optional(TokenKind::Extends) {
                Some(self.parse_type_annotation())
            } else {
                None
            };
            let span = self.done();
            params.push(TypeParam { name, bound, span });
            if !self.optional(TokenKind::Comma) {
                break;
            }
        }
        self.close_type_arguments(false);
        params
    }

    /// Comma separated types after `implements` or an interface's `extends`
    pub(crate) fn parse_type_list(&mut self) -> Vec<TypeRef> {
        let mut types = vec![self.parse_type_annotation()];
        while self.optional(TokenKind::Comma) {
            types.push(self.parse_type_annotation());
        }
        types
    }

    /// A return type if one precedes a name here
    pub(crate) fn parse_optional_return_type(&mut self) -> Option<TypeRef> {
        if self.at(TokenKind::Void) || (self.at(TokenKind::Identifier) && self.looks_like_return_type()) {
            Some(self.parse_type_annotation())
        } else {
            None
        }
    }
}
