//! Statement rules and blocks.

use super::error::{DiagnosticSink, ErrorCode};
use super::keywords::PseudoKeyword;
use super::lexer::TokenKind;
use super::parser::Parser;
use super::source::TokenSource;
use crate::ast::*;

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    /// `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Block {
        self.begin();
        self.expect(TokenKind::LBrace);
        let statements = self.parse_statements_until(&[TokenKind::RBrace]);
        self.expect_close_brace();
        let span = self.done();
        Block { statements, span }
    }

    /// Statements up to one of `stops` or end of input
    fn parse_statements_until(&mut self, stops: &[TokenKind]) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.at(TokenKind::Eof) && !stops.contains(&self.peek(0)) {
            let before = self.ctx.position();
            statements.push(self.parse_statement());
            if self.ctx.position() == before {
                let error = self.capture_error_text();
                statements.push(Stmt::Error(error));
                if self.ctx.position() == before {
                    break;
                }
            }
        }
        statements
    }

    pub(crate) fn parse_statement(&mut self) -> Stmt {
        match self.peek(0) {
            TokenKind::LBrace => Stmt::Block(self.parse_block()),
            TokenKind::Var | TokenKind::Final => self.parse_variable_statement(),
            TokenKind::Const if self.const_starts_declaration() => self.parse_variable_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => self.parse_do_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Throw | TokenKind::Return => self.parse_throw_or_return(),
            TokenKind::Break | TokenKind::Continue => self.parse_jump_statement(),
            TokenKind::Semicolon => {
                self.begin();
                self.next();
                Stmt::Empty(self.done())
            }
            TokenKind::Identifier
                if self.at_pseudo_keyword(PseudoKeyword::Assert) && self.peek(1) == TokenKind::LParen =>
            {
                self.parse_assert_statement()
            }
            TokenKind::Identifier => self.parse_identifier_statement(),
            TokenKind::Void if self.looks_like_function_header() => self.parse_function_statement(),
            TokenKind::Eof => {
                self.begin();
                self.report_unexpected();
                let span = self.done();
                Stmt::Error(ErrorNode {
                    text: String::new(),
                    span,
                })
            }
            kind if can_start_expression(kind) => self.parse_expression_statement(),
            _ => {
                self.report_unexpected();
                Stmt::Error(self.capture_error_text())
            }
        }
    }

    /// Label, local function, typed declaration or expression statement
    fn parse_identifier_statement(&mut self) -> Stmt {
        if self.peek(1) == TokenKind::Colon {
            self.begin();
            let label = self.parse_identifier();
            self.next();
            let body = self.parse_statement();
            let span = self.done();
            return Stmt::Labeled(LabeledStmt {
                label,
                body: Box::new(body),
                span,
            });
        }
        if self.looks_like_function_header() {
            return self.parse_function_statement();
        }
        self.begin();
        match self.try_type_annotation_for_declaration() {
            Some(type_ref) => {
                let variables = self.parse_variable_declarators();
                self.expect_statement_end();
                let span = self.done();
                Stmt::Variable(VarDeclStmt {
                    modifiers: Vec::new(),
                    type_ref: Some(type_ref),
                    variables,
                    span,
                })
            }
            None => {
                self.rollback();
                self.parse_expression_statement()
            }
        }
    }

    fn parse_expression_statement(&mut self) -> Stmt {
        self.begin();
        let expr = self.parse_expression();
        self.expect_statement_end();
        let span = self.done();
        Stmt::Expr(ExprStmt { expr, span })
    }

    /// Local function declaration
    fn parse_function_statement(&mut self) -> Stmt {
        self.begin();
        let return_type = self.parse_optional_return_type();
        let name = self.parse_identifier();
        self.begin();
        let params = self.parse_formal_parameters();
        let body = self.parse_function_body(false);
        let function_span = self.done();
        let span = self.done();
        Stmt::Function(FunctionStmt {
            name,
            function: Function {
                return_type,
                params,
                body,
                span: function_span,
            },
            span,
        })
    }

    /// `var`/`final`/`const` declaration with optional type
    fn parse_variable_statement(&mut self) -> Stmt {
        self.begin();
        let (modifiers, type_ref) = self.parse_declaration_head();
        let variables = self.parse_variable_declarators();
        self.expect_statement_end();
        let span = self.done();
        Stmt::Variable(VarDeclStmt {
            modifiers,
            type_ref,
            variables,
            span,
        })
    }

    /// `var`, `final [T]` or `const [T]`
    fn parse_declaration_head(&mut self) -> (Vec<Modifier>, Option<TypeRef>) {
        let mut modifiers = Vec::new();
        match self.peek(0) {
            TokenKind::Var => {
                self.next();
                return (modifiers, None);
            }
            TokenKind::Final => modifiers.push(Modifier::Final),
            TokenKind::Const => modifiers.push(Modifier::Const),
            _ => {}
        }
        self.next();
        let type_ref = if self.at(TokenKind::Identifier) && self.looks_like_return_type() {
            Some(self.parse_type_annotation())
        } else {
            None
        };
        (modifiers, type_ref)
    }

    /// `a = 1, b, c = 2`
    pub(crate) fn parse_variable_declarators(&mut self) -> Vec<VariableDecl> {
        let mut variables = Vec::new();
        loop {
            self.begin();
            let name = self.parse_identifier();
            let initializer = if self.optional(TokenKind::Assign) {
                Some(self.parse_expression())
            } else {
                None
            };
            let span = self.done();
            variables.push(VariableDecl {
                name,
                initializer,
                span,
            });
            if !self.optional(TokenKind::Comma) {
                break;
            }
        }
        variables
    }

    fn parse_if_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        self.expect(TokenKind::LParen);
        let condition = self.parse_expression();
        self.expect_close_paren();
        let then_branch = self.parse_statement();
        let else_branch = if self.optional(TokenKind::Else) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        let span = self.done();
        Stmt::If(IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
            span,
        })
    }

    fn parse_for_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        self.expect(TokenKind::LParen);

        // `for (x in e)`
        if self.at(TokenKind::Identifier) && self.peek(1) == TokenKind::In {
            let target = ForInTarget::Identifier(self.parse_identifier());
            return self.finish_for_in(target);
        }

        let init = match self.peek(0) {
            TokenKind::Semicolon => None,
            TokenKind::Var | TokenKind::Final | TokenKind::Const => {
                self.begin();
                let (modifiers, type_ref) = self.parse_declaration_head();
                if self.at(TokenKind::Identifier) && self.peek(1) == TokenKind::In {
                    return self.finish_for_in_declaration(modifiers, type_ref);
                }
                Some(self.finish_for_init_declaration(modifiers, type_ref))
            }
            TokenKind::Identifier => {
                self.begin();
                match self.try_type_annotation_for_declaration() {
                    Some(type_ref) => {
                        if self.peek(1) == TokenKind::In {
                            return self.finish_for_in_declaration(Vec::new(), Some(type_ref));
                        }
                        Some(self.finish_for_init_declaration(Vec::new(), Some(type_ref)))
                    }
                    None => {
                        self.rollback();
                        Some(self.parse_for_init_expression())
                    }
                }
            }
            _ => Some(self.parse_for_init_expression()),
        };
        self.expect(TokenKind::Semicolon);

        let condition = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(TokenKind::Semicolon);

        let mut updates = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                updates.push(self.parse_expression());
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_close_paren();
        let body = self.parse_statement();
        let span = self.done();
        Stmt::For(ForStmt {
            init: init.map(Box::new),
            condition,
            updates,
            body: Box::new(body),
            span,
        })
    }

    fn parse_for_init_expression(&mut self) -> Stmt {
        self.begin();
        let expr = self.parse_expression();
        let span = self.done();
        Stmt::Expr(ExprStmt { expr, span })
    }

    /// Declarations of a classic `for`; closes the frame opened before the head
    fn finish_for_init_declaration(&mut self, modifiers: Vec<Modifier>, type_ref: Option<TypeRef>) -> Stmt {
        let variables = self.parse_variable_declarators();
        let span = self.done();
        Stmt::Variable(VarDeclStmt {
            modifiers,
            type_ref,
            variables,
            span,
        })
    }

    /// `[var|final|T] x in e)`; closes the declaration frame and the loop frame
    fn finish_for_in_declaration(&mut self, modifiers: Vec<Modifier>, type_ref: Option<TypeRef>) -> Stmt {
        let name = self.parse_identifier();
        let variable_span = name.span;
        let span = self.done();
        let declaration = VarDeclStmt {
            modifiers,
            type_ref,
            variables: vec![VariableDecl {
                name,
                initializer: None,
                span: variable_span,
            }],
            span,
        };
        self.finish_for_in(ForInTarget::Declaration(declaration))
    }

    /// `in e) body`; closes the loop frame
    fn finish_for_in(&mut self, target: ForInTarget) -> Stmt {
        self.expect(TokenKind::In);
        let iterable = self.parse_expression();
        self.expect_close_paren();
        let body = self.parse_statement();
        let span = self.done();
        Stmt::ForIn(ForInStmt {
            target,
            iterable,
            body: Box::new(body),
            span,
        })
    }

    fn parse_while_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        self.expect(TokenKind::LParen);
        let condition = self.parse_expression();
        self.expect_close_paren();
        let body = self.parse_statement();
        let span = self.done();
        Stmt::While(WhileStmt {
            condition,
            body: Box::new(body),
            span,
        })
    }

    fn parse_do_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        let body = self.parse_statement();
        self.expect(TokenKind::While);
        self.expect(TokenKind::LParen);
        let condition = self.parse_expression();
        self.expect_close_paren();
        self.expect_statement_end();
        let span = self.done();
        Stmt::DoWhile(DoWhileStmt {
            body: Box::new(body),
            condition,
            span,
        })
    }

    fn parse_switch_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        self.expect(TokenKind::LParen);
        let expr = self.parse_expression();
        self.expect_close_paren();
        let mut cases = Vec::new();
        if self.expect(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
                let before = self.ctx.position();
                cases.push(self.parse_switch_case());
                if self.ctx.position() == before {
                    self.capture_error_text();
                }
            }
            self.expect_close_brace();
        }
        let span = self.done();
        Stmt::Switch(SwitchStmt { expr, cases, span })
    }

    fn at_case_label(&self) -> bool {
        self.at(TokenKind::Identifier)
            && self.peek(1) == TokenKind::Colon
            && matches!(self.peek(2), TokenKind::Case | TokenKind::Default)
    }

    fn parse_switch_case(&mut self) -> SwitchCase {
        self.begin();
        let mut labels = Vec::new();
        while self.at_case_label() {
            labels.push(self.parse_identifier());
            self.next();
        }
        let mut values = Vec::new();
        let mut is_default = false;
        loop {
            if self.optional(TokenKind::Case) {
                values.push(self.parse_expression());
                self.expect(TokenKind::Colon);
            } else if self.optional(TokenKind::Default) {
                is_default = true;
                self.expect(TokenKind::Colon);
            } else {
                break;
            }
        }
        if values.is_empty() && !is_default {
            let location = self.location();
            let found = self.describe_next();
            self.error(ErrorCode::ExpectedToken, location, vec!["'case'".to_string(), found]);
        }

        let mut statements = Vec::new();
        while !matches!(
            self.peek(0),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) && !self.at_case_label()
        {
            let before = self.ctx.position();
            statements.push(self.parse_statement());
            if self.ctx.position() == before {
                statements.push(Stmt::Error(self.capture_error_text()));
                if self.ctx.position() == before {
                    break;
                }
            }
        }
        let span = self.done();
        SwitchCase {
            labels,
            values,
            is_default,
            statements,
            span,
        }
    }

    fn parse_try_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        let body = self.parse_block();
        let mut catches = Vec::new();
        while self.at(TokenKind::Catch) {
            self.begin();
            self.next();
            self.expect(TokenKind::LParen);
            let exception = self.parse_catch_param();
            let trace = if self.optional(TokenKind::Comma) {
                Some(self.parse_catch_param())
            } else {
                None
            };
            self.expect_close_paren();
            let body = self.parse_block();
            let span = self.done();
            catches.push(CatchClause {
                exception,
                trace,
                body,
                span,
            });
        }
        let finally = if self.optional(TokenKind::Finally) {
            Some(self.parse_block())
        } else {
            None
        };
        if catches.is_empty() && finally.is_none() {
            let location = self.location();
            let found = self.describe_next();
            self.error(
                ErrorCode::ExpectedToken,
                location,
                vec!["'catch' or 'finally'".to_string(), found],
            );
        }
        let span = self.done();
        Stmt::Try(TryStmt {
            body,
            catches,
            finally,
            span,
        })
    }

    /// `var e`, `final e`, `T e` or just `e`
    fn parse_catch_param(&mut self) -> CatchParam {
        self.begin();
        let mut modifiers = Vec::new();
        if self.optional(TokenKind::Final) {
            modifiers.push(Modifier::Final);
        } else {
            self.optional(TokenKind::Var);
        }
        let type_ref = if self.at(TokenKind::Identifier) && self.looks_like_return_type() {
            Some(self.parse_type_annotation())
        } else {
            None
        };
        let name = self.parse_identifier();
        let span = self.done();
        CatchParam {
            modifiers,
            type_ref,
            name,
            span,
        }
    }

    fn parse_throw_or_return(&mut self) -> Stmt {
        self.begin();
        let is_throw = self.at(TokenKind::Throw);
        self.next();
        let value = if self.at(TokenKind::Semicolon) || self.at(TokenKind::RBrace) {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect_statement_end();
        let span = self.done();
        if is_throw {
            Stmt::Throw(ThrowStmt { value, span })
        } else {
            Stmt::Return(ReturnStmt { value, span })
        }
    }

    fn parse_jump_statement(&mut self) -> Stmt {
        self.begin();
        let is_break = self.at(TokenKind::Break);
        self.next();
        let label = if self.at(TokenKind::Identifier) {
            Some(self.parse_identifier())
        } else {
            None
        };
        self.expect_statement_end();
        let span = self.done();
        let jump = JumpStmt { label, span };
        if is_break {
            Stmt::Break(jump)
        } else {
            Stmt::Continue(jump)
        }
    }

    fn parse_assert_statement(&mut self) -> Stmt {
        self.begin();
        self.next();
        self.expect(TokenKind::LParen);
        let condition = self.parse_expression();
        self.expect_close_paren();
        self.expect_statement_end();
        let span = self.done();
        Stmt::Assert(AssertStmt { condition, span })
    }
}

/// Tokens that can begin an expression statement
fn can_start_expression(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_literal()
        || matches!(
            kind,
            Identifier
                | This
                | Super
                | New
                | Const
                | LParen
                | LBracket
                | Lt
                | Sub
                | Not
                | BitNot
                | Inc
                | Dec
        )
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::error::{Diagnostics, ErrorCode};
    use crate::parser::parse_statement;

    fn parse(source: &str) -> (Stmt, Vec<ErrorCode>) {
        let mut diagnostics = Diagnostics::new();
        let stmt = parse_statement(source, &mut diagnostics);
        (stmt, diagnostics.codes())
    }

    #[test]
    fn typed_declaration_with_nested_generics() {
        let (stmt, codes) = parse("List<List<int>> x = null;");
        assert!(codes.is_empty(), "{:?}", codes);
        let Stmt::Variable(decl) = stmt else { panic!("expected declaration, got {:?}", stmt) };
        assert_eq!(decl.type_ref.map(|t| t.to_string()).as_deref(), Some("List<List<int>>"));
        assert_eq!(decl.variables[0].name.name, "x");
    }

    #[test]
    fn comparison_is_not_a_declaration() {
        let (stmt, codes) = parse("a < b >> c;");
        assert!(codes.is_empty(), "{:?}", codes);
        let Stmt::Expr(expr) = stmt else { panic!("expected expression statement") };
        assert_eq!(AstPrinter::expr_to_string(&expr.expr), "(a < (b >> c))");
    }

    #[test]
    fn label_and_local_function() {
        let (stmt, _) = parse("outer: while (true) { break outer; }");
        assert!(matches!(stmt, Stmt::Labeled(ref l) if l.label.name == "outer"));
        let (stmt, codes) = parse("int twice(x) => x * 2;");
        assert!(codes.is_empty());
        assert!(matches!(stmt, Stmt::Function(ref f) if f.name.name == "twice"));
    }

    #[test]
    fn for_in_with_declaration() {
        let (stmt, codes) = parse("for (final String s in list) print(s);");
        assert!(codes.is_empty(), "{:?}", codes);
        let Stmt::ForIn(for_in) = stmt else { panic!("expected for-in") };
        let ForInTarget::Declaration(decl) = for_in.target else { panic!("expected declaration") };
        assert_eq!(decl.modifiers, vec![Modifier::Final]);
        assert_eq!(decl.variables[0].name.name, "s");
    }

    #[test]
    fn classic_for() {
        let (stmt, codes) = parse("for (var i = 0; i < n; i++) { }");
        assert!(codes.is_empty(), "{:?}", codes);
        let Stmt::For(f) = stmt else { panic!("expected for") };
        assert!(matches!(f.init.as_deref(), Some(Stmt::Variable(_))));
        assert!(f.condition.is_some());
        assert_eq!(f.updates.len(), 1);
    }

    #[test]
    fn try_catch_with_trace() {
        let (stmt, codes) = parse("try { f(); } catch (var e, var trace) { } finally { }");
        assert!(codes.is_empty(), "{:?}", codes);
        let Stmt::Try(t) = stmt else { panic!("expected try") };
        assert_eq!(t.catches.len(), 1);
        assert!(t.catches[0].trace.is_some());
        assert!(t.finally.is_some());
    }

    #[test]
    fn switch_with_labels_and_default() {
        let source = "switch (x) { case 1: case 2: a(); break; l: case 3: continue l; default: b(); }";
        let (stmt, codes) = parse(source);
        assert!(codes.is_empty(), "{:?}", codes);
        let Stmt::Switch(s) = stmt else { panic!("expected switch") };
        assert_eq!(s.cases.len(), 3);
        assert_eq!(s.cases[0].values.len(), 2);
        assert_eq!(s.cases[1].labels[0].name, "l");
        assert!(s.cases[2].is_default);
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let (_, codes) = parse("x = 1 }");
        assert_eq!(codes.first(), Some(&ErrorCode::ExpectedToken));
    }
}
