//! Expression rules, from assignment down to primaries.
//!
//! Binary operators are parsed by precedence climbing over
//! [`TokenKind::precedence`]. A left-associative chain keeps one frame open
//! and stamps each intermediate node with
//! [`done_without_consuming`](super::context::ParserContext::done_without_consuming),
//! so every node of `a + b + c` starts at `a`.

use super::error::{DiagnosticSink, ErrorCode};
use super::lexer::TokenKind;
use super::parser::Parser;
use super::source::TokenSource;
use super::span::HasSpan;
use crate::ast::*;

/// Lowest level handled by the binary layer (`||`)
const MIN_BINARY_PRECEDENCE: u8 = 4;

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    use TokenKind::*;
    let op = match kind {
        Or => BinaryOp::Or,
        And => BinaryOp::And,
        BitOr => BinaryOp::BitOr,
        BitXor => BinaryOp::BitXor,
        BitAnd => BinaryOp::BitAnd,
        Eq => BinaryOp::Eq,
        Ne => BinaryOp::Ne,
        EqStrict => BinaryOp::EqStrict,
        NeStrict => BinaryOp::NeStrict,
        Lt => BinaryOp::Lt,
        Gt => BinaryOp::Gt,
        Le => BinaryOp::Le,
        Ge => BinaryOp::Ge,
        Shl => BinaryOp::Shl,
        Sar => BinaryOp::Sar,
        Shr => BinaryOp::Shr,
        Add => BinaryOp::Add,
        Sub => BinaryOp::Sub,
        Mul => BinaryOp::Mul,
        Div => BinaryOp::Div,
        TruncDiv => BinaryOp::TruncDiv,
        Mod => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    let op = match kind {
        Assign => AssignOp::Assign,
        MulAssign => AssignOp::Mul,
        DivAssign => AssignOp::Div,
        TruncDivAssign => AssignOp::TruncDiv,
        ModAssign => AssignOp::Mod,
        AddAssign => AssignOp::Add,
        SubAssign => AssignOp::Sub,
        ShlAssign => AssignOp::Shl,
        SarAssign => AssignOp::Sar,
        ShrAssign => AssignOp::Shr,
        BitAndAssign => AssignOp::BitAnd,
        BitXorAssign => AssignOp::BitXor,
        BitOrAssign => AssignOp::BitOr,
        _ => return None,
    };
    Some(op)
}

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    /// Full expression including assignment (right associative)
    pub(crate) fn parse_expression(&mut self) -> Expr {
        self.begin();
        let target = self.parse_conditional_expression();
        let Some(op) = assign_op(self.peek(0)) else {
            self.done();
            return target;
        };
        let op_location = self.location();
        if !target.is_assignable() {
            self.error(ErrorCode::IllegalAssignmentTarget, op_location, vec![]);
        }
        self.next();
        let value = self.parse_expression();
        let span = self.done();
        Expr::Assign(AssignExpr {
            op,
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }

    /// `c ? a : b`, or a binary expression
    pub(crate) fn parse_conditional_expression(&mut self) -> Expr {
        self.begin();
        let condition = self.parse_binary_expression(MIN_BINARY_PRECEDENCE);
        if !self.optional(TokenKind::Conditional) {
            self.done();
            return condition;
        }
        let then_expr = self.parse_expression();
        self.expect(TokenKind::Colon);
        let else_expr = self.parse_expression();
        let span = self.done();
        Expr::Conditional(ConditionalExpr {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span,
        })
    }

    /// Binary operators at `min_precedence` or tighter
    pub(crate) fn parse_binary_expression(&mut self, min_precedence: u8) -> Expr {
        self.begin();
        let mut result = self.parse_unary_expression();
        let mut level = self.peek(0).precedence();
        while level >= min_precedence {
            let mut built_at_level = false;
            while self.peek(0).precedence() == level {
                let kind = self.peek(0);
                let op_location = self.location();
                if built_at_level && (kind.is_equality_operator() || kind.is_relational_operator()) {
                    self.error(
                        ErrorCode::NonChainableOperator,
                        op_location,
                        vec![format!("'{}'", kind.as_str())],
                    );
                }
                self.next();
                result = if kind == TokenKind::Is {
                    let negated = self.optional(TokenKind::Not);
                    let type_ref = self.parse_type_annotation();
                    let span = self.done_without_consuming();
                    let test = Expr::Is(IsExpr {
                        expr: Box::new(result),
                        type_ref,
                        span,
                    });
                    if negated {
                        Expr::Unary(UnaryExpr {
                            op: UnaryOp::Not,
                            operand: Box::new(test),
                            span,
                        })
                    } else {
                        test
                    }
                } else {
                    let right = self.parse_binary_expression(level + 1);
                    let span = self.done_without_consuming();
                    match binary_op(kind) {
                        Some(op) => Expr::Binary(BinaryExpr {
                            op,
                            left: Box::new(result),
                            right: Box::new(right),
                            span,
                        }),
                        None => result,
                    }
                };
                built_at_level = true;
            }
            level -= 1;
        }
        self.done();
        result
    }

    /// Prefix operators, then postfix
    pub(crate) fn parse_unary_expression(&mut self) -> Expr {
        let op = match self.peek(0) {
            TokenKind::Sub => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::BitNot => UnaryOp::BitNot,
            TokenKind::Inc => UnaryOp::PreInc,
            TokenKind::Dec => UnaryOp::PreDec,
            _ => return self.parse_postfix_expression(),
        };
        self.begin();
        self.next();
        let operand = if matches!(op, UnaryOp::Neg | UnaryOp::BitNot) && self.at(TokenKind::Super) {
            // `-super` invokes the superclass operator
            self.parse_selector_expression(true)
        } else {
            self.parse_unary_expression()
        };
        if matches!(op, UnaryOp::PreInc | UnaryOp::PreDec) && !operand.is_assignable() {
            self.error(ErrorCode::IllegalAssignmentTarget, operand.span().start, vec![]);
        }
        let span = self.done();
        Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_postfix_expression(&mut self) -> Expr {
        self.begin();
        let expr = self.parse_selector_expression(false);
        let op = match self.peek(0) {
            TokenKind::Inc => PostfixOp::Inc,
            TokenKind::Dec => PostfixOp::Dec,
            _ => {
                self.done();
                return expr;
            }
        };
        if !expr.is_assignable() {
            let location = self.location();
            self.error(ErrorCode::IllegalAssignmentTarget, location, vec![]);
        }
        self.next();
        let span = self.done();
        Expr::Postfix(PostfixExpr {
            op,
            operand: Box::new(expr),
            span,
        })
    }

    /// A primary followed by `.name`, `[index]` and argument lists
    fn parse_selector_expression(&mut self, allow_bare_super: bool) -> Expr {
        self.begin();
        let mut expr = self.parse_primary();
        let mut selectors = 0;
        loop {
            match self.peek(0) {
                TokenKind::Period => {
                    self.next();
                    let name = self.parse_identifier();
                    if self.at(TokenKind::LParen) {
                        let args = self.parse_arguments();
                        let span = self.done_without_consuming();
                        expr = Expr::Invocation(InvocationExpr {
                            target: Some(Box::new(expr)),
                            name,
                            args,
                            span,
                        });
                    } else {
                        let span = self.done_without_consuming();
                        expr = Expr::PropertyAccess(PropertyAccessExpr {
                            target: Box::new(expr),
                            name,
                            span,
                        });
                    }
                }
                TokenKind::LBracket => {
                    self.next();
                    let index = self.parse_expression();
                    self.expect_close_bracket();
                    let span = self.done_without_consuming();
                    expr = Expr::Index(IndexExpr {
                        target: Box::new(expr),
                        index: Box::new(index),
                        span,
                    });
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments();
                    let span = self.done_without_consuming();
                    expr = match expr {
                        Expr::Identifier(name) => Expr::Invocation(InvocationExpr {
                            target: None,
                            name,
                            args,
                            span,
                        }),
                        callee => Expr::Call(CallExpr {
                            callee: Box::new(callee),
                            args,
                            span,
                        }),
                    };
                }
                _ => break,
            }
            selectors += 1;
        }
        if selectors == 0 && !allow_bare_super {
            if let Expr::Super(span) = &expr {
                self.error(ErrorCode::SuperNotExpression, span.start, vec![]);
            }
        }
        self.done();
        expr
    }

    /// Call arguments: positional expressions, then `name: expr` pairs
    pub(crate) fn parse_arguments(&mut self) -> Vec<Expr> {
        let mut args = Vec::new();
        if !self.expect(TokenKind::LParen) {
            return args;
        }
        if !self.at(TokenKind::RParen) {
            loop {
                if self.at(TokenKind::Identifier) && self.peek(1) == TokenKind::Colon {
                    self.begin();
                    let name = self.parse_identifier();
                    self.next();
                    let value = self.parse_expression();
                    let span = self.done();
                    args.push(Expr::Named(NamedExpr {
                        name,
                        value: Box::new(value),
                        span,
                    }));
                } else {
                    args.push(self.parse_expression());
                }
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_close_paren();
        args
    }

    fn parse_primary(&mut self) -> Expr {
        match self.peek(0) {
            TokenKind::This => {
                self.begin();
                self.next();
                Expr::This(self.done())
            }
            TokenKind::Super => {
                self.begin();
                self.next();
                Expr::Super(self.done())
            }
            TokenKind::Integer | TokenKind::HexInteger | TokenKind::Double => self.parse_number(),
            TokenKind::True | TokenKind::False | TokenKind::Null => {
                let value = match self.peek(0) {
                    TokenKind::True => Literal::Boolean(true),
                    TokenKind::False => Literal::Boolean(false),
                    _ => Literal::Null,
                };
                self.begin();
                self.next();
                let span = self.done();
                Expr::Literal(LiteralExpr { value, span })
            }
            TokenKind::StringLiteral | TokenKind::StringSegment | TokenKind::UnterminatedString => {
                self.parse_string()
            }
            TokenKind::Identifier | TokenKind::Void => {
                if self.looks_like_function_header() {
                    self.parse_function_expression()
                } else if self.at(TokenKind::Identifier) {
                    Expr::Identifier(self.parse_identifier())
                } else {
                    self.parse_error_expression()
                }
            }
            TokenKind::LParen => {
                if self.looks_like_function_literal() {
                    self.parse_function_expression()
                } else {
                    self.begin();
                    self.next();
                    let inner = self.parse_expression();
                    self.expect_close_paren();
                    let span = self.done();
                    Expr::Paren(ParenExpr {
                        expr: Box::new(inner),
                        span,
                    })
                }
            }
            TokenKind::LBracket | TokenKind::LBrace | TokenKind::Const => self.parse_compound_literal(),
            TokenKind::Lt if self.looks_like_typed_literal() => self.parse_compound_literal(),
            TokenKind::New => self.parse_new_expression(),
            _ => self.parse_error_expression(),
        }
    }

    /// Report the next token and wrap it in an error node.
    ///
    /// Delimiters an enclosing rule may own are left in place.
    pub(crate) fn parse_error_expression(&mut self) -> Expr {
        self.begin();
        self.report_unexpected();
        let mut text = String::new();
        if !self.at_structural_token() && !matches!(self.peek(0), TokenKind::Comma | TokenKind::Colon) {
            text = self.lexeme();
            self.next();
        }
        let span = self.done();
        Expr::Error(ErrorNode { text, span })
    }

    fn parse_number(&mut self) -> Expr {
        self.begin();
        let kind = self.peek(0);
        let text = self.peek_text(0).unwrap_or_default().to_string();
        let location = self.location();
        self.next();
        let value = match kind {
            TokenKind::Double => text.parse::<f64>().ok().map(Literal::Double),
            TokenKind::HexInteger => i64::from_str_radix(&text[2..], 16).ok().map(Literal::Integer),
            _ => text.parse::<i64>().ok().map(Literal::Integer),
        };
        let value = value.unwrap_or_else(|| {
            self.error(ErrorCode::InvalidNumber, location, vec![text.clone()]);
            Literal::Integer(0)
        });
        let span = self.done();
        Expr::Literal(LiteralExpr { value, span })
    }

    /// One string literal or several adjacent ones, with interpolation
    pub(crate) fn parse_string(&mut self) -> Expr {
        self.begin();
        let mut parts: Vec<StringPart> = Vec::new();
        let mut interpolated = false;
        loop {
            match self.peek(0) {
                TokenKind::StringLiteral | TokenKind::StringEnd => {
                    push_text(&mut parts, self.peek_text(0).unwrap_or_default());
                    self.next();
                    if !self.peek(0).is_string_start() {
                        break;
                    }
                }
                TokenKind::StringSegment => {
                    push_text(&mut parts, self.peek_text(0).unwrap_or_default());
                    self.next();
                }
                TokenKind::InterpolationStart => {
                    interpolated = true;
                    self.next();
                    let expr = self.parse_expression();
                    parts.push(StringPart::Expr(expr));
                    if !self.optional(TokenKind::InterpolationEnd) {
                        self.recover_interpolation();
                    }
                }
                TokenKind::UnterminatedString => {
                    let location = self.location();
                    self.error(ErrorCode::UnterminatedString, location, vec![]);
                    push_text(&mut parts, self.peek_text(0).unwrap_or_default());
                    self.next();
                    break;
                }
                _ => break,
            }
        }
        let span = self.done();
        if interpolated {
            return Expr::Interpolation(InterpolationExpr { parts, span });
        }
        let value = match parts.pop() {
            Some(StringPart::Text(text)) => text,
            _ => String::new(),
        };
        Expr::Literal(LiteralExpr {
            value: Literal::String(value),
            span,
        })
    }

    /// Skip the rest of a malformed `${...}`
    fn recover_interpolation(&mut self) {
        let location = self.location();
        self.error(ErrorCode::UnterminatedInterpolation, location, vec![]);
        loop {
            match self.peek(0) {
                TokenKind::InterpolationEnd => {
                    self.next();
                    return;
                }
                TokenKind::Eof | TokenKind::UnterminatedString | TokenKind::StringEnd => return,
                _ => self.next(),
            }
        }
    }

    /// List and map literals, optionally `const` and typed, and `const T(...)`
    fn parse_compound_literal(&mut self) -> Expr {
        self.begin();
        let is_const = self.optional(TokenKind::Const);
        if is_const && self.at(TokenKind::Identifier) {
            return self.finish_new_expression(true);
        }
        let type_args = if self.at(TokenKind::Lt) {
            self.parse_type_arguments()
        } else {
            Vec::new()
        };
        match self.peek(0) {
            TokenKind::LBracket => {
                self.next();
                let mut elements = Vec::new();
                while !self.at(TokenKind::RBracket) && !self.at(TokenKind::Eof) {
                    elements.push(self.parse_expression());
                    if !self.optional(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_close_bracket();
                let span = self.done();
                Expr::List(ListLiteral {
                    is_const,
                    type_arg: type_args.into_iter().next(),
                    elements,
                    span,
                })
            }
            TokenKind::LBrace => {
                self.next();
                let mut entries = Vec::new();
                while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
                    self.begin();
                    let key = self.parse_expression();
                    self.expect(TokenKind::Colon);
                    let value = self.parse_expression();
                    let span = self.done();
                    entries.push(MapEntry { key, value, span });
                    if !self.optional(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_close_brace();
                let span = self.done();
                Expr::Map(MapLiteral {
                    is_const,
                    type_args,
                    entries,
                    span,
                })
            }
            _ => {
                let location = self.location();
                let found = self.describe_next();
                self.error(ErrorCode::ExpectedToken, location, vec!["'[' or '{'".to_string(), found]);
                let span = self.done();
                Expr::Error(ErrorNode {
                    text: String::new(),
                    span,
                })
            }
        }
    }

    fn parse_new_expression(&mut self) -> Expr {
        self.begin();
        self.next();
        self.finish_new_expression(false)
    }

    /// Rest of `new`/`const` after the keyword; closes the caller's frame
    fn finish_new_expression(&mut self, is_const: bool) -> Expr {
        // `p.A` is a library prefix only when type arguments or a
        // constructor name follow; `A.named` names a constructor
        self.begin();
        let class = self.parse_identifier();
        let mut name = class.name;
        if self.at(TokenKind::Period)
            && self.peek(1) == TokenKind::Identifier
            && matches!(self.peek(2), TokenKind::Lt | TokenKind::Period)
        {
            self.next();
            let qualified = self.parse_identifier();
            name = format!("{}.{}", name, qualified.name);
        }
        let type_args = if self.at(TokenKind::Lt) {
            self.parse_type_arguments()
        } else {
            Vec::new()
        };
        let type_span = self.done();
        let type_ref = TypeRef {
            name,
            type_args,
            span: type_span,
        };
        let constructor = if self.optional(TokenKind::Period) {
            Some(self.parse_identifier())
        } else {
            None
        };
        let args = self.parse_arguments();
        let span = self.done();
        Expr::New(NewExpr {
            is_const,
            type_ref,
            constructor,
            args,
            span,
        })
    }

    /// `(params) => e`, `(params) { ... }` or `[type] name(params) body`
    fn parse_function_expression(&mut self) -> Expr {
        self.begin();
        let return_type = self.parse_optional_return_type();
        let name = if self.at(TokenKind::Identifier) {
            Some(self.parse_identifier())
        } else {
            None
        };
        self.begin();
        let params = self.parse_formal_parameters();
        let body = self.parse_function_body(true);
        let function_span = self.done();
        let span = self.done();
        let function = Function {
            return_type,
            params,
            body,
            span: function_span,
        };
        Expr::Function(FunctionExpr { name, function, span })
    }
}

fn push_text(parts: &mut Vec<StringPart>, text: &str) {
    if let Some(StringPart::Text(last)) = parts.last_mut() {
        last.push_str(text);
        return;
    }
    parts.push(StringPart::Text(text.to_string()));
}
