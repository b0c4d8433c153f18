//! Directives, top-level declarations and class members.
//!
//! Modifier legality is checked here, as soon as the part of a member that
//! decides it has been read. A misplaced modifier never changes how the rest
//! of the member is read.

use log::trace;

use super::error::{DiagnosticSink, ErrorCode};
use super::keywords::PseudoKeyword;
use super::lexer::TokenKind;
use super::parser::Parser;
use super::source::TokenSource;
use super::span::Location;
use crate::ast::*;

/// Where a member is being declared
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    TopLevel,
    Class(&'a str),
    Interface(&'a str),
}

/// What a method turned out to be, known once its name has been read
struct MethodShape {
    is_getter: bool,
    is_setter: bool,
    is_operator: bool,
    is_factory: bool,
    is_abstract: bool,
    is_constructor: bool,
}

impl MethodShape {
    fn new(scope: Scope<'_>, modifiers: &[Modifier], name: &MethodName) -> Self {
        let has = |wanted: Modifier| modifiers.contains(&wanted);
        let is_getter = has(Modifier::Getter);
        let is_setter = has(Modifier::Setter);
        let is_factory = has(Modifier::Factory);
        let is_constructor = is_factory
            || match (name, scope.class_name()) {
                (MethodName::Simple(id), Some(class)) => !is_getter && !is_setter && id.name == class,
                (MethodName::Qualified { class: owner, .. }, Some(class)) => owner.name == class,
                _ => false,
            };
        Self {
            is_getter,
            is_setter,
            is_operator: has(Modifier::Operator),
            is_factory,
            is_abstract: has(Modifier::Abstract),
            is_constructor,
        }
    }
}

impl Scope<'_> {
    fn class_name(&self) -> Option<&str> {
        match self {
            Scope::TopLevel => None,
            Scope::Class(name) | Scope::Interface(name) => Some(*name),
        }
    }
}

impl<S: TokenSource, D: DiagnosticSink> Parser<S, D> {
    /// Directives at the start of a unit
    pub(crate) fn parse_directive_list(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.at(TokenKind::Hash) {
            if let Some(directive) = self.parse_directive() {
                directives.push(directive);
            }
        }
        directives
    }

    /// `#name('value'[, prefix: 'p']);`
    ///
    /// Unknown directive names are reported and parsed through, yielding
    /// `None`.
    pub(crate) fn parse_directive(&mut self) -> Option<Directive> {
        debug_assert!(self.at(TokenKind::Hash));
        self.begin();
        self.next();
        let name_location = self.location();
        let kind = if self.at(TokenKind::Identifier) {
            let name = self.peek_text(0).unwrap_or_default().to_string();
            self.next();
            let kind = DirectiveKind::from_name(&name);
            if kind.is_none() {
                self.error(ErrorCode::UnknownDirective, name_location, vec![name]);
            }
            kind
        } else {
            let found = self.describe_next();
            self.error(ErrorCode::ExpectedIdentifier, name_location, vec![found]);
            None
        };

        self.expect(TokenKind::LParen);
        let value = self.parse_string_value();
        let mut prefix = None;
        if self.optional(TokenKind::Comma) {
            let location = self.location();
            if self.optional_pseudo_keyword(PseudoKeyword::Prefix) {
                if kind != Some(DirectiveKind::Import) {
                    self.error(ErrorCode::NamedParameterNotAllowed, location, vec![]);
                }
                self.expect(TokenKind::Colon);
                prefix = Some(self.parse_string_value());
            } else {
                let found = self.describe_next();
                self.error(ErrorCode::ExpectedToken, location, vec!["'prefix'".to_string(), found]);
            }
        }
        self.expect_close_paren();
        self.expect_statement_end();
        let span = self.done();
        let kind = kind?;
        trace!("directive #{}('{}')", kind.as_str(), value);
        Some(Directive {
            kind,
            value,
            prefix,
            span,
        })
    }

    /// Text of a string literal, or empty after reporting a missing one
    fn parse_string_value(&mut self) -> String {
        if !self.peek(0).is_string_start() {
            self.report_expected(TokenKind::StringLiteral);
            return String::new();
        }
        match self.parse_string() {
            Expr::Literal(LiteralExpr {
                value: Literal::String(value),
                ..
            }) => value,
            Expr::Interpolation(interpolation) => interpolation
                .parts
                .into_iter()
                .filter_map(|part| match part {
                    StringPart::Text(text) => Some(text),
                    StringPart::Expr(_) => None,
                })
                .collect(),
            _ => String::new(),
        }
    }

    /// One top-level declaration; `None` for a stray `;`
    pub(crate) fn parse_top_level_declaration(&mut self) -> Option<Declaration> {
        match self.peek(0) {
            TokenKind::Class => Some(Declaration::Class(self.parse_class_declaration(false))),
            TokenKind::Identifier
                if self.at_pseudo_keyword(PseudoKeyword::Interface) && self.peek(1) == TokenKind::Identifier =>
            {
                Some(Declaration::Class(self.parse_class_declaration(true)))
            }
            TokenKind::Identifier
                if self.at_pseudo_keyword(PseudoKeyword::Typedef)
                    && matches!(self.peek(1), TokenKind::Identifier | TokenKind::Void) =>
            {
                Some(Declaration::TypeAlias(self.parse_type_alias()))
            }
            TokenKind::Semicolon => {
                let location = self.location();
                self.warning(ErrorCode::UnnecessarySemicolon, location, vec![]);
                self.next();
                None
            }
            kind if can_start_member(kind) => match self.parse_member(Scope::TopLevel)? {
                Member::Field(field) => Some(Declaration::Variable(field)),
                Member::Method(method) => Some(Declaration::Function(method)),
            },
            _ => {
                let location = self.location();
                let found = self.describe_next();
                self.error(ErrorCode::ExpectedDeclaration, location, vec![found]);
                Some(Declaration::Error(self.capture_stray_text()))
            }
        }
    }

    /// Like `capture_error_text`, but also consumes an unmatched `}`
    fn capture_stray_text(&mut self) -> ErrorNode {
        if self.at(TokenKind::RBrace) {
            self.begin();
            self.next();
            let span = self.done();
            return ErrorNode {
                text: "}".to_string(),
                span,
            };
        }
        self.capture_error_text()
    }

    /// `class A<T> extends B implements C native "N" { ... }` or
    /// `interface I<T> extends J factory F<T> { ... }`
    fn parse_class_declaration(&mut self, is_interface: bool) -> ClassDecl {
        self.begin();
        self.next();
        let name = self.parse_identifier();
        let type_params = if self.at(TokenKind::Lt) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };

        let mut superclass = None;
        let mut interfaces = Vec::new();
        let mut default_class = None;
        let mut native_name = None;
        if is_interface {
            if self.optional(TokenKind::Extends) {
                interfaces = self.parse_type_list();
            }
            if self.optional_pseudo_keyword(PseudoKeyword::Factory) {
                default_class = Some(self.parse_type_annotation());
            }
        } else {
            if self.optional(TokenKind::Extends) {
                superclass = Some(self.parse_type_annotation());
            }
            if self.optional_pseudo_keyword(PseudoKeyword::Implements) {
                interfaces = self.parse_type_list();
            }
            if self.optional_pseudo_keyword(PseudoKeyword::Native) {
                native_name = Some(self.parse_string_value());
            }
        }

        let scope = if is_interface {
            Scope::Interface(&name.name)
        } else {
            Scope::Class(&name.name)
        };
        let mut members = Vec::new();
        // one stray token before the body is tolerated
        if self.expect(TokenKind::LBrace) || self.optional(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
                let before = self.ctx.position();
                if self.at(TokenKind::Semicolon) {
                    let location = self.location();
                    self.warning(ErrorCode::UnnecessarySemicolon, location, vec![]);
                    self.next();
                    continue;
                }
                if !can_start_member(self.peek(0)) {
                    let location = self.location();
                    let found = self.describe_next();
                    self.error(ErrorCode::ExpectedClassMember, location, vec![found]);
                    self.capture_error_text();
                } else if let Some(member) = self.parse_member(scope) {
                    members.push(member);
                }
                if self.ctx.position() == before {
                    break;
                }
            }
            self.expect_close_brace();
        }
        let span = self.done();
        trace!("class {} with {} members", name, members.len());
        ClassDecl {
            is_interface,
            name,
            type_params,
            superclass,
            interfaces,
            default_class,
            native_name,
            members,
            span,
        }
    }

    /// `typedef [R] Name<T>(params);`
    fn parse_type_alias(&mut self) -> TypeAlias {
        self.begin();
        self.next();
        let return_type = if self.is_function_type_alias_name() {
            None
        } else {
            Some(self.parse_type_annotation())
        };
        let name = self.parse_identifier();
        let type_params = if self.at(TokenKind::Lt) {
            self.parse_type_parameters()
        } else {
            Vec::new()
        };
        let params = self.parse_formal_parameters();
        self.expect_statement_end();
        let span = self.done();
        TypeAlias {
            return_type,
            name,
            type_params,
            params,
            span,
        }
    }

    /// A field, method, accessor, operator or constructor.
    ///
    /// `None` when no name could be found; the malformed text is consumed.
    fn parse_member(&mut self, scope: Scope<'_>) -> Option<Member> {
        self.begin();
        let modifiers = self.parse_modifiers();
        let is_var = self.optional(TokenKind::Var);
        let return_type = if is_var || self.accessor_at_start().is_some() || self.at_operator_name() {
            None
        } else {
            self.parse_optional_return_type()
        };

        if is_var || (self.at(TokenKind::Identifier) && self.at_field_name()) {
            let field = self.finish_field(scope, modifiers, return_type);
            return Some(Member::Field(field));
        }
        if !self.at(TokenKind::Identifier) {
            let location = self.location();
            let found = self.describe_next();
            self.error(ErrorCode::ExpectedIdentifier, location, vec![found]);
            self.capture_error_text();
            self.done();
            return None;
        }
        Some(Member::Method(self.finish_method(scope, modifiers, return_type)))
    }

    /// `static`, `abstract`, `factory`, `final` and `const` in any order
    fn parse_modifiers(&mut self) -> Vec<(Modifier, Location)> {
        let mut modifiers: Vec<(Modifier, Location)> = Vec::new();
        loop {
            let location = self.location();
            let modifier = match self.peek(0) {
                TokenKind::Final => Modifier::Final,
                TokenKind::Const => Modifier::Const,
                TokenKind::Identifier if modifier_may_follow(self.peek(1)) => match self.pseudo_keyword_at(0) {
                    Some(PseudoKeyword::Static) => Modifier::Static,
                    Some(PseudoKeyword::Abstract) => Modifier::Abstract,
                    Some(PseudoKeyword::Factory) => Modifier::Factory,
                    _ => break,
                },
                _ => break,
            };
            self.next();
            if modifiers.iter().any(|(m, _)| *m == modifier) {
                self.error(ErrorCode::DuplicateModifier, location, vec![modifier.as_str().to_string()]);
            } else {
                modifiers.push((modifier, location));
            }
        }
        modifiers
    }

    /// `get x` or `set x`, but not a field whose type is named `get`
    fn accessor_at_start(&self) -> Option<Modifier> {
        let modifier = match self.pseudo_keyword_at(0) {
            Some(PseudoKeyword::Get) => Modifier::Getter,
            Some(PseudoKeyword::Set) => Modifier::Setter,
            _ => return None,
        };
        let is_accessor = self.peek(1) == TokenKind::Identifier
            && !matches!(self.peek(2), TokenKind::Assign | TokenKind::Comma);
        is_accessor.then_some(modifier)
    }

    fn at_operator_name(&self) -> bool {
        self.at_pseudo_keyword(PseudoKeyword::Operator)
            && (self.peek(1).is_user_definable_operator()
                || self.peek(1) == TokenKind::LBracket
                || (self.pseudo_keyword_at(1) == Some(PseudoKeyword::Negate) && self.peek(2) == TokenKind::LParen))
    }

    fn at_field_name(&self) -> bool {
        self.accessor_at_start().is_none()
            && !self.at_operator_name()
            && !matches!(self.peek(1), TokenKind::LParen | TokenKind::Period)
    }

    /// Declarators and `;` of a field; closes the member frame
    fn finish_field(
        &mut self,
        scope: Scope<'_>,
        modifiers: Vec<(Modifier, Location)>,
        type_ref: Option<TypeRef>,
    ) -> FieldDecl {
        let mut problems = Vec::new();
        for (modifier, location) in &modifiers {
            let illegal = match modifier {
                Modifier::Abstract | Modifier::Factory => true,
                Modifier::Static => matches!(scope, Scope::TopLevel),
                _ => false,
            };
            if illegal {
                problems.push((ErrorCode::IllegalModifier, *location, vec![modifier.as_str().to_string()]));
            }
        }
        self.report_in_order(problems);

        let variables = self.parse_variable_declarators();
        self.expect_statement_end();
        let span = self.done();
        FieldDecl {
            modifiers: modifiers.into_iter().map(|(m, _)| m).collect(),
            type_ref,
            variables,
            span,
        }
    }

    /// Name, parameters, initializers and body of a method; closes the
    /// member frame.
    ///
    /// Legality is checked as soon as the deciding part has been read, so
    /// errors inside the body cannot hide it.
    fn finish_method(
        &mut self,
        scope: Scope<'_>,
        modifiers: Vec<(Modifier, Location)>,
        return_type: Option<TypeRef>,
    ) -> MethodDecl {
        let name_location = self.location();
        let accessor = self.accessor_at_start();
        let name = if accessor.is_some() {
            self.next();
            MethodName::Simple(self.parse_identifier())
        } else if self.at_operator_name() {
            self.parse_operator_name()
        } else {
            let first = self.parse_identifier();
            if self.optional(TokenKind::Period) {
                MethodName::Qualified {
                    class: first,
                    name: self.parse_identifier(),
                }
            } else {
                MethodName::Simple(first)
            }
        };

        let mut kinds: Vec<Modifier> = modifiers.iter().map(|(m, _)| *m).collect();
        kinds.extend(accessor);
        if matches!(name, MethodName::Operator { .. }) {
            kinds.push(Modifier::Operator);
        }
        let shape = MethodShape::new(scope, &kinds, &name);
        self.check_method_modifiers(scope, &modifiers, &shape);

        self.begin();
        let params = if accessor == Some(Modifier::Getter) && !self.at(TokenKind::LParen) {
            Vec::new()
        } else {
            self.parse_formal_parameters()
        };
        self.check_parameters(&name, &shape, &params, name_location);

        let initializers = if self.at(TokenKind::Colon) {
            self.parse_initializers()
        } else {
            Vec::new()
        };
        let body_location = self.location();
        let has_body = matches!(self.peek(0), TokenKind::LBrace | TokenKind::Arrow);
        self.check_body(scope, &shape, &initializers, has_body, body_location);

        let body = self.parse_function_body(false);
        let function_span = self.done();
        let span = self.done();

        if matches!(body, FunctionBody::Native(_)) {
            kinds.push(Modifier::Native);
        }
        MethodDecl {
            modifiers: kinds,
            name,
            function: Function {
                return_type,
                params,
                body,
                span: function_span,
            },
            initializers,
            span,
        }
    }

    /// `operator +`, `operator []`, `operator []=` or `operator negate`
    fn parse_operator_name(&mut self) -> MethodName {
        self.begin();
        self.next();
        let op = if self.optional(TokenKind::LBracket) {
            self.expect(TokenKind::RBracket);
            if self.optional(TokenKind::Assign) {
                "[]="
            } else {
                "[]"
            }
        } else if self.optional_pseudo_keyword(PseudoKeyword::Negate) {
            "negate"
        } else {
            let op = self.peek(0).as_str();
            self.next();
            op
        };
        let span = self.done();
        MethodName::Operator {
            op: op.to_string(),
            span,
        }
    }

    /// Report collected problems by position, so the error watermark keeps
    /// all of them
    fn report_in_order(&mut self, mut problems: Vec<(ErrorCode, Location, Vec<String>)>) {
        problems.sort_by_key(|(_, location, _)| location.offset);
        for (code, location, args) in problems {
            self.error(code, location, args);
        }
    }

    fn check_method_modifiers(&mut self, scope: Scope<'_>, modifiers: &[(Modifier, Location)], shape: &MethodShape) {
        let location_of = |wanted: Modifier| modifiers.iter().find(|(m, _)| *m == wanted).map(|(_, l)| *l);
        let mut problems = Vec::new();
        for (modifier, location) in modifiers {
            let illegal = match (scope, modifier) {
                (Scope::TopLevel, Modifier::Static | Modifier::Abstract | Modifier::Factory) => true,
                (_, Modifier::Final) => true,
                (_, Modifier::Const) => !shape.is_constructor || shape.is_factory,
                (_, Modifier::Factory) => shape.is_getter || shape.is_setter || shape.is_operator,
                (_, Modifier::Static) => shape.is_operator,
                _ => false,
            };
            if illegal {
                problems.push((ErrorCode::IllegalModifier, *location, vec![modifier.as_str().to_string()]));
            }
        }
        if let (Scope::Interface(_), Some(location)) = (scope, location_of(Modifier::Abstract)) {
            problems.push((ErrorCode::AbstractMemberInInterface, location, vec![]));
        }
        for (first, second) in [
            (Modifier::Static, Modifier::Abstract),
            (Modifier::Factory, Modifier::Static),
            (Modifier::Factory, Modifier::Abstract),
        ] {
            if let (Some(a), Some(b)) = (location_of(first), location_of(second)) {
                let location = if a.offset > b.offset { a } else { b };
                problems.push((
                    ErrorCode::IllegalModifierCombination,
                    location,
                    vec![first.as_str().to_string(), second.as_str().to_string()],
                ));
            }
        }
        self.report_in_order(problems);
    }

    fn check_parameters(&mut self, name: &MethodName, shape: &MethodShape, params: &[Param], name_location: Location) {
        let mut problems = Vec::new();
        if shape.is_getter && !params.is_empty() {
            problems.push((ErrorCode::GetterHasParameters, name_location, vec![]));
        }
        if shape.is_setter && params.len() != 1 {
            problems.push((ErrorCode::SetterParameterCount, name_location, vec![]));
        }
        if let MethodName::Operator { op, .. } = name {
            let expected = match op.as_str() {
                "[]=" => 2,
                "negate" | "~" => 0,
                _ => 1,
            };
            if params.len() != expected {
                problems.push((
                    ErrorCode::OperatorParameterCount,
                    name_location,
                    vec![op.clone(), expected.to_string()],
                ));
            }
        }
        if shape.is_setter || shape.is_operator {
            if let Some(named) = params.iter().find(|p| p.kind == ParamKind::Named) {
                problems.push((ErrorCode::NamedParameterNotAllowed, named.span.start, vec![]));
            }
        }
        self.report_in_order(problems);
    }

    /// Checks that depend on whether a body follows; run before the body
    /// is parsed
    fn check_body(
        &mut self,
        scope: Scope<'_>,
        shape: &MethodShape,
        initializers: &[Initializer],
        has_body: bool,
        body_location: Location,
    ) {
        let mut problems = Vec::new();
        if let Some(first) = initializers.first() {
            if !shape.is_constructor {
                problems.push((ErrorCode::InitializersNotAllowed, first.span.start, vec![]));
            } else {
                let mut redirects = initializers.iter().filter(|i| i.kind.is_redirect());
                if let Some(redirect) = redirects.next() {
                    if let Some(second) = redirects.next() {
                        problems.push((ErrorCode::MultipleRedirects, second.span.start, vec![]));
                    } else if initializers.len() > 1 {
                        problems.push((ErrorCode::RedirectMustBeSole, redirect.span.start, vec![]));
                    }
                    if has_body {
                        problems.push((ErrorCode::RedirectWithBody, body_location, vec![]));
                    }
                }
            }
        }
        if has_body && (shape.is_abstract || matches!(scope, Scope::Interface(_))) {
            problems.push((ErrorCode::AbstractMemberWithBody, body_location, vec![]));
        }
        if matches!(scope, Scope::TopLevel) && self.at(TokenKind::Semicolon) {
            problems.push((ErrorCode::MissingFunctionBody, body_location, vec![]));
        }
        self.report_in_order(problems);
    }

    /// `: x = e, this.y = e, super(...), this.named(...)`
    fn parse_initializers(&mut self) -> Vec<Initializer> {
        debug_assert!(self.at(TokenKind::Colon));
        self.next();
        let mut initializers = Vec::new();
        loop {
            initializers.push(self.parse_initializer());
            if !self.optional(TokenKind::Comma) {
                break;
            }
        }
        initializers
    }

    fn parse_initializer(&mut self) -> Initializer {
        self.begin();
        let kind = match self.peek(0) {
            TokenKind::Super => {
                self.next();
                let name = if self.optional(TokenKind::Period) {
                    Some(self.parse_identifier())
                } else {
                    None
                };
                let args = self.parse_arguments();
                InitializerKind::Super { name, args }
            }
            TokenKind::This
                if self.peek(1) == TokenKind::LParen
                    || (self.peek(1) == TokenKind::Period && self.peek(3) == TokenKind::LParen) =>
            {
                self.next();
                let name = if self.optional(TokenKind::Period) {
                    Some(self.parse_identifier())
                } else {
                    None
                };
                let args = self.parse_arguments();
                InitializerKind::Redirect { name, args }
            }
            _ => {
                if self.at(TokenKind::This) && self.peek(1) == TokenKind::Period {
                    self.next();
                    self.next();
                }
                let name = self.parse_identifier();
                self.expect(TokenKind::Assign);
                let value = self.parse_conditional_expression();
                InitializerKind::Field { name, value }
            }
        };
        let span = self.done();
        Initializer { kind, span }
    }

    /// `(a, final int b, this.c, [d = 1])`
    pub(crate) fn parse_formal_parameters(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if !self.expect(TokenKind::LParen) {
            return params;
        }
        let mut kind = ParamKind::Positional;
        if !self.at(TokenKind::RParen) {
            loop {
                if kind == ParamKind::Positional && self.optional(TokenKind::LBracket) {
                    kind = ParamKind::Named;
                }
                params.push(self.parse_formal_parameter(kind));
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
            if kind == ParamKind::Named {
                self.expect_close_bracket();
            }
        }
        self.expect_close_paren();
        params
    }

    fn parse_formal_parameter(&mut self, kind: ParamKind) -> Param {
        self.begin();
        let mut modifiers = Vec::new();
        if self.optional(TokenKind::Final) {
            modifiers.push(Modifier::Final);
        } else {
            self.optional(TokenKind::Var);
        }
        let type_ref = if self.looks_like_parameter_type() {
            Some(self.parse_type_annotation())
        } else {
            None
        };
        let field_init = self.at(TokenKind::This) && self.peek(1) == TokenKind::Period;
        if field_init {
            self.next();
            self.next();
        }
        let name = self.parse_identifier();
        let function_params = if self.at(TokenKind::LParen) {
            Some(self.parse_formal_parameters())
        } else {
            None
        };
        let default_value = if self.at(TokenKind::Assign) {
            let location = self.location();
            self.next();
            if kind == ParamKind::Positional {
                self.error(ErrorCode::DefaultPositionalParameter, location, vec![]);
            }
            Some(self.parse_conditional_expression())
        } else {
            None
        };
        let span = self.done();
        Param {
            modifiers,
            type_ref,
            name,
            field_init,
            kind,
            default_value,
            function_params,
            span,
        }
    }

    /// A type followed by a parameter name or `this.`
    fn looks_like_parameter_type(&mut self) -> bool {
        if !matches!(self.peek(0), TokenKind::Identifier | TokenKind::Void) {
            return false;
        }
        self.begin();
        let result = self.type_annotation(true).is_some() && matches!(self.peek(0), TokenKind::Identifier | TokenKind::This);
        self.rollback();
        result
    }

    /// Block, arrow, `;` or `native` body.
    ///
    /// Function literals (`in_expression`) accept only block and arrow
    /// bodies, are never skipped in diet mode and leave the `;` after an
    /// arrow body to the enclosing statement.
    pub(crate) fn parse_function_body(&mut self, in_expression: bool) -> FunctionBody {
        let diet = self.config.diet && !in_expression;
        match self.peek(0) {
            TokenKind::LBrace if diet => FunctionBody::Block(self.skip_block()),
            TokenKind::LBrace => FunctionBody::Block(self.parse_block()),
            TokenKind::Arrow if diet => FunctionBody::Block(self.skip_arrow_body()),
            TokenKind::Arrow => {
                self.next();
                let expr = self.parse_expression();
                if !in_expression {
                    self.expect_statement_end();
                }
                FunctionBody::Arrow(Box::new(expr))
            }
            TokenKind::Semicolon if !in_expression => {
                self.next();
                FunctionBody::None
            }
            TokenKind::Identifier if !in_expression && self.at_pseudo_keyword(PseudoKeyword::Native) => {
                self.next();
                let name = if self.peek(0).is_string_start() {
                    Some(self.parse_string_value())
                } else {
                    None
                };
                self.expect_statement_end();
                FunctionBody::Native(name)
            }
            _ => {
                let location = self.location();
                self.error(ErrorCode::MissingFunctionBody, location, vec![]);
                FunctionBody::None
            }
        }
    }
}

/// Tokens a field or method declaration can begin with
fn can_start_member(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::Var | TokenKind::Final | TokenKind::Const | TokenKind::Void
    )
}

/// Whether `static`, `abstract` or `factory` before this token is a modifier
/// rather than a name
fn modifier_may_follow(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::Final | TokenKind::Const | TokenKind::Var | TokenKind::Void
    )
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::config::ParserConfig;
    use crate::parser::error::{Diagnostics, ErrorCode};
    use crate::parser::parse_unit;

    fn parse(source: &str) -> (Unit, Vec<ErrorCode>) {
        let mut diagnostics = Diagnostics::new();
        let unit = parse_unit(source, &ParserConfig::default(), &mut diagnostics);
        (unit, diagnostics.codes())
    }

    fn class_members(source: &str) -> (ClassDecl, Vec<ErrorCode>) {
        let (unit, codes) = parse(source);
        let class = unit.classes().next().cloned().expect("class");
        (class, codes)
    }

    #[test]
    fn directives_with_prefix() {
        let (unit, codes) = parse("#library('app');\n#import('dart:html', prefix: 'html');\n#source('a.ql');");
        assert!(codes.is_empty(), "{:?}", codes);
        assert_eq!(unit.directives.len(), 3);
        assert_eq!(unit.directives[1].kind, DirectiveKind::Import);
        assert_eq!(unit.directives[1].prefix.as_deref(), Some("html"));
        assert_eq!(unit.directives[2].value, "a.ql");
    }

    #[test]
    fn unknown_directive() {
        let (unit, codes) = parse("#frobnicate('x');");
        assert!(unit.directives.is_empty());
        assert_eq!(codes, vec![ErrorCode::UnknownDirective]);
    }

    #[test]
    fn class_header() {
        let (class, codes) = class_members("class A<T extends B> extends S<T> implements I, J native \"N\" { }");
        assert!(codes.is_empty(), "{:?}", codes);
        assert_eq!(class.type_params.len(), 1);
        assert_eq!(class.superclass.map(|s| s.to_string()).as_deref(), Some("S<T>"));
        assert_eq!(class.interfaces.len(), 2);
        assert_eq!(class.native_name.as_deref(), Some("N"));
    }

    #[test]
    fn interface_header() {
        let (class, codes) = class_members("interface I<T> extends J, K factory F<T> { int size(); }");
        assert!(codes.is_empty(), "{:?}", codes);
        assert!(class.is_interface);
        assert_eq!(class.interfaces.len(), 2);
        assert_eq!(class.default_class.as_ref().map(|d| d.to_string()).as_deref(), Some("F<T>"));
        assert_eq!(class.methods().count(), 1);
    }

    #[test]
    fn member_kinds() {
        let source = "class A {
            static final int count = 0;
            var x, y = 2;
            A(this.x) : y = 1, super();
            A.named() : this(0);
            factory A.make() => new A(1);
            int get size => 1;
            set size(v) { }
            operator [](i) => i;
            operator []=(i, v) { }
            operator negate() => this;
            abstract void run();
            native_method() native \"m\";
        }";
        let (class, codes) = class_members(source);
        assert!(codes.is_empty(), "{:?}", codes);
        assert_eq!(class.fields().count(), 2);
        let names: Vec<String> = class.methods().map(|m| m.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "A",
                "A.named",
                "A.make",
                "size",
                "size",
                "operator []",
                "operator []=",
                "operator negate",
                "run",
                "native_method"
            ]
        );
        let getter = class.methods().nth(3).expect("getter");
        assert!(getter.has_modifier(Modifier::Getter));
    }

    #[test]
    fn modifier_legality() {
        let cases: &[(&str, ErrorCode)] = &[
            ("class A { static static x; }", ErrorCode::DuplicateModifier),
            ("class A { static abstract f(); }", ErrorCode::IllegalModifierCombination),
            ("class A { factory get x => 1; }", ErrorCode::IllegalModifier),
            ("class A { static operator +(o) => 1; }", ErrorCode::IllegalModifier),
            ("interface I { abstract f(); }", ErrorCode::AbstractMemberInInterface),
            ("class A { abstract f() { } }", ErrorCode::AbstractMemberWithBody),
            ("class A { get x(a) => 1; }", ErrorCode::GetterHasParameters),
            ("class A { set x(a, b) { } }", ErrorCode::SetterParameterCount),
            ("class A { operator +(a, b) => 1; }", ErrorCode::OperatorParameterCount),
            ("class A { f() : x = 1 { } }", ErrorCode::InitializersNotAllowed),
            ("class A { A() : this(1), this(2); }", ErrorCode::MultipleRedirects),
            ("class A { A() : x = 1, this(2); }", ErrorCode::RedirectMustBeSole),
            ("class A { A() : this(2) { } }", ErrorCode::RedirectWithBody),
            ("f(a = 1) { }", ErrorCode::DefaultPositionalParameter),
            ("f();", ErrorCode::MissingFunctionBody),
        ];
        for (source, expected) in cases {
            let (_, codes) = parse(source);
            assert!(codes.contains(expected), "{}: {:?}", source, codes);
        }
    }

    #[test]
    fn named_parameters() {
        let (unit, codes) = parse("f(a, final int b, [c = 1, void g(x)]) { }");
        assert!(codes.is_empty(), "{:?}", codes);
        let Some(Declaration::Function(f)) = unit.declarations.first() else { panic!("expected function") };
        let params = &f.function.params;
        assert_eq!(params.len(), 4);
        assert_eq!(params[1].type_ref.as_ref().map(|t| t.name.as_str()), Some("int"));
        assert_eq!(params[2].kind, ParamKind::Named);
        assert!(params[2].default_value.is_some());
        assert!(params[3].function_params.is_some());
    }

    #[test]
    fn typedefs_with_and_without_return_type() {
        let (unit, codes) = parse("typedef void Handler(Event e);\ntypedef Compare<T>(T a, T b);");
        assert!(codes.is_empty(), "{:?}", codes);
        let aliases: Vec<&TypeAlias> = unit
            .declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::TypeAlias(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].return_type.as_ref().map(|t| t.name.as_str()), Some("void"));
        assert!(aliases[1].return_type.is_none());
        assert_eq!(aliases[1].type_params.len(), 1);
    }

    #[test]
    fn stray_tokens_between_members() {
        let (class, codes) = class_members("class A { ; + - ; f() { } }");
        assert_eq!(class.methods().count(), 1);
        assert!(codes.contains(&ErrorCode::ExpectedClassMember));
    }
}
