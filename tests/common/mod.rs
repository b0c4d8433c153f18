// Common test utilities
#![allow(dead_code)]

use quill::ast::*;
use quill::parser::{Diagnostics, ErrorCode};
use quill::ParserConfig;

/// Route parser logging to the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Full parse with default settings
pub fn parse(source: &str) -> (Unit, Diagnostics) {
    parse_with(source, &ParserConfig::default())
}

/// Body-skipping parse
pub fn parse_diet(source: &str) -> (Unit, Diagnostics) {
    parse_with(source, &ParserConfig::default().with_diet(true))
}

pub fn parse_with(source: &str, config: &ParserConfig) -> (Unit, Diagnostics) {
    init_logging();
    let mut diagnostics = Diagnostics::new();
    let unit = quill::parse_unit(source, config, &mut diagnostics);
    (unit, diagnostics)
}

/// Error codes of a full parse
pub fn error_codes(source: &str) -> Vec<ErrorCode> {
    parse(source).1.codes()
}

/// Checks that every node lies within the node it was found in
#[derive(Default)]
pub struct NestingChecker {
    stack: Vec<Span>,
    pub visited: usize,
    pub violations: Vec<String>,
}

impl NestingChecker {
    /// Every node whose span falls outside its parent's
    pub fn violations_in(unit: &Unit) -> Vec<String> {
        let mut checker = Self::default();
        checker.visit_unit(unit);
        checker.violations
    }

    fn enter(&mut self, what: &str, span: Span) {
        self.visited += 1;
        if span.start.offset > span.end.offset {
            self.violations.push(format!("{} {} ends before it starts", what, span));
        }
        if let Some(parent) = self.stack.last() {
            if !parent.encloses(span) {
                self.violations.push(format!("{} {} outside {}", what, span, parent));
            }
        }
        self.stack.push(span);
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

impl AstVisitor for NestingChecker {
    fn visit_class_decl(&mut self, class: &ClassDecl) {
        self.enter("class", class.span);
        walk_class_decl(self, class);
        self.leave();
    }

    fn visit_method_decl(&mut self, method: &MethodDecl) {
        self.enter("method", method.span);
        walk_method_decl(self, method);
        self.leave();
    }

    fn visit_field_decl(&mut self, field: &FieldDecl) {
        self.enter("field", field.span);
        walk_field_decl(self, field);
        self.leave();
    }

    fn visit_block(&mut self, block: &Block) {
        self.enter("block", block.span);
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
        self.leave();
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.enter("statement", stmt.span());
        walk_stmt(self, stmt);
        self.leave();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.enter("expression", expr.span());
        walk_expr(self, expr);
        self.leave();
    }
}
