//! Parser module for the Quill language
//!
//! This module handles lexical analysis and error-tolerant parsing of `.ql`
//! sources into the AST.

pub mod context;
mod declarations;
pub mod error;
mod expressions;
pub mod keywords;
pub mod lexer;
pub mod parser;
mod probes;
mod recovery;
pub mod source;
pub mod span;
mod statements;
mod types;

pub use context::ParserContext;
pub use error::{Diagnostic, DiagnosticSink, Diagnostics, ErrorCode, Severity};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use source::{TokenSource, TokenStream};
pub use span::{HasSpan, LineMap, Location, Span};

use crate::ast::{Directive, Expr, Stmt, Unit};
use crate::config::ParserConfig;

/// Parse a compilation unit: leading directives, then declarations
pub fn parse_unit<D: DiagnosticSink>(source: &str, config: &ParserConfig, sink: D) -> Unit {
    Parser::new(source, config.clone(), sink).parse_unit()
}

/// Parse only the directives at the start of `source`
pub fn parse_directives<D: DiagnosticSink>(source: &str, config: &ParserConfig, sink: D) -> Vec<Directive> {
    Parser::new(source, config.clone(), sink).parse_directives()
}

/// Parse `source` as a single expression
pub fn parse_expression<D: DiagnosticSink>(source: &str, sink: D) -> Expr {
    Parser::new(source, ParserConfig::default(), sink).parse_standalone_expression()
}

/// Parse `source` as a single statement
pub fn parse_statement<D: DiagnosticSink>(source: &str, sink: D) -> Stmt {
    Parser::new(source, ParserConfig::default(), sink).parse_standalone_statement()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Declaration;

    #[test]
    fn test_parse_simple_class() {
        let source = r#"
#library('hello');

class HelloWorld {
  static void main() {
    print('Hello, World!');
  }
}
"#;
        let mut diagnostics = Diagnostics::new();
        let unit = parse_unit(source, &ParserConfig::default(), &mut diagnostics);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
        assert_eq!(unit.directives.len(), 1);
        assert!(unit.class("HelloWorld").is_some());
    }

    #[test]
    fn test_parse_directives_stops_at_first_declaration() {
        let source = "#import('a.ql');\n#import('b.ql');\nclass A { garbage ( }";
        let mut diagnostics = Diagnostics::new();
        let directives = parse_directives(source, &ParserConfig::default(), &mut diagnostics);
        assert_eq!(directives.len(), 2);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_directive_after_declaration() {
        let mut diagnostics = Diagnostics::new();
        let unit = parse_unit("var x;\n#import('a.ql');", &ParserConfig::default(), &mut diagnostics);
        assert_eq!(diagnostics.codes(), vec![ErrorCode::DirectiveAfterDeclaration]);
        assert!(matches!(unit.declarations.as_slice(), [Declaration::Variable(_)]));
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        parse_expression("1 +", &mut sink);
        assert_eq!(sink.len(), 1);
    }
}
