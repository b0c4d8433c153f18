//! Quill front-end parser (quill)
//!
//! An error-tolerant, speculative recursive-descent parser for Quill, a
//! small class-based language with optional types, string interpolation and
//! `#`-directives.
//!
//! ## Architecture
//!
//! - **parser**: scanner, token stream, parse context and the grammar rules
//! - **ast**: syntax tree, visitor and printer
//! - **config**: parser knobs (`diet`, diagnostic cap, lookahead bound)
//! - **bin**: the `quillp` command-line driver
//!
//! ## Parse Flow
//!
//! ```text
//! Source → Lexer → TokenStream → ParserContext → Parser → Unit
//!                                      ↓
//!                               DiagnosticSink
//! ```
//!
//! Parsing never fails. Syntax errors go to the caller's
//! [`DiagnosticSink`](parser::DiagnosticSink) and the parser always returns
//! a complete tree, with error nodes where input could not be understood.

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;

pub use config::ParserConfig;
pub use error::{Error, Result};
pub use parser::{parse_directives, parse_expression, parse_statement, parse_unit};

use parser::Diagnostics;

/// Parse `source` and turn the first error diagnostic into an `Err`.
///
/// For callers that have no use for a partial tree.
pub fn parse_checked(source: &str, config: &ParserConfig) -> Result<ast::Unit> {
    let mut diagnostics = Diagnostics::new();
    let unit = parse_unit(source, config, &mut diagnostics);
    diagnostics.into_result(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_parse_reports_first_error() {
        let config = ParserConfig::default();
        assert!(parse_checked("class A { }", &config).is_ok());
        match parse_checked("class A {\n  f() { if (x }\n}", &config) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
