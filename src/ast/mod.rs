//! Abstract syntax tree for Quill
//!
//! Every node records the span of source it was parsed from. Nodes that
//! could not be parsed are kept as [`ErrorNode`]s holding the skipped text,
//! so a tree is produced for any input.

mod nodes;
mod printer;
mod visitor;

pub use nodes::*;
pub use printer::*;
pub use visitor::*;

pub use crate::parser::span::{HasSpan, Location, Span};

use std::fmt;

/// A parsed compilation unit
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub directives: Vec<Directive>,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

impl Unit {
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Class(c) => Some(c),
            _ => None,
        })
    }

    /// Look up a class or interface by name
    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes().find(|c| c.name.name == name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &MethodDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }
}

impl HasSpan for Unit {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter::new().print(self))
    }
}
