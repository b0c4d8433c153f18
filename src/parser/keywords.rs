//! Contextual keywords.
//!
//! These words have a special meaning in some positions only and are
//! ordinary identifiers everywhere else, so the scanner hands them to the
//! parser as [`TokenKind::Identifier`](super::lexer::TokenKind::Identifier)
//! and rules compare the identifier text.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoKeyword {
    Abstract,
    Assert,
    Factory,
    Get,
    Implements,
    Import,
    Interface,
    Library,
    Native,
    Negate,
    Operator,
    Prefix,
    Resource,
    Set,
    Source,
    Static,
    Typedef,
}

const ALL: [PseudoKeyword; 17] = [
    PseudoKeyword::Abstract,
    PseudoKeyword::Assert,
    PseudoKeyword::Factory,
    PseudoKeyword::Get,
    PseudoKeyword::Implements,
    PseudoKeyword::Import,
    PseudoKeyword::Interface,
    PseudoKeyword::Library,
    PseudoKeyword::Native,
    PseudoKeyword::Negate,
    PseudoKeyword::Operator,
    PseudoKeyword::Prefix,
    PseudoKeyword::Resource,
    PseudoKeyword::Set,
    PseudoKeyword::Source,
    PseudoKeyword::Static,
    PseudoKeyword::Typedef,
];

static BY_TEXT: Lazy<HashMap<&'static str, PseudoKeyword>> =
    Lazy::new(|| ALL.iter().map(|k| (k.as_str(), *k)).collect());

impl PseudoKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoKeyword::Abstract => "abstract",
            PseudoKeyword::Assert => "assert",
            PseudoKeyword::Factory => "factory",
            PseudoKeyword::Get => "get",
            PseudoKeyword::Implements => "implements",
            PseudoKeyword::Import => "import",
            PseudoKeyword::Interface => "interface",
            PseudoKeyword::Library => "library",
            PseudoKeyword::Native => "native",
            PseudoKeyword::Negate => "negate",
            PseudoKeyword::Operator => "operator",
            PseudoKeyword::Prefix => "prefix",
            PseudoKeyword::Resource => "resource",
            PseudoKeyword::Set => "set",
            PseudoKeyword::Source => "source",
            PseudoKeyword::Static => "static",
            PseudoKeyword::Typedef => "typedef",
        }
    }

    pub fn lookup(text: &str) -> Option<Self> {
        BY_TEXT.get(text).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_round_trips_every_word() {
        for keyword in ALL {
            assert_eq!(PseudoKeyword::lookup(keyword.as_str()), Some(keyword));
        }
        assert_eq!(PseudoKeyword::lookup("class"), None);
        assert_eq!(PseudoKeyword::lookup("Static"), None);
    }
}
