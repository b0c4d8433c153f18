use logos::Logos;

use super::span::{LineMap, Location};

/// Token kinds for the Quill language
///
/// Contextual words such as `abstract`, `get` or `factory` are not listed here:
/// they scan as [`TokenKind::Identifier`] and are recognized by text in the
/// parser, so they stay usable as ordinary names.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Keywords
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("class")]
    Class,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("extends")]
    Extends,
    #[token("false")]
    False,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("switch")]
    Switch,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("var")]
    Var,
    #[token("void")]
    Void,
    #[token("while")]
    While,

    // Assignment operators
    #[token("=")]
    Assign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("~/=")]
    TruncDivAssign,
    #[token("%=")]
    ModAssign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    SarAssign,
    #[token(">>>=")]
    ShrAssign,
    #[token("&=")]
    BitAndAssign,
    #[token("^=")]
    BitXorAssign,
    #[token("|=")]
    BitOrAssign,

    // Binary and unary operators
    #[token("||")]
    Or,
    #[token("&&")]
    And,
    #[token("|")]
    BitOr,
    #[token("^")]
    BitXor,
    #[token("&")]
    BitAnd,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("===")]
    EqStrict,
    #[token("!==")]
    NeStrict,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Sar,
    #[token(">>>")]
    Shr,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("~/")]
    TruncDiv,
    #[token("%")]
    Mod,
    #[token("!")]
    Not,
    #[token("~")]
    BitNot,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,

    // Separators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Period,
    #[token(":")]
    Colon,
    #[token("?")]
    Conditional,
    #[token("=>")]
    Arrow,
    #[token("#")]
    Hash,

    // Literals
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInteger,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Double,
    /// Opening quote of a string; the body is scanned by [`Lexer`] and
    /// never reaches the parser as this kind.
    #[regex(r#"@?("""|'''|"|')"#)]
    StringStart,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r\f]+", priority = 2)]
    Whitespace,
    #[token("\u{FEFF}")]
    Bom,

    // Produced by the string scanner
    /// A complete string without interpolation
    StringLiteral,
    /// A literal piece of a string that is followed by an interpolation
    StringSegment,
    /// The last literal piece of an interpolated string
    StringEnd,
    /// A string (or interpolation) that hit end of line or end of input
    UnterminatedString,
    InterpolationStart,
    InterpolationEnd,

    /// Character the scanner does not understand
    Unknown,
    Eof,
}

impl TokenKind {
    /// Source text of fixed tokens, or a description for the others
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Break => "break",
            Case => "case",
            Catch => "catch",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Do => "do",
            Else => "else",
            Extends => "extends",
            False => "false",
            Final => "final",
            Finally => "finally",
            For => "for",
            If => "if",
            In => "in",
            Is => "is",
            New => "new",
            Null => "null",
            Return => "return",
            Super => "super",
            Switch => "switch",
            This => "this",
            Throw => "throw",
            True => "true",
            Try => "try",
            Var => "var",
            Void => "void",
            While => "while",
            Assign => "=",
            MulAssign => "*=",
            DivAssign => "/=",
            TruncDivAssign => "~/=",
            ModAssign => "%=",
            AddAssign => "+=",
            SubAssign => "-=",
            ShlAssign => "<<=",
            SarAssign => ">>=",
            ShrAssign => ">>>=",
            BitAndAssign => "&=",
            BitXorAssign => "^=",
            BitOrAssign => "|=",
            Or => "||",
            And => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Eq => "==",
            Ne => "!=",
            EqStrict => "===",
            NeStrict => "!==",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            Shl => "<<",
            Sar => ">>",
            Shr => ">>>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            TruncDiv => "~/",
            Mod => "%",
            Not => "!",
            BitNot => "~",
            Inc => "++",
            Dec => "--",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            LBrace => "{",
            RBrace => "}",
            Semicolon => ";",
            Comma => ",",
            Period => ".",
            Colon => ":",
            Conditional => "?",
            Arrow => "=>",
            Hash => "#",
            Integer | HexInteger => "integer literal",
            Double => "double literal",
            StringStart | StringLiteral | StringSegment | StringEnd => "string literal",
            UnterminatedString => "unterminated string",
            InterpolationStart => "${",
            InterpolationEnd => "}",
            Identifier => "identifier",
            LineComment | BlockComment => "comment",
            Whitespace | Bom => "whitespace",
            Unknown => "unknown character",
            Eof => "end of input",
        }
    }

    /// Binding strength as a binary operator; 0 for everything else.
    ///
    /// Assignment is 1 and the conditional operator 3; the binary layer only
    /// ever looks at levels 4 and up.
    pub fn precedence(&self) -> u8 {
        use TokenKind::*;
        match self {
            Assign | MulAssign | DivAssign | TruncDivAssign | ModAssign | AddAssign
            | SubAssign | ShlAssign | SarAssign | ShrAssign | BitAndAssign | BitXorAssign
            | BitOrAssign => 1,
            Conditional => 3,
            Or => 4,
            And => 5,
            BitOr => 6,
            BitXor => 7,
            BitAnd => 8,
            Eq | Ne | EqStrict | NeStrict => 9,
            Lt | Gt | Le | Ge | Is => 10,
            Shl | Sar | Shr => 11,
            Add | Sub => 12,
            Mul | Div | TruncDiv | Mod => 13,
            _ => 0,
        }
    }

    pub fn is_equality_operator(&self) -> bool {
        matches!(self, TokenKind::Eq | TokenKind::Ne | TokenKind::EqStrict | TokenKind::NeStrict)
    }

    /// Relational comparison or type test
    pub fn is_relational_operator(&self) -> bool {
        matches!(self, TokenKind::Lt | TokenKind::Gt | TokenKind::Le | TokenKind::Ge | TokenKind::Is)
    }

    /// Operators a class may declare with `operator`
    pub fn is_user_definable_operator(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Eq | Lt | Gt | Le | Ge | Add | Sub | Mul | Div | TruncDiv | Mod | BitOr | BitXor
                | BitAnd | Shl | Sar | Shr | BitNot
        )
    }

    pub fn is_literal(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Integer | HexInteger | Double | StringLiteral | StringSegment | UnterminatedString
                | True | False | Null
        )
    }

    pub fn is_string_start(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral | TokenKind::StringSegment | TokenKind::UnterminatedString
        )
    }

    /// Tokens the scanner drops before handing the stream to the parser
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Bom
        )
    }

    fn keeps_text(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Integer
                | TokenKind::HexInteger
                | TokenKind::Double
                | TokenKind::Unknown
        )
    }
}

/// Token with location information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme for identifiers and numbers, unescaped value for string pieces
    pub text: Option<String>,
    pub location: Location,
    /// Location just past the token
    pub end: Location,
}

impl Token {
    pub fn new(kind: TokenKind, text: Option<String>, location: Location, end: Location) -> Self {
        Self { kind, text, location, end }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Text of the token as written or, for fixed tokens, the kind's spelling
    pub fn lexeme(&self) -> &str {
        self.text.as_deref().unwrap_or_else(|| self.kind.as_str())
    }
}

/// Scanner for Quill source
///
/// Produces the complete token stream up front, with whitespace and comments
/// removed and a trailing [`TokenKind::Eof`]. Strings are split into pieces
/// around interpolations so the parser sees `${` expression tokens `}`.
pub struct Lexer<'a> {
    source: &'a str,
    lines: LineMap,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: LineMap::new(source),
        }
    }

    pub fn tokenize(self) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.lex_range(0, self.source.len(), &mut tokens);
        let end = self.location(self.source.len());
        tokens.push(Token::new(TokenKind::Eof, None, end, end));
        tokens
    }

    fn location(&self, offset: usize) -> Location {
        self.lines.location(self.source, offset)
    }

    fn push(&self, out: &mut Vec<Token>, kind: TokenKind, text: Option<String>, start: usize, end: usize) {
        out.push(Token::new(kind, text, self.location(start), self.location(end)));
    }

    /// Scan `source[start..end]`, appending tokens with absolute locations
    fn lex_range(&self, start: usize, end: usize, out: &mut Vec<Token>) {
        let mut lexer = TokenKind::lexer(&self.source[start..end]);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let (abs_start, abs_end) = (start + span.start, start + span.end);
            match result {
                Ok(kind) if kind.is_trivia() => {}
                Ok(TokenKind::StringStart) => {
                    let opener = lexer.slice();
                    let raw = opener.starts_with('@');
                    let quote = opener.trim_start_matches('@');
                    let consumed = self.lex_string(abs_start, abs_end, end, quote, raw, out);
                    lexer.bump(consumed);
                }
                Ok(kind) => {
                    let text = kind.keeps_text().then(|| lexer.slice().to_string());
                    self.push(out, kind, text, abs_start, abs_end);
                }
                Err(()) => {
                    self.push(out, TokenKind::Unknown, Some(lexer.slice().to_string()), abs_start, abs_end);
                }
            }
        }
    }

    /// Scan a string body starting at `body_start`; returns the bytes consumed
    /// after the opening quote.
    fn lex_string(
        &self,
        token_start: usize,
        body_start: usize,
        limit: usize,
        quote: &str,
        raw: bool,
        out: &mut Vec<Token>,
    ) -> usize {
        let source = self.source;
        let multiline = quote.len() == 3;
        let mut pos = body_start;
        let mut piece_start = token_start;
        let mut value = String::new();
        let mut interpolated = false;

        loop {
            let rest = &source[pos..limit];
            let Some(ch) = rest.chars().next() else {
                self.push(out, TokenKind::UnterminatedString, Some(value), piece_start, pos);
                return pos - body_start;
            };
            if rest.starts_with(quote) {
                pos += quote.len();
                let kind = if interpolated { TokenKind::StringEnd } else { TokenKind::StringLiteral };
                self.push(out, kind, Some(value), piece_start, pos);
                return pos - body_start;
            }
            if ch == '\n' && !multiline {
                self.push(out, TokenKind::UnterminatedString, Some(value), piece_start, pos);
                return pos - body_start;
            }
            if ch == '\\' && !raw {
                let (decoded, width) = decode_escape(&rest[1..]);
                value.push_str(&decoded);
                pos += 1 + width;
                continue;
            }
            if ch == '$' && !raw {
                let after = &rest[1..];
                if after.starts_with('{') {
                    interpolated = true;
                    self.push(out, TokenKind::StringSegment, Some(std::mem::take(&mut value)), piece_start, pos);
                    self.push(out, TokenKind::InterpolationStart, None, pos, pos + 2);
                    let inner_start = pos + 2;
                    match find_interpolation_end(source, inner_start, limit) {
                        Some(close) => {
                            self.lex_range(inner_start, close, out);
                            self.push(out, TokenKind::InterpolationEnd, None, close, close + 1);
                            pos = close + 1;
                            piece_start = pos;
                        }
                        None => {
                            self.lex_range(inner_start, limit, out);
                            self.push(out, TokenKind::UnterminatedString, Some(String::new()), limit, limit);
                            return limit - body_start;
                        }
                    }
                    continue;
                }
                let ident_len = after
                    .char_indices()
                    .take_while(|(i, c)| {
                        if *i == 0 {
                            c.is_ascii_alphabetic() || *c == '_'
                        } else {
                            c.is_ascii_alphanumeric() || *c == '_'
                        }
                    })
                    .count();
                if ident_len > 0 {
                    interpolated = true;
                    self.push(out, TokenKind::StringSegment, Some(std::mem::take(&mut value)), piece_start, pos);
                    self.push(out, TokenKind::InterpolationStart, None, pos, pos + 1);
                    let ident_start = pos + 1;
                    let ident_end = ident_start + ident_len;
                    self.lex_range(ident_start, ident_end, out);
                    self.push(out, TokenKind::InterpolationEnd, None, ident_end, ident_end);
                    pos = ident_end;
                    piece_start = pos;
                    continue;
                }
            }
            value.push(ch);
            pos += ch.len_utf8();
        }
    }
}

/// Decode the escape following a backslash; returns the text and the
/// number of bytes used after the backslash.
fn decode_escape(rest: &str) -> (String, usize) {
    let Some(ch) = rest.chars().next() else {
        return (String::new(), 0);
    };
    let simple = match ch {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        _ => None,
    };
    if let Some(c) = simple {
        return (c.to_string(), 1);
    }
    match ch {
        'x' => {
            let hex: String = rest[1..].chars().take(2).take_while(|c| c.is_ascii_hexdigit()).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(c) if hex.len() == 2 => (c.to_string(), 3),
                _ => ("x".to_string(), 1),
            }
        }
        'u' => {
            let body = &rest[1..];
            let (hex, width): (String, usize) = if let Some(braced) = body.strip_prefix('{') {
                let digits: String = braced.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
                let closed = braced[digits.len()..].starts_with('}');
                let width = 1 + digits.len() + usize::from(closed);
                (digits, width)
            } else {
                let digits: String = body.chars().take(4).take_while(|c| c.is_ascii_hexdigit()).collect();
                let width = digits.len();
                (digits, width)
            };
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(c) => (c.to_string(), 1 + width),
                None => ("u".to_string(), 1),
            }
        }
        other => (other.to_string(), other.len_utf8()),
    }
}

/// Offset of the `}` closing an interpolation that starts at `start`
fn find_interpolation_end(source: &str, start: usize, limit: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;
    while pos < limit {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Some(pos);
                }
                depth -= 1;
            }
            b'\'' | b'"' | b'@' if is_string_opener(bytes, pos, limit) => {
                pos = skip_string(source, pos, limit);
                continue;
            }
            b'/' if pos + 1 < limit && bytes[pos + 1] == b'/' => {
                while pos < limit && bytes[pos] != b'\n' {
                    pos += 1;
                }
                continue;
            }
            b'/' if pos + 1 < limit && bytes[pos + 1] == b'*' => {
                pos += 2;
                while pos + 1 < limit && !(bytes[pos] == b'*' && bytes[pos + 1] == b'/') {
                    pos += 1;
                }
                pos = (pos + 2).min(limit);
                continue;
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

fn is_string_opener(bytes: &[u8], pos: usize, limit: usize) -> bool {
    match bytes[pos] {
        b'\'' | b'"' => true,
        b'@' => pos + 1 < limit && matches!(bytes[pos + 1], b'\'' | b'"'),
        _ => false,
    }
}

/// Skip a nested string inside an interpolation; returns the offset after it
fn skip_string(source: &str, start: usize, limit: usize) -> usize {
    let bytes = source.as_bytes();
    let mut pos = start;
    let raw = bytes[pos] == b'@';
    if raw {
        pos += 1;
    }
    let q = bytes[pos];
    let triple = pos + 2 < limit && bytes[pos + 1] == q && bytes[pos + 2] == q;
    let quote_len = if triple { 3 } else { 1 };
    pos += quote_len;
    while pos < limit {
        let b = bytes[pos];
        if b == q && (!triple || (pos + 2 < limit && bytes[pos + 1] == q && bytes[pos + 2] == q)) {
            return pos + quote_len;
        }
        if b == b'\n' && !triple {
            return pos;
        }
        if b == b'\\' && !raw {
            pos += 2;
            continue;
        }
        if b == b'$' && !raw && pos + 1 < limit && bytes[pos + 1] == b'{' {
            match find_interpolation_end(source, pos + 2, limit) {
                Some(close) => {
                    pos = close + 1;
                    continue;
                }
                None => return limit,
            }
        }
        pos += 1;
    }
    limit.min(bytes.len())
}
