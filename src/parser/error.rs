use std::fmt;

use super::span::Location;
use crate::error::Error;

/// Diagnostic codes reported by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Token mismatches
    ExpectedToken,
    ExpectedIdentifier,
    ExpectedType,
    ExpectedClassMember,
    ExpectedDeclaration,
    UnexpectedToken,
    UnexpectedEndOfInput,

    // Legality checks done while parsing
    NonChainableOperator,
    IllegalAssignmentTarget,
    SuperNotExpression,
    DuplicateModifier,
    IllegalModifier,
    IllegalModifierCombination,
    AbstractMemberInInterface,
    AbstractMemberWithBody,
    GetterHasParameters,
    SetterParameterCount,
    OperatorParameterCount,
    DefaultPositionalParameter,
    NamedParameterNotAllowed,
    RedirectMustBeSole,
    MultipleRedirects,
    RedirectWithBody,
    InitializersNotAllowed,
    MissingFunctionBody,
    UnknownDirective,
    DirectiveAfterDeclaration,
    InvalidNumber,

    // Unterminated constructs
    UnterminatedString,
    UnterminatedInterpolation,

    // Warnings
    UnnecessarySemicolon,
}

impl ErrorCode {
    /// Message template; `{0}`, `{1}` are replaced by the diagnostic arguments
    pub fn template(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            ExpectedToken => "expected {0}, found {1}",
            ExpectedIdentifier => "expected identifier, found {0}",
            ExpectedType => "expected type, found {0}",
            ExpectedClassMember => "expected class member, found {0}",
            ExpectedDeclaration => "expected declaration, found {0}",
            UnexpectedToken => "unexpected token {0}",
            UnexpectedEndOfInput => "unexpected end of input",
            NonChainableOperator => "operator {0} cannot be chained",
            IllegalAssignmentTarget => "illegal assignment target",
            SuperNotExpression => "'super' cannot be used as an expression",
            DuplicateModifier => "duplicate modifier '{0}'",
            IllegalModifier => "modifier '{0}' is not allowed here",
            IllegalModifierCombination => "'{0}' cannot be combined with '{1}'",
            AbstractMemberInInterface => "interface members are implicitly abstract",
            AbstractMemberWithBody => "abstract members cannot have a body",
            GetterHasParameters => "getters cannot have parameters",
            SetterParameterCount => "setters must have exactly one parameter",
            OperatorParameterCount => "operator '{0}' must have {1} parameter(s)",
            DefaultPositionalParameter => "positional parameters cannot have default values",
            NamedParameterNotAllowed => "named parameters are not allowed here",
            RedirectMustBeSole => "a redirecting constructor call must be the only initializer",
            MultipleRedirects => "only one redirecting constructor call is allowed",
            RedirectWithBody => "a redirecting constructor cannot have a body",
            InitializersNotAllowed => "initializers are only allowed on constructors",
            MissingFunctionBody => "expected function body",
            UnknownDirective => "unknown directive '#{0}'",
            DirectiveAfterDeclaration => "directives must precede declarations",
            InvalidNumber => "invalid number literal '{0}'",
            UnterminatedString => "unterminated string literal",
            UnterminatedInterpolation => "unterminated string interpolation",
            UnnecessarySemicolon => "unnecessary semicolon",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorCode::UnnecessarySemicolon => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single parser diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub location: Location,
    pub args: Vec<String>,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, location: Location, args: Vec<String>) -> Self {
        Self {
            code,
            location,
            args,
            severity: code.default_severity(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn message(&self) -> String {
        let mut message = self.code.template().to_string();
        for (i, arg) in self.args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", i), arg);
        }
        message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.severity,
            self.location.line,
            self.location.column,
            self.message()
        )
    }
}

impl std::error::Error for Diagnostic {}

impl From<Diagnostic> for Error {
    fn from(diagnostic: Diagnostic) -> Self {
        Error::Parse {
            line: diagnostic.location.line,
            column: diagnostic.location.column,
            message: diagnostic.message(),
        }
    }
}

/// Receiver of the diagnostics a parse produces
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Collects diagnostics, keeping errors and warnings apart
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All diagnostics in source order
    pub fn all(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self.errors.iter().chain(self.warnings.iter()).collect();
        all.sort_by_key(|d| d.location.offset);
        all
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|d| d.code).collect()
    }

    /// `Ok(value)` if no error was collected, else the first error
    pub fn into_result<T>(self, value: T) -> crate::error::Result<T> {
        match self.errors.into_iter().next() {
            None => Ok(value),
            Some(first) => Err(first.into()),
        }
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }
}
