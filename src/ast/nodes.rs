use std::fmt;

use super::Span;
use crate::parser::span::HasSpan;

/// A name together with where it was written
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }

    /// Placeholder produced when an identifier was expected but missing
    pub fn missing(span: Span) -> Self {
        Self { name: String::new(), span }
    }

    pub fn is_missing(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// Directives

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Library,
    Import,
    Source,
    Resource,
    Native,
}

impl DirectiveKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "library" => Some(DirectiveKind::Library),
            "import" => Some(DirectiveKind::Import),
            "source" => Some(DirectiveKind::Source),
            "resource" => Some(DirectiveKind::Resource),
            "native" => Some(DirectiveKind::Native),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Library => "library",
            DirectiveKind::Import => "import",
            DirectiveKind::Source => "source",
            DirectiveKind::Resource => "resource",
            DirectiveKind::Native => "native",
        }
    }
}

/// `#library('name');`, `#import('uri', prefix: 'p');` and friends
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Library name for `#library`, the URI otherwise
    pub value: String,
    pub prefix: Option<String>,
    pub span: Span,
}

// Declarations

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    TypeAlias(TypeAlias),
    Function(MethodDecl),
    Variable(FieldDecl),
    Error(ErrorNode),
}

impl Declaration {
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Class(c) => Some(&c.name.name),
            Declaration::TypeAlias(t) => Some(&t.name.name),
            Declaration::Function(m) => Some(m.name.simple_name()),
            Declaration::Variable(v) => v.variables.first().map(|d| d.name.name.as_str()),
            Declaration::Error(_) => None,
        }
    }
}

/// A class or an interface
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub is_interface: bool,
    pub name: Identifier,
    pub type_params: Vec<TypeParam>,
    /// `extends` clause of a class
    pub superclass: Option<TypeRef>,
    /// `implements` of a class, `extends` of an interface
    pub interfaces: Vec<TypeRef>,
    /// `factory` clause of an interface
    pub default_class: Option<TypeRef>,
    pub native_name: Option<String>,
    pub members: Vec<Member>,
    pub span: Span,
}

impl ClassDecl {
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }
}

/// `typedef R Name<T>(params);`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub return_type: Option<TypeRef>,
    pub name: Identifier,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Static,
    Abstract,
    Factory,
    Const,
    Final,
    Getter,
    Setter,
    Operator,
    Native,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Static => "static",
            Modifier::Abstract => "abstract",
            Modifier::Factory => "factory",
            Modifier::Const => "const",
            Modifier::Final => "final",
            Modifier::Getter => "get",
            Modifier::Setter => "set",
            Modifier::Operator => "operator",
            Modifier::Native => "native",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a class or top-level variables sharing one declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub type_ref: Option<TypeRef>,
    pub variables: Vec<VariableDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: Identifier,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// Method, constructor, accessor, operator or top-level function
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub name: MethodName,
    pub function: Function,
    pub initializers: Vec<Initializer>,
    pub span: Span,
}

impl MethodDecl {
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodName {
    Simple(Identifier),
    /// Named constructor `A.name`
    Qualified { class: Identifier, name: Identifier },
    Operator { op: String, span: Span },
}

impl MethodName {
    /// The last name component, or the operator text
    pub fn simple_name(&self) -> &str {
        match self {
            MethodName::Simple(id) => &id.name,
            MethodName::Qualified { name, .. } => &name.name,
            MethodName::Operator { op, .. } => op,
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodName::Simple(id) => write!(f, "{}", id),
            MethodName::Qualified { class, name } => write!(f, "{}.{}", class, name),
            MethodName::Operator { op, .. } => write!(f, "operator {}", op),
        }
    }
}

/// Return type, parameters and body shared by every function-like node
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub return_type: Option<TypeRef>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Block),
    Arrow(Box<Expr>),
    Native(Option<String>),
    /// `;` in place of a body
    None,
}

impl FunctionBody {
    pub fn is_none(&self) -> bool {
        matches!(self, FunctionBody::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Positional,
    /// Declared after `[`
    Named,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub modifiers: Vec<Modifier>,
    pub type_ref: Option<TypeRef>,
    pub name: Identifier,
    /// `this.name` parameter that initializes a field
    pub field_init: bool,
    pub kind: ParamKind,
    pub default_value: Option<Expr>,
    /// Parameters of a function-typed parameter `int f(a, b)`
    pub function_params: Option<Vec<Param>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initializer {
    pub kind: InitializerKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitializerKind {
    Field { name: Identifier, value: Expr },
    Super { name: Option<Identifier>, args: Vec<Expr> },
    Redirect { name: Option<Identifier>, args: Vec<Expr> },
}

impl InitializerKind {
    pub fn is_redirect(&self) -> bool {
        matches!(self, InitializerKind::Redirect { .. })
    }
}

// Types

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Possibly qualified name, `void` for the void type
    pub name: String,
    pub type_args: Vec<TypeRef>,
    pub span: Span,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Identifier,
    pub bound: Option<TypeRef>,
    pub span: Span,
}

// Statements

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    Variable(VarDeclStmt),
    Function(FunctionStmt),
    If(IfStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Switch(SwitchStmt),
    Try(TryStmt),
    Throw(ThrowStmt),
    Return(ReturnStmt),
    Break(JumpStmt),
    Continue(JumpStmt),
    Labeled(LabeledStmt),
    Assert(AssertStmt),
    Expr(ExprStmt),
    Empty(Span),
    Error(ErrorNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub modifiers: Vec<Modifier>,
    pub type_ref: Option<TypeRef>,
    pub variables: Vec<VariableDecl>,
    pub span: Span,
}

/// Local function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionStmt {
    pub name: Identifier,
    pub function: Function,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub updates: Vec<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInTarget {
    Declaration(VarDeclStmt),
    Identifier(Identifier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForInStmt {
    pub target: ForInTarget,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub expr: Expr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub labels: Vec<Identifier>,
    /// Empty for `default`
    pub values: Vec<Expr>,
    pub is_default: bool,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchParam {
    pub modifiers: Vec<Modifier>,
    pub type_ref: Option<TypeRef>,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub exception: CatchParam,
    pub trace: Option<CatchParam>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    /// `None` for a rethrow
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// `break` or `continue`
#[derive(Debug, Clone, PartialEq)]
pub struct JumpStmt {
    pub label: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    pub label: Identifier,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStmt {
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Raw text recovered in place of a construct that could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNode {
    pub text: String,
    pub span: Span,
}

// Expressions

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Interpolation(InterpolationExpr),
    Identifier(Identifier),
    This(Span),
    Super(Span),
    Paren(ParenExpr),
    Unary(UnaryExpr),
    Postfix(PostfixExpr),
    Binary(BinaryExpr),
    Is(IsExpr),
    Assign(AssignExpr),
    Conditional(ConditionalExpr),
    PropertyAccess(PropertyAccessExpr),
    Index(IndexExpr),
    Invocation(InvocationExpr),
    Call(CallExpr),
    New(NewExpr),
    List(ListLiteral),
    Map(MapLiteral),
    Function(FunctionExpr),
    Named(NamedExpr),
    Error(ErrorNode),
}

impl Expr {
    /// Whether the expression may appear left of `=` or under `++`/`--`
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Identifier(_) | Expr::PropertyAccess(_) | Expr::Index(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationExpr {
    pub parts: Vec<StringPart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    PreInc,
    PreDec,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpr {
    pub op: PostfixOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    EqStrict,
    NeStrict,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Sar,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    TruncDiv,
    Mod,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::EqStrict => "===",
            BinaryOp::NeStrict => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Sar => ">>",
            BinaryOp::Shr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::TruncDiv => "~/",
            BinaryOp::Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Type test `expr is T`; `is!` wraps this in a `Not`
#[derive(Debug, Clone, PartialEq)]
pub struct IsExpr {
    pub expr: Box<Expr>,
    pub type_ref: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Mul,
    Div,
    TruncDiv,
    Mod,
    Add,
    Sub,
    Shl,
    Sar,
    Shr,
    BitAnd,
    BitXor,
    BitOr,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::TruncDiv => "~/=",
            AssignOp::Mod => "%=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Shl => "<<=",
            AssignOp::Sar => ">>=",
            AssignOp::Shr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitXor => "^=",
            AssignOp::BitOr => "|=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAccessExpr {
    pub target: Box<Expr>,
    pub name: Identifier,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `name(args)` or `target.name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationExpr {
    pub target: Option<Box<Expr>>,
    pub name: Identifier,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// Call of an arbitrary expression, e.g. `(f)(x)` or `list[0](x)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub is_const: bool,
    pub type_ref: TypeRef,
    pub constructor: Option<Identifier>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub is_const: bool,
    pub type_arg: Option<TypeRef>,
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteral {
    pub is_const: bool,
    pub type_args: Vec<TypeRef>,
    pub entries: Vec<MapEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub name: Option<Identifier>,
    pub function: Function,
    pub span: Span,
}

/// Named argument `name: value`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpr {
    pub name: Identifier,
    pub value: Box<Expr>,
    pub span: Span,
}

macro_rules! impl_has_span {
    ($($ty:ty),* $(,)?) => {
        $(impl HasSpan for $ty {
            fn span(&self) -> Span {
                self.span
            }
        })*
    };
}

impl_has_span!(
    Identifier, Directive, ClassDecl, TypeAlias, FieldDecl, VariableDecl, MethodDecl, Function,
    Param, Initializer, TypeRef, TypeParam, Block, VarDeclStmt, FunctionStmt, IfStmt, ForStmt,
    ForInStmt, WhileStmt, DoWhileStmt, SwitchStmt, SwitchCase, TryStmt, CatchParam, CatchClause,
    ThrowStmt, ReturnStmt, JumpStmt, LabeledStmt, AssertStmt, ExprStmt, ErrorNode, LiteralExpr,
    InterpolationExpr, ParenExpr, UnaryExpr, PostfixExpr, BinaryExpr, IsExpr, AssignExpr,
    ConditionalExpr, PropertyAccessExpr, IndexExpr, InvocationExpr, CallExpr, NewExpr,
    ListLiteral, MapEntry, MapLiteral, FunctionExpr, NamedExpr,
);

impl HasSpan for Declaration {
    fn span(&self) -> Span {
        match self {
            Declaration::Class(c) => c.span,
            Declaration::TypeAlias(t) => t.span,
            Declaration::Function(m) => m.span,
            Declaration::Variable(v) => v.span,
            Declaration::Error(e) => e.span,
        }
    }
}

impl HasSpan for Member {
    fn span(&self) -> Span {
        match self {
            Member::Field(f) => f.span,
            Member::Method(m) => m.span,
        }
    }
}

impl HasSpan for MethodName {
    fn span(&self) -> Span {
        match self {
            MethodName::Simple(id) => id.span,
            MethodName::Qualified { class, name } => class.span.merge(name.span),
            MethodName::Operator { span, .. } => *span,
        }
    }
}

impl HasSpan for ForInTarget {
    fn span(&self) -> Span {
        match self {
            ForInTarget::Declaration(d) => d.span,
            ForInTarget::Identifier(id) => id.span,
        }
    }
}

impl HasSpan for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Block(s) => s.span,
            Stmt::Variable(s) => s.span,
            Stmt::Function(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForIn(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(s) | Stmt::Continue(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Assert(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::Empty(span) => *span,
            Stmt::Error(s) => s.span,
        }
    }
}

impl HasSpan for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Interpolation(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::This(span) | Expr::Super(span) => *span,
            Expr::Paren(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Postfix(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Is(e) => e.span,
            Expr::Assign(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::PropertyAccess(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::Invocation(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::New(e) => e.span,
            Expr::List(e) => e.span,
            Expr::Map(e) => e.span,
            Expr::Function(e) => e.span,
            Expr::Named(e) => e.span,
            Expr::Error(e) => e.span,
        }
    }
}
