use super::*;

/// AST visitor trait for traversing the tree
///
/// Every method has a default that walks into the node's children, so an
/// implementation only overrides the nodes it cares about and calls the
/// matching `walk_*` function to keep descending.
pub trait AstVisitor {
    fn visit_unit(&mut self, unit: &Unit) {
        walk_unit(self, unit);
    }

    fn visit_directive(&mut self, _directive: &Directive) {}

    fn visit_declaration(&mut self, declaration: &Declaration) {
        walk_declaration(self, declaration);
    }

    fn visit_class_decl(&mut self, class: &ClassDecl) {
        walk_class_decl(self, class);
    }

    fn visit_type_alias(&mut self, alias: &TypeAlias) {
        walk_type_alias(self, alias);
    }

    fn visit_member(&mut self, member: &Member) {
        match member {
            Member::Field(field) => self.visit_field_decl(field),
            Member::Method(method) => self.visit_method_decl(method),
        }
    }

    fn visit_field_decl(&mut self, field: &FieldDecl) {
        walk_field_decl(self, field);
    }

    fn visit_method_decl(&mut self, method: &MethodDecl) {
        walk_method_decl(self, method);
    }

    fn visit_function(&mut self, function: &Function) {
        walk_function(self, function);
    }

    fn visit_param(&mut self, param: &Param) {
        walk_param(self, param);
    }

    fn visit_initializer(&mut self, initializer: &Initializer) {
        walk_initializer(self, initializer);
    }

    fn visit_type_ref(&mut self, type_ref: &TypeRef) {
        for arg in &type_ref.type_args {
            self.visit_type_ref(arg);
        }
    }

    fn visit_type_param(&mut self, type_param: &TypeParam) {
        if let Some(bound) = &type_param.bound {
            self.visit_type_ref(bound);
        }
    }

    fn visit_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_error(&mut self, _error: &ErrorNode) {}
}

pub fn walk_unit<V: AstVisitor + ?Sized>(visitor: &mut V, unit: &Unit) {
    for directive in &unit.directives {
        visitor.visit_directive(directive);
    }
    for declaration in &unit.declarations {
        visitor.visit_declaration(declaration);
    }
}

pub fn walk_declaration<V: AstVisitor + ?Sized>(visitor: &mut V, declaration: &Declaration) {
    match declaration {
        Declaration::Class(class) => visitor.visit_class_decl(class),
        Declaration::TypeAlias(alias) => visitor.visit_type_alias(alias),
        Declaration::Function(function) => visitor.visit_method_decl(function),
        Declaration::Variable(variable) => visitor.visit_field_decl(variable),
        Declaration::Error(error) => visitor.visit_error(error),
    }
}

pub fn walk_class_decl<V: AstVisitor + ?Sized>(visitor: &mut V, class: &ClassDecl) {
    for type_param in &class.type_params {
        visitor.visit_type_param(type_param);
    }
    if let Some(superclass) = &class.superclass {
        visitor.visit_type_ref(superclass);
    }
    for interface in &class.interfaces {
        visitor.visit_type_ref(interface);
    }
    if let Some(default_class) = &class.default_class {
        visitor.visit_type_ref(default_class);
    }
    for member in &class.members {
        visitor.visit_member(member);
    }
}

pub fn walk_type_alias<V: AstVisitor + ?Sized>(visitor: &mut V, alias: &TypeAlias) {
    if let Some(return_type) = &alias.return_type {
        visitor.visit_type_ref(return_type);
    }
    for type_param in &alias.type_params {
        visitor.visit_type_param(type_param);
    }
    for param in &alias.params {
        visitor.visit_param(param);
    }
}

pub fn walk_field_decl<V: AstVisitor + ?Sized>(visitor: &mut V, field: &FieldDecl) {
    if let Some(type_ref) = &field.type_ref {
        visitor.visit_type_ref(type_ref);
    }
    for variable in &field.variables {
        if let Some(init) = &variable.initializer {
            visitor.visit_expr(init);
        }
    }
}

pub fn walk_method_decl<V: AstVisitor + ?Sized>(visitor: &mut V, method: &MethodDecl) {
    for initializer in &method.initializers {
        visitor.visit_initializer(initializer);
    }
    visitor.visit_function(&method.function);
}

pub fn walk_function<V: AstVisitor + ?Sized>(visitor: &mut V, function: &Function) {
    if let Some(return_type) = &function.return_type {
        visitor.visit_type_ref(return_type);
    }
    for param in &function.params {
        visitor.visit_param(param);
    }
    match &function.body {
        FunctionBody::Block(block) => visitor.visit_block(block),
        FunctionBody::Arrow(expr) => visitor.visit_expr(expr),
        FunctionBody::Native(_) | FunctionBody::None => {}
    }
}

pub fn walk_param<V: AstVisitor + ?Sized>(visitor: &mut V, param: &Param) {
    if let Some(type_ref) = &param.type_ref {
        visitor.visit_type_ref(type_ref);
    }
    if let Some(params) = &param.function_params {
        for inner in params {
            visitor.visit_param(inner);
        }
    }
    if let Some(default) = &param.default_value {
        visitor.visit_expr(default);
    }
}

pub fn walk_initializer<V: AstVisitor + ?Sized>(visitor: &mut V, initializer: &Initializer) {
    match &initializer.kind {
        InitializerKind::Field { value, .. } => visitor.visit_expr(value),
        InitializerKind::Super { args, .. } | InitializerKind::Redirect { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}

fn walk_var_decl<V: AstVisitor + ?Sized>(visitor: &mut V, decl: &VarDeclStmt) {
    if let Some(type_ref) = &decl.type_ref {
        visitor.visit_type_ref(type_ref);
    }
    for variable in &decl.variables {
        if let Some(init) = &variable.initializer {
            visitor.visit_expr(init);
        }
    }
}

fn walk_catch_param<V: AstVisitor + ?Sized>(visitor: &mut V, param: &CatchParam) {
    if let Some(type_ref) = &param.type_ref {
        visitor.visit_type_ref(type_ref);
    }
}

pub fn walk_stmt<V: AstVisitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::Variable(decl) => walk_var_decl(visitor, decl),
        Stmt::Function(function) => visitor.visit_function(&function.function),
        Stmt::If(s) => {
            visitor.visit_expr(&s.condition);
            visitor.visit_stmt(&s.then_branch);
            if let Some(else_branch) = &s.else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                visitor.visit_stmt(init);
            }
            if let Some(condition) = &s.condition {
                visitor.visit_expr(condition);
            }
            for update in &s.updates {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(&s.body);
        }
        Stmt::ForIn(s) => {
            if let ForInTarget::Declaration(decl) = &s.target {
                walk_var_decl(visitor, decl);
            }
            visitor.visit_expr(&s.iterable);
            visitor.visit_stmt(&s.body);
        }
        Stmt::While(s) => {
            visitor.visit_expr(&s.condition);
            visitor.visit_stmt(&s.body);
        }
        Stmt::DoWhile(s) => {
            visitor.visit_stmt(&s.body);
            visitor.visit_expr(&s.condition);
        }
        Stmt::Switch(s) => {
            visitor.visit_expr(&s.expr);
            for case in &s.cases {
                for value in &case.values {
                    visitor.visit_expr(value);
                }
                for stmt in &case.statements {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::Try(s) => {
            visitor.visit_block(&s.body);
            for catch in &s.catches {
                walk_catch_param(visitor, &catch.exception);
                if let Some(trace) = &catch.trace {
                    walk_catch_param(visitor, trace);
                }
                visitor.visit_block(&catch.body);
            }
            if let Some(finally) = &s.finally {
                visitor.visit_block(finally);
            }
        }
        Stmt::Throw(s) => {
            if let Some(value) = &s.value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Return(s) => {
            if let Some(value) = &s.value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Labeled(s) => visitor.visit_stmt(&s.body),
        Stmt::Assert(s) => visitor.visit_expr(&s.condition),
        Stmt::Expr(s) => visitor.visit_expr(&s.expr),
        Stmt::Error(error) => visitor.visit_error(error),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) => {}
    }
}

fn walk_args<V: AstVisitor + ?Sized>(visitor: &mut V, args: &[Expr]) {
    for arg in args {
        visitor.visit_expr(arg);
    }
}

pub fn walk_expr<V: AstVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Interpolation(e) => {
            for part in &e.parts {
                if let StringPart::Expr(inner) = part {
                    visitor.visit_expr(inner);
                }
            }
        }
        Expr::Paren(e) => visitor.visit_expr(&e.expr),
        Expr::Unary(e) => visitor.visit_expr(&e.operand),
        Expr::Postfix(e) => visitor.visit_expr(&e.operand),
        Expr::Binary(e) => {
            visitor.visit_expr(&e.left);
            visitor.visit_expr(&e.right);
        }
        Expr::Is(e) => {
            visitor.visit_expr(&e.expr);
            visitor.visit_type_ref(&e.type_ref);
        }
        Expr::Assign(e) => {
            visitor.visit_expr(&e.target);
            visitor.visit_expr(&e.value);
        }
        Expr::Conditional(e) => {
            visitor.visit_expr(&e.condition);
            visitor.visit_expr(&e.then_expr);
            visitor.visit_expr(&e.else_expr);
        }
        Expr::PropertyAccess(e) => visitor.visit_expr(&e.target),
        Expr::Index(e) => {
            visitor.visit_expr(&e.target);
            visitor.visit_expr(&e.index);
        }
        Expr::Invocation(e) => {
            if let Some(target) = &e.target {
                visitor.visit_expr(target);
            }
            walk_args(visitor, &e.args);
        }
        Expr::Call(e) => {
            visitor.visit_expr(&e.callee);
            walk_args(visitor, &e.args);
        }
        Expr::New(e) => {
            visitor.visit_type_ref(&e.type_ref);
            walk_args(visitor, &e.args);
        }
        Expr::List(e) => {
            if let Some(type_arg) = &e.type_arg {
                visitor.visit_type_ref(type_arg);
            }
            walk_args(visitor, &e.elements);
        }
        Expr::Map(e) => {
            for type_arg in &e.type_args {
                visitor.visit_type_ref(type_arg);
            }
            for entry in &e.entries {
                visitor.visit_expr(&entry.key);
                visitor.visit_expr(&entry.value);
            }
        }
        Expr::Function(e) => visitor.visit_function(&e.function),
        Expr::Named(e) => visitor.visit_expr(&e.value),
        Expr::Error(error) => visitor.visit_error(error),
        Expr::Literal(_) | Expr::Identifier(_) | Expr::This(_) | Expr::Super(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ErrorCounter {
        errors: usize,
    }

    impl AstVisitor for ErrorCounter {
        fn visit_error(&mut self, _error: &ErrorNode) {
            self.errors += 1;
        }
    }

    #[test]
    fn default_walk_reaches_nested_errors() {
        let span = Span::default();
        let error = Expr::Error(ErrorNode { text: "?".into(), span });
        let stmt = Stmt::If(IfStmt {
            condition: error.clone(),
            then_branch: Box::new(Stmt::Expr(ExprStmt { expr: error, span })),
            else_branch: None,
            span,
        });
        let mut counter = ErrorCounter::default();
        counter.visit_stmt(&stmt);
        assert_eq!(counter.errors, 2);
    }
}
