use super::nodes::*;
use super::Unit;

/// AST printer for debugging and output
///
/// Renders a tree back to Quill source. Binary, assignment, conditional and
/// type-test expressions are always parenthesized so the printed text shows
/// exactly how the parser grouped them.
pub struct AstPrinter {
    indent_level: usize,
    output: String,
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl AstPrinter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            output: String::new(),
        }
    }

    pub fn print(&mut self, unit: &Unit) -> String {
        self.output.clear();
        for directive in &unit.directives {
            self.print_directive(directive);
        }
        if !unit.directives.is_empty() && !unit.declarations.is_empty() {
            self.output.push('\n');
        }
        for declaration in &unit.declarations {
            self.print_declaration(declaration);
        }
        std::mem::take(&mut self.output)
    }

    /// One-line rendering of an expression
    pub fn expr_to_string(expr: &Expr) -> String {
        let mut printer = Self::new();
        printer.expr(expr);
        printer.output
    }

    /// One line per declaration and member: name and parameter list only.
    ///
    /// Identical for a full parse and a diet parse of the same source.
    pub fn outline(unit: &Unit) -> Vec<String> {
        let mut lines = Vec::new();
        for declaration in &unit.declarations {
            match declaration {
                Declaration::Class(class) => {
                    let keyword = if class.is_interface { "interface" } else { "class" };
                    lines.push(format!("{} {}", keyword, class.name));
                    for member in &class.members {
                        match member {
                            Member::Field(field) => {
                                for variable in &field.variables {
                                    lines.push(format!("  field {}", variable.name));
                                }
                            }
                            Member::Method(method) => {
                                lines.push(format!("  {}", Self::signature(method)));
                            }
                        }
                    }
                }
                Declaration::TypeAlias(alias) => lines.push(format!("typedef {}", alias.name)),
                Declaration::Function(function) => lines.push(Self::signature(function)),
                Declaration::Variable(field) => {
                    for variable in &field.variables {
                        lines.push(format!("var {}", variable.name));
                    }
                }
                Declaration::Error(_) => lines.push("<error>".to_string()),
            }
        }
        lines
    }

    fn signature(method: &MethodDecl) -> String {
        let params: Vec<&str> = method.function.params.iter().map(|p| p.name.name.as_str()).collect();
        format!("{}({})", method.name, params.join(", "))
    }

    fn indent(&mut self) {
        self.indent_level += 2;
    }

    fn dedent(&mut self) {
        if self.indent_level >= 2 {
            self.indent_level -= 2;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
    }

    fn push(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn print_directive(&mut self, directive: &Directive) {
        let mut line = format!("#{}({}", directive.kind.as_str(), quote(&directive.value));
        if let Some(prefix) = &directive.prefix {
            line.push_str(&format!(", prefix: {}", quote(prefix)));
        }
        line.push_str(");");
        self.writeln(&line);
    }

    fn print_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Class(class) => self.print_class(class),
            Declaration::TypeAlias(alias) => {
                self.write_indent();
                self.push("typedef ");
                if let Some(return_type) = &alias.return_type {
                    self.push(&format!("{} ", return_type));
                }
                self.push(&alias.name.name);
                self.type_params(&alias.type_params);
                self.params(&alias.params);
                self.push(";\n");
            }
            Declaration::Function(function) => self.print_method(function),
            Declaration::Variable(field) => self.print_field(field),
            Declaration::Error(error) => self.writeln(&format!("/* error: {} */", error.text)),
        }
    }

    fn print_class(&mut self, class: &ClassDecl) {
        self.write_indent();
        self.push(if class.is_interface { "interface " } else { "class " });
        self.push(&class.name.name);
        self.type_params(&class.type_params);
        if let Some(superclass) = &class.superclass {
            self.push(&format!(" extends {}", superclass));
        }
        if !class.interfaces.is_empty() {
            let names: Vec<String> = class.interfaces.iter().map(|t| t.to_string()).collect();
            let keyword = if class.is_interface { "extends" } else { "implements" };
            self.push(&format!(" {} {}", keyword, names.join(", ")));
        }
        if let Some(default_class) = &class.default_class {
            self.push(&format!(" factory {}", default_class));
        }
        if let Some(native) = &class.native_name {
            self.push(&format!(" native {}", quote(native)));
        }
        self.push(" {\n");
        self.indent();
        for member in &class.members {
            match member {
                Member::Field(field) => self.print_field(field),
                Member::Method(method) => self.print_method(method),
            }
        }
        self.dedent();
        self.writeln("}");
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            match modifier {
                // rendered as part of the name
                Modifier::Getter | Modifier::Setter | Modifier::Operator | Modifier::Native => {}
                other => {
                    self.push(other.as_str());
                    self.push(" ");
                }
            }
        }
    }

    fn print_field(&mut self, field: &FieldDecl) {
        self.write_indent();
        self.modifiers(&field.modifiers);
        match &field.type_ref {
            Some(type_ref) => self.push(&format!("{} ", type_ref)),
            None if field.modifiers.is_empty() => self.push("var "),
            None => {}
        }
        self.variables(&field.variables);
        self.push(";\n");
    }

    fn variables(&mut self, variables: &[VariableDecl]) {
        for (i, variable) in variables.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&variable.name.name);
            if let Some(init) = &variable.initializer {
                self.push(" = ");
                self.expr(init);
            }
        }
    }

    fn print_method(&mut self, method: &MethodDecl) {
        self.write_indent();
        self.modifiers(&method.modifiers);
        if let Some(return_type) = &method.function.return_type {
            self.push(&format!("{} ", return_type));
        }
        if method.has_modifier(Modifier::Getter) {
            self.push("get ");
        } else if method.has_modifier(Modifier::Setter) {
            self.push("set ");
        }
        self.push(&method.name.to_string());
        if !method.has_modifier(Modifier::Getter) {
            self.params(&method.function.params);
        }
        if !method.initializers.is_empty() {
            self.push(" : ");
            for (i, initializer) in method.initializers.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.initializer(initializer);
            }
        }
        self.function_body(&method.function.body);
        self.push("\n");
    }

    fn initializer(&mut self, initializer: &Initializer) {
        match &initializer.kind {
            InitializerKind::Field { name, value } => {
                self.push(&format!("{} = ", name));
                self.expr(value);
            }
            InitializerKind::Super { name, args } | InitializerKind::Redirect { name, args } => {
                let keyword = if initializer.kind.is_redirect() { "this" } else { "super" };
                self.push(keyword);
                if let Some(name) = name {
                    self.push(&format!(".{}", name));
                }
                self.args(args);
            }
        }
    }

    fn function_body(&mut self, body: &FunctionBody) {
        match body {
            FunctionBody::Block(block) => {
                self.push(" ");
                self.block(block);
            }
            FunctionBody::Arrow(expr) => {
                self.push(" => ");
                self.expr(expr);
                self.push(";");
            }
            FunctionBody::Native(name) => {
                self.push(" native");
                if let Some(name) = name {
                    self.push(&format!(" {}", quote(name)));
                }
                self.push(";");
            }
            FunctionBody::None => self.push(";"),
        }
    }

    fn type_params(&mut self, type_params: &[TypeParam]) {
        if type_params.is_empty() {
            return;
        }
        let rendered: Vec<String> = type_params
            .iter()
            .map(|p| match &p.bound {
                Some(bound) => format!("{} extends {}", p.name, bound),
                None => p.name.to_string(),
            })
            .collect();
        self.push(&format!("<{}>", rendered.join(", ")));
    }

    fn params(&mut self, params: &[Param]) {
        self.push("(");
        let mut in_named = false;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if param.kind == ParamKind::Named && !in_named {
                self.push("[");
                in_named = true;
            }
            self.param(param);
        }
        if in_named {
            self.push("]");
        }
        self.push(")");
    }

    fn param(&mut self, param: &Param) {
        self.modifiers(&param.modifiers);
        if let Some(type_ref) = &param.type_ref {
            self.push(&format!("{} ", type_ref));
        }
        if param.field_init {
            self.push("this.");
        }
        self.push(&param.name.name);
        if let Some(inner) = &param.function_params {
            self.params(inner);
        }
        if let Some(default) = &param.default_value {
            self.push(" = ");
            self.expr(default);
        }
    }

    fn block(&mut self, block: &Block) {
        self.push("{\n");
        self.indent();
        for stmt in &block.statements {
            self.stmt(stmt);
        }
        self.dedent();
        self.write_indent();
        self.push("}");
    }

    fn var_decl(&mut self, decl: &VarDeclStmt) {
        self.modifiers(&decl.modifiers);
        match &decl.type_ref {
            Some(type_ref) => self.push(&format!("{} ", type_ref)),
            None if decl.modifiers.is_empty() => self.push("var "),
            None => {}
        }
        self.variables(&decl.variables);
    }

    fn catch_param(&mut self, param: &CatchParam) {
        self.modifiers(&param.modifiers);
        match &param.type_ref {
            Some(type_ref) => self.push(&format!("{} ", type_ref)),
            None if param.modifiers.is_empty() => self.push("var "),
            None => {}
        }
        self.push(&param.name.name);
    }

    /// Statement written at the current indentation, ending with a newline
    fn stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        self.stmt_inline(stmt);
        self.push("\n");
    }

    fn stmt_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::Variable(decl) => {
                self.var_decl(decl);
                self.push(";");
            }
            Stmt::Function(f) => {
                if let Some(return_type) = &f.function.return_type {
                    self.push(&format!("{} ", return_type));
                }
                self.push(&f.name.name);
                self.params(&f.function.params);
                self.function_body(&f.function.body);
            }
            Stmt::If(s) => {
                self.push("if (");
                self.expr(&s.condition);
                self.push(") ");
                self.stmt_inline(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.push(" else ");
                    self.stmt_inline(else_branch);
                }
            }
            Stmt::For(s) => {
                self.push("for (");
                match s.init.as_deref() {
                    Some(Stmt::Variable(decl)) => self.var_decl(decl),
                    Some(Stmt::Expr(e)) => self.expr(&e.expr),
                    _ => {}
                }
                self.push("; ");
                if let Some(condition) = &s.condition {
                    self.expr(condition);
                }
                self.push("; ");
                for (i, update) in s.updates.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(update);
                }
                self.push(") ");
                self.stmt_inline(&s.body);
            }
            Stmt::ForIn(s) => {
                self.push("for (");
                match &s.target {
                    ForInTarget::Declaration(decl) => self.var_decl(decl),
                    ForInTarget::Identifier(id) => self.push(&id.name),
                }
                self.push(" in ");
                self.expr(&s.iterable);
                self.push(") ");
                self.stmt_inline(&s.body);
            }
            Stmt::While(s) => {
                self.push("while (");
                self.expr(&s.condition);
                self.push(") ");
                self.stmt_inline(&s.body);
            }
            Stmt::DoWhile(s) => {
                self.push("do ");
                self.stmt_inline(&s.body);
                self.push(" while (");
                self.expr(&s.condition);
                self.push(");");
            }
            Stmt::Switch(s) => {
                self.push("switch (");
                self.expr(&s.expr);
                self.push(") {\n");
                self.indent();
                for case in &s.cases {
                    for label in &case.labels {
                        self.writeln(&format!("{}:", label));
                    }
                    for value in &case.values {
                        self.write_indent();
                        self.push("case ");
                        self.expr(value);
                        self.push(":\n");
                    }
                    if case.is_default {
                        self.writeln("default:");
                    }
                    self.indent();
                    for stmt in &case.statements {
                        self.stmt(stmt);
                    }
                    self.dedent();
                }
                self.dedent();
                self.write_indent();
                self.push("}");
            }
            Stmt::Try(s) => {
                self.push("try ");
                self.block(&s.body);
                for catch in &s.catches {
                    self.push(" catch (");
                    self.catch_param(&catch.exception);
                    if let Some(trace) = &catch.trace {
                        self.push(", ");
                        self.catch_param(trace);
                    }
                    self.push(") ");
                    self.block(&catch.body);
                }
                if let Some(finally) = &s.finally {
                    self.push(" finally ");
                    self.block(finally);
                }
            }
            Stmt::Throw(s) => {
                self.push("throw");
                if let Some(value) = &s.value {
                    self.push(" ");
                    self.expr(value);
                }
                self.push(";");
            }
            Stmt::Return(s) => {
                self.push("return");
                if let Some(value) = &s.value {
                    self.push(" ");
                    self.expr(value);
                }
                self.push(";");
            }
            Stmt::Break(s) | Stmt::Continue(s) => {
                self.push(if matches!(stmt, Stmt::Break(_)) { "break" } else { "continue" });
                if let Some(label) = &s.label {
                    self.push(&format!(" {}", label));
                }
                self.push(";");
            }
            Stmt::Labeled(s) => {
                self.push(&format!("{}: ", s.label));
                self.stmt_inline(&s.body);
            }
            Stmt::Assert(s) => {
                self.push("assert(");
                self.expr(&s.condition);
                self.push(");");
            }
            Stmt::Expr(s) => {
                self.expr(&s.expr);
                self.push(";");
            }
            Stmt::Empty(_) => self.push(";"),
            Stmt::Error(error) => self.push(&format!("/* error: {} */", error.text)),
        }
    }

    fn args(&mut self, args: &[Expr]) {
        self.push("(");
        self.expr_list(args);
        self.push(")");
    }

    fn expr_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => match &lit.value {
                Literal::Integer(n) => self.push(&n.to_string()),
                Literal::Double(d) => self.push(&format!("{:?}", d)),
                Literal::String(s) => self.push(&quote(s)),
                Literal::Boolean(b) => self.push(&b.to_string()),
                Literal::Null => self.push("null"),
            },
            Expr::Interpolation(e) => {
                self.push("'");
                for part in &e.parts {
                    match part {
                        StringPart::Text(text) => self.push(&escape(text)),
                        StringPart::Expr(inner) => {
                            self.push("${");
                            self.expr(inner);
                            self.push("}");
                        }
                    }
                }
                self.push("'");
            }
            Expr::Identifier(id) => self.push(&id.name),
            Expr::This(_) => self.push("this"),
            Expr::Super(_) => self.push("super"),
            Expr::Paren(e) => {
                self.push("(");
                self.expr(&e.expr);
                self.push(")");
            }
            Expr::Unary(e) => {
                self.push(e.op.as_str());
                self.expr(&e.operand);
            }
            Expr::Postfix(e) => {
                self.expr(&e.operand);
                self.push(e.op.as_str());
            }
            Expr::Binary(e) => {
                self.push("(");
                self.expr(&e.left);
                self.push(&format!(" {} ", e.op));
                self.expr(&e.right);
                self.push(")");
            }
            Expr::Is(e) => {
                self.push("(");
                self.expr(&e.expr);
                self.push(&format!(" is {})", e.type_ref));
            }
            Expr::Assign(e) => {
                self.push("(");
                self.expr(&e.target);
                self.push(&format!(" {} ", e.op.as_str()));
                self.expr(&e.value);
                self.push(")");
            }
            Expr::Conditional(e) => {
                self.push("(");
                self.expr(&e.condition);
                self.push(" ? ");
                self.expr(&e.then_expr);
                self.push(" : ");
                self.expr(&e.else_expr);
                self.push(")");
            }
            Expr::PropertyAccess(e) => {
                self.expr(&e.target);
                self.push(&format!(".{}", e.name));
            }
            Expr::Index(e) => {
                self.expr(&e.target);
                self.push("[");
                self.expr(&e.index);
                self.push("]");
            }
            Expr::Invocation(e) => {
                if let Some(target) = &e.target {
                    self.expr(target);
                    self.push(".");
                }
                self.push(&e.name.name);
                self.args(&e.args);
            }
            Expr::Call(e) => {
                self.expr(&e.callee);
                self.args(&e.args);
            }
            Expr::New(e) => {
                self.push(if e.is_const { "const " } else { "new " });
                self.push(&e.type_ref.to_string());
                if let Some(constructor) = &e.constructor {
                    self.push(&format!(".{}", constructor));
                }
                self.args(&e.args);
            }
            Expr::List(e) => {
                if e.is_const {
                    self.push("const ");
                }
                if let Some(type_arg) = &e.type_arg {
                    self.push(&format!("<{}>", type_arg));
                }
                self.push("[");
                self.expr_list(&e.elements);
                self.push("]");
            }
            Expr::Map(e) => {
                if e.is_const {
                    self.push("const ");
                }
                if !e.type_args.is_empty() {
                    let args: Vec<String> = e.type_args.iter().map(|t| t.to_string()).collect();
                    self.push(&format!("<{}>", args.join(", ")));
                }
                self.push("{");
                for (i, entry) in e.entries.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(&entry.key);
                    self.push(": ");
                    self.expr(&entry.value);
                }
                self.push("}");
            }
            Expr::Function(e) => {
                if let Some(return_type) = &e.function.return_type {
                    self.push(&format!("{} ", return_type));
                }
                if let Some(name) = &e.name {
                    self.push(&name.name);
                }
                self.params(&e.function.params);
                self.function_body(&e.function.body);
            }
            Expr::Named(e) => {
                self.push(&format!("{}: ", e.name));
                self.expr(&e.value);
            }
            Expr::Error(error) => self.push(&format!("/* error: {} */", error.text)),
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn quote(text: &str) -> String {
    format!("'{}'", escape(text))
}
