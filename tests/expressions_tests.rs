use quill::ast::*;
use quill::parser::{Diagnostics, ErrorCode};

fn parse(source: &str) -> (Expr, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let expr = quill::parse_expression(source, &mut diagnostics);
    (expr, diagnostics)
}

fn render(source: &str) -> String {
    let (expr, diagnostics) = parse(source);
    assert!(!diagnostics.has_errors(), "{}: {:?}", source, diagnostics.errors());
    AstPrinter::expr_to_string(&expr)
}

#[test]
fn test_precedence_of_assignment_value() {
    let (expr, diagnostics) = parse("x = 1 + 2 * 3");
    assert!(!diagnostics.has_errors());
    let Expr::Assign(assign) = expr else { panic!("expected assignment") };
    assert_eq!(assign.op, AssignOp::Assign);
    let Expr::Binary(sum) = *assign.value else { panic!("expected addition") };
    assert_eq!(sum.op, BinaryOp::Add);
    assert!(matches!(*sum.right, Expr::Binary(ref product) if product.op == BinaryOp::Mul));
}

#[test]
fn test_negated_type_test() {
    let (expr, diagnostics) = parse("a is! B");
    assert!(!diagnostics.has_errors());
    let Expr::Unary(not) = expr else { panic!("expected negation") };
    assert_eq!(not.op, UnaryOp::Not);
    let Expr::Is(test) = *not.operand else { panic!("expected type test") };
    assert_eq!(test.type_ref.name, "B");
    assert_eq!(test.span, not.span);
}

#[test]
fn test_chained_type_test_is_reported_once() {
    let (expr, diagnostics) = parse("a is B is C");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::NonChainableOperator]);
    assert!(matches!(expr, Expr::Is(_)));
}

#[test]
fn test_chained_equality_is_reported() {
    let (_, diagnostics) = parse("a == b == c");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::NonChainableOperator]);
    let (_, diagnostics) = parse("a == b && c == d");
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_generic_type_arguments_in_new() {
    assert_eq!(render("new List<List<int>>()"), "new List<List<int>>()");
    assert_eq!(render("new Map<String, List<int>>.from(m)"), "new Map<String, List<int>>.from(m)");
}

#[test]
fn test_shift_after_comparison() {
    assert_eq!(render("a < b >> c"), "(a < (b >> c))");
    assert_eq!(render("a >>> 2 > b"), "((a >>> 2) > b)");
}

#[test]
fn test_typed_and_const_literals() {
    assert_eq!(render("<int>[1, 2]"), "<int>[1, 2]");
    assert_eq!(render("const [1]"), "const [1]");
    let (expr, _) = parse("<String, int>{'a': 1}");
    let Expr::Map(map) = expr else { panic!("expected map") };
    assert_eq!(map.type_args.len(), 2);
    assert_eq!(map.entries.len(), 1);
}

#[test]
fn test_function_literals() {
    let (expr, diagnostics) = parse("(a, b) => a + b");
    assert!(!diagnostics.has_errors());
    let Expr::Function(f) = expr else { panic!("expected function literal") };
    assert!(f.name.is_none());
    assert_eq!(f.function.params.len(), 2);
    assert!(matches!(f.function.body, FunctionBody::Arrow(_)));

    let (expr, diagnostics) = parse("int twice(x) { return x * 2; }");
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    let Expr::Function(f) = expr else { panic!("expected named function literal") };
    assert_eq!(f.name.map(|n| n.name).as_deref(), Some("twice"));
}

#[test]
fn test_parenthesized_is_not_function() {
    let (expr, diagnostics) = parse("(a + b) * c");
    assert!(!diagnostics.has_errors());
    let Expr::Binary(product) = expr else { panic!("expected product") };
    assert_eq!(product.op, BinaryOp::Mul);
    assert!(matches!(*product.left, Expr::Paren(_)));
}

#[test]
fn test_named_arguments() {
    let (expr, _) = parse("f(1, label: 'x')");
    let Expr::Invocation(call) = expr else { panic!("expected invocation") };
    assert_eq!(call.args.len(), 2);
    assert!(matches!(call.args[1], Expr::Named(ref named) if named.name.name == "label"));
}

#[test]
fn test_prefix_and_postfix() {
    assert_eq!(render("-a++"), "-a++");
    assert_eq!(render("!~x"), "!~x");
    assert_eq!(render("--a.b"), "--a.b");
}

#[test]
fn test_numbers() {
    assert_eq!(render("0x1F"), "31");
    assert_eq!(render("1.5"), "1.5");
    let (_, diagnostics) = parse("0xFFFFFFFFFFFFFFFFFFFF");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::InvalidNumber]);
}

#[test]
fn test_unterminated_interpolation() {
    let (expr, diagnostics) = parse("'a${b'");
    assert!(diagnostics.has_errors());
    assert!(matches!(expr, Expr::Interpolation(_) | Expr::Literal(_)));
}

#[test]
fn test_missing_operand_yields_error_node() {
    let (expr, diagnostics) = parse("a + ");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::UnexpectedEndOfInput]);
    let Expr::Binary(binary) = expr else { panic!("expected binary") };
    assert!(matches!(*binary.right, Expr::Error(_)));
}
