mod common;

use common::{parse, parse_diet};
use quill::ast::*;

const LIBRARY: &str = r#"
class Stack<T> {
  List<T> _items;
  Stack() : _items = <T>[];

  void push(T item) { _items.add(item); }
  T pop() {
    if (_items.isEmpty()) throw new StateError('empty');
    return _items.removeLast();
  }
  int get length => _items.length;
  T operator [](int i) => _items[i];
}

main() {
  var s = new Stack<int>();
  s.push(1);
  print(s.pop());
}
"#;

#[test]
fn test_garbage_body_is_skipped() {
    let (unit, diagnostics) = parse_diet("class A { foo() { garbage garbage garbage } }");
    assert!(diagnostics.all().is_empty(), "{:?}", diagnostics.all());
    let class = unit.class("A").expect("class A");
    let methods: Vec<&MethodDecl> = class.methods().collect();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].name.simple_name(), "foo");
    let FunctionBody::Block(ref body) = methods[0].function.body else { panic!("expected skipped block") };
    assert!(body.statements.is_empty());
}

#[test]
fn test_garbage_body_fails_full_parse() {
    let (_, diagnostics) = parse("class A { foo() { garbage garbage garbage } }");
    assert!(diagnostics.has_errors());
}

#[test]
fn test_outline_matches_full_parse() {
    let (full, full_diagnostics) = parse(LIBRARY);
    let (diet, diet_diagnostics) = parse_diet(LIBRARY);
    assert!(!full_diagnostics.has_errors(), "{:?}", full_diagnostics.errors());
    assert!(!diet_diagnostics.has_errors(), "{:?}", diet_diagnostics.errors());
    assert_eq!(AstPrinter::outline(&full), AstPrinter::outline(&diet));
    assert_eq!(
        AstPrinter::outline(&diet),
        vec![
            "class Stack",
            "  field _items",
            "  Stack()",
            "  push(item)",
            "  pop()",
            "  length()",
            "  operator [](i)",
            "main()",
        ]
    );
}

#[test]
fn test_diet_keeps_initializers_and_skips_arrow_bodies() {
    let (diet, _) = parse_diet(LIBRARY);
    let class = diet.class("Stack").expect("Stack");
    let methods: Vec<&MethodDecl> = class.methods().collect();
    assert_eq!(methods[0].initializers.len(), 1);
    let getter = methods.iter().find(|m| m.has_modifier(Modifier::Getter)).expect("getter");
    assert!(matches!(getter.function.body, FunctionBody::Block(ref b) if b.statements.is_empty()));
}

#[test]
fn test_nested_braces_in_skipped_body() {
    let (unit, diagnostics) = parse_diet("f() { if (a) { b(); } else { var m = {'k': 1}; } }\ng() { }");
    assert!(!diagnostics.has_errors());
    assert_eq!(unit.functions().count(), 2);
}

#[test]
fn test_unclosed_body_reaches_end_of_input() {
    let (unit, diagnostics) = parse_diet("class A { foo() { bar(");
    assert!(diagnostics.has_errors());
    assert_eq!(unit.classes().count(), 1);
}
