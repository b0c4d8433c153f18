mod common;

use common::{parse, NestingChecker};
use quill::ast::*;

const SOURCE: &str = r#"
class Counter extends Base implements Comparable {
  static final int LIMIT = 10;
  int _count = 0;

  Counter(int start) : super(start), _count = start;

  int compareTo(other) => _count - other._count;

  void tick([int by = 1]) {
    for (int i = 0; i < by; i++) {
      if (_count >= LIMIT) {
        throw new OverflowError('at $_count');
      } else {
        _count += i * 2 + (by ~/ 2);
      }
    }
    var squares = [1, 4, 9].map((x) => x * x);
    label: while (true) { break label; }
    switch (_count) {
      case 0: print('zero'); break;
      default: print(_count is! int ? 'odd' : "${_count}");
    }
  }
}
"#;

#[test]
fn test_child_spans_nest_in_parents() {
    let (unit, diagnostics) = parse(SOURCE);
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    let mut checker = NestingChecker::default();
    checker.visit_unit(&unit);
    assert!(checker.visited > 50);
    assert!(checker.violations.is_empty(), "{:#?}", checker.violations);
}

#[test]
fn test_spans_cover_their_source_text() {
    let (unit, _) = parse(SOURCE);
    let class = unit.class("Counter").expect("Counter");
    assert!(class.span.source_text(SOURCE).starts_with("class Counter"));
    assert!(class.span.source_text(SOURCE).ends_with('}'));

    let tick = class.methods().find(|m| m.name.simple_name() == "tick").expect("tick");
    assert!(tick.span.source_text(SOURCE).starts_with("void tick"));
    assert!(tick.function.span.source_text(SOURCE).starts_with("([int by = 1])"));
    assert_eq!(tick.function.params[0].span.source_text(SOURCE), "int by = 1");
}

#[test]
fn test_locations_are_one_based() {
    let (unit, _) = parse("class A {}\n\nclass B {}");
    let b = unit.class("B").expect("B");
    assert_eq!((b.span.start.line, b.span.start.column), (3, 1));
    assert_eq!(b.name.span.to_string(), "3:7-8");
}

#[test]
fn test_split_shift_tokens_have_their_own_spans() {
    let source = "Map<String, List<int>> m;";
    let (unit, diagnostics) = parse(source);
    assert!(!diagnostics.has_errors());
    let Declaration::Variable(ref field) = unit.declarations[0] else { panic!("expected variable") };
    let outer = field.type_ref.as_ref().expect("type");
    let inner = &outer.type_args[1];
    assert_eq!(outer.span.source_text(source), "Map<String, List<int>>");
    assert!(inner.span.source_text(source).starts_with("List<int"));
    assert!(outer.span.encloses(inner.span));
}
