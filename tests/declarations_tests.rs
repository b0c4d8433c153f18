mod common;

use common::{error_codes, parse};
use quill::ast::*;
use quill::parser::ErrorCode;

#[test]
fn test_empty_class() {
    let (unit, diagnostics) = parse("class A { }");
    assert!(diagnostics.all().is_empty());
    assert_eq!(unit.declarations.len(), 1);
    let class = unit.class("A").expect("class A");
    assert!(class.superclass.is_none());
    assert!(class.members.is_empty());
}

#[test]
fn test_library_unit() {
    let source = r#"
#library('shapes');
#import('dart:core');
#source('circle.ql');

interface Shape extends Comparable factory ShapeFactory {
  Shape(num size);
  num get area;
}

class Circle implements Shape {
  static final num PI = 3.14159;
  final num radius;

  const Circle(this.radius);
  Circle.unit() : this(1);

  num get area => PI * radius * radius;
  bool operator ==(other) => other is Circle && other.radius == radius;
  String toString() => 'Circle($radius)';
}

typedef bool Predicate<T>(T value);

Circle biggest(List<Circle> circles) {
  Circle best = null;
  for (final c in circles) {
    if (best == null || c.area > best.area) best = c;
  }
  return best;
}

var defaultCircle = new Circle(1);
"#;
    let (unit, diagnostics) = parse(source);
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    assert_eq!(unit.directives.len(), 3);
    assert_eq!(
        unit.declarations.iter().map(|d| d.name().unwrap_or("?")).collect::<Vec<_>>(),
        vec!["Shape", "Circle", "Predicate", "biggest", "defaultCircle"]
    );

    let shape = unit.class("Shape").expect("Shape");
    assert!(shape.is_interface);
    assert_eq!(shape.default_class.as_ref().map(|t| t.name.as_str()), Some("ShapeFactory"));

    let circle = unit.class("Circle").expect("Circle");
    assert_eq!(circle.fields().count(), 2);
    let methods: Vec<&MethodDecl> = circle.methods().collect();
    assert_eq!(methods.len(), 5);
    assert!(methods[0].has_modifier(Modifier::Const));
    assert!(methods[0].function.params[0].field_init);
    assert!(methods[1].initializers[0].kind.is_redirect());
    assert!(methods[2].has_modifier(Modifier::Getter));
    assert_eq!(methods[3].name.simple_name(), "==");
    assert_eq!(unit.functions().count(), 1);
}

#[test]
fn test_top_level_accessors() {
    let (unit, diagnostics) = parse("int get answer => 42;\nset answer(value) { }");
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    let accessors: Vec<&MethodDecl> = unit.functions().collect();
    assert_eq!(accessors.len(), 2);
    assert!(accessors[0].has_modifier(Modifier::Getter));
    assert!(accessors[1].has_modifier(Modifier::Setter));
}

#[test]
fn test_native_members() {
    let (unit, diagnostics) = parse("class Window native \"*DOMWindow\" { int get length() native; alert(msg) native \"alert\"; }");
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    let window = unit.class("Window").expect("Window");
    assert_eq!(window.native_name.as_deref(), Some("*DOMWindow"));
    let bodies: Vec<&FunctionBody> = window.methods().map(|m| &m.function.body).collect();
    assert_eq!(bodies, vec![&FunctionBody::Native(None), &FunctionBody::Native(Some("alert".to_string()))]);
}

#[test]
fn test_factory_modifier_rules() {
    assert!(error_codes("class A { factory A() => null; }").is_empty());
    assert!(error_codes("class A { static factory A() => null; }").contains(&ErrorCode::IllegalModifierCombination));
    assert!(error_codes("class A { factory x; }").contains(&ErrorCode::IllegalModifier));
    assert!(error_codes("static f() { }").contains(&ErrorCode::IllegalModifier));
}

#[test]
fn test_named_parameters_in_setter() {
    assert!(error_codes("class A { set x([v]) { } }").contains(&ErrorCode::NamedParameterNotAllowed));
}

#[test]
fn test_field_initializer_with_this() {
    let (unit, diagnostics) = parse("class P { var x; P() : this.x = 1; }");
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    let ctor = unit.class("P").and_then(|c| c.methods().next()).expect("constructor");
    assert!(matches!(
        ctor.initializers[0].kind,
        InitializerKind::Field { ref name, .. } if name.name == "x"
    ));
}

#[test]
fn test_super_named_initializer() {
    let (unit, diagnostics) = parse("class B extends A { B() : super.named(1, 2); }");
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    let ctor = unit.class("B").and_then(|c| c.methods().next()).expect("constructor");
    let InitializerKind::Super { name, args } = &ctor.initializers[0].kind else { panic!("expected super call") };
    assert_eq!(name.as_ref().map(|n| n.name.as_str()), Some("named"));
    assert_eq!(args.len(), 2);
}

#[test]
fn test_stray_semicolons_warn() {
    let (unit, diagnostics) = parse("class A { };\n;");
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warnings().len(), 2);
    assert_eq!(unit.declarations.len(), 1);
}

#[test]
fn test_modifier_errors_survive_a_broken_body() {
    let codes = error_codes("class A { static abstract f() { x = ; } }");
    assert!(codes.contains(&ErrorCode::IllegalModifierCombination), "{:?}", codes);
    assert!(codes.contains(&ErrorCode::UnexpectedToken), "{:?}", codes);

    let codes = error_codes("class A { get x(a) { y = ; } }");
    assert!(codes.contains(&ErrorCode::GetterHasParameters), "{:?}", codes);

    let codes = error_codes("class A { set x(a, b) { broken( } }");
    assert!(codes.contains(&ErrorCode::SetterParameterCount), "{:?}", codes);

    let codes = error_codes("class A { operator +([o]) { broken( } }");
    assert!(codes.contains(&ErrorCode::NamedParameterNotAllowed), "{:?}", codes);

    let codes = error_codes("class A { A() : this(2) { z = ; } }");
    assert!(codes.contains(&ErrorCode::RedirectWithBody), "{:?}", codes);
}

#[test]
fn test_field_modifier_errors_survive_a_broken_initializer() {
    let codes = error_codes("class A { abstract var x = ; }");
    assert!(codes.contains(&ErrorCode::IllegalModifier), "{:?}", codes);
}
