mod common;

use common::{error_codes, init_logging, parse, parse_with, NestingChecker};
use quill::ast::*;
use quill::parser::{Diagnostics, ErrorCode, Parser};
use quill::ParserConfig;

#[test]
fn test_stray_tokens_between_declarations() {
    let (unit, diagnostics) = parse("class A { } ); class B { }");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::ExpectedDeclaration]);
    assert!(unit.class("A").is_some());
    assert!(unit.class("B").is_some());
    assert!(matches!(unit.declarations[1], Declaration::Error(ref e) if e.text == ") ;"));
}

#[test]
fn test_stray_close_brace_at_top_level() {
    let (unit, diagnostics) = parse("} class A { }");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::ExpectedDeclaration]);
    assert!(unit.class("A").is_some());
}

#[test]
fn test_unclosed_class_body() {
    let (unit, diagnostics) = parse("class A { foo() { bar(); }");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::ExpectedToken]);
    assert_eq!(unit.class("A").map(|c| c.members.len()), Some(1));
}

#[test]
fn test_bad_member_is_captured() {
    let (unit, diagnostics) = parse("class A { + 1; int x; }");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::ExpectedClassMember]);
    let class = unit.class("A").expect("class A");
    assert_eq!(class.fields().count(), 1);
}

#[test]
fn test_missing_semicolon_resumes_at_next_statement_end() {
    let (unit, diagnostics) = parse("main() { var a = 1 var b = 2; return a; }");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::ExpectedToken]);
    let main = unit.functions().next().expect("main");
    let FunctionBody::Block(ref body) = main.function.body else { panic!("expected block body") };
    assert!(matches!(body.statements.last(), Some(Stmt::Return(_))));
}

#[test]
fn test_directive_rules() {
    assert_eq!(error_codes("class A {} #import('x');"), vec![ErrorCode::DirectiveAfterDeclaration]);
    let (unit, diagnostics) = parse("#foo('x');\n#source('y.ql');");
    assert_eq!(diagnostics.codes(), vec![ErrorCode::UnknownDirective]);
    assert_eq!(unit.directives.len(), 1);
}

#[test]
fn test_errors_are_reported_in_source_order() {
    let (_, diagnostics) = parse("class A { ) }\nclass B extends { }\nf( { }\nvar = 3;");
    let offsets: Vec<usize> = diagnostics.errors().iter().map(|d| d.location.offset).collect();
    assert!(!offsets.is_empty());
    assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{:?}", offsets);
}

#[test]
fn test_error_cap() {
    let source = "class A { ) }\n".repeat(5);
    let (_, diagnostics) = parse(&source);
    assert_eq!(diagnostics.errors().len(), 5);

    let config = ParserConfig::default().with_max_errors(3);
    let (unit, diagnostics) = parse_with(&source, &config);
    assert_eq!(diagnostics.errors().len(), 3);
    assert_eq!(unit.classes().count(), 5);
}

const HOSTILE_INPUTS: &[&str] = &[
    "",
    "}}}}",
    "((((",
    "class",
    "class {",
    "interface",
    "#",
    "#import(",
    ")]}",
    "a b c d",
    "f() { if (x",
    "class A { operator }",
    "class A { get }",
    "typedef",
    "x = <<<>>>;",
    "main() { for (var x in ) }",
    "main() { switch (x) { case 1: default: case } }",
    "'${'${'",
    "class A { A() : this(), super(); }",
    "f() { x = 1 + ; }",
    "f() { x = 1 +   }",
    "class A { f() { if (x } }",
    "class A { static abstract f() { x = ; } }",
    "main() { var m = {'a': , }; print(m[); }",
    "class A extends B implements { int get => ; }",
];

#[test]
fn test_hostile_inputs_terminate_with_balanced_frames() {
    init_logging();
    for input in HOSTILE_INPUTS.iter().copied() {
        for diet in [false, true] {
            let config = ParserConfig::default().with_diet(diet);
            let mut parser = Parser::new(input, config, Diagnostics::new());
            let unit = parser.parse_unit();
            assert_eq!(parser.depth(), 0, "unbalanced frames for {:?}", input);
            assert!(unit.span.end.offset <= input.len());
        }
    }
}

#[test]
fn test_malformed_input_spans_still_nest() {
    for input in HOSTILE_INPUTS.iter().copied() {
        for diet in [false, true] {
            let config = ParserConfig::default().with_diet(diet);
            let (unit, _) = parse_with(input, &config);
            let violations = NestingChecker::violations_in(&unit);
            assert!(violations.is_empty(), "{:?} (diet: {}): {:#?}", input, diet, violations);
        }
    }
}

#[test]
fn test_empty_operand_stays_inside_its_statement() {
    let source = "f() { x = 1 + ; }";
    let (unit, diagnostics) = parse(source);
    assert!(diagnostics.has_errors());
    let f = unit.functions().next().expect("f");
    let FunctionBody::Block(ref body) = f.function.body else { panic!("expected block body") };
    let stmt = body.statements.first().expect("statement");
    assert!(body.span.encloses(stmt.span()));
    assert!(stmt.span().source_text(source).starts_with("x = 1 +"));
}

#[test]
fn test_warnings_respect_the_diagnostic_limit() {
    let config = ParserConfig::default().with_max_errors(2);
    let (unit, diagnostics) = parse_with("class A { ; ; ; ; ; ; int x; }", &config);
    assert_eq!(diagnostics.warnings().len(), 2);
    assert!(!diagnostics.has_errors());
    assert_eq!(unit.class("A").map(|c| c.fields().count()), Some(1));

    let (_, diagnostics) = parse("class A { ; ; ; ; ; ; int x; }");
    assert_eq!(diagnostics.warnings().len(), 6);
}

#[test]
fn test_lookahead_bound_keeps_parsing() {
    let nested = format!("f() {{ {}x{} y = 1; }}", "List<".repeat(30), ">".repeat(30));
    let config = ParserConfig::default().with_max_lookahead(16);
    let (unit, _) = parse_with(&nested, &config);
    assert_eq!(unit.functions().count(), 1);
}
