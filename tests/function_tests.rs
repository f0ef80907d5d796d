// Integration tests for the function parser and writer

use ggadam::harness::run_function_parser_test;
use ggadam::parser::ast::*;
use ggadam::parser::lexer::{is_keyword, KEYWORDS};
use ggadam::parser::{parse_expression, parse_functions};
use ggadam::writer::{write_expression, write_function};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const FIXTURE: &str = include_str!("data/function_parser_test.fn");

#[test]
fn test_square_end_to_end() {
    let source = "square(x) {\n  return x * x;\n}";

    let functions = parse_functions(source, "square.fn").expect("Parsing failed");

    assert_eq!(functions.len(), 1);
    let square = &functions["square"];
    assert_eq!(square.parameters, ["x"]);
    assert_eq!(square.statements.len(), 1);
    assert_eq!(write_function(square), "square (x) {\n    return x * x;\n}");
}

#[test]
fn test_two_functions_in_either_order() {
    let a = "first(a) { return a; }";
    let b = "second(b, c) { return b + c; }";

    let forward = parse_functions(&format!("{}\n{}", a, b), "two.fn").unwrap();
    let backward = parse_functions(&format!("{}\n{}", b, a), "two.fn").unwrap();

    assert_eq!(forward.len(), 2);
    assert!(forward.contains_key("first"));
    assert!(forward.contains_key("second"));
    assert_eq!(forward, backward);
}

#[test]
fn test_unbalanced_brace_fails() {
    assert!(parse_functions("f() {", "bad.fn").is_err());
    assert!(parse_functions("f() { if (x) { return 1; }", "bad.fn").is_err());
    assert!(parse_functions("f() { } }", "bad.fn").is_err());
}

#[test]
fn test_extreme_number_literals() {
    let err = parse_functions("f() { return 1e999; }", "big.fn").unwrap_err();
    assert!(err.message.contains("out of range"), "{}", err.message);

    let source = "f() { return 1.7976931348623157e308 + 5e-324 + 2.5E+20; }";
    let mut out = Vec::new();
    let report = run_function_parser_test(source, "big.fn", &mut out).unwrap();
    assert!(report.passed(), "{:?}", report.round_trip_failures);
}

#[test]
fn test_deep_nesting_fails_cleanly() {
    let source = format!("f() {{ return {}1; }}", "(".repeat(5000));
    let err = parse_functions(&source, "deep.fn").unwrap_err();
    assert_eq!(err.message, "Expression nested too deeply");

    let mut out = Vec::new();
    let report = run_function_parser_test(&source, "deep.fn", &mut out).unwrap();
    assert!(!report.passed());
}

#[test]
fn test_fixture_parses() {
    let functions = parse_functions(FIXTURE, "function_parser_test.fn").expect("Parsing failed");

    assert_eq!(functions.len(), 21);
    assert!(functions["empty_fn"].statements.is_empty());
    assert_eq!(functions["nested_ifs_fn"].parameters, ["x", "y", "z"]);
    assert!(matches!(
        functions["sum_until"].statements[1],
        Statement::ComplexFor { .. }
    ));
    assert!(matches!(
        functions["slow_dict_size"].statements[1],
        Statement::SimpleFor { value: Some(_), .. }
    ));
}

#[test]
fn test_fixture_round_trips() {
    let functions = parse_functions(FIXTURE, "function_parser_test.fn").unwrap();

    for function in functions.values() {
        let written = write_function(function);
        let reparsed = parse_functions(&written, "written.fn")
            .unwrap_or_else(|e| panic!("{}\n{}", e, written));
        assert_eq!(&reparsed[&function.name], function, "{}", written);

        // Writing is a fixed point after one pass
        assert_eq!(write_function(&reparsed[&function.name]), written);
    }
}

#[test]
fn test_harness_on_fixture() {
    let mut out = Vec::new();
    let report = run_function_parser_test(FIXTURE, "function_parser_test.fn", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(report.passed(), "{:?}", report.round_trip_failures);
    assert_eq!(report.function_count, 21);
    assert!(text.contains("\nPASS\n21 functions\n"));
    assert!(text.contains("chained_ifs_fn (x, y, z) {\n    if (x)\n        return 0;\n    else if (y)"));
    assert!(text.ends_with("round trip: PASS\n"));
}

#[test]
fn test_free_variables() {
    let functions = parse_functions(FIXTURE, "function_parser_test.fn").unwrap();

    let names = |f: &str| -> Vec<String> { functions[f].free_variables().into_iter().collect() };

    assert!(names("shadowed_param_1_fn").is_empty());
    assert!(names("slow_size").is_empty());
    assert_eq!(names("const_cell_fn"), ["const_cell"]);
    assert_eq!(names("assign_cell_2_fn"), ["interface_cell"]);
    assert!(names("sum_until").is_empty());
}

// ===== Round-trip law over generated ASTs =====

fn arb_ident() -> impl Strategy<Value = String> + Clone {
    "[a-z_][a-z0-9_]{0,5}".prop_filter("keywords are not identifiers", |s| !is_keyword(s))
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_ident(),
        1 => prop::sample::select(KEYWORDS).prop_map(str::to_string),
    ]
}

fn arb_binop() -> impl Strategy<Value = BinOp> {
    prop::sample::select(vec![
        BinOp::Or,
        BinOp::And,
        BinOp::Eq,
        BinOp::Ne,
        BinOp::Lt,
        BinOp::Le,
        BinOp::Gt,
        BinOp::Ge,
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
    ])
}

fn arb_expr() -> impl Strategy<Value = Expr> + Clone {
    let leaf = prop_oneof![
        Just(Expr::Empty),
        any::<bool>().prop_map(Expr::Bool),
        (0u32..10_000).prop_map(|n| Expr::Number(f64::from(n) / 4.0)),
        (prop::num::f64::POSITIVE
            | prop::num::f64::ZERO
            | prop::num::f64::NORMAL
            | prop::num::f64::SUBNORMAL)
            .prop_map(Expr::Number),
        "[a-z '\"]{0,6}".prop_map(Expr::String),
        arb_name().prop_map(Expr::Name),
        arb_ident().prop_map(Expr::Variable),
    ];

    leaf.prop_recursive(4, 48, 4, |inner| {
        let named = prop::collection::vec((arb_ident(), inner.clone()), 1..3);
        prop_oneof![
            (prop::sample::select(vec![UnOp::Neg, UnOp::Not]), inner.clone()).prop_map(
                |(op, operand)| Expr::Unary {
                    op,
                    operand: Box::new(operand),
                }
            ),
            (arb_binop(), inner.clone(), inner.clone()).prop_map(|(op, left, right)| {
                Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, t, e)| Expr::Ternary {
                condition: Box::new(c),
                then_expr: Box::new(t),
                else_expr: Box::new(e),
            }),
            (inner.clone(), inner.clone()).prop_map(|(target, index)| Expr::Index {
                target: Box::new(target),
                index: Box::new(index),
            }),
            (arb_ident(), prop::collection::vec(inner.clone(), 0..3)).prop_map(|(name, args)| {
                Expr::Call {
                    name,
                    args: CallArgs::Positional(args),
                }
            }),
            (arb_ident(), named.clone()).prop_map(|(name, args)| Expr::Call {
                name,
                args: CallArgs::Named(args),
            }),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Expr::Array),
            prop::collection::vec((arb_ident(), inner), 0..3).prop_map(Expr::Dictionary),
        ]
    })
}

fn arb_statement() -> impl Strategy<Value = Statement> {
    let simple = prop_oneof![
        (arb_ident(), prop::option::of(arb_expr()))
            .prop_map(|(name, init)| Statement::Decl { name, init }),
        (arb_ident(), prop::option::of(arb_expr()))
            .prop_map(|(name, init)| Statement::ConstDecl { name, init }),
        (arb_ident(), arb_expr()).prop_map(|(name, value)| Statement::Assign { name, value }),
        arb_expr().prop_map(Statement::Return),
        Just(Statement::Continue),
        Just(Statement::Break),
    ];

    simple.prop_recursive(3, 24, 3, |inner| {
        let body = prop::collection::vec(inner, 0..3);
        let bindings = prop::collection::vec((arb_ident(), arb_expr()), 1..3);
        prop_oneof![
            (arb_expr(), body.clone(), body.clone()).prop_map(|(condition, then_branch, else_branch)| {
                Statement::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }),
            (arb_ident(), prop::option::of(arb_ident()), arb_expr(), body.clone()).prop_map(
                |(key, value, sequence, body)| Statement::SimpleFor {
                    key,
                    value,
                    sequence,
                    body,
                }
            ),
            (bindings.clone(), arb_expr(), bindings, body).prop_map(
                |(decls, condition, updates, body)| Statement::ComplexFor {
                    decls,
                    condition,
                    updates,
                    body,
                }
            ),
        ]
    })
}

fn arb_function() -> impl Strategy<Value = AdamFunction> {
    (
        arb_ident(),
        prop::collection::vec(arb_ident(), 0..3),
        prop::collection::vec(arb_statement(), 0..4),
    )
        .prop_map(|(name, parameters, statements)| AdamFunction::new(name, parameters, statements))
}

proptest! {
    #[test]
    fn prop_expression_round_trip(expr in arb_expr()) {
        let written = write_expression(&expr);
        let reparsed = parse_expression(&written, "prop.fn");
        prop_assert!(reparsed.is_ok(), "{}: {:?}", written, reparsed);
        prop_assert_eq!(reparsed.unwrap(), expr, "{}", written);
    }

    #[test]
    fn prop_function_round_trip(function in arb_function()) {
        let written = write_function(&function);
        let reparsed = parse_functions(&written, "prop.fn");
        prop_assert!(reparsed.is_ok(), "{}: {:?}", written, reparsed);
        let reparsed = reparsed.unwrap();
        prop_assert_eq!(reparsed.len(), 1);
        prop_assert_eq!(&reparsed[&function.name], &function, "{}", written);
    }
}
