//! End-to-end tests driving the full pipeline: lex, parse, check and
//! evaluate whole programs through one session, the way the binary does.

use golite::{
    ast::types::Value,
    driver::{lex, parse, run, Session},
    errors::errors::ErrorImpl,
};

fn eval(source: &str) -> Result<Vec<Value>, golite::errors::errors::Error> {
    let mut session = Session::new();
    run(source, Some(String::from("test.gol")), &mut session)
}

#[test]
fn test_program_with_all_statement_forms() {
    let source = "\
var limit int64 = 10
var total int64

for i := 0; i < limit; i++ {
    if i % 2 == 0 {
        continue
    }
    if i == 7 {
        break
    }
    total = total + i
}

// 1 + 3 + 5
total
";
    assert_eq!(eval(source).unwrap(), vec![Value::Int64(9)]);
}

#[test]
fn test_hex_and_scientific_literals() {
    assert_eq!(eval("0x1234\n").unwrap(), vec![Value::Int64(4660)]);
    assert_eq!(eval("0xFF + 1\n").unwrap(), vec![Value::Int64(256)]);

    // 1e3 and 8e1 lex as floats; the language has no float type, so using
    // them in an expression is rejected downstream, not by the lexer.
    for source in ["1e3\n", "8e1\n"] {
        let error = eval(source).unwrap_err();
        assert_eq!(error.get_error_name(), "SyntaxError", "for {:?}", source);
    }

    for source in ["18e3\n", "0e1\n", "00\n", "00.3\n", "3e3.6\n"] {
        let error = eval(source).unwrap_err();
        assert!(
            matches!(error.get_impl(), ErrorImpl::MalformedNumber { .. }),
            "expected MalformedNumber for {:?}",
            source
        );
    }
}

#[test]
fn test_session_persists_across_inputs() {
    // One session, several inputs, as in the REPL.
    let mut session = Session::new();

    assert_eq!(
        run("var x int32 = 40\n", None, &mut session).unwrap(),
        vec![]
    );
    assert_eq!(
        run("x + 2\n", None, &mut session).unwrap(),
        vec![Value::Int32(42)]
    );

    // A failed statement leaves earlier declarations intact.
    assert!(run("var x int32\n", None, &mut session).is_err());
    assert_eq!(
        run("x\n", None, &mut session).unwrap(),
        vec![Value::Int32(42)]
    );
}

#[test]
fn test_statements_run_before_later_lines_are_seen() {
    // The third line is a syntax error; the first two still execute.
    let mut session = Session::new();
    let mut parser = parse(lex("var x int64 = 5\nx\nvar := broken\n", None));

    let mut echoed = vec![];
    let error = loop {
        match parser.next_stmt() {
            Ok(Some(stmt)) => {
                if let Some(value) = session.evaluate(&stmt).unwrap() {
                    echoed.push(value);
                }
            }
            Ok(None) => panic!("expected the third line to fail"),
            Err(error) => break error,
        }
    };

    assert_eq!(echoed, vec![Value::Int64(5)]);
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_error_taxonomy_end_to_end() {
    let cases = [
        ("var a = \n", "SyntaxError"),
        ("===\n", "SyntaxError"),
        ("var a int64\nvar a int64\n", "Conflict"),
        ("missing\n", "SymbolNotFound"),
        ("var a int16 = 99999\n", "InvalidOperation"),
        ("var a int32 = 1\nvar b int64 = 2\na + b\n", "InvalidOperation"),
        ("if 1 {\n}\n", "InvalidOperation"),
        ("break\n", "InvalidOperation"),
    ];

    for (source, expected) in cases {
        let error = eval(source).unwrap_err();
        assert_eq!(error.get_error_name(), expected, "for {:?}", source);
    }
}

#[test]
fn test_shadowing_and_scope_lifetime() {
    let source = "\
var x int64 = 1
{
    var x int64 = 10
    x
}
x
";
    assert_eq!(
        eval(source).unwrap(),
        vec![Value::Int64(10), Value::Int64(1)]
    );
}

#[test]
fn test_nested_loops() {
    let source = "\
var total int64 = 0
for i := 0; i < 3; i++ {
    for j := 0; j < 3; j++ {
        if j > i {
            break
        }
        total = total + 1
    }
}
total
";
    // 1 + 2 + 3 iterations survive the inner break.
    assert_eq!(eval(source).unwrap(), vec![Value::Int64(6)]);
}

#[test]
fn test_constant_folding_meets_runtime_values() {
    // 2 * 3 folds at check time; the remaining addition runs against the
    // variable at its declared width.
    assert_eq!(
        eval("var x int16 = 100\nx + 2 * 3\n").unwrap(),
        vec![Value::Int16(106)]
    );
}

#[test]
fn test_echo_is_top_level_only() {
    // Bare expressions inside blocks evaluate but are not surfaced.
    assert_eq!(eval("{\n    1 + 1\n    2 + 2;\n}\n").unwrap(), vec![]);
}

#[test]
fn test_division_semantics() {
    assert_eq!(eval("7 / 2\n").unwrap(), vec![Value::Int64(3)]);
    assert_eq!(eval("-7 / 2\n").unwrap(), vec![Value::Int64(-3)]);
    assert_eq!(eval("-7 % 2\n").unwrap(), vec![Value::Int64(-1)]);

    let error = eval("1 / 0\n").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::DivisionByZero));
}

#[test]
fn test_unused_string_literals_are_lexed() {
    // Strings lex fine; there is just no expression position for them yet.
    let error = eval("\"hello\"\n").unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxError");
}
