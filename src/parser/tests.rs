//! Unit tests for the parser module.
//!
//! Covers statement dispatch, the expression precedence ladder, the three
//! loop forms, statement termination, echo flags, increment desugaring and
//! round-tripping through the pretty-printer.

use crate::{
    ast::{
        expressions::{BinOp, Expr, LogicalOp, UnaryOp},
        statements::Stmt,
        types::BasicKind,
    },
    errors::errors::ErrorImpl,
    lexer::lexer::Lexer,
};

use super::parser::{parse_all, Parser};

fn parse_one(source: &str) -> Stmt {
    let mut statements = parse_all(source, None).unwrap();
    assert_eq!(statements.len(), 1, "expected one statement in {:?}", source);
    statements.remove(0)
}

fn parse_expr_stmt(source: &str) -> Expr {
    match parse_one(source) {
        Stmt::Expr(s) => s.expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_parser_is_incremental() {
    // The second line is syntactically broken, but the first statement
    // parses fine because nothing past its newline has been pulled.
    let mut parser = Parser::new(Lexer::new("var a int32\nvar :=\n", None));

    let first = parser.next_stmt().unwrap();
    assert!(matches!(first, Some(Stmt::VarDecl(_))));

    assert!(parser.next_stmt().is_err());
}

#[test]
fn test_next_stmt_none_at_end() {
    let mut parser = Parser::new(Lexer::new("1\n", None));
    assert!(parser.next_stmt().unwrap().is_some());
    assert!(parser.next_stmt().unwrap().is_none());
    assert!(parser.next_stmt().unwrap().is_none());
}

#[test]
fn test_var_decl_forms() {
    match parse_one("var a int32\n") {
        Stmt::VarDecl(s) => {
            assert_eq!(s.names, vec![String::from("a")]);
            assert_eq!(s.declared, Some(BasicKind::Int32));
            assert!(s.inits.is_empty());
        }
        other => panic!("unexpected statement: {:?}", other),
    }

    match parse_one("var a, b = 1, 2\n") {
        Stmt::VarDecl(s) => {
            assert_eq!(s.names.len(), 2);
            assert_eq!(s.declared, None);
            assert_eq!(s.inits.len(), 2);
        }
        other => panic!("unexpected statement: {:?}", other),
    }

    match parse_one("var a, b int64 = 1, 2\n") {
        Stmt::VarDecl(s) => {
            assert_eq!(s.declared, Some(BasicKind::Int64));
            assert_eq!(s.inits.len(), 2);
        }
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_var_decl_requires_type_or_init() {
    let error = parse_all("var a\n", None).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_expression_precedence() {
    // 1 + 2 == 3 && x || y parses as ((1 + 2 == 3) && x) || y
    let expr = parse_expr_stmt("1 + 2 == 3 && x || y\n");

    let Expr::Logical(or) = expr else {
        panic!("expected || at the root");
    };
    assert_eq!(or.op, LogicalOp::Or);

    let Expr::Logical(and) = *or.left else {
        panic!("expected && under ||");
    };
    assert_eq!(and.op, LogicalOp::And);

    let Expr::Binary(eq) = *and.left else {
        panic!("expected == under &&");
    };
    assert_eq!(eq.op, BinOp::Eq);

    let Expr::Binary(add) = *eq.left else {
        panic!("expected + under ==");
    };
    assert_eq!(add.op, BinOp::Add);
}

#[test]
fn test_multiplication_binds_tighter() {
    let expr = parse_expr_stmt("1 + 2 * 3\n");

    let Expr::Binary(add) = expr else {
        panic!("expected + at the root");
    };
    assert_eq!(add.op, BinOp::Add);
    let Expr::Binary(mul) = *add.right else {
        panic!("expected * on the right");
    };
    assert_eq!(mul.op, BinOp::Mul);
}

#[test]
fn test_parenthesized_grouping() {
    let expr = parse_expr_stmt("(1 + 2) * 3\n");

    let Expr::Binary(mul) = expr else {
        panic!("expected * at the root");
    };
    assert_eq!(mul.op, BinOp::Mul);
    assert!(matches!(*mul.left, Expr::Binary(_)));
}

#[test]
fn test_unary_operators() {
    let expr = parse_expr_stmt("-x + !y\n");

    let Expr::Binary(add) = expr else {
        panic!("expected + at the root");
    };
    let Expr::Unary(neg) = *add.left else {
        panic!("expected unary minus");
    };
    assert_eq!(neg.op, UnaryOp::Neg);
    let Expr::Unary(not) = *add.right else {
        panic!("expected unary not");
    };
    assert_eq!(not.op, UnaryOp::Not);
}

#[test]
fn test_echo_flag() {
    match parse_one("1 + 2\n") {
        Stmt::Expr(s) => assert!(s.echo),
        other => panic!("unexpected statement: {:?}", other),
    }
    match parse_one("1 + 2;\n") {
        Stmt::Expr(s) => assert!(!s.echo),
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_optional_semicolon_terminator() {
    assert!(parse_all("var a int32;\n", None).is_ok());
    assert!(parse_all("break;\n", None).is_ok());
    // Two statements cannot share a line even with a semicolon.
    assert!(parse_all("var a int32; var b int32\n", None).is_err());
}

#[test]
fn test_increment_desugars_to_assignment() {
    match parse_one("i++\n") {
        Stmt::Assign(s) => {
            assert!(!s.define);
            assert_eq!(s.targets.len(), 1);
            let Expr::Binary(add) = &s.values[0] else {
                panic!("expected i + 1 as the value");
            };
            assert_eq!(add.op, BinOp::Add);
        }
        other => panic!("unexpected statement: {:?}", other),
    }

    match parse_one("i--\n") {
        Stmt::Assign(s) => {
            let Expr::Binary(sub) = &s.values[0] else {
                panic!("expected i - 1 as the value");
            };
            assert_eq!(sub.op, BinOp::Sub);
        }
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_increment_requires_identifier() {
    let error = parse_all("1++\n", None).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_multi_assignment() {
    match parse_one("a, b = b, a\n") {
        Stmt::Assign(s) => {
            assert!(!s.define);
            assert_eq!(s.targets.len(), 2);
            assert_eq!(s.values.len(), 2);
        }
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_short_declaration_targets_must_be_identifiers() {
    assert!(matches!(parse_one("a, b := 1, 2\n"), Stmt::Assign(s) if s.define));

    let error = parse_all("a + 1 := 2\n", None).unwrap_err();
    assert!(matches!(
        error.get_impl(),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
}

#[test]
fn test_if_else_chain() {
    let source = "if a {\n} else if b {\n} else if c {\n} else {\n}\n";
    match parse_one(source) {
        Stmt::If(s) => {
            assert_eq!(s.branches.len(), 3);
            assert!(s.else_block.is_some());
        }
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_for_forms() {
    match parse_one("for {\n}\n") {
        Stmt::For(s) => {
            assert!(s.init.is_none() && s.cond.is_none() && s.post.is_none());
        }
        other => panic!("unexpected statement: {:?}", other),
    }

    match parse_one("for x < 3 {\n}\n") {
        Stmt::For(s) => {
            assert!(s.init.is_none());
            assert!(s.cond.is_some());
            assert!(s.post.is_none());
        }
        other => panic!("unexpected statement: {:?}", other),
    }

    match parse_one("for i := 0; i < 3; i++ {\n}\n") {
        Stmt::For(s) => {
            assert!(matches!(s.init.as_deref(), Some(Stmt::Assign(a)) if a.define));
            assert!(s.cond.is_some());
            assert!(matches!(s.post.as_deref(), Some(Stmt::Assign(_))));
        }
        other => panic!("unexpected statement: {:?}", other),
    }

    // The post clause may be omitted.
    match parse_one("for i := 0; i < 3; {\n}\n") {
        Stmt::For(s) => assert!(s.post.is_none()),
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_for_post_clause_cannot_declare() {
    let error = parse_all("for i := 0; i < 3; j := 1 {\n}\n", None).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_block_statement() {
    match parse_one("{\n    var a int32\n    a\n}\n") {
        Stmt::Block(s) => assert_eq!(s.body.len(), 2),
        other => panic!("unexpected statement: {:?}", other),
    }

    let error = parse_all("{\n    var a int32\n", None).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_block_open_brace_needs_newline() {
    let error = parse_all("{ var a int32\n}\n", None).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_return_statement() {
    match parse_one("return\n") {
        Stmt::Return(s) => assert!(s.values.is_empty()),
        other => panic!("unexpected statement: {:?}", other),
    }
    match parse_one("return 1, 2\n") {
        Stmt::Return(s) => assert_eq!(s.values.len(), 2),
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_function_literal() {
    let source = "var f = func(a int32, b int32) (int64, bool) {\n    return a\n}\n";
    match parse_one(source) {
        Stmt::VarDecl(s) => {
            let Expr::FnLit(f) = &s.inits[0] else {
                panic!("expected a function literal initializer");
            };
            assert_eq!(f.params.len(), 2);
            assert_eq!(f.results, vec![BasicKind::Int64, BasicKind::Bool]);
            assert_eq!(f.body.body.len(), 1);
        }
        other => panic!("unexpected statement: {:?}", other),
    }
}

#[test]
fn test_blank_lines_are_empty_statements() {
    let statements = parse_all("\n\n1\n", None).unwrap();
    assert_eq!(statements.len(), 3);
    assert!(matches!(statements[0], Stmt::Empty(_)));
    assert!(matches!(statements[2], Stmt::Expr(_)));
}

#[test]
fn test_unparsed_keywords_are_syntax_errors() {
    for source in ["package main\n", "import x\n", "struct {\n}\n"] {
        let error = parse_all(source, None).unwrap_err();
        assert_eq!(error.get_error_name(), "SyntaxError", "for {:?}", source);
    }
}

#[test]
fn test_node_ids_are_unique() {
    let statements = parse_all("1 + 2\n3 * 4\n", None).unwrap();
    let mut ids = vec![];
    for stmt in &statements {
        if let Stmt::Expr(s) = stmt {
            ids.push(s.id);
            ids.push(s.expr.id());
        }
    }
    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
}

fn reprint(source: &str) -> String {
    parse_all(source, None)
        .unwrap()
        .iter()
        .map(|stmt| format!("{}\n", stmt))
        .collect()
}

#[test]
fn test_print_reparse_print_is_stable() {
    let sources = [
        "var x int32 = 1 + 2 * 3\n",
        "x = (1 + 2) * 3\n",
        "1 + 2;\n",
        "-x * 2\n",
        "-(-x)\n",
        "a && b || !c\n",
        "if x > 1 {\n    x = x - 1\n} else {\n    x = 0\n}\n",
        "for i := 0; i < 3; i = i + 1 {\n    total = total + i\n}\n",
        "for {\n    break\n}\n",
        "{\n    var a int64\n}\n",
        "return 1, 2\n",
    ];

    for source in sources {
        let once = reprint(source);
        let twice = reprint(&once);
        assert_eq!(once, twice, "printing is not stable for {:?}", source);
    }
}
