//! Unit tests for the type checker.
//!
//! Covers declaration typing, untyped-constant promotion and range checks,
//! constant folding, scope conflicts and shadowing, condition checking and
//! the error taxonomy the checker reports.

use crate::{
    ast::{
        decor::Decorations,
        statements::Stmt,
        types::{BasicKind, ConstKind, Ty, Value},
    },
    errors::errors::{Error, ErrorImpl},
    parser::parser::parse_all,
};

use super::{scope::ScopeStack, type_checker::type_check};

struct Checked {
    scopes: ScopeStack,
    decor: Decorations,
    statements: Vec<Stmt>,
}

fn check(source: &str) -> Result<Checked, Error> {
    let statements = parse_all(source, None)?;
    let mut scopes = ScopeStack::new();
    let mut decor = Decorations::new();
    for stmt in &statements {
        type_check(stmt, &mut scopes, &mut decor)?;
    }
    Ok(Checked {
        scopes,
        decor,
        statements,
    })
}

fn check_error(source: &str) -> Error {
    check(source).err().expect("expected a checking error")
}

fn last_expr_id(checked: &Checked) -> u32 {
    match checked.statements.last() {
        Some(Stmt::Expr(s)) => s.expr.id(),
        other => panic!("expected a trailing expression statement, got {:?}", other),
    }
}

#[test]
fn test_constant_folding() {
    let checked = check("1 + 2 * 3\n").unwrap();
    let id = last_expr_id(&checked);

    assert_eq!(checked.decor.ty(id), Some(Ty::Constant(ConstKind::Integer)));
    assert!(checked.decor.is_folded(id));
    assert_eq!(checked.decor.value(id), Some(Value::Int64(7)));
}

#[test]
fn test_constant_comparison_folds_to_bool() {
    let checked = check("1 < 2\n").unwrap();
    let id = last_expr_id(&checked);

    assert_eq!(checked.decor.ty(id), Some(Ty::Constant(ConstKind::Bool)));
    assert_eq!(checked.decor.value(id), Some(Value::Bool(true)));
}

#[test]
fn test_unary_folding() {
    let checked = check("-(3 * 4)\n").unwrap();
    let id = last_expr_id(&checked);
    assert_eq!(checked.decor.value(id), Some(Value::Int64(-12)));

    let checked = check("!true\n").unwrap();
    let id = last_expr_id(&checked);
    assert_eq!(checked.decor.value(id), Some(Value::Bool(false)));
}

#[test]
fn test_declared_type_wins() {
    let checked = check("var x int32 = 1 + 2\n").unwrap();
    let symbol = checked.scopes.lookup("x").unwrap();
    assert_eq!(symbol.kind, BasicKind::Int32);
}

#[test]
fn test_untyped_defaults() {
    let checked = check("var x = 5\nvar b = true\ny := 7\n").unwrap();
    assert_eq!(checked.scopes.lookup("x").unwrap().kind, BasicKind::Int64);
    assert_eq!(checked.scopes.lookup("b").unwrap().kind, BasicKind::Bool);
    assert_eq!(checked.scopes.lookup("y").unwrap().kind, BasicKind::Int64);
}

#[test]
fn test_constant_out_of_range() {
    let error = check_error("var x int16 = 99999\n");
    assert!(matches!(error.get_impl(), ErrorImpl::OutOfRange { .. }));
    assert_eq!(error.get_error_name(), "InvalidOperation");

    assert!(check("var x int16 = 32767\n").is_ok());
    assert!(check("var x int32 = 99999\n").is_ok());
}

#[test]
fn test_literal_beyond_i64_is_rejected() {
    // The wrapped bit pattern of this literal is -1, which every integer
    // type would accept; the raw literal must be range-checked instead.
    let error = check_error("var a int16 = 18446744073709551615\n");
    assert!(matches!(error.get_impl(), ErrorImpl::OutOfRange { .. }));

    let error = check_error("9223372036854775808\n");
    assert!(matches!(error.get_impl(), ErrorImpl::OutOfRange { .. }));

    assert!(check("var x int64 = 9223372036854775807\n").is_ok());
}

#[test]
fn test_shadowing_init_checked_against_outer_binding() {
    // Inside its own declaration, the name still means the outer symbol.
    let error = check_error("var x int16 = 1\n{\n    var x int64 = x\n}\n");
    assert!(matches!(error.get_impl(), ErrorImpl::TypeMismatch { .. }));

    assert!(check("var x int64 = 1\n{\n    var x int64 = x + 1\n}\n").is_ok());
}

#[test]
fn test_no_implicit_widening() {
    let error = check_error("var x int32 = 1\nvar y int64 = 2\nx + y\n");
    assert!(matches!(error.get_impl(), ErrorImpl::TypeMismatch { .. }));

    // A constant commits to the concrete operand's type instead.
    assert!(check("var x int32 = 1\nx + 5\n").is_ok());
}

#[test]
fn test_constant_must_fit_concrete_operand() {
    let error = check_error("var x int16 = 1\nx + 99999\n");
    assert!(matches!(error.get_impl(), ErrorImpl::OutOfRange { .. }));
}

#[test]
fn test_assignment_types() {
    assert!(check("var x int32\nx = 7\n").is_ok());

    let error = check_error("var x int32\nvar y int64\nx = y\n");
    assert!(matches!(error.get_impl(), ErrorImpl::TypeMismatch { .. }));

    let error = check_error("var x int32\nx = true\n");
    assert!(matches!(error.get_impl(), ErrorImpl::TypeMismatch { .. }));

    let error = check_error("x = 1\n");
    assert!(matches!(error.get_impl(), ErrorImpl::SymbolNotFound { .. }));
}

#[test]
fn test_declaration_conflicts() {
    let error = check_error("var x int32\nvar x int64\n");
    assert!(matches!(error.get_impl(), ErrorImpl::Conflict { .. }));
    assert_eq!(error.get_error_name(), "Conflict");

    // Shadowing in an inner block is allowed.
    assert!(check("var x int32\n{\n    var x int64\n}\n").is_ok());
}

#[test]
fn test_declaration_is_atomic() {
    let checked = check("var a int32\n");
    let mut checked = checked.unwrap();

    let statements = parse_all("var b, a = 1, 2\n", None).unwrap();
    let error = type_check(&statements[0], &mut checked.scopes, &mut checked.decor)
        .expect_err("expected a conflict");
    assert!(matches!(error.get_impl(), ErrorImpl::Conflict { .. }));

    // The failing declaration bound none of its names.
    assert!(checked.scopes.lookup("b").is_none());
}

#[test]
fn test_declaration_arity() {
    let error = check_error("var a, b = 1\n");
    assert!(matches!(error.get_impl(), ErrorImpl::ArityMismatch { .. }));

    let error = check_error("a, b := 1, 2, 3\n");
    assert!(matches!(error.get_impl(), ErrorImpl::ArityMismatch { .. }));
}

#[test]
fn test_duplicate_names_in_one_declaration() {
    let error = check_error("var a, a int32\n");
    assert!(matches!(error.get_impl(), ErrorImpl::Conflict { .. }));
}

#[test]
fn test_conditions_must_be_bool() {
    let error = check_error("if 1 {\n}\n");
    assert!(matches!(error.get_impl(), ErrorImpl::NonBoolCondition { .. }));
    assert_eq!(error.get_error_name(), "InvalidOperation");

    let error = check_error("for 1 + 2 {\n}\n");
    assert!(matches!(error.get_impl(), ErrorImpl::NonBoolCondition { .. }));

    assert!(check("if true {\n}\n").is_ok());
    assert!(check("var x int64 = 1\nfor x < 3 {\n    x++\n}\n").is_ok());
}

#[test]
fn test_loop_header_scope() {
    // The init variable is scoped to the loop, not the surrounding scope.
    let checked = check("for i := 0; i < 3; i++ {\n}\n").unwrap();
    assert!(checked.scopes.lookup("i").is_none());

    // Redeclaring the loop variable after the loop is therefore fine.
    assert!(check("for i := 0; i < 3; i++ {\n}\nvar i bool\n").is_ok());
}

#[test]
fn test_invalid_operands() {
    let error = check_error("-true\n");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidOperand { .. }));

    let error = check_error("!5\n");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidOperand { .. }));

    let error = check_error("true + false\n");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidOperand { .. }));

    let error = check_error("true < false\n");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidOperand { .. }));

    assert!(check("true == false\n").is_ok());
}

#[test]
fn test_logical_operands_must_be_bool() {
    let error = check_error("1 && true\n");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidOperand { .. }));

    assert!(check("true && false || true\n").is_ok());
}

#[test]
fn test_logical_ops_are_not_folded() {
    // Folding && would defeat short-circuiting; the type is still constant.
    let checked = check("true && false\n").unwrap();
    let id = last_expr_id(&checked);
    assert_eq!(checked.decor.ty(id), Some(Ty::Constant(ConstKind::Bool)));
    assert!(!checked.decor.is_folded(id));
}

#[test]
fn test_constant_division_by_zero_is_not_a_check_error() {
    // The fault is deferred to evaluation, so a short-circuited 1/0 never
    // fires.
    let checked = check("false && 1 / 0 == 1\n").unwrap();
    let id = last_expr_id(&checked);
    assert!(!checked.decor.is_folded(id));
}

#[test]
fn test_function_literals_not_implemented() {
    let error = check_error("var f = func() {\n}\n");
    assert!(matches!(error.get_impl(), ErrorImpl::NotImplemented { .. }));
    assert_eq!(error.get_error_name(), "InvalidOperation");
}

#[test]
fn test_block_type_is_last_statement_type() {
    let checked = check("{\n    1 + 1\n}\n").unwrap();
    let Some(Stmt::Block(block)) = checked.statements.last() else {
        panic!("expected a block statement");
    };
    assert_eq!(
        checked.decor.ty(block.id),
        Some(Ty::Constant(ConstKind::Integer))
    );
}

#[test]
fn test_symbol_not_found() {
    let error = check_error("missing + 1\n");
    assert!(matches!(error.get_impl(), ErrorImpl::SymbolNotFound { .. }));
    assert_eq!(error.get_error_name(), "SymbolNotFound");
}

#[test]
fn test_block_scope_is_parked_not_dropped() {
    let checked = check("var x int32\n{\n    var y int64\n}\n").unwrap();
    // After the block, y is not reachable but x still is.
    assert!(checked.scopes.lookup("y").is_none());
    assert!(checked.scopes.lookup("x").is_some());
}
