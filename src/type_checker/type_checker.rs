use crate::{
    ast::{
        decor::Decorations,
        expressions::{BinOp, BinaryExpr, Expr, LogicalExpr, UnaryExpr, UnaryOp},
        statements::{AssignStmt, BlockStmt, ForStmt, IfStmt, Stmt, VarDeclStmt},
        types::{BasicKind, ConstKind, Ty, Value},
        NodeId,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::scope::ScopeStack;

/// Checks one top-level statement against the current scope state, recording
/// types and folded values in the decoration table.
pub fn type_check(stmt: &Stmt, scopes: &mut ScopeStack, decor: &mut Decorations) -> Result<(), Error> {
    TypeChecker { scopes, decor }.check_stmt(stmt)
}

struct TypeChecker<'a> {
    scopes: &'a mut ScopeStack,
    decor: &'a mut Decorations,
}

impl TypeChecker<'_> {
    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::VarDecl(s) => self.check_var_decl(s),
            Stmt::Assign(s) => self.check_assign(s),
            Stmt::If(s) => self.check_if(s),
            Stmt::For(s) => self.check_for(s),
            Stmt::Block(s) => self.check_block(s),
            Stmt::Return(s) => {
                for value in &s.values {
                    self.check_expr(value)?;
                }
                Ok(())
            }
            Stmt::Expr(s) => {
                let ty = self.check_expr(&s.expr)?;
                self.decor.set_type(s.id, ty);
                Ok(())
            }
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) => Ok(()),
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<Ty, Error> {
        let ty = match expr {
            Expr::Int(e) => {
                // Literals are lexed unsigned; one past i64::MAX already
                // exceeds every representable type.
                let Ok(value) = i64::try_from(e.value) else {
                    return Err(Error::new(
                        ErrorImpl::OutOfRange {
                            value: i128::from(e.value),
                            target: String::from("int64"),
                        },
                        e.span.start.clone(),
                    ));
                };
                self.decor.set_value(e.id, Value::Int64(value));
                self.decor.mark_folded(e.id);
                Ty::Constant(ConstKind::Integer)
            }
            Expr::Bool(e) => {
                self.decor.set_value(e.id, Value::Bool(e.value));
                self.decor.mark_folded(e.id);
                Ty::Constant(ConstKind::Bool)
            }
            Expr::Ident(e) => {
                let symbol = self.scopes.lookup(&e.name).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::SymbolNotFound {
                            name: e.name.clone(),
                        },
                        e.span.start.clone(),
                    )
                })?;
                Ty::Basic(symbol.kind)
            }
            Expr::Unary(e) => self.check_unary(e)?,
            Expr::Binary(e) => self.check_binary(e)?,
            Expr::Logical(e) => self.check_logical(e)?,
            Expr::FnLit(e) => {
                return Err(Error::new(
                    ErrorImpl::NotImplemented {
                        feature: String::from("function literals"),
                    },
                    e.span.start.clone(),
                ));
            }
        };
        self.decor.set_type(expr.id(), ty);
        Ok(ty)
    }

    fn check_unary(&mut self, e: &UnaryExpr) -> Result<Ty, Error> {
        let operand = self.check_expr(&e.operand)?;

        match e.op {
            UnaryOp::Neg => match operand {
                Ty::Constant(ConstKind::Integer) => {
                    if let Some(value) = self.folded_int(&e.operand) {
                        self.decor
                            .set_value(e.id, Value::Int64(value.wrapping_neg()));
                        self.decor.mark_folded(e.id);
                    }
                    Ok(Ty::Constant(ConstKind::Integer))
                }
                Ty::Basic(kind) if kind.is_arithmetic() => Ok(Ty::Basic(kind)),
                other => Err(invalid_operand("-", other, &e.span.start)),
            },
            UnaryOp::Not => match operand {
                Ty::Constant(ConstKind::Bool) => {
                    if let Some(Value::Bool(value)) = self.decor.folded_value(e.operand.id()) {
                        self.decor.set_value(e.id, Value::Bool(!value));
                        self.decor.mark_folded(e.id);
                    }
                    Ok(Ty::Constant(ConstKind::Bool))
                }
                Ty::Basic(BasicKind::Bool) => Ok(Ty::Basic(BasicKind::Bool)),
                other => Err(invalid_operand("!", other, &e.span.start)),
            },
        }
    }

    fn check_binary(&mut self, e: &BinaryExpr) -> Result<Ty, Error> {
        let left = self.check_expr(&e.left)?;
        let right = self.check_expr(&e.right)?;

        if e.op.is_comparison() {
            self.check_comparison(e, left, right)
        } else {
            self.check_arithmetic(e, left, right)
        }
    }

    fn check_arithmetic(&mut self, e: &BinaryExpr, left: Ty, right: Ty) -> Result<Ty, Error> {
        let position = &e.span.start;

        match (left, right) {
            (Ty::Basic(a), Ty::Basic(b)) => {
                if !a.is_arithmetic() {
                    return Err(invalid_operand(&e.op.to_string(), left, position));
                }
                if !b.is_arithmetic() {
                    return Err(invalid_operand(&e.op.to_string(), right, position));
                }
                // Identical widths only: no implicit widening.
                if a != b {
                    return Err(type_mismatch(left, right, position));
                }
                Ok(Ty::Basic(a))
            }
            (Ty::Constant(ConstKind::Integer), Ty::Constant(ConstKind::Integer)) => {
                if let (Some(a), Some(b)) = (self.folded_int(&e.left), self.folded_int(&e.right)) {
                    // Division by a zero constant is left unfolded so the
                    // fault surfaces only if the operand actually runs.
                    if let Some(value) = fold_arithmetic(e.op, a, b) {
                        self.decor.set_value(e.id, Value::Int64(value));
                        self.decor.mark_folded(e.id);
                    }
                }
                Ok(Ty::Constant(ConstKind::Integer))
            }
            (Ty::Basic(kind), Ty::Constant(ConstKind::Integer)) => {
                self.commit_constant(kind, &e.right, left, position)?;
                Ok(Ty::Basic(kind))
            }
            (Ty::Constant(ConstKind::Integer), Ty::Basic(kind)) => {
                self.commit_constant(kind, &e.left, right, position)?;
                Ok(Ty::Basic(kind))
            }
            (Ty::Constant(ConstKind::Bool), _) => {
                Err(invalid_operand(&e.op.to_string(), left, position))
            }
            (_, Ty::Constant(ConstKind::Bool)) => {
                Err(invalid_operand(&e.op.to_string(), right, position))
            }
        }
    }

    /// An untyped integer constant meeting a concrete operand commits to
    /// that operand's type; its value must fit the type's range.
    fn commit_constant(
        &mut self,
        kind: BasicKind,
        constant: &Expr,
        concrete_ty: Ty,
        position: &Position,
    ) -> Result<(), Error> {
        if !kind.is_arithmetic() {
            return Err(type_mismatch(concrete_ty, Ty::Constant(ConstKind::Integer), position));
        }
        if let Some(value) = self.folded_int(constant) {
            if !kind.fits(value) {
                return Err(Error::new(
                    ErrorImpl::OutOfRange {
                        value: i128::from(value),
                        target: kind.to_string(),
                    },
                    constant.span().start.clone(),
                ));
            }
        }
        Ok(())
    }

    fn check_comparison(&mut self, e: &BinaryExpr, left: Ty, right: Ty) -> Result<Ty, Error> {
        let position = &e.span.start;
        let equality = matches!(e.op, BinOp::Eq | BinOp::Ne);

        match (left, right) {
            (Ty::Basic(a), Ty::Basic(b)) => {
                if a != b {
                    return Err(type_mismatch(left, right, position));
                }
                if a == BasicKind::Bool && !equality {
                    return Err(invalid_operand(&e.op.to_string(), left, position));
                }
                Ok(Ty::Basic(BasicKind::Bool))
            }
            (Ty::Constant(ConstKind::Integer), Ty::Constant(ConstKind::Integer)) => {
                if let (Some(a), Some(b)) = (self.folded_int(&e.left), self.folded_int(&e.right)) {
                    let value = compare_ints(e.op, a, b);
                    self.decor.set_value(e.id, Value::Bool(value));
                    self.decor.mark_folded(e.id);
                }
                Ok(Ty::Constant(ConstKind::Bool))
            }
            (Ty::Constant(ConstKind::Bool), Ty::Constant(ConstKind::Bool)) => {
                if !equality {
                    return Err(invalid_operand(&e.op.to_string(), left, position));
                }
                if let (Some(Value::Bool(a)), Some(Value::Bool(b))) = (
                    self.decor.folded_value(e.left.id()),
                    self.decor.folded_value(e.right.id()),
                ) {
                    let value = if e.op == BinOp::Eq { a == b } else { a != b };
                    self.decor.set_value(e.id, Value::Bool(value));
                    self.decor.mark_folded(e.id);
                }
                Ok(Ty::Constant(ConstKind::Bool))
            }
            (Ty::Basic(kind), Ty::Constant(ConstKind::Integer)) => {
                self.commit_constant(kind, &e.right, left, position)?;
                Ok(Ty::Basic(BasicKind::Bool))
            }
            (Ty::Constant(ConstKind::Integer), Ty::Basic(kind)) => {
                self.commit_constant(kind, &e.left, right, position)?;
                Ok(Ty::Basic(BasicKind::Bool))
            }
            (Ty::Basic(BasicKind::Bool), Ty::Constant(ConstKind::Bool))
            | (Ty::Constant(ConstKind::Bool), Ty::Basic(BasicKind::Bool)) => {
                if !equality {
                    return Err(invalid_operand(&e.op.to_string(), left, position));
                }
                Ok(Ty::Basic(BasicKind::Bool))
            }
            _ => Err(type_mismatch(left, right, position)),
        }
    }

    /// `&&` and `||` are never folded, so short-circuiting stays a runtime
    /// decision; two constant operands still give a constant result type.
    fn check_logical(&mut self, e: &LogicalExpr) -> Result<Ty, Error> {
        let left = self.check_expr(&e.left)?;
        let right = self.check_expr(&e.right)?;

        if !left.is_bool() {
            return Err(invalid_operand(&e.op.to_string(), left, &e.span.start));
        }
        if !right.is_bool() {
            return Err(invalid_operand(&e.op.to_string(), right, &e.span.start));
        }

        if left.is_constant() && right.is_constant() {
            Ok(Ty::Constant(ConstKind::Bool))
        } else {
            Ok(Ty::Basic(BasicKind::Bool))
        }
    }

    fn check_var_decl(&mut self, s: &VarDeclStmt) -> Result<(), Error> {
        if !s.inits.is_empty() && s.inits.len() != s.names.len() {
            return Err(Error::new(
                ErrorImpl::ArityMismatch {
                    names: s.names.len(),
                    values: s.inits.len(),
                },
                s.span.start.clone(),
            ));
        }

        let mut kinds = vec![];
        for i in 0..s.names.len() {
            let init = s.inits.get(i);
            let init_ty = match init {
                Some(init) => Some(self.check_expr(init)?),
                None => None,
            };
            kinds.push(self.resolve_declared_kind(s.declared, init_ty, init, &s.span.start)?);
        }

        self.declare_all(&s.names, &kinds, &s.span.start)
    }

    /// Picks the concrete type of one declared name from the optional type
    /// annotation and the optional initializer type.
    fn resolve_declared_kind(
        &mut self,
        declared: Option<BasicKind>,
        init_ty: Option<Ty>,
        init: Option<&Expr>,
        position: &Position,
    ) -> Result<BasicKind, Error> {
        match (declared, init_ty) {
            (Some(kind), None) => Ok(kind),
            (None, Some(ty)) => Ok(default_kind(ty)),
            (Some(kind), Some(ty)) => {
                match ty {
                    Ty::Basic(init_kind) => {
                        if init_kind != kind {
                            return Err(type_mismatch(Ty::Basic(kind), ty, position));
                        }
                    }
                    Ty::Constant(ConstKind::Integer) => {
                        if let Some(init) = init {
                            self.commit_constant(kind, init, Ty::Basic(kind), position)?;
                        }
                    }
                    Ty::Constant(ConstKind::Bool) => {
                        if kind != BasicKind::Bool {
                            return Err(type_mismatch(Ty::Basic(kind), ty, position));
                        }
                    }
                }
                Ok(kind)
            }
            (None, None) => Err(Error::new(
                ErrorImpl::Internal {
                    message: String::from("declaration with neither type nor initializer"),
                },
                position.clone(),
            )),
        }
    }

    /// Declares a batch of names atomically: conflicts are detected first,
    /// so a failing declaration binds none of its names.
    fn declare_all(
        &mut self,
        names: &[String],
        kinds: &[BasicKind],
        position: &Position,
    ) -> Result<(), Error> {
        for (i, name) in names.iter().enumerate() {
            if self.scopes.current_contains(name) || names[..i].contains(name) {
                return Err(Error::new(
                    ErrorImpl::Conflict { name: name.clone() },
                    position.clone(),
                ));
            }
        }
        for (name, kind) in names.iter().zip(kinds) {
            self.scopes.declare(name, *kind, position)?;
        }
        Ok(())
    }

    fn check_assign(&mut self, s: &AssignStmt) -> Result<(), Error> {
        if s.targets.len() != s.values.len() {
            return Err(Error::new(
                ErrorImpl::ArityMismatch {
                    names: s.targets.len(),
                    values: s.values.len(),
                },
                s.span.start.clone(),
            ));
        }

        if s.define {
            self.check_define(s)
        } else {
            for (target, value) in s.targets.iter().zip(&s.values) {
                self.check_assign_pair(target, value)?;
            }
            Ok(())
        }
    }

    /// `a, b := x, y`: targets are fresh declarations typed from their
    /// values through the untyped-constant defaults.
    fn check_define(&mut self, s: &AssignStmt) -> Result<(), Error> {
        let mut names = vec![];
        let mut kinds = vec![];

        for (target, value) in s.targets.iter().zip(&s.values) {
            let Expr::Ident(ident) = target else {
                return Err(Error::new(
                    ErrorImpl::Internal {
                        message: String::from("short declaration target is not an identifier"),
                    },
                    target.span().start.clone(),
                ));
            };
            let ty = self.check_expr(value)?;
            let kind = default_kind(ty);
            self.decor.set_type(ident.id, Ty::Basic(kind));
            names.push(ident.name.clone());
            kinds.push(kind);
        }

        self.declare_all(&names, &kinds, &s.span.start)
    }

    fn check_assign_pair(&mut self, target: &Expr, value: &Expr) -> Result<(), Error> {
        let Expr::Ident(ident) = target else {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: String::from("="),
                    message: String::from("only identifiers can be assigned to"),
                },
                target.span().start.clone(),
            ));
        };

        let kind = match self.scopes.lookup(&ident.name) {
            Some(symbol) => symbol.kind,
            None => {
                return Err(Error::new(
                    ErrorImpl::SymbolNotFound {
                        name: ident.name.clone(),
                    },
                    ident.span.start.clone(),
                ));
            }
        };
        self.decor.set_type(ident.id, Ty::Basic(kind));

        let ty = self.check_expr(value)?;
        match ty {
            Ty::Basic(value_kind) => {
                if value_kind != kind {
                    return Err(type_mismatch(Ty::Basic(kind), ty, &value.span().start));
                }
            }
            Ty::Constant(ConstKind::Integer) => {
                self.commit_constant(kind, value, Ty::Basic(kind), &value.span().start)?;
            }
            Ty::Constant(ConstKind::Bool) => {
                if kind != BasicKind::Bool {
                    return Err(type_mismatch(Ty::Basic(kind), ty, &value.span().start));
                }
            }
        }
        Ok(())
    }

    /// Conditions must be boolean; an integer is not truthy.
    fn require_bool(&mut self, cond: &Expr) -> Result<(), Error> {
        let ty = self.check_expr(cond)?;
        if !ty.is_bool() {
            return Err(Error::new(
                ErrorImpl::NonBoolCondition {
                    received: ty.to_string(),
                },
                cond.span().start.clone(),
            ));
        }
        Ok(())
    }

    fn check_if(&mut self, s: &IfStmt) -> Result<(), Error> {
        for (cond, block) in &s.branches {
            self.require_bool(cond)?;
            self.check_block(block)?;
        }
        if let Some(block) = &s.else_block {
            self.check_block(block)?;
        }
        Ok(())
    }

    /// The init clause declares into a header scope that wraps the body, so
    /// loop variables survive iterations but not the loop itself.
    fn check_for(&mut self, s: &ForStmt) -> Result<(), Error> {
        self.scopes.push_new();
        let result = self.check_for_clauses(s);
        self.scopes.pop_into(s.id)?;
        result
    }

    fn check_for_clauses(&mut self, s: &ForStmt) -> Result<(), Error> {
        if let Some(init) = &s.init {
            self.check_stmt(init)?;
        }
        if let Some(cond) = &s.cond {
            self.require_bool(cond)?;
        }
        if let Some(post) = &s.post {
            self.check_stmt(post)?;
        }
        self.check_block(&s.body)
    }

    /// A block gets its own scope; the scope is parked under the block's id
    /// afterwards (even if checking failed partway) so evaluation and
    /// re-entry find the same declarations.
    fn check_block(&mut self, block: &BlockStmt) -> Result<(), Error> {
        self.scopes.push_new();
        let result = self.check_block_body(block);
        self.scopes.pop_into(block.id)?;
        result
    }

    fn check_block_body(&mut self, block: &BlockStmt) -> Result<(), Error> {
        let mut last: Option<NodeId> = None;
        for stmt in &block.body {
            self.check_stmt(stmt)?;
            last = Some(stmt.id());
        }
        // A block's type is its last statement's type, when it has one.
        if let Some(ty) = last.and_then(|id| self.decor.ty(id)) {
            self.decor.set_type(block.id, ty);
        }
        Ok(())
    }

    fn folded_int(&self, expr: &Expr) -> Option<i64> {
        self.decor.folded_value(expr.id()).and_then(Value::as_i64)
    }
}

/// The concrete type an untyped constant defaults to when nothing else
/// commits it: 64-bit for integers, `bool` for booleans.
fn default_kind(ty: Ty) -> BasicKind {
    match ty {
        Ty::Basic(kind) => kind,
        Ty::Constant(ConstKind::Integer) => BasicKind::Int64,
        Ty::Constant(ConstKind::Bool) => BasicKind::Bool,
    }
}

fn fold_arithmetic(op: BinOp, a: i64, b: i64) -> Option<i64> {
    Some(match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinOp::Rem => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        _ => return None,
    })
}

fn compare_ints(op: BinOp, a: i64, b: i64) -> bool {
    match op {
        BinOp::Eq => a == b,
        BinOp::Ne => a != b,
        BinOp::Lt => a < b,
        BinOp::Gt => a > b,
        BinOp::Le => a <= b,
        BinOp::Ge => a >= b,
        _ => false,
    }
}

fn type_mismatch(expected: Ty, received: Ty, position: &Position) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        position.clone(),
    )
}

fn invalid_operand(operator: &str, operand: Ty, position: &Position) -> Error {
    Error::new(
        ErrorImpl::InvalidOperand {
            operator: operator.to_string(),
            operand: operand.to_string(),
        },
        position.clone(),
    )
}
