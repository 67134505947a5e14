use crate::{
    ast::{
        decor::Decorations,
        expressions::{BinOp, BinaryExpr, Expr, LogicalExpr, LogicalOp, UnaryExpr, UnaryOp},
        statements::{AssignStmt, BlockStmt, ForStmt, IfStmt, Stmt, VarDeclStmt},
        types::{BasicKind, Ty, Value},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::scope::{ScopeStack, Symbol},
    Position,
};

/// How a statement finished: ran to completion, or requested a control
/// transfer that enclosing statements must honor.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Completed,
    Broke,
    Continued,
    Returned(Vec<Value>),
}

pub struct Evaluator<'a> {
    scopes: &'a mut ScopeStack,
    decor: &'a mut Decorations,
}

impl<'a> Evaluator<'a> {
    pub fn new(scopes: &'a mut ScopeStack, decor: &'a mut Decorations) -> Self {
        Evaluator { scopes, decor }
    }

    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, Error> {
        match stmt {
            Stmt::VarDecl(s) => {
                self.exec_var_decl(s)?;
                Ok(Flow::Completed)
            }
            Stmt::Assign(s) => {
                self.exec_assign(s)?;
                Ok(Flow::Completed)
            }
            Stmt::If(s) => self.exec_if(s),
            Stmt::For(s) => self.exec_for(s),
            Stmt::Block(s) => self.exec_block(s),
            Stmt::Break(_) => Ok(Flow::Broke),
            Stmt::Continue(_) => Ok(Flow::Continued),
            Stmt::Return(s) => {
                let mut values = vec![];
                for expr in &s.values {
                    values.push(self.eval_expr(expr)?);
                }
                Ok(Flow::Returned(values))
            }
            Stmt::Expr(s) => {
                let value = self.eval_expr(&s.expr)?;
                if s.echo {
                    self.decor.set_value(s.id, value);
                }
                Ok(Flow::Completed)
            }
            Stmt::Empty(_) => Ok(Flow::Completed),
        }
    }

    /// The declared names are not visible to their own initializers: an
    /// initializer reads the binding the checker resolved, which may be an
    /// outer one this declaration shadows. The symbols leave the innermost
    /// scope while the initializers run and return with their values.
    fn exec_var_decl(&mut self, s: &VarDeclStmt) -> Result<(), Error> {
        let mut symbols = vec![];
        for name in &s.names {
            let symbol = self
                .scopes
                .remove_current(name)
                .ok_or_else(|| internal("symbol escaped checking", &s.span.start))?;
            symbols.push(symbol);
        }

        let inits = self.eval_decl_inits(&s.inits);

        // Symbols are reinserted even when an initializer faulted, so the
        // declarations the checker made stay in place.
        for (i, (name, mut symbol)) in s.names.iter().zip(symbols).enumerate() {
            if let Ok(values) = &inits {
                symbol.value = Some(match values.get(i) {
                    Some(value) => value.convert(symbol.kind),
                    // No initializer materializes the type's zero value.
                    None => symbol.kind.zero(),
                });
            }
            self.scopes.insert_current(name, symbol)?;
        }
        inits.map(|_| ())
    }

    /// `a, b := x, y` hides the declared names from the right side the same
    /// way `var` hides them from its initializers.
    fn exec_define(&mut self, s: &AssignStmt) -> Result<(), Error> {
        let mut names = vec![];
        let mut symbols = vec![];
        for target in &s.targets {
            let Expr::Ident(ident) = target else {
                return Err(internal(
                    "short declaration target is not an identifier",
                    &target.span().start,
                ));
            };
            let symbol = self
                .scopes
                .remove_current(&ident.name)
                .ok_or_else(|| internal("symbol escaped checking", &ident.span.start))?;
            names.push(ident.name.as_str());
            symbols.push(symbol);
        }

        let values = self.eval_decl_inits(&s.values);

        for (i, (name, mut symbol)) in names.iter().zip(symbols).enumerate() {
            if let Ok(values) = &values {
                if let Some(value) = values.get(i) {
                    symbol.value = Some(value.convert(symbol.kind));
                }
            }
            self.scopes.insert_current(name, symbol)?;
        }
        values.map(|_| ())
    }

    fn eval_decl_inits(&mut self, inits: &[Expr]) -> Result<Vec<Value>, Error> {
        let mut values = vec![];
        for expr in inits {
            values.push(self.eval_expr(expr)?);
        }
        Ok(values)
    }

    fn exec_assign(&mut self, s: &AssignStmt) -> Result<(), Error> {
        if s.define {
            return self.exec_define(s);
        }

        // Right side fully evaluates before any target updates, so
        // `a, b = b, a` swaps.
        let mut values = vec![];
        for expr in &s.values {
            values.push(self.eval_expr(expr)?);
        }

        for (target, value) in s.targets.iter().zip(values) {
            let Expr::Ident(ident) = target else {
                return Err(internal(
                    "assignment target is not an identifier",
                    &target.span().start,
                ));
            };
            let symbol = self.lookup_mut(&ident.name, &ident.span.start)?;
            symbol.value = Some(value.convert(symbol.kind));
        }
        Ok(())
    }

    fn exec_if(&mut self, s: &IfStmt) -> Result<Flow, Error> {
        for (cond, block) in &s.branches {
            if self.eval_condition(cond)? {
                return self.exec_block(block);
            }
        }
        match &s.else_block {
            Some(block) => self.exec_block(block),
            None => Ok(Flow::Completed),
        }
    }

    /// Runs the loop inside its header scope. `break` and `continue` are
    /// absorbed here; the post clause still runs after a `continue`.
    fn exec_for(&mut self, s: &ForStmt) -> Result<Flow, Error> {
        self.scopes.attach(s.id);
        let result = self.run_loop(s);
        self.scopes.detach(s.id)?;
        result
    }

    fn run_loop(&mut self, s: &ForStmt) -> Result<Flow, Error> {
        if let Some(init) = &s.init {
            self.exec_stmt(init)?;
        }

        loop {
            if let Some(cond) = &s.cond {
                if !self.eval_condition(cond)? {
                    break;
                }
            }

            match self.exec_block(&s.body)? {
                Flow::Completed | Flow::Continued => {}
                Flow::Broke => break,
                Flow::Returned(values) => return Ok(Flow::Returned(values)),
            }

            if let Some(post) = &s.post {
                self.exec_stmt(post)?;
            }
        }
        Ok(Flow::Completed)
    }

    /// Attaches the block's parked scope, runs the body and detaches again.
    /// Detaching happens even when the body errors or transfers control, so
    /// the scope is always parked with cleared values afterwards.
    fn exec_block(&mut self, block: &BlockStmt) -> Result<Flow, Error> {
        self.scopes.attach(block.id);
        let result = self.exec_block_body(block);
        self.scopes.detach(block.id)?;
        result
    }

    fn exec_block_body(&mut self, block: &BlockStmt) -> Result<Flow, Error> {
        for stmt in &block.body {
            let flow = self.exec_stmt(stmt)?;
            if flow != Flow::Completed {
                return Ok(flow);
            }
        }
        Ok(Flow::Completed)
    }

    fn eval_condition(&mut self, cond: &Expr) -> Result<bool, Error> {
        let value = self.eval_expr(cond)?;
        value
            .as_bool()
            .ok_or_else(|| internal("condition evaluated to a non-boolean", &cond.span().start))
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, Error> {
        // Folded nodes are final; skip the subtree entirely.
        if let Some(value) = self.decor.folded_value(expr.id()) {
            return Ok(value);
        }

        let value = match expr {
            Expr::Int(e) => match i64::try_from(e.value) {
                Ok(value) => Value::Int64(value),
                Err(_) => {
                    return Err(internal("oversized literal escaped checking", &e.span.start));
                }
            },
            Expr::Bool(e) => Value::Bool(e.value),
            Expr::Ident(e) => {
                let symbol = self.scopes.lookup(&e.name).ok_or_else(|| {
                    internal("identifier escaped checking", &e.span.start)
                })?;
                symbol.value.ok_or_else(|| {
                    Error::new(
                        ErrorImpl::UnsetVariable {
                            name: e.name.clone(),
                        },
                        e.span.start.clone(),
                    )
                })?
            }
            Expr::Unary(e) => self.eval_unary(e)?,
            Expr::Binary(e) => self.eval_binary(e)?,
            Expr::Logical(e) => self.eval_logical(e)?,
            Expr::FnLit(e) => {
                return Err(internal("function literal escaped checking", &e.span.start));
            }
        };

        self.decor.set_value(expr.id(), value);
        Ok(value)
    }

    fn eval_unary(&mut self, e: &UnaryExpr) -> Result<Value, Error> {
        let operand = self.eval_expr(&e.operand)?;

        match e.op {
            UnaryOp::Neg => {
                let kind = self.concrete_kind_of(&e.operand)?;
                Ok(negate(operand.convert(kind)))
            }
            UnaryOp::Not => {
                let value = operand
                    .as_bool()
                    .ok_or_else(|| internal("`!` on a non-boolean", &e.span.start))?;
                Ok(Value::Bool(!value))
            }
        }
    }

    fn eval_binary(&mut self, e: &BinaryExpr) -> Result<Value, Error> {
        let left = self.eval_expr(&e.left)?;
        let right = self.eval_expr(&e.right)?;

        if e.op.is_comparison() {
            compare(e.op, left, right, &e.span.start)
        } else {
            // Both sides were committed to one concrete type by the
            // checker; re-represent and compute at that width.
            let kind = self.sibling_kind(&e.left, &e.right)?;
            arithmetic(
                e.op,
                kind,
                left.convert(kind),
                right.convert(kind),
                &e.span.start,
            )
        }
    }

    /// Short-circuit: the right operand only runs when the left did not
    /// already decide, and the result is whichever operand ran last.
    fn eval_logical(&mut self, e: &LogicalExpr) -> Result<Value, Error> {
        let left = self.eval_expr(&e.left)?;
        let decided = left
            .as_bool()
            .ok_or_else(|| internal("logical operand is not a boolean", &e.span.start))?;

        match e.op {
            LogicalOp::And if !decided => return Ok(left),
            LogicalOp::Or if decided => return Ok(left),
            _ => {}
        }
        self.eval_expr(&e.right)
    }

    /// The concrete type a single operand computes at: its basic type, or
    /// the 64-bit default for an uncommitted constant.
    fn concrete_kind_of(&self, operand: &Expr) -> Result<BasicKind, Error> {
        let ty = self
            .decor
            .expect_ty(operand.id(), &operand.span().start)?;
        Ok(match ty {
            Ty::Basic(kind) => kind,
            Ty::Constant(_) => BasicKind::Int64,
        })
    }

    /// The concrete type two sibling operands share. A concrete side wins;
    /// two constants compute at the 64-bit default.
    fn sibling_kind(&self, left: &Expr, right: &Expr) -> Result<BasicKind, Error> {
        let left_ty = self.decor.expect_ty(left.id(), &left.span().start)?;
        if let Ty::Basic(kind) = left_ty {
            return Ok(kind);
        }
        self.concrete_kind_of(right)
    }

    fn lookup_mut(&mut self, name: &str, position: &Position) -> Result<&mut Symbol, Error> {
        let missing = internal("symbol escaped checking", position);
        self.scopes.lookup_mut(name).ok_or(missing)
    }
}

fn internal(message: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::Internal {
            message: message.to_string(),
        },
        position.clone(),
    )
}

fn negate(value: Value) -> Value {
    match value {
        Value::Int16(v) => Value::Int16(v.wrapping_neg()),
        Value::Int32(v) => Value::Int32(v.wrapping_neg()),
        Value::Int64(v) => Value::Int64(v.wrapping_neg()),
        Value::Bool(v) => Value::Bool(v),
    }
}

fn compare(op: BinOp, left: Value, right: Value, position: &Position) -> Result<Value, Error> {
    let result = match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinOp::Eq => a == b,
            BinOp::Ne => a != b,
            _ => return Err(internal("ordering comparison on booleans", position)),
        },
        _ => {
            let a = int_operand(left, position)?;
            let b = int_operand(right, position)?;
            match op {
                BinOp::Eq => a == b,
                BinOp::Ne => a != b,
                BinOp::Lt => a < b,
                BinOp::Gt => a > b,
                BinOp::Le => a <= b,
                BinOp::Ge => a >= b,
                _ => return Err(internal("non-comparison operator in compare", position)),
            }
        }
    };
    Ok(Value::Bool(result))
}

/// Width-correct wrapping arithmetic: computed over 64 bits, then
/// re-truncated to the committed width, which matches native wrapping at
/// that width for every operator here.
fn arithmetic(
    op: BinOp,
    kind: BasicKind,
    left: Value,
    right: Value,
    position: &Position,
) -> Result<Value, Error> {
    let a = int_operand(left, position)?;
    let b = int_operand(right, position)?;

    let wide = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div | BinOp::Rem => {
            if b == 0 {
                return Err(Error::new(ErrorImpl::DivisionByZero, position.clone()));
            }
            if op == BinOp::Div {
                a.wrapping_div(b)
            } else {
                a.wrapping_rem(b)
            }
        }
        _ => return Err(internal("comparison operator in arithmetic", position)),
    };

    Ok(Value::Int64(wide).convert(kind))
}

fn int_operand(value: Value, position: &Position) -> Result<i64, Error> {
    value
        .as_i64()
        .ok_or_else(|| internal("boolean in integer arithmetic", position))
}
