//! The tree-walking evaluator (§4.4). Grounded on `Evaluator.hpp`'s
//! frame/state-machine shape, with its gaps filled in per the spec
//! rather than reproduced:
//!
//! - `Evaluate(const ForExpr&)` / `Evaluate(const WhileExpr&)` are
//!   literal stubs in the source (`return Value();`); both loops are
//!   fully implemented here.
//! - `- * / && ||` are commented out of the source's
//!   `BinaryOperation` evaluator; all six are implemented here, with
//!   `&&`/`||` short-circuiting.
//! - The source's `elseif` handling reuses the first `if`'s block for
//!   every `elseif` arm (a bug — `node.ifStatement->block` instead of
//!   `elsif.block`); each arm here evaluates its own block.

use quillc_par::{
    AssignOp, Ast, BinaryOp, Block, Expr, FunctionBody, FunctionDef, Stmt, SymbolId, UnaryOp,
};

use crate::error::RuntimeError;
use crate::frame::Frame;
use crate::host;
use crate::value::{ObjectValue, Value};

/// Resolves `function_name` in the global scope, arity-checks, and
/// either dispatches to a host builtin or runs the body in a fresh
/// root frame with the formals bound in call order — mirroring the
/// source's static `Evaluate(root, function, arguments)` entry point.
pub fn evaluate(ast: &Ast, function_name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let def = ast
        .global
        .functions
        .values()
        .find(|f| f.name == function_name)
        .ok_or_else(|| RuntimeError::undefined_identifier(function_name))?;

    if args.len() != def.args.params.len() {
        return Err(RuntimeError::argument_count_mismatch(
            def.args.params.len(),
            args.len(),
        ));
    }

    match &def.body {
        FunctionBody::Host(h) => host::call(*h, &args),
        FunctionBody::Block(block) => {
            let frame = Frame::root();
            for (param, arg) in def.args.params.iter().zip(args) {
                frame.define(param.id, arg);
            }
            let ctx = Ctx { ast };
            let (value, _) = ctx.eval_block(&frame, block)?;
            Ok(value)
        }
    }
}

struct Ctx<'a> {
    ast: &'a Ast,
}

/// `did_return` mirrors the source's `didHitReturn`: once any
/// statement on a block's straight-line path returns, every
/// enclosing construct stops executing further statements and
/// propagates the value up unchanged.
type EvalResult = Result<(Value, bool), RuntimeError>;

impl<'a> Ctx<'a> {
    fn eval_block(&self, frame: &Frame, block: &Block) -> EvalResult {
        for stmt in &block.stmts {
            let (value, did_return) = self.eval_stmt(frame, stmt)?;
            if did_return {
                return Ok((value, true));
            }
        }
        Ok((Value::Void, false))
    }

    fn eval_stmt(&self, frame: &Frame, stmt: &Stmt) -> EvalResult {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval_expr(frame, expr)?;
                Ok((Value::Void, false))
            }
            Stmt::Return { value, .. } => {
                let v = match value {
                    Some(expr) => self.eval_expr(frame, expr)?,
                    None => Value::Void,
                };
                Ok((v, true))
            }
            Stmt::If(chain) => {
                if self.eval_condition(frame, &chain.if_arm.cond)? {
                    let child = frame.child();
                    return self.eval_block(&child, &chain.if_arm.body);
                }
                for arm in &chain.elseif_arms {
                    if self.eval_condition(frame, &arm.cond)? {
                        let child = frame.child();
                        return self.eval_block(&child, &arm.body);
                    }
                }
                if let Some(body) = &chain.else_body {
                    let child = frame.child();
                    return self.eval_block(&child, body);
                }
                Ok((Value::Void, false))
            }
            Stmt::While { cond, body, .. } => {
                while self.eval_condition(frame, cond)? {
                    let child = frame.child();
                    let (value, did_return) = self.eval_block(&child, body)?;
                    if did_return {
                        return Ok((value, true));
                    }
                }
                Ok((Value::Void, false))
            }
            Stmt::DoWhile { body, cond, .. } => loop {
                let child = frame.child();
                let (value, did_return) = self.eval_block(&child, body)?;
                if did_return {
                    return Ok((value, true));
                }
                if !self.eval_condition(frame, cond)? {
                    return Ok((Value::Void, false));
                }
            },
            Stmt::For {
                var, iter, body, ..
            } => self.eval_for(frame, *var, iter, body),
        }
    }

    /// The range is evaluated once up front; each iteration then gets
    /// a fresh child frame with the loop variable bound to the next
    /// integer in the sequence.
    fn eval_for(&self, frame: &Frame, var: SymbolId, iter: &Expr, body: &Block) -> EvalResult {
        let (from, to, inclusive) = match iter {
            Expr::Range {
                from,
                to,
                inclusive,
                ..
            } => (
                self.eval_number(frame, from)?,
                self.eval_number(frame, to)?,
                *inclusive,
            ),
            other => {
                return Err(RuntimeError::type_mismatch(
                    "range",
                    self.eval_expr(frame, other)?.type_name(),
                    other.line(),
                ))
            }
        };

        let from_i = from as i64;
        let upper = if inclusive { to as i64 } else { to as i64 - 1 };
        let mut i = from_i;
        while i <= upper {
            let child = frame.child();
            child.define(var, Value::Number(i as f64));
            let (value, did_return) = self.eval_block(&child, body)?;
            if did_return {
                return Ok((value, true));
            }
            i += 1;
        }
        Ok((Value::Void, false))
    }

    fn eval_condition(&self, frame: &Frame, expr: &Expr) -> Result<bool, RuntimeError> {
        match self.eval_expr(frame, expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_mismatch(
                "bool",
                other.type_name(),
                expr.line(),
            )),
        }
    }

    fn eval_number(&self, frame: &Frame, expr: &Expr) -> Result<f64, RuntimeError> {
        match self.eval_expr(frame, expr)? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::type_mismatch(
                "number",
                other.type_name(),
                expr.line(),
            )),
        }
    }

    fn eval_expr(&self, frame: &Frame, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            Expr::Number(n, _) => Ok(Value::Number(*n)),
            Expr::Str(s, _) => Ok(Value::String(s.clone())),
            Expr::Null(_) => Ok(Value::Void),
            Expr::VariableRef(id, _) => frame
                .get(*id)
                .ok_or_else(|| RuntimeError::undefined_identifier_by_id(id_as_u32(*id))),
            Expr::VariableDef { id, init, .. } => {
                let v = match init {
                    Some(expr) => self.eval_expr(frame, expr)?,
                    None => Value::Void,
                };
                frame.define(*id, v.clone());
                Ok(v)
            }
            Expr::VariableAssign { id, op, value, .. } => {
                let rhs = self.eval_expr(frame, value)?;
                let new_value = match op {
                    AssignOp::Assign => rhs,
                    AssignOp::Add | AssignOp::Sub | AssignOp::Mul | AssignOp::Div => {
                        let current = frame
                            .get(*id)
                            .ok_or_else(|| RuntimeError::undefined_identifier_by_id(id_as_u32(*id)))?;
                        let bop = match op {
                            AssignOp::Add => BinaryOp::Add,
                            AssignOp::Sub => BinaryOp::Sub,
                            AssignOp::Mul => BinaryOp::Mul,
                            AssignOp::Div => BinaryOp::Div,
                            AssignOp::Assign => unreachable!(),
                        };
                        apply_binary(bop, current, rhs)?
                    }
                };
                frame.assign(*id, new_value.clone());
                Ok(new_value)
            }
            Expr::Unary { op, operand, line } => {
                let v = self.eval_expr(frame, operand)?;
                match op {
                    UnaryOp::Not => match v {
                        Value::Bool(b) => Ok(Value::Bool(!b)),
                        other => Err(RuntimeError::type_mismatch(
                            "bool",
                            other.type_name(),
                            *line,
                        )),
                    },
                    // Reserved optional-probe: produces bool, true iff
                    // the operand isn't void.
                    UnaryOp::Probe => Ok(Value::Bool(!matches!(v, Value::Void))),
                }
            }
            Expr::Binary { op, lhs, rhs, .. } => self.eval_binary(frame, *op, lhs, rhs),
            Expr::Range { .. } => unreachable!(
                "Range only appears as a for loop's iterable and is evaluated by eval_for"
            ),
            Expr::Call { callee, args, line } => self.eval_call(frame, *callee, args, *line),
            Expr::ObjectInit {
                type_id,
                fields,
                line,
            } => self.eval_object_init(frame, *type_id, fields, *line),
            Expr::Member { object, attr, line } => self.eval_member(frame, object, attr, *line),
        }
    }

    /// `&&`/`||` short-circuit (§5): the right operand is not
    /// evaluated once the left side already determines the result.
    fn eval_binary(
        &self,
        frame: &Frame,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinaryOp::And => {
                if !self.eval_bool(frame, lhs)? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_bool(frame, rhs)?))
            }
            BinaryOp::Or => {
                if self.eval_bool(frame, lhs)? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_bool(frame, rhs)?))
            }
            _ => {
                let lv = self.eval_expr(frame, lhs)?;
                let rv = self.eval_expr(frame, rhs)?;
                apply_binary(op, lv, rv)
            }
        }
    }

    fn eval_bool(&self, frame: &Frame, expr: &Expr) -> Result<bool, RuntimeError> {
        match self.eval_expr(frame, expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::type_mismatch(
                "bool",
                other.type_name(),
                expr.line(),
            )),
        }
    }

    fn eval_call(
        &self,
        frame: &Frame,
        callee: SymbolId,
        args: &[Expr],
        _line: u32,
    ) -> Result<Value, RuntimeError> {
        let values = args
            .iter()
            .map(|a| self.eval_expr(frame, a))
            .collect::<Result<Vec<_>, _>>()?;

        let def: &FunctionDef = self
            .ast
            .global
            .functions
            .get(&callee)
            .expect("a callee resolved by the parser always has a global function entry");

        if values.len() != def.args.params.len() {
            return Err(RuntimeError::argument_count_mismatch(
                def.args.params.len(),
                values.len(),
            ));
        }

        match &def.body {
            FunctionBody::Host(h) => host::call(*h, &values),
            FunctionBody::Block(block) => {
                // Parented at the call site, not the callee's own
                // lexical scope — `FunctionCall` in the source builds
                // its new `Evaluator` with `this` as parent.
                let child = frame.child();
                for (param, v) in def.args.params.iter().zip(values) {
                    child.define(param.id, v);
                }
                let (value, _) = self.eval_block(&child, block)?;
                Ok(value)
            }
        }
    }

    fn eval_object_init(
        &self,
        frame: &Frame,
        type_id: SymbolId,
        fields: &[(SymbolId, Expr)],
        _line: u32,
    ) -> Result<Value, RuntimeError> {
        let def = self
            .ast
            .global
            .objects
            .get(&type_id)
            .expect("an object type resolved by the parser always has a global entry");

        let mut values = std::collections::HashMap::new();
        for (field_id, expr) in fields {
            values.insert(*field_id, self.eval_expr(frame, expr)?);
        }
        for (attr_id, default) in &def.attributes {
            if !values.contains_key(attr_id) {
                let v = match default {
                    Some(expr) => self.eval_expr(frame, expr)?,
                    None => Value::Void,
                };
                values.insert(*attr_id, v);
            }
        }

        Ok(Value::Object(ObjectValue {
            type_id,
            type_name: def.name.clone(),
            fields: values,
        }))
    }

    fn eval_member(
        &self,
        frame: &Frame,
        object: &Expr,
        attr: &str,
        line: u32,
    ) -> Result<Value, RuntimeError> {
        let v = self.eval_expr(frame, object)?;
        let obj = match v {
            Value::Object(obj) => obj,
            other => {
                return Err(RuntimeError::type_mismatch(
                    "object",
                    other.type_name(),
                    line,
                ))
            }
        };
        let def = self
            .ast
            .global
            .objects
            .get(&obj.type_id)
            .expect("an object value's type always has a global entry");
        let attr_id = def
            .attributes
            .iter()
            .map(|(id, _)| *id)
            .find(|id| self.ast.symtab.info(*id).name == attr)
            .ok_or_else(|| RuntimeError::undefined_identifier(attr))?;
        Ok(obj
            .fields
            .get(&attr_id)
            .cloned()
            .unwrap_or(Value::Void))
    }
}

fn id_as_u32(id: SymbolId) -> u32 {
    use quillc_util::Idx;
    id.index() as u32
}

fn apply_binary(op: BinaryOp, lv: Value, rv: Value) -> Result<Value, RuntimeError> {
    use BinaryOp::*;
    match op {
        Add => match (lv, rv) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            _ => Err(RuntimeError::operator_type_mismatch()),
        },
        Sub => arith(lv, rv, |a, b| a - b),
        Mul => arith(lv, rv, |a, b| a * b),
        Div => arith(lv, rv, |a, b| a / b),
        Lt => compare(lv, rv, |a, b| a < b),
        Le => compare(lv, rv, |a, b| a <= b),
        Gt => compare(lv, rv, |a, b| a > b),
        Ge => compare(lv, rv, |a, b| a >= b),
        Eq => Ok(Value::Bool(lv.runtime_eq(&rv))),
        Ne => Ok(Value::Bool(!lv.runtime_eq(&rv))),
        And | Or => unreachable!("short-circuited in eval_binary before reaching apply_binary"),
    }
}

fn arith(lv: Value, rv: Value, f: impl Fn(f64, f64) -> f64) -> Result<Value, RuntimeError> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(a, b))),
        _ => Err(RuntimeError::operator_type_mismatch()),
    }
}

fn compare(lv: Value, rv: Value, f: impl Fn(f64, f64) -> bool) -> Result<Value, RuntimeError> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(a, b))),
        _ => Err(RuntimeError::operator_type_mismatch()),
    }
}
