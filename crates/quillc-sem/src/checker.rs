//! The post-parse type-checking pass (§4.3). A single walk over every
//! user-defined function body and object definition, checked entirely
//! against the symbol table the parser already built — there is no
//! inference here, every expression's type is read directly off a
//! symbol or computed structurally from its operands.
//!
//! Grounded on `faxc-sem/src/analysis.rs`'s general shape (a visitor
//! carrying the enclosing function's expected return type through the
//! walk, reporting through a single error channel) re-keyed to this
//! language's much smaller, inference-free type lattice.

use indexmap::IndexMap;

use quillc_par::{
    Ast, BinaryOp, Block, Expr, FunctionBody, FunctionDef, IfArm, ObjectDef, Stmt, SymbolId,
    SymbolTable, UnaryOp, TYPE_ANY, TYPE_BOOL, TYPE_NUMBER, TYPE_STRING, TYPE_VOID,
};

use crate::error::{MismatchKind, TypeError};

/// Runs the full pass over every user-defined function and object.
/// Host functions have no body to check.
pub fn check(ast: &Ast) -> Result<(), TypeError> {
    for def in ast.global.functions.values() {
        check_function(&ast.symtab, &ast.global.functions, &ast.global.objects, def)?;
    }
    for def in ast.global.objects.values() {
        check_object(&ast.symtab, &ast.global.functions, &ast.global.objects, def)?;
    }
    log::debug!(
        "type check: {} function(s), {} object(s) passed",
        ast.global.functions.len(),
        ast.global.objects.len()
    );
    Ok(())
}

fn check_function(
    symtab: &SymbolTable,
    functions: &IndexMap<SymbolId, FunctionDef>,
    objects: &IndexMap<SymbolId, ObjectDef>,
    def: &FunctionDef,
) -> Result<(), TypeError> {
    let block = match &def.body {
        FunctionBody::Host(_) => return Ok(()),
        FunctionBody::Block(block) => block,
    };
    let mut checker = Checker {
        symtab,
        functions,
        objects,
        ret_type: def.args.return_type,
    };
    checker.check_block(block)?;

    if def.args.return_type != TYPE_VOID && !block_returns(block) {
        return Err(TypeError::mismatch(
            &checker.type_name(def.args.return_type),
            &checker.type_name(TYPE_VOID),
            def.line,
            MismatchKind::Return,
        ));
    }
    Ok(())
}

fn check_object(
    symtab: &SymbolTable,
    functions: &IndexMap<SymbolId, FunctionDef>,
    objects: &IndexMap<SymbolId, ObjectDef>,
    def: &ObjectDef,
) -> Result<(), TypeError> {
    let mut checker = Checker {
        symtab,
        functions,
        objects,
        ret_type: TYPE_VOID,
    };
    for (attr_id, init) in &def.attributes {
        if let Some(expr) = init {
            let declared = symtab.info(*attr_id).type_id;
            let actual = checker.check_expr(expr)?;
            checker.require_assignable(declared, actual, expr.line())?;
        }
    }
    Ok(())
}

/// Purely structural, per §4.3: "A block returns iff any statement on
/// its straight-line path is `Return` or a returning if-chain." Loop
/// bodies never make a block returning — the source gives no static
/// guarantee a loop body executes at all.
fn block_returns(block: &Block) -> bool {
    block.stmts.iter().any(stmt_returns)
}

fn stmt_returns(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return { .. } => true,
        Stmt::If(chain) => {
            let arm_returns = |arm: &IfArm| block_returns(&arm.body);
            arm_returns(&chain.if_arm)
                && chain.elseif_arms.iter().all(arm_returns)
                && chain
                    .else_body
                    .as_ref()
                    .map(block_returns)
                    .unwrap_or(false)
        }
        _ => false,
    }
}

struct Checker<'a> {
    symtab: &'a SymbolTable,
    functions: &'a IndexMap<SymbolId, FunctionDef>,
    objects: &'a IndexMap<SymbolId, ObjectDef>,
    ret_type: SymbolId,
}

impl<'a> Checker<'a> {
    fn type_name(&self, id: SymbolId) -> String {
        self.symtab.info(id).name.clone()
    }

    fn mismatch(&self, expected: SymbolId, actual: SymbolId, line: u32) -> TypeError {
        TypeError::mismatch(
            &self.type_name(expected),
            &self.type_name(actual),
            line,
            MismatchKind::Assignment,
        )
    }

    fn require_assignable(
        &self,
        declared: SymbolId,
        actual: SymbolId,
        line: u32,
    ) -> Result<(), TypeError> {
        if declared == TYPE_ANY || actual == TYPE_ANY || declared == actual {
            Ok(())
        } else {
            Err(self.mismatch(declared, actual, line))
        }
    }

    fn check_block(&mut self, block: &Block) -> Result<(), TypeError> {
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), TypeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.check_expr(expr)?;
                Ok(())
            }
            Stmt::Return { value, line } => {
                let actual = match value {
                    Some(expr) => self.check_expr(expr)?,
                    None => TYPE_VOID,
                };
                if actual != TYPE_ANY && self.ret_type != TYPE_ANY && actual != self.ret_type {
                    return Err(TypeError::mismatch(
                        &self.type_name(self.ret_type),
                        &self.type_name(actual),
                        *line,
                        MismatchKind::Return,
                    ));
                }
                Ok(())
            }
            Stmt::If(chain) => {
                self.check_expr(&chain.if_arm.cond)?;
                self.check_block(&chain.if_arm.body)?;
                for arm in &chain.elseif_arms {
                    self.check_expr(&arm.cond)?;
                    self.check_block(&arm.body)?;
                }
                if let Some(body) = &chain.else_body {
                    self.check_block(body)?;
                }
                Ok(())
            }
            Stmt::While { cond, body, .. } => {
                self.check_expr(cond)?;
                self.check_block(body)
            }
            Stmt::DoWhile { body, cond, .. } => {
                self.check_block(body)?;
                self.check_expr(cond)?;
                Ok(())
            }
            Stmt::For { iter, body, .. } => {
                self.check_expr(iter)?;
                self.check_block(body)
            }
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<SymbolId, TypeError> {
        match expr {
            Expr::Bool(_, _) => Ok(TYPE_BOOL),
            Expr::Number(_, _) => Ok(TYPE_NUMBER),
            Expr::Str(_, _) => Ok(TYPE_STRING),
            Expr::Null(_) => Ok(TYPE_VOID),
            Expr::VariableRef(id, _) => Ok(self.symtab.info(*id).type_id),
            Expr::VariableDef { id, init, line } => {
                let declared = self.symtab.info(*id).type_id;
                if let Some(init_expr) = init {
                    let actual = self.check_expr(init_expr)?;
                    self.require_assignable(declared, actual, *line)?;
                }
                Ok(declared)
            }
            Expr::VariableAssign {
                id, value, line, ..
            } => {
                let declared = self.symtab.info(*id).type_id;
                let actual = self.check_expr(value)?;
                self.require_assignable(declared, actual, *line)?;
                Ok(declared)
            }
            Expr::Unary { op, operand, line } => {
                let t = self.check_expr(operand)?;
                match op {
                    UnaryOp::Not => {
                        if t == TYPE_BOOL || t == TYPE_ANY {
                            Ok(TYPE_BOOL)
                        } else {
                            Err(self.mismatch(TYPE_BOOL, t, *line))
                        }
                    }
                    UnaryOp::Probe => Ok(TYPE_BOOL),
                }
            }
            Expr::Binary { op, lhs, rhs, line } => {
                let lt = self.check_expr(lhs)?;
                let rt = self.check_expr(rhs)?;
                self.check_binary(*op, lt, rt, *line)
            }
            Expr::Range { from, to, .. } => {
                self.check_expr(from)?;
                self.check_expr(to)?;
                Ok(TYPE_NUMBER)
            }
            Expr::Call { callee, args, line } => self.check_call(*callee, args, *line),
            Expr::ObjectInit {
                type_id,
                fields,
                line,
            } => self.check_object_init(*type_id, fields, *line),
            Expr::Member { object, attr, line } => self.check_member(object, attr, *line),
        }
    }

    fn check_binary(
        &self,
        op: BinaryOp,
        lt: SymbolId,
        rt: SymbolId,
        line: u32,
    ) -> Result<SymbolId, TypeError> {
        use BinaryOp::*;
        match op {
            Add => {
                if lt == TYPE_NUMBER && rt == TYPE_NUMBER {
                    Ok(TYPE_NUMBER)
                } else if lt == TYPE_STRING && rt == TYPE_STRING {
                    Ok(TYPE_STRING)
                } else if lt == TYPE_ANY || rt == TYPE_ANY {
                    Ok(TYPE_ANY)
                } else {
                    Err(self.mismatch(TYPE_NUMBER, rt, line))
                }
            }
            Sub | Mul | Div => self.numeric(lt, rt, line, TYPE_NUMBER),
            Lt | Le | Gt | Ge => self.numeric(lt, rt, line, TYPE_BOOL),
            And | Or => {
                if lt == TYPE_BOOL && rt == TYPE_BOOL {
                    Ok(TYPE_BOOL)
                } else if lt == TYPE_ANY || rt == TYPE_ANY {
                    Ok(TYPE_BOOL)
                } else {
                    Err(self.mismatch(TYPE_BOOL, if lt != TYPE_BOOL { lt } else { rt }, line))
                }
            }
            // Differing concrete operand types are not a static
            // error here: §4.4 gives defined runtime semantics for
            // them (false for `==`, true for `!=`), which rejecting
            // them statically would make unreachable.
            Eq | Ne => Ok(TYPE_BOOL),
        }
    }

    fn numeric(
        &self,
        lt: SymbolId,
        rt: SymbolId,
        line: u32,
        result: SymbolId,
    ) -> Result<SymbolId, TypeError> {
        if lt == TYPE_NUMBER && rt == TYPE_NUMBER {
            Ok(result)
        } else if lt == TYPE_ANY || rt == TYPE_ANY {
            Ok(result)
        } else {
            Err(self.mismatch(TYPE_NUMBER, if lt != TYPE_NUMBER { lt } else { rt }, line))
        }
    }

    fn check_call(&mut self, callee: SymbolId, args: &[Expr], line: u32) -> Result<SymbolId, TypeError> {
        let def = self
            .functions
            .get(&callee)
            .expect("a callee resolved by the parser always has an entry in the global function table");
        if args.len() != def.args.params.len() {
            return Err(TypeError::argument_count_mismatch(
                def.args.params.len(),
                args.len(),
                line,
            ));
        }
        for (param, arg) in def.args.params.iter().zip(args) {
            let actual = self.check_expr(arg)?;
            let declared = self.symtab.info(param.id).type_id;
            self.require_assignable(declared, actual, line)?;
        }
        Ok(def.args.return_type)
    }

    fn check_object_init(
        &mut self,
        type_id: SymbolId,
        fields: &[(SymbolId, Expr)],
        line: u32,
    ) -> Result<SymbolId, TypeError> {
        for (field_id, expr) in fields {
            let actual = self.check_expr(expr)?;
            let declared = self.symtab.info(*field_id).type_id;
            self.require_assignable(declared, actual, line)?;
        }
        Ok(type_id)
    }

    fn check_member(&mut self, object: &Expr, attr: &str, line: u32) -> Result<SymbolId, TypeError> {
        let obj_type = self.check_expr(object)?;
        if obj_type == TYPE_ANY {
            return Ok(TYPE_ANY);
        }
        let obj_def = match self.objects.get(&obj_type) {
            Some(def) => def,
            None => return Err(TypeError::undefined_identifier(attr, line)),
        };
        for (attr_id, _) in &obj_def.attributes {
            if self.symtab.info(*attr_id).name == attr {
                return Ok(self.symtab.info(*attr_id).type_id);
            }
        }
        Err(TypeError::undefined_identifier(attr, line))
    }
}
