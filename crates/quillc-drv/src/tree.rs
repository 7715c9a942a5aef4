//! The `-tree` canonical textual AST form (§6.3): a kind header per
//! node, four-space indentation per depth, `id:name` symbol rendering,
//! and a sorted `Symbols: { .. }` header at each node that owns a
//! scope — omitted when that scope binds nothing.

use std::fmt::Write as _;

use quillc_par::{
    Ast, AssignOp, BinaryOp, Block, Expr, FunctionBody, FunctionDef, Global, ObjectDef, ScopeId,
    Stmt, SymbolId, SymbolTable, UnaryOp,
};
use quillc_util::Idx;

pub fn render(ast: &Ast) -> String {
    let mut out = String::new();
    let printer = Printer {
        symtab: &ast.symtab,
    };
    printer.global(&mut out, &ast.global, 0);
    out
}

struct Printer<'a> {
    symtab: &'a SymbolTable,
}

impl<'a> Printer<'a> {
    fn indent(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("    ");
        }
    }

    fn line(&self, out: &mut String, depth: usize, text: &str) {
        self.indent(out, depth);
        out.push_str(text);
        out.push('\n');
    }

    fn sym(&self, id: SymbolId) -> String {
        format!("{}:{}", id.index(), self.symtab.info(id).name)
    }

    fn scope_header(&self, out: &mut String, scope: ScopeId, depth: usize) {
        let mut entries: Vec<(&str, SymbolId)> = self.symtab.scopes[scope].bindings().collect();
        if entries.is_empty() {
            return;
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let mut text = String::from("Symbols: { ");
        for (i, (name, id)) in entries.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            let _ = write!(text, "{}:{}", id.index(), name);
        }
        text.push_str(" }");
        self.line(out, depth, &text);
    }

    fn global(&self, out: &mut String, global: &Global, depth: usize) {
        self.line(out, depth, "Global");
        self.scope_header(out, global.scope, depth + 1);
        for def in global.functions.values() {
            self.function(out, def, depth + 1);
        }
        for def in global.objects.values() {
            self.object(out, def, depth + 1);
        }
    }

    fn function(&self, out: &mut String, def: &FunctionDef, depth: usize) {
        self.line(
            out,
            depth,
            &format!(
                "Function {} : {}",
                self.sym(def.id),
                self.symtab.info(def.args.return_type).name
            ),
        );
        self.scope_header(out, def.scope, depth + 1);
        for param in &def.args.params {
            self.line(out, depth + 1, &format!("Param {}", self.sym(param.id)));
        }
        match &def.body {
            FunctionBody::Host(host) => {
                self.line(out, depth + 1, &format!("Host({host:?})"));
            }
            FunctionBody::Block(block) => self.block(out, block, depth + 1),
        }
    }

    fn object(&self, out: &mut String, def: &ObjectDef, depth: usize) {
        self.line(out, depth, &format!("Object {}", self.sym(def.id)));
        self.scope_header(out, def.scope, depth + 1);
        for (attr_id, default) in &def.attributes {
            self.line(out, depth + 1, &format!("Attribute {}", self.sym(*attr_id)));
            if let Some(expr) = default {
                self.expr(out, expr, depth + 2);
            }
        }
    }

    fn block(&self, out: &mut String, block: &Block, depth: usize) {
        self.line(out, depth, "Block");
        self.scope_header(out, block.scope, depth + 1);
        for stmt in &block.stmts {
            self.stmt(out, stmt, depth + 1);
        }
    }

    fn stmt(&self, out: &mut String, stmt: &Stmt, depth: usize) {
        match stmt {
            Stmt::Expr(expr) => {
                self.line(out, depth, "ExprStmt");
                self.expr(out, expr, depth + 1);
            }
            Stmt::Return { value, .. } => {
                self.line(out, depth, "Return");
                if let Some(expr) = value {
                    self.expr(out, expr, depth + 1);
                }
            }
            Stmt::If(chain) => {
                self.line(out, depth, "If");
                self.expr(out, &chain.if_arm.cond, depth + 1);
                self.block(out, &chain.if_arm.body, depth + 1);
                for arm in &chain.elseif_arms {
                    self.line(out, depth, "Elseif");
                    self.expr(out, &arm.cond, depth + 1);
                    self.block(out, &arm.body, depth + 1);
                }
                if let Some(body) = &chain.else_body {
                    self.line(out, depth, "Else");
                    self.block(out, body, depth + 1);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.line(out, depth, "While");
                self.expr(out, cond, depth + 1);
                self.block(out, body, depth + 1);
            }
            Stmt::DoWhile { body, cond, .. } => {
                self.line(out, depth, "DoWhile");
                self.block(out, body, depth + 1);
                self.expr(out, cond, depth + 1);
            }
            Stmt::For { var, iter, body, .. } => {
                self.line(out, depth, &format!("For {}", self.sym(*var)));
                self.expr(out, iter, depth + 1);
                self.block(out, body, depth + 1);
            }
        }
    }

    fn expr(&self, out: &mut String, expr: &Expr, depth: usize) {
        match expr {
            Expr::Bool(b, _) => self.line(out, depth, &format!("Bool({b})")),
            Expr::Number(n, _) => self.line(out, depth, &format!("Number({n})")),
            Expr::Str(s, _) => self.line(out, depth, &format!("Str({s:?})")),
            Expr::Null(_) => self.line(out, depth, "Null"),
            Expr::VariableRef(id, _) => {
                self.line(out, depth, &format!("VariableRef({})", self.sym(*id)))
            }
            Expr::VariableDef { id, init, .. } => {
                self.line(out, depth, &format!("VariableDef({})", self.sym(*id)));
                if let Some(expr) = init {
                    self.expr(out, expr, depth + 1);
                }
            }
            Expr::VariableAssign { id, op, value, .. } => {
                self.line(
                    out,
                    depth,
                    &format!("VariableAssign({}, {})", self.sym(*id), assign_op_name(*op)),
                );
                self.expr(out, value, depth + 1);
            }
            Expr::Unary { op, operand, .. } => {
                self.line(out, depth, &format!("Unary({})", unary_op_name(*op)));
                self.expr(out, operand, depth + 1);
            }
            Expr::Binary { op, lhs, rhs, .. } => {
                self.line(out, depth, &format!("Binary({})", binary_op_name(*op)));
                self.expr(out, lhs, depth + 1);
                self.expr(out, rhs, depth + 1);
            }
            Expr::Range {
                from,
                to,
                inclusive,
                ..
            } => {
                self.line(
                    out,
                    depth,
                    if *inclusive { "Range(...)" } else { "Range(..<)" },
                );
                self.expr(out, from, depth + 1);
                self.expr(out, to, depth + 1);
            }
            Expr::Call { callee, args, .. } => {
                self.line(out, depth, &format!("Call({})", self.sym(*callee)));
                for arg in args {
                    self.expr(out, arg, depth + 1);
                }
            }
            Expr::ObjectInit {
                type_id, fields, ..
            } => {
                self.line(out, depth, &format!("ObjectInit({})", self.sym(*type_id)));
                for (field_id, value) in fields {
                    self.line(out, depth + 1, &format!("Field {}", self.sym(*field_id)));
                    self.expr(out, value, depth + 2);
                }
            }
            Expr::Member { object, attr, .. } => {
                self.line(out, depth, &format!("Member(.{attr})"));
                self.expr(out, object, depth + 1);
            }
        }
    }
}

fn assign_op_name(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::Add => "+=",
        AssignOp::Sub => "-=",
        AssignOp::Mul => "*=",
        AssignOp::Div => "/=",
    }
}

fn unary_op_name(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Not => "!",
        UnaryOp::Probe => "?",
    }
}

fn binary_op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_par::parse;

    #[test]
    fn empty_function_tree_has_no_block_symbols_line() {
        let ast = parse("func foo() {}").unwrap();
        let text = render(&ast);
        let foo_block = text
            .lines()
            .skip_while(|l| l.trim() != "Function 12:foo : void")
            .nth(1)
            .unwrap();
        assert_eq!(foo_block.trim(), "Block");
    }

    #[test]
    fn function_with_a_param_lists_it_under_symbols() {
        let ast = parse("func foo(a: any) : any { return a; }").unwrap();
        let text = render(&ast);
        assert!(text.contains("Symbols: { "));
        assert!(text.contains("Param "));
    }

    #[test]
    fn indentation_is_four_spaces_per_depth() {
        let ast = parse("func foo() : number { return 1; }").unwrap();
        let text = render(&ast);
        let return_line = text.lines().find(|l| l.trim() == "Return").unwrap();
        let indent_len = return_line.len() - return_line.trim_start().len();
        assert_eq!(indent_len % 4, 0);
        assert!(indent_len >= 8);
    }

    #[test]
    fn tree_rendering_is_stable_across_runs() {
        let ast1 = parse("func foo(a: number) : number { return a + 1; }").unwrap();
        let ast2 = parse("func foo(a: number) : number { return a + 1; }").unwrap();
        assert_eq!(render(&ast1), render(&ast2));
    }
}
