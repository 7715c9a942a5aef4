//! Expression productions, one method per precedence level from
//! lowest (assignment) to highest (unary), per the table in §4.2:
//! `= += -= *= /=` (right) < `||` < `&&` < `== !=` < `< <= > >=` <
//! `..< ...` < `+ -` < `* /` < `.` (postfix) < `! ?` (prefix).

use quillc_lex::TokenKind;

use crate::ast::{AssignOp, BinaryOp, Expr, UnaryOp};
use crate::error::ParserError;
use crate::parser::Parser;
use crate::symtab::{SymbolId, TYPE_ANY};

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParserError> {
        let lhs = self.parse_or()?;
        if self.check(TokenKind::BinaryOperator)
            && matches!(self.look.text.as_str(), "=" | "+=" | "-=" | "*=" | "/=")
        {
            let op_tok = self.shift();
            let line = op_tok.line;
            let op = match op_tok.text.as_str() {
                "=" => AssignOp::Assign,
                "+=" => AssignOp::Add,
                "-=" => AssignOp::Sub,
                "*=" => AssignOp::Mul,
                "/=" => AssignOp::Div,
                _ => unreachable!("matched above"),
            };
            let id = match lhs {
                Expr::VariableRef(id, _) => id,
                _ => return Err(ParserError::parse(&op_tok, &[TokenKind::Identifier])),
            };
            let value = Box::new(self.parse_assignment()?);
            return Ok(Expr::VariableAssign {
                id,
                op,
                value,
                line,
            });
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_and()?;
        while self.check(TokenKind::BinaryOperator) && self.look.text == "||" {
            let op_tok = self.shift();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_tok.line,
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_equality()?;
        while self.check(TokenKind::BinaryOperator) && self.look.text == "&&" {
            let op_tok = self.shift();
            let rhs = self.parse_equality()?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_tok.line,
            };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.look.text.as_str() {
                "==" if self.check(TokenKind::BinaryOperator) => BinaryOp::Eq,
                "!=" if self.check(TokenKind::BinaryOperator) => BinaryOp::Ne,
                _ => break,
            };
            let op_tok = self.shift();
            let rhs = self.parse_relational()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_tok.line,
            };
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_range()?;
        loop {
            let op = match self.look.text.as_str() {
                "<" if self.check(TokenKind::BinaryOperator) => BinaryOp::Lt,
                "<=" if self.check(TokenKind::BinaryOperator) => BinaryOp::Le,
                ">" if self.check(TokenKind::BinaryOperator) => BinaryOp::Gt,
                ">=" if self.check(TokenKind::BinaryOperator) => BinaryOp::Ge,
                _ => break,
            };
            let op_tok = self.shift();
            let rhs = self.parse_range()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_tok.line,
            };
        }
        Ok(lhs)
    }

    /// A single, non-chaining application — `a..<b..<c` has no
    /// meaning, so this does not loop like the binary levels above.
    fn parse_range(&mut self) -> Result<Expr, ParserError> {
        let lhs = self.parse_additive()?;
        if self.check(TokenKind::RangeOperator) {
            let op_tok = self.shift();
            let inclusive = op_tok.text == "...";
            let rhs = self.parse_additive()?;
            return Ok(Expr::Range {
                from: Box::new(lhs),
                to: Box::new(rhs),
                inclusive,
                line: op_tok.line,
            });
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.look.text.as_str() {
                "+" if self.check(TokenKind::BinaryOperator) => BinaryOp::Add,
                "-" if self.check(TokenKind::BinaryOperator) => BinaryOp::Sub,
                _ => break,
            };
            let op_tok = self.shift();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_tok.line,
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParserError> {
        let mut lhs = self.parse_member()?;
        loop {
            let op = match self.look.text.as_str() {
                "*" if self.check(TokenKind::BinaryOperator) => BinaryOp::Mul,
                "/" if self.check(TokenKind::BinaryOperator) => BinaryOp::Div,
                _ => break,
            };
            let op_tok = self.shift();
            let rhs = self.parse_member()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: op_tok.line,
            };
        }
        Ok(lhs)
    }

    fn parse_member(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_unary()?;
        while self.check(TokenKind::BinaryOperator) && self.look.text == "." {
            let op_tok = self.shift();
            let attr_tok = self.expect(TokenKind::Identifier)?;
            expr = Expr::Member {
                object: Box::new(expr),
                attr: attr_tok.text,
                line: op_tok.line,
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParserError> {
        if self.check(TokenKind::UnaryOperator) {
            let op_tok = self.shift();
            let op = match op_tok.text.as_str() {
                "!" => UnaryOp::Not,
                "?" => UnaryOp::Probe,
                _ => unreachable!("lexer only emits ! and ? as UnaryOperator"),
            };
            let operand = Box::new(self.parse_unary()?);
            return Ok(Expr::Unary {
                op,
                operand,
                line: op_tok.line,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        match self.look.kind {
            TokenKind::Number => {
                let tok = self.shift();
                let value = tok
                    .text
                    .parse::<f64>()
                    .expect("lexer only emits well-formed Number lexemes");
                Ok(Expr::Number(value, tok.line))
            }
            TokenKind::String => {
                let tok = self.shift();
                let inner = &tok.text[1..tok.text.len() - 1];
                Ok(Expr::Str(inner.to_string(), tok.line))
            }
            TokenKind::True => {
                let tok = self.shift();
                Ok(Expr::Bool(true, tok.line))
            }
            TokenKind::False => {
                let tok = self.shift();
                Ok(Expr::Bool(false, tok.line))
            }
            TokenKind::Null => {
                let tok = self.shift();
                Ok(Expr::Null(tok.line))
            }
            TokenKind::Var => self.parse_variable_def_expr(),
            TokenKind::New => self.parse_object_init(),
            TokenKind::ParenOpen => {
                self.shift();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::ParenClose)?;
                Ok(inner)
            }
            TokenKind::Identifier => {
                let tok = self.shift();
                if self.check(TokenKind::ParenOpen) {
                    self.parse_call(&tok.text, tok.line)
                } else {
                    let id = self.lookup_symbol(&tok.text, tok.line)?;
                    Ok(Expr::VariableRef(id, tok.line))
                }
            }
            _ => Err(ParserError::parse(
                &self.look,
                &[
                    TokenKind::Number,
                    TokenKind::String,
                    TokenKind::True,
                    TokenKind::False,
                    TokenKind::Null,
                    TokenKind::Var,
                    TokenKind::New,
                    TokenKind::ParenOpen,
                    TokenKind::Identifier,
                ],
            )),
        }
    }

    fn parse_call(&mut self, name: &str, line: u32) -> Result<Expr, ParserError> {
        let callee = self.lookup_symbol(name, line)?;
        self.expect(TokenKind::ParenOpen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::ParenClose) {
            loop {
                args.push(self.parse_expr()?);
                if self.check(TokenKind::Comma) {
                    self.shift();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::ParenClose)?;
        Ok(Expr::Call { callee, args, line })
    }

    fn parse_object_init(&mut self) -> Result<Expr, ParserError> {
        let start = self.expect(TokenKind::New)?;
        let line = start.line;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let type_id = self.lookup_symbol(&name_tok.text, name_tok.line)?;
        self.expect(TokenKind::CurlyOpen)?;

        let mut fields = Vec::new();
        if !self.check(TokenKind::CurlyClose) {
            loop {
                let field_tok = self.expect(TokenKind::Identifier)?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expr()?;
                let attr_scope = match self.object_scopes.get(&type_id) {
                    Some(scope) => *scope,
                    None => {
                        return Err(ParserError::undefined_identifier(
                            &field_tok.text,
                            field_tok.line,
                        ))
                    }
                };
                let field_id = self.lookup_symbol_in(attr_scope, &field_tok.text, field_tok.line)?;
                fields.push((field_id, value));
                if self.check(TokenKind::Comma) {
                    self.shift();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::CurlyClose)?;
        Ok(Expr::ObjectInit {
            type_id,
            fields,
            line,
        })
    }

    fn parse_variable_def_expr(&mut self) -> Result<Expr, ParserError> {
        let (id, init, line) = self.parse_var_decl()?;
        Ok(Expr::VariableDef { id, init, line })
    }

    /// Shared backing for both the statement-level `var` expression
    /// form and object-attribute declarations: `'var' Ident
    /// (':' Ident)? ('=' Expression)?`.
    pub(crate) fn parse_var_decl(&mut self) -> Result<(SymbolId, Option<Expr>, u32), ParserError> {
        let start = self.expect(TokenKind::Var)?;
        let line = start.line;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let type_id = if self.check(TokenKind::Colon) {
            self.shift();
            self.parse_type_name()?
        } else {
            TYPE_ANY
        };
        let id = self.add_symbol(&name_tok.text, line)?;
        self.table.set_type(id, type_id, false);
        let init = if self.check(TokenKind::BinaryOperator) && self.look.text == "=" {
            self.shift();
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok((id, init, line))
    }
}
