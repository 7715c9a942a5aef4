//! Statement-level productions: blocks, control constructs, and the
//! `for` loop's special scoping rule (its control variable lives only
//! in the loop body's own scope, not a wrapping one).

use quillc_lex::TokenKind;

use crate::ast::{Block, IfArm, IfChain, Stmt};
use crate::error::ParserError;
use crate::parser::Parser;
use crate::symtab::TYPE_NUMBER;

impl<'a> Parser<'a> {
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParserError> {
        let parent = self.scope;
        self.expect(TokenKind::CurlyOpen)?;
        let scope = self.push_scope();
        let stmts = self.parse_stmts_until(TokenKind::CurlyClose)?;
        self.expect(TokenKind::CurlyClose)?;
        self.pop_scope(parent);
        Ok(Block { scope, stmts })
    }

    fn parse_stmts_until(&mut self, end: TokenKind) -> Result<Vec<Stmt>, ParserError> {
        let mut stmts = Vec::new();
        while !self.check(end) {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParserError> {
        match self.look.kind {
            TokenKind::Return => self.parse_return(),
            TokenKind::For => self.parse_for(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_return(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::Return)?;
        let line = start.line;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return { value, line })
    }

    /// The loop variable must be visible only inside the loop body —
    /// so instead of the usual `parse_block` helper (which would push
    /// its own scope with no way to seed it first), the body's brace
    /// and scope are handled here directly, with the control variable
    /// inserted before the body's statements are parsed.
    fn parse_for(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::For)?;
        let line = start.line;
        let name_tok = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::In)?;
        let iter = self.parse_expr()?;

        let parent = self.scope;
        self.expect(TokenKind::CurlyOpen)?;
        let scope = self.push_scope();
        let var = self.add_symbol(&name_tok.text, name_tok.line)?;
        self.table.set_type(var, TYPE_NUMBER, false);
        let stmts = self.parse_stmts_until(TokenKind::CurlyClose)?;
        self.expect(TokenKind::CurlyClose)?;
        self.pop_scope(parent);

        Ok(Stmt::For {
            var,
            iter,
            body: Block { scope, stmts },
            line,
        })
    }

    fn parse_if_arm(&mut self, kind: TokenKind) -> Result<IfArm, ParserError> {
        let start = self.expect(kind)?;
        let line = start.line;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(IfArm { cond, body, line })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParserError> {
        let if_arm = self.parse_if_arm(TokenKind::If)?;
        let line = if_arm.line;
        let mut elseif_arms = Vec::new();
        while self.check(TokenKind::Elseif) {
            elseif_arms.push(self.parse_if_arm(TokenKind::Elseif)?);
        }
        let else_body = if self.check(TokenKind::Else) {
            self.shift();
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If(IfChain {
            if_arm,
            elseif_arms,
            else_body,
            line,
        }))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::While)?;
        let line = start.line;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body, line })
    }

    fn parse_do_while(&mut self) -> Result<Stmt, ParserError> {
        let start = self.expect(TokenKind::Do)?;
        let line = start.line;
        let body = self.parse_block()?;
        self.expect(TokenKind::While)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::DoWhile { body, cond, line })
    }
}
