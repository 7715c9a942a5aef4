//! Top-level productions: `Global`, `FunctionDef`, `Arguments`,
//! `ObjectDef`, and the restricted parameter form `Arguments` actually
//! uses (no `var` keyword, no initializer — distinct from the
//! statement-level `VariableDef` used for object attributes and local
//! declarations, even though the design-level grammar reuses the same
//! nonterminal name for both).

use indexmap::IndexMap;
use quillc_lex::TokenKind;

use crate::ast::{Arguments, Expr, FunctionBody, FunctionDef, Global, ObjectDef, Param};
use crate::error::ParserError;
use crate::parser::Parser;
use crate::symtab::{SymbolId, TYPE_ANY, TYPE_VOID};

impl<'a> Parser<'a> {
    pub(crate) fn parse_global(&mut self) -> Result<Global, ParserError> {
        let mut functions = IndexMap::new();
        let mut objects = IndexMap::new();
        loop {
            match self.look.kind {
                TokenKind::Func => {
                    let def = self.parse_function_def()?;
                    functions.insert(def.id, def);
                }
                TokenKind::Object => {
                    let def = self.parse_object_def()?;
                    objects.insert(def.id, def);
                }
                TokenKind::Eof => break,
                _ => {
                    return Err(ParserError::parse(
                        &self.look,
                        &[TokenKind::Func, TokenKind::Object],
                    ))
                }
            }
        }
        Ok(Global {
            scope: self.scope,
            functions,
            objects,
        })
    }

    fn parse_function_def(&mut self) -> Result<FunctionDef, ParserError> {
        let start = self.expect(TokenKind::Func)?;
        let line = start.line;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let name = name_tok.text.clone();
        let id = self.add_symbol(&name, line)?;

        let parent = self.scope;
        let scope = self.push_scope();
        let args = self.parse_arguments()?;
        let body_block = self.parse_block()?;
        self.pop_scope(parent);

        self.table.set_type(id, args.return_type, true);

        Ok(FunctionDef {
            id,
            name,
            scope,
            args,
            body: FunctionBody::Block(body_block),
            line,
        })
    }

    fn parse_arguments(&mut self) -> Result<Arguments, ParserError> {
        self.expect(TokenKind::ParenOpen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::ParenClose) {
            loop {
                params.push(self.parse_param()?);
                if self.check(TokenKind::Comma) {
                    self.shift();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::ParenClose)?;

        let return_type = if self.check(TokenKind::Colon) {
            self.shift();
            self.parse_type_name()?
        } else {
            TYPE_VOID
        };

        Ok(Arguments {
            params,
            return_type,
        })
    }

    /// The parameter form `Ident (':' Ident)?` — no `var`, no
    /// initializer. Distinct from `parse_var_decl`, which backs the
    /// full statement-level `VariableDef` production.
    fn parse_param(&mut self) -> Result<Param, ParserError> {
        let name_tok = self.expect(TokenKind::Identifier)?;
        let line = name_tok.line;
        let type_id = if self.check(TokenKind::Colon) {
            self.shift();
            self.parse_type_name()?
        } else {
            TYPE_ANY
        };
        let id = self.add_symbol(&name_tok.text, line)?;
        self.table.set_type(id, type_id, false);
        Ok(Param { id, line })
    }

    pub(crate) fn parse_type_name(&mut self) -> Result<SymbolId, ParserError> {
        let type_tok = self.expect(TokenKind::Identifier)?;
        self.lookup_symbol(&type_tok.text, type_tok.line)
    }

    fn parse_object_def(&mut self) -> Result<ObjectDef, ParserError> {
        let start = self.expect(TokenKind::Object)?;
        let line = start.line;
        let name_tok = self.expect(TokenKind::Identifier)?;
        let name = name_tok.text.clone();
        let id = self.add_symbol(&name, line)?;
        // An object type's own "type" is itself: an attribute typed
        // `Foo` checks against `Foo`'s own symbol id, not a separate
        // type-of-types indirection.
        self.table.set_type(id, id, false);

        self.expect(TokenKind::CurlyOpen)?;
        let parent = self.scope;
        let scope = self.push_scope();
        self.object_scopes.insert(id, scope);

        let mut attributes = Vec::new();
        while self.check(TokenKind::Var) {
            attributes.push(self.parse_attribute_def()?);
        }
        self.expect(TokenKind::CurlyClose)?;
        self.pop_scope(parent);

        Ok(ObjectDef {
            id,
            name,
            scope,
            attributes,
            line,
        })
    }

    /// Attribute form of `VariableDef`. Unlike a block statement's
    /// `var x = e;`, an attribute is not wrapped in an
    /// `Expression ';'` statement — §6.4 names only expression
    /// statements and `do-while` as needing a terminating semicolon —
    /// so the `var` keyword of the next attribute is what ends this
    /// one.
    fn parse_attribute_def(&mut self) -> Result<(SymbolId, Option<Expr>), ParserError> {
        let (id, init, _line) = self.parse_var_decl()?;
        Ok((id, init))
    }
}
