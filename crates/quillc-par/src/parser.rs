//! The parser driver: token lookahead, scope bookkeeping, and the
//! small set of helpers every grammar-production method builds on.
//! Grounded on `faxc-par`'s general recursive-descent/Pratt-parsing
//! shape (a `Lexer` plus one token of lookahead, `expect`/`check`
//! helpers, push/pop scope discipline) re-keyed to this grammar;
//! none of the teacher's actual node definitions survive, since they
//! target a much larger language.

use std::collections::HashMap;

use indexmap::IndexMap;
use quillc_lex::{Lexer, Token, TokenKind};

use crate::ast::{Arguments, Ast, FunctionBody, FunctionDef, Global, HostFn, Param};
use crate::error::ParserError;
use crate::symtab::{ScopeId, SymbolId, SymbolTable, SCOPE_ROOT};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pub(crate) look: Token,
    pub(crate) table: SymbolTable,
    pub(crate) scope: ScopeId,
    /// Maps an object type's `SymbolId` to the scope holding its
    /// attributes, so `new Type { field: expr }` can resolve `field`
    /// to an attribute id without waiting on the type checker.
    pub(crate) object_scopes: HashMap<SymbolId, ScopeId>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let look = lexer.next_token();
        Parser {
            lexer,
            look,
            table: SymbolTable::new(),
            scope: SCOPE_ROOT,
            object_scopes: HashMap::new(),
        }
    }

    pub(crate) fn shift(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.look, next)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.look.kind == kind
    }

    /// Consumes the lookahead token if it matches `kind`, else raises
    /// a parse error naming `kind` as the sole expectation.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParserError> {
        if self.check(kind) {
            Ok(self.shift())
        } else {
            Err(ParserError::parse(&self.look, &[kind]))
        }
    }

    pub(crate) fn push_scope(&mut self) -> ScopeId {
        let child = self.table.new_scope(self.scope);
        self.scope = child;
        child
    }

    /// Restores the enclosing scope. `child` must be the scope
    /// `push_scope` most recently returned.
    pub(crate) fn pop_scope(&mut self, parent: ScopeId) {
        self.scope = parent;
    }

    pub(crate) fn add_symbol(&mut self, name: &str, line: u32) -> Result<SymbolId, ParserError> {
        self.table
            .add(self.scope, name)
            .map_err(|e| ParserError::from_symtab(e, line))
    }

    pub(crate) fn lookup_symbol(&self, name: &str, line: u32) -> Result<SymbolId, ParserError> {
        self.table
            .lookup(self.scope, name)
            .map_err(|e| ParserError::from_symtab(e, line))
    }

    pub(crate) fn lookup_symbol_in(
        &self,
        scope: ScopeId,
        name: &str,
        line: u32,
    ) -> Result<SymbolId, ParserError> {
        self.table
            .lookup(scope, name)
            .map_err(|e| ParserError::from_symtab(e, line))
    }
}

/// Synthesizes `FunctionDef`s for the four predeclared host functions
/// so the evaluator can resolve a call by name uniformly whether it
/// lands on user source or a host builtin — mirrors how §4.2's
/// `FunctionDef` note says it "may instead wrap a host function".
/// None of these appear in source text; their line is 0.
fn host_function_defs() -> IndexMap<SymbolId, FunctionDef> {
    use crate::symtab::{
        FN_READ_NUMBER, FN_READ_TEXT, FN_WRITE, FN_WRITE_LINE, PARAM_WRITE, PARAM_WRITE_LINE,
        SCOPE_ROOT, SCOPE_WRITE, SCOPE_WRITE_LINE, TYPE_NUMBER, TYPE_STRING, TYPE_VOID,
    };

    let mut functions = IndexMap::new();
    functions.insert(
        FN_WRITE,
        FunctionDef {
            id: FN_WRITE,
            name: "Write".to_string(),
            scope: SCOPE_WRITE,
            args: Arguments {
                params: vec![Param {
                    id: PARAM_WRITE,
                    line: 0,
                }],
                return_type: TYPE_VOID,
            },
            body: FunctionBody::Host(HostFn::Write),
            line: 0,
        },
    );
    functions.insert(
        FN_WRITE_LINE,
        FunctionDef {
            id: FN_WRITE_LINE,
            name: "WriteLine".to_string(),
            scope: SCOPE_WRITE_LINE,
            args: Arguments {
                params: vec![Param {
                    id: PARAM_WRITE_LINE,
                    line: 0,
                }],
                return_type: TYPE_VOID,
            },
            body: FunctionBody::Host(HostFn::WriteLine),
            line: 0,
        },
    );
    functions.insert(
        FN_READ_NUMBER,
        FunctionDef {
            id: FN_READ_NUMBER,
            name: "ReadNumber".to_string(),
            scope: SCOPE_ROOT,
            args: Arguments {
                params: vec![],
                return_type: TYPE_NUMBER,
            },
            body: FunctionBody::Host(HostFn::ReadNumber),
            line: 0,
        },
    );
    functions.insert(
        FN_READ_TEXT,
        FunctionDef {
            id: FN_READ_TEXT,
            name: "ReadText".to_string(),
            scope: SCOPE_ROOT,
            args: Arguments {
                params: vec![],
                return_type: TYPE_STRING,
            },
            body: FunctionBody::Host(HostFn::ReadText),
            line: 0,
        },
    );
    functions
}

/// Parses a complete program into its symbol table and top-level
/// declarations.
pub fn parse(source: &str) -> Result<Ast, ParserError> {
    log::debug!("parse: {} bytes of source", source.len());
    let mut parser = Parser::new(source);
    let global = parser.parse_global().map_err(|e| {
        log::debug!("parse failed on line {}: {}", e.line, e.message);
        e
    })?;
    log::debug!(
        "parse: {} function(s), {} object(s)",
        global.functions.len(),
        global.objects.len()
    );

    let mut functions = host_function_defs();
    for (id, def) in global.functions {
        functions.insert(id, def);
    }

    Ok(Ast {
        symtab: parser.table,
        global: Global {
            scope: global.scope,
            functions,
            objects: global.objects,
        },
    })
}
