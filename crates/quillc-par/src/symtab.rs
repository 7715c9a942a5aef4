//! Lexically scoped symbol table: a tree of scopes sharing a single,
//! explicit id allocator owned by the table itself (not the teacher's
//! global `AtomicU32` generator — spec ties every symbol id to one
//! program, so the counter lives on the `SymbolTable` that owns that
//! program).
//!
//! Grounded on `faxc-sem/src/scope.rs`'s `Rib`/`ScopeTree` shape
//! (parent-linked scopes stored in an index vector, resolved by
//! walking the parent chain), generalized with a flat, by-id symbol
//! store alongside it so lookup-by-id is O(1) regardless of which
//! scope a symbol was declared in.

use rustc_hash::FxHashMap;

use quillc_util::index_vec::{define_idx, IndexVec};

define_idx!(SymbolId);
define_idx!(ScopeId);

/// A resolved name: a stable id, its declared type (itself a
/// `SymbolId` referring to a type symbol), and role flags.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub id: SymbolId,
    pub name: String,
    pub type_id: SymbolId,
    pub is_function: bool,
    /// Carried from spec.md's symbol tuple; Quill's grammar has no
    /// array literal or array-typed declaration, so this is always
    /// `false` in practice.
    pub is_array: bool,
}

#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    bindings: FxHashMap<String, SymbolId>,
}

impl Scope {
    pub fn bindings(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.bindings.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone)]
pub enum SymtabError {
    UndefinedIdentifier(String),
    UndefinedIdentifierById(u32),
    IdentifierRedefinition(String),
}

pub const SCOPE_ROOT: ScopeId = ScopeId(0);

pub const TYPE_VOID: SymbolId = SymbolId(1);
pub const TYPE_BOOL: SymbolId = SymbolId(2);
pub const TYPE_NUMBER: SymbolId = SymbolId(3);
pub const TYPE_STRING: SymbolId = SymbolId(4);
pub const TYPE_ANY: SymbolId = SymbolId(5);

pub const FN_WRITE: SymbolId = SymbolId(6);
pub const PARAM_WRITE: SymbolId = SymbolId(7);
pub const FN_WRITE_LINE: SymbolId = SymbolId(8);
pub const PARAM_WRITE_LINE: SymbolId = SymbolId(9);
pub const FN_READ_NUMBER: SymbolId = SymbolId(10);
pub const FN_READ_TEXT: SymbolId = SymbolId(11);

/// Scope holding `Write`'s single `any`-typed parameter.
pub const SCOPE_WRITE: ScopeId = ScopeId(1);
/// Scope holding `WriteLine`'s single `any`-typed parameter.
pub const SCOPE_WRITE_LINE: ScopeId = ScopeId(2);

pub struct SymbolTable {
    symbols: IndexVec<SymbolId, SymbolInfo>,
    pub scopes: IndexVec<ScopeId, Scope>,
}

impl SymbolTable {
    /// Builds a table with the global scope pre-populated per spec.md
    /// §3.2: the five built-in types at ids 1..5, then `Write`,
    /// `WriteLine`, `ReadNumber`, `ReadText` at ids 6..11, with
    /// `Write`/`WriteLine` each getting their own parameter scope so
    /// the numbering comes out deterministic.
    pub fn new() -> Self {
        let mut table = SymbolTable {
            symbols: IndexVec::new(),
            scopes: IndexVec::new(),
        };
        // Id 0 is never issued to a real symbol (the root scope's id
        // counter in the source this was modeled on starts pre-increment
        // at 0, so the first real id is 1). Pushing a sentinel here
        // keeps this table's own id numbering in lockstep with
        // `symbols`'s positional index, so `SymbolId` doubles as a
        // direct `IndexVec` index with no separate counter to drift
        // out of sync.
        table.symbols.push(SymbolInfo {
            id: SymbolId(0),
            name: String::new(),
            type_id: SymbolId(0),
            is_function: false,
            is_array: false,
        });

        let root = table.scopes.push(Scope::default());
        debug_assert_eq!(root, SCOPE_ROOT);

        for name in ["void", "bool", "number", "string", "any"] {
            let id = table.define(root, name);
            table.set_type(id, id, false);
        }

        let write = table.define(root, "Write");
        let write_scope = table.scopes.push(Scope {
            parent: Some(root),
            bindings: FxHashMap::default(),
        });
        debug_assert_eq!(write_scope, SCOPE_WRITE);
        let write_param = table.define(write_scope, "value");
        table.set_type(write, TYPE_VOID, true);
        table.set_type(write_param, TYPE_ANY, false);

        let write_line = table.define(root, "WriteLine");
        let write_line_scope = table.scopes.push(Scope {
            parent: Some(root),
            bindings: FxHashMap::default(),
        });
        debug_assert_eq!(write_line_scope, SCOPE_WRITE_LINE);
        let write_line_param = table.define(write_line_scope, "value");
        table.set_type(write_line, TYPE_VOID, true);
        table.set_type(write_line_param, TYPE_ANY, false);

        let read_number = table.define(root, "ReadNumber");
        table.set_type(read_number, TYPE_NUMBER, true);

        let read_text = table.define(root, "ReadText");
        table.set_type(read_text, TYPE_STRING, true);

        debug_assert_eq!(write, FN_WRITE);
        debug_assert_eq!(write_param, PARAM_WRITE);
        debug_assert_eq!(write_line, FN_WRITE_LINE);
        debug_assert_eq!(write_line_param, PARAM_WRITE_LINE);
        debug_assert_eq!(read_number, FN_READ_NUMBER);
        debug_assert_eq!(read_text, FN_READ_TEXT);

        table
    }

    /// Inserts a name with no redefinition check — used only while
    /// seeding built-ins, which can never collide.
    fn define(&mut self, scope: ScopeId, name: &str) -> SymbolId {
        let id = self.symbols.push(SymbolInfo {
            id: SymbolId(0), // patched below, once the real id is known
            name: name.to_string(),
            type_id: TYPE_ANY,
            is_function: false,
            is_array: false,
        });
        self.symbols[id].id = id;
        self.scopes[scope].bindings.insert(name.to_string(), id);
        id
    }

    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: FxHashMap::default(),
        })
    }

    pub fn add(&mut self, scope: ScopeId, name: &str) -> Result<SymbolId, SymtabError> {
        if self.resolve(scope, name).is_some() {
            return Err(SymtabError::IdentifierRedefinition(name.to_string()));
        }
        Ok(self.define(scope, name))
    }

    pub fn set_type(&mut self, id: SymbolId, type_id: SymbolId, is_function: bool) {
        let info = &mut self.symbols[id];
        info.type_id = type_id;
        info.is_function = is_function;
    }

    fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut cur = Some(scope);
        while let Some(s) = cur {
            if let Some(&id) = self.scopes[s].bindings.get(name) {
                return Some(id);
            }
            cur = self.scopes[s].parent;
        }
        None
    }

    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<SymbolId, SymtabError> {
        self.resolve(scope, name)
            .ok_or_else(|| SymtabError::UndefinedIdentifier(name.to_string()))
    }

    pub fn info(&self, id: SymbolId) -> &SymbolInfo {
        &self.symbols[id]
    }

    pub fn get(&self, id: SymbolId) -> Result<&SymbolInfo, SymtabError> {
        self.symbols
            .get(id)
            .ok_or(SymtabError::UndefinedIdentifierById(id.index() as u32))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
