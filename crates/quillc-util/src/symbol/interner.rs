//! String interner backed by a `DashMap`, keyed by an `AHash` hasher.
//!
//! Identifier text is leaked into `'static` storage once per distinct
//! string; the interner hands back a small integer handle afterwards.
//! This mirrors the concurrent-interner shape used elsewhere in the
//! teacher workspace, sized for a single source file's identifier set
//! rather than a whole-program symbol table.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::OnceLock;

use dashmap::DashMap;

use super::Symbol;

/// Running counters surfaced for diagnostics/tests; not load-bearing.
#[derive(Debug, Default, Clone, Copy)]
pub struct InternerStats {
    pub count: usize,
    pub hits: usize,
    pub misses: usize,
}

struct StringTable {
    by_text: DashMap<&'static str, u32, ahash::RandomState>,
    by_index: DashMap<u32, &'static str, ahash::RandomState>,
    next_index: AtomicU32,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl StringTable {
    fn new() -> Self {
        StringTable {
            by_text: DashMap::with_hasher(ahash::RandomState::new()),
            by_index: DashMap::with_hasher(ahash::RandomState::new()),
            next_index: AtomicU32::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn intern(&self, text: &str) -> Symbol {
        if let Some(existing) = self.by_text.get(text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Symbol::from_index(*existing);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.by_text.insert(leaked, index);
        self.by_index.insert(index, leaked);
        Symbol::from_index(index)
    }

    fn resolve(&self, index: u32) -> &'static str {
        self.by_index
            .get(&index)
            .map(|entry| *entry)
            .unwrap_or_else(|| panic!("symbol index {index} was never interned"))
    }

    fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.next_index.load(Ordering::Relaxed) as usize,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn table() -> &'static StringTable {
    static TABLE: OnceLock<StringTable> = OnceLock::new();
    TABLE.get_or_init(StringTable::new)
}

pub fn intern(text: &str) -> Symbol {
    table().intern(text)
}

pub fn resolve(sym: Symbol) -> &'static str {
    table().resolve(sym.index())
}

pub fn stats() -> InternerStats {
    table().stats()
}
