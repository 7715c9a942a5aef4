//! Infrastructure error types shared by the compiler crates.
//!
//! Language-level errors (undefined identifier, type mismatch, and so on)
//! live in the crate that raises them (`quillc-par`, `quillc-sem`,
//! `quillc-eval`) since each renders its own verbatim diagnostic text.
//! This module only carries errors for the infrastructure underneath
//! them: the symbol interner and the index-vector family.

use thiserror::Error;

/// Error type for symbol interning operations.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("symbol index {0} is not present in the interner")]
    NotFound(u32),
}

/// Error type for `IndexVec` access.
#[derive(Debug, Error)]
pub enum IndexVecError {
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },
}
