//! Lexer module: a single-pass, non-backtracking, total tokenizer.

mod core;

pub use core::Lexer;
