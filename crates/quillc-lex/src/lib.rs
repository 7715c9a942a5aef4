//! Character-stream to token-stream front end.
//!
//! `Lexer::next_token` is the only operation; it never fails — a
//! malformed lexeme becomes a `Token` of kind `Invalid` for the parser
//! to reject at its point of use.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{keyword_kind, operator_kind, Token, TokenKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any input, however garbled, lexes to a finite token sequence
        /// terminated by `Eof`, and `Eof` keeps reproducing afterward.
        #[test]
        fn lexing_always_terminates_with_eof(source in ".{0,200}") {
            let mut lexer = Lexer::new(&source);
            let mut saw_eof = false;
            for _ in 0..10_000 {
                let tok = lexer.next_token();
                if tok.kind == TokenKind::Eof {
                    saw_eof = true;
                    break;
                }
            }
            prop_assert!(saw_eof);
            prop_assert_eq!(lexer.next_token().kind, TokenKind::Eof);
            prop_assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        }
    }
}
