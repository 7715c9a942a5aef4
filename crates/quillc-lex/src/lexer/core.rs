//! The `Lexer`: single-pass, non-backtracking, total over its input.
//!
//! Grounded on the teacher's `lexer/core.rs` dispatch-loop shape (a
//! cursor plus a `next_token` match over the first character), with
//! the character classes and token kinds replaced by Quill's own.

use quillc_util::symbol::Symbol;

use crate::cursor::Cursor;
use crate::token::{keyword_kind, operator_kind, Token, TokenKind};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_bracket(c: char) -> Option<TokenKind> {
    Some(match c {
        '(' => TokenKind::ParenOpen,
        ')' => TokenKind::ParenClose,
        '{' => TokenKind::CurlyOpen,
        '}' => TokenKind::CurlyClose,
        '[' => TokenKind::SquareOpen,
        ']' => TokenKind::SquareClose,
        _ => return None,
    })
}

/// Characters excluded from an operator run: brackets, the three
/// single-char punctuators, the string delimiter, and the comment
/// marker.
fn is_operator_char(c: char) -> bool {
    c.is_ascii_punctuation()
        && is_bracket(c).is_none()
        && !matches!(c, ',' | ';' | ':' | '"' | '#')
}

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            line: 1,
        }
    }

    /// Produces the next token. Total: once the input is exhausted,
    /// every subsequent call returns another `Eof` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let line = self.line;

        if self.cursor.is_at_end() {
            log::trace!("lex: eof at line {line}");
            return Token::new("", TokenKind::Eof, line);
        }

        let c = self.cursor.current();
        let token = if let Some(kind) = is_bracket(c) {
            self.single_char(kind, line)
        } else if c == ',' {
            self.single_char(TokenKind::Comma, line)
        } else if c == ';' {
            self.single_char(TokenKind::Semicolon, line)
        } else if c == ':' {
            self.single_char(TokenKind::Colon, line)
        } else if c == '"' {
            self.lex_string(line)
        } else if self.starts_number(c) {
            self.lex_number(line)
        } else if is_ident_start(c) {
            self.lex_identifier(line)
        } else {
            self.lex_operator(line)
        };

        log::trace!("lex: {token}");
        token
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                '\n' => {
                    self.line += 1;
                    self.cursor.advance();
                }
                '#' => {
                    while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
                        self.cursor.advance();
                    }
                }
                c if c.is_ascii_whitespace() => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind, line: u32) -> Token {
        let start = self.cursor.position();
        self.cursor.advance();
        Token::new(self.cursor.slice_from(start), kind, line)
    }

    fn lex_string(&mut self, line: u32) -> Token {
        let start = self.cursor.position();
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.current() {
                '"' => {
                    self.cursor.advance();
                    return Token::new(self.cursor.slice_from(start), TokenKind::String, line);
                }
                '\n' | '\0' => {
                    return Token::new(self.cursor.slice_from(start), TokenKind::Invalid, line);
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn starts_number(&self, c: char) -> bool {
        c.is_ascii_digit()
            || (c == '-' && (self.cursor.peek(1).is_ascii_digit() || self.cursor.peek(1) == '.'))
            || (c == '.' && self.cursor.peek(1).is_ascii_digit())
    }

    fn lex_number(&mut self, line: u32) -> Token {
        let start = self.cursor.position();
        let mut dots = 0u32;
        let mut dashes = 0u32;
        loop {
            match self.cursor.current() {
                '.' if self.cursor.peek(1).is_ascii_digit() => {
                    dots += 1;
                    self.cursor.advance();
                }
                '.' => break,
                '-' => {
                    dashes += 1;
                    self.cursor.advance();
                }
                c if c.is_ascii_digit() => {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        let text = self.cursor.slice_from(start);
        let trailing_dot = text.ends_with('.');
        let kind = if dots >= 2 || dashes > 1 || trailing_dot {
            TokenKind::Invalid
        } else {
            TokenKind::Number
        };
        Token::new(text, kind, line)
    }

    fn lex_identifier(&mut self, line: u32) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
        // Interning keeps later name-resolution comparisons cheap even
        // though the token itself still carries the owned lexeme text.
        let _ = Symbol::from(text);
        Token::new(text, kind, line)
    }

    fn lex_operator(&mut self, line: u32) -> Token {
        let start = self.cursor.position();
        while is_operator_char(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        if text.is_empty() {
            // A punctuation character excluded from operator runs but
            // not otherwise recognized (only reachable if the dispatch
            // above and this predicate ever disagree) still needs to
            // make forward progress.
            let c = self.cursor.advance();
            return Token::new(c.to_string(), TokenKind::Invalid, line);
        }
        let kind = operator_kind(text).unwrap_or(TokenKind::Invalid);
        Token::new(text, kind, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn empty_source_is_just_eof() {
        let toks = tokens("");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Eof);
    }

    #[test]
    fn eof_repeats_after_exhaustion() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn brackets_and_punctuation() {
        let toks = tokens("(){}[],;:");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ParenOpen,
                TokenKind::ParenClose,
                TokenKind::CurlyOpen,
                TokenKind::CurlyClose,
                TokenKind::SquareOpen,
                TokenKind::SquareClose,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comment_is_skipped_and_newline_counts_lines() {
        let toks = tokens("# a comment\nfoo");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].line, 2);
    }

    #[test]
    fn keywords_are_recognized() {
        let toks = tokens(
            "func object new var return if elseif else while do for in true false null as",
        );
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Func,
                TokenKind::Object,
                TokenKind::New,
                TokenKind::Var,
                TokenKind::Return,
                TokenKind::If,
                TokenKind::Elseif,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Do,
                TokenKind::For,
                TokenKind::In,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::As,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifier_keeps_keyword_like_prefix_distinct() {
        let toks = tokens("funct");
        assert_eq!(toks[0].kind, TokenKind::Identifier);
        assert_eq!(toks[0].text, "funct");
    }

    #[test]
    fn string_literal_includes_quotes() {
        let toks = tokens(r#""hello world""#);
        assert_eq!(toks[0].kind, TokenKind::String);
        assert_eq!(toks[0].text, "\"hello world\"");
    }

    #[test]
    fn unterminated_string_is_invalid_and_keeps_opened_prefix() {
        let toks = tokens("\"abc\ndef");
        assert_eq!(toks[0].kind, TokenKind::Invalid);
        assert_eq!(toks[0].text, "\"abc");
    }

    #[test]
    fn numbers_plain_negative_and_fractional() {
        let toks = tokens("12 -5 3.14 -2.5 .5");
        let got: Vec<_> = toks
            .iter()
            .take(5)
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (TokenKind::Number, "12"),
                (TokenKind::Number, "-5"),
                (TokenKind::Number, "3.14"),
                (TokenKind::Number, "-2.5"),
                (TokenKind::Number, ".5"),
            ]
        );
    }

    #[test]
    fn malformed_numbers_are_invalid() {
        assert_eq!(tokens("1.2.3")[0].kind, TokenKind::Invalid);
        assert_eq!(tokens("1.")[0].kind, TokenKind::Invalid);
        assert_eq!(tokens("--1")[0].kind, TokenKind::Invalid);
    }

    #[test]
    fn bare_dot_is_an_operator_not_a_number() {
        let toks = tokens(".");
        assert_eq!(toks[0].kind, TokenKind::BinaryOperator);
        assert_eq!(toks[0].text, ".");
    }

    #[test]
    fn operator_runs_are_maximal_and_classified() {
        let toks = tokens("== != <= >= && || += -= *= /= ..< ... ->");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::BinaryOperator,
                TokenKind::RangeOperator,
                TokenKind::RangeOperator,
                TokenKind::BinaryOperator,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unrecognized_operator_run_is_invalid() {
        let toks = tokens("@@@");
        assert_eq!(toks[0].kind, TokenKind::Invalid);
        assert_eq!(toks[0].text, "@@@");
    }
}
