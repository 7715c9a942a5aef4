//! Diagnostics raised while parsing and resolving names. Message text
//! is rendered once, at construction time, to match the exact wording
//! and punctuation the exceptions this was modeled on produce — the
//! error type itself just carries the finished string plus the line
//! it happened on.

use quillc_lex::{Token, TokenKind};

use crate::symtab::SymtabError;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParserError {
    pub message: String,
    pub line: u32,
}

fn wrap(line: u32, inner: &str) -> String {
    format!("An exception occured on line {line}. Message: {inner}")
}

impl ParserError {
    /// `Failed to parse [<kind> '<text>' on line <line>]. Expected ...`
    pub fn parse(received: &Token, expected: &[TokenKind]) -> Self {
        let expected_str = match expected {
            [] => "Invalid".to_string(),
            [one] => one.to_string(),
            many => {
                let mut s = String::from("one of following { ");
                for k in many {
                    s.push_str(&k.to_string());
                    s.push_str(", ");
                }
                s.push('}');
                s
            }
        };
        let message = format!("Failed to parse [{received}]. Expected {expected_str}.");
        ParserError {
            message,
            line: received.line,
        }
    }

    pub fn undefined_identifier(name: &str, line: u32) -> Self {
        ParserError {
            message: wrap(line, &format!("Found undefined identifier {name}.")),
            line,
        }
    }

    pub fn identifier_redefinition(name: &str, line: u32) -> Self {
        ParserError {
            message: wrap(line, &format!("Tried to redefine identifier {name}.")),
            line,
        }
    }

    pub fn undefined_identifier_by_id(id: u32, line: u32) -> Self {
        ParserError {
            message: wrap(
                line,
                &format!("Tried to access undefined identifier with id {id}."),
            ),
            line,
        }
    }

    pub fn from_symtab(err: SymtabError, line: u32) -> Self {
        match err {
            SymtabError::UndefinedIdentifier(name) => Self::undefined_identifier(&name, line),
            SymtabError::IdentifierRedefinition(name) => {
                Self::identifier_redefinition(&name, line)
            }
            SymtabError::UndefinedIdentifierById(id) => {
                Self::undefined_identifier_by_id(id, line)
            }
        }
    }
}
