//! Runtime diagnostics (§4.4, §6.5, §7). `OperatorTypeMismatch` and
//! the identifier-lookup messages follow §6.5's verbatim wording —
//! note that's "No operator for this type.", not the source's own
//! "No operator+ for this type." (`ValueOperators.hpp`), which names
//! the operator that happened to trigger the check rather than
//! speaking generally.

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn undefined_identifier(name: &str) -> Self {
        RuntimeError {
            message: format!("Found undefined identifier {name}."),
        }
    }

    pub fn undefined_identifier_by_id(id: u32) -> Self {
        RuntimeError {
            message: format!("Tried to access undefined identifier with id {id}."),
        }
    }

    /// §7 lists `ArgumentCountMismatch(expected, actual)` with no line
    /// field — unlike `TypeMismatch`, which always carries one. The
    /// source has no fixed wording here either (`Evaluator.hpp` just
    /// throws `"Wrong number of arguments."`); this keeps the two
    /// numbers in the message since they're the whole point of the
    /// diagnostic.
    pub fn argument_count_mismatch(expected: usize, actual: usize) -> Self {
        RuntimeError {
            message: format!("Argument count mismatch. Expected {expected} got {actual}."),
        }
    }

    pub fn operator_type_mismatch() -> Self {
        RuntimeError {
            message: "No operator for this type.".to_string(),
        }
    }

    pub fn type_mismatch(expected: &str, actual: &str, line: u32) -> Self {
        RuntimeError {
            message: format!(
                "Type mismatch error on line {line}. Expected \"{expected}\" got \"{actual}\"."
            ),
        }
    }

    /// Not named anywhere in the source material: stdin can run dry
    /// mid-token-read, and something has to happen rather than a hang
    /// or a panic.
    pub fn end_of_input() -> Self {
        RuntimeError {
            message: "Unexpected end of input.".to_string(),
        }
    }

    pub fn io(source: &dyn std::fmt::Display) -> Self {
        RuntimeError {
            message: format!("I/O error: {source}."),
        }
    }
}
