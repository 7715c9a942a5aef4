//! Typed AST to runtime value: the tree-walking evaluator (§4.4).
//! Grounded on the source's `Evaluator` (`Evaluator.hpp`) — a frame
//! chained to its parent by pointer, walked for lookups and mutated
//! in place for assignment — with every stubbed or commented-out code
//! path filled in per the spec's prose rather than carried over.

mod error;
mod eval;
mod frame;
mod host;
mod value;

pub use error::RuntimeError;
pub use eval::evaluate;
pub use value::{ObjectValue, Value};
