//! Foundation types shared by every stage of the Quill pipeline:
//! interned identifier text (`symbol`), typed index vectors
//! (`index_vec`), and the infrastructure error types the higher
//! crates wrap their own diagnostics around.

pub mod error;
pub mod index_vec;
pub mod symbol;

pub use index_vec::{Idx, IndexVec};
pub use symbol::Symbol;
