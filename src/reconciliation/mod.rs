//! Reconciliation passes over bank statements
//!
//! Each pass works on an in-memory [`CsvTable`](crate::types::CsvTable) and a
//! snapshot of the [`AccountDirectory`](crate::directory::AccountDirectory):
//! validation flags rows whose declared account disagrees with their origin,
//! correction rewrites them, splitting separates a statement holding several
//! accounts. [`Reconciler`] wires the passes to a statement store.

pub mod corrector;
pub mod engine;
pub mod prefix;
pub mod splitter;
pub mod validator;

pub use corrector::*;
pub use engine::*;
pub use prefix::*;
pub use splitter::*;
pub use validator::*;
