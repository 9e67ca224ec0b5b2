//! Reading and writing `;`-delimited statement files

pub mod parser;
pub mod writer;

pub use parser::*;
pub use writer::*;

/// Field delimiter used by statement files
pub const DEFAULT_DELIMITER: u8 = b';';
