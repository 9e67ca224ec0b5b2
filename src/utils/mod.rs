//! Utility modules

pub mod fs_storage;
pub mod memory_storage;
pub mod validation;

pub use fs_storage::*;
pub use memory_storage::*;
pub use validation::*;
